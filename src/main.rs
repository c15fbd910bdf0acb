//! 可执行文件入口：四个随机出牌的玩家打一局
//!
//! 第一个参数可以是规则配置（JSON）文件的路径，日志级别由 `RUST_LOG` 控制

use std::env;
use std::fs;
use std::process::ExitCode;

use laizi_engine::{GameEngine, RandomDiscardProvider, RuleConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn load_config() -> Result<RuleConfig, Box<dyn std::error::Error>> {
    match env::args().nth(1) {
        Some(path) => {
            let json = fs::read_to_string(&path)?;
            Ok(RuleConfig::from_json(&json)?)
        }
        None => Ok(RuleConfig::default()),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "读取规则配置失败");
            return ExitCode::FAILURE;
        }
    };

    // 没有配置种子时，出牌也用随机种子
    let mut provider = match config.seed {
        Some(seed) => RandomDiscardProvider::seeded(seed),
        None => RandomDiscardProvider::new(StdRng::from_entropy()),
    };
    let mut engine = GameEngine::with_config(config);

    match engine.run(&mut provider) {
        Ok(outcome) => {
            info!(winner = ?outcome.winner, reason = ?outcome.reason, "对局结束");
            match serde_json::to_string_pretty(&engine.snapshot()) {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    error!(%err, "快照序列化失败");
                    ExitCode::FAILURE
                }
            }
        }
        Err(err) => {
            error!(%err, "对局出错");
            ExitCode::FAILURE
        }
    }
}
