use serde::{Deserialize, Serialize};

use crate::game::constants::NUM_PLAYERS;
use crate::tile::Honor;

/// 规则配置
///
/// 所有字段都有默认值，JSON 中缺省的字段按默认值处理
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// 任何时候都可以开杠的字牌（默认红中）
    pub bonus_honor: Honor,
    /// 吃碰之后可使用的癞子数
    pub claimed_wild_cap: u8,
    /// 无人响应时下家是否自动摸牌
    pub auto_draw: bool,
    /// 洗牌种子（None 时使用线程随机数）
    pub seed: Option<u64>,
    /// 庄家座位
    pub dealer: u8,
    /// 快照中显示完整手牌的座位
    pub local_player: u8,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            bonus_honor: Honor::Red,
            claimed_wild_cap: 1,
            auto_draw: true,
            seed: None,
            dealer: 0,
            local_player: 0,
        }
    }
}

impl RuleConfig {
    /// 从 JSON 读取配置
    ///
    /// 座位号超出范围时按 4 取模
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let config: RuleConfig = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// 座位号按 4 取模
    pub fn normalized(mut self) -> Self {
        self.dealer %= NUM_PLAYERS;
        self.local_player %= NUM_PLAYERS;
        self
    }
}
