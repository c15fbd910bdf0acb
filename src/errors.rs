use std::fmt;

use crate::game::action::ClaimKind;

/// 引擎错误
///
/// 所有错误都在命令边界立即返回，引擎内部不做重试
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// 非当前玩家（或不在响应名单中的玩家）执行动作，或阶段不允许该动作
    InvalidTurn { player: u8 },
    /// 手牌索引越界
    InvalidIndex { index: usize, len: usize },
    /// 牌墙已空（底层摸牌原语）
    EmptyWall,
    /// 不满足前提条件的吃/碰/杠/胡
    IllegalClaim { player: u8, kind: ClaimKind },
    /// 胡牌判定的牌数不是 14 张
    MalformedHand { count: usize },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidTurn { player } => {
                write!(f, "不是玩家 {} 的回合", player)
            }
            GameError::InvalidIndex { index, len } => {
                write!(f, "无效的牌索引 {}（手牌共 {} 张）", index, len)
            }
            GameError::EmptyWall => write!(f, "牌堆已空"),
            GameError::IllegalClaim { player, kind } => {
                write!(f, "玩家 {} 无法执行 {:?}", player, kind)
            }
            GameError::MalformedHand { count } => {
                write!(f, "胡牌检查失败：牌数不对，当前 {} 张，需要 14 张", count)
            }
        }
    }
}

impl std::error::Error for GameError {}

pub type EngineResult<T> = Result<T, GameError>;
