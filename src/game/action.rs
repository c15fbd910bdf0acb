use serde::{Deserialize, Serialize};

use crate::game::constants::{CHI_PRIORITY, GANG_PRIORITY, PENG_PRIORITY, WIN_PRIORITY};
use crate::tile::{Suit, TileKind};

/// 响应类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClaimKind {
    /// 吃
    Chi,
    /// 碰
    Peng,
    /// 杠
    Gang,
    /// 胡
    Win,
}

impl ClaimKind {
    /// 基础优先级（红中杠另行提升）
    pub fn base_priority(self) -> u8 {
        match self {
            ClaimKind::Chi => CHI_PRIORITY,
            ClaimKind::Peng => PENG_PRIORITY,
            ClaimKind::Gang => GANG_PRIORITY,
            ClaimKind::Win => WIN_PRIORITY,
        }
    }
}

/// 吃牌选项：手牌中与弃牌组成顺子的两张牌
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChiOption {
    pub suit: Suit,
    pub ranks: [u8; 2],
}

impl ChiOption {
    /// 需要从手牌中拿出的两张牌
    pub fn kinds(&self) -> [Option<TileKind>; 2] {
        [
            TileKind::numeral(self.suit, self.ranks[0]),
            TileKind::numeral(self.suit, self.ranks[1]),
        ]
    }
}

/// 对一次弃牌的决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimDecision {
    /// 过
    Pass,
    Chi(ChiOption),
    Peng,
    Gang,
    Win,
}

impl ClaimDecision {
    /// 响应类型（过返回 None）
    pub fn kind(&self) -> Option<ClaimKind> {
        match self {
            ClaimDecision::Pass => None,
            ClaimDecision::Chi(_) => Some(ClaimKind::Chi),
            ClaimDecision::Peng => Some(ClaimKind::Peng),
            ClaimDecision::Gang => Some(ClaimKind::Gang),
            ClaimDecision::Win => Some(ClaimKind::Win),
        }
    }
}

/// 动作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// 摸牌
    Draw,
    /// 出牌（手牌有序位置）
    Discard { hand_index: usize },
    /// 响应别人的弃牌
    Claim(ClaimDecision),
    /// 暗杠
    ConcealedGang { kind: TileKind },
    /// 自摸胡
    SelfDrawWin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priorities() {
        assert!(ClaimKind::Win.base_priority() > ClaimKind::Gang.base_priority());
        assert!(ClaimKind::Gang.base_priority() > ClaimKind::Peng.base_priority());
        assert!(ClaimKind::Peng.base_priority() > ClaimKind::Chi.base_priority());
    }

    #[test]
    fn test_decision_kind() {
        assert_eq!(ClaimDecision::Pass.kind(), None);
        let chi = ClaimDecision::Chi(ChiOption { suit: Suit::Wan, ranks: [2, 3] });
        assert_eq!(chi.kind(), Some(ClaimKind::Chi));
    }

    #[test]
    fn test_chi_option_kinds() {
        let option = ChiOption { suit: Suit::Tong, ranks: [4, 6] };
        assert_eq!(option.kinds(), [Some(TileKind::Tong(4)), Some(TileKind::Tong(6))]);
    }
}
