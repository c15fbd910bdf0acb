use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::game::player::Player;
use crate::tile::{Tile, TileKind, WildReveal};

/// 多余癞子的拆分
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcessWilds {
    /// 没有别的用处，建议杠出来的癞子数
    pub unusable: u8,
    /// 可以按自身身份当普通牌使用的癞子数
    pub as_natural: u8,
}

impl ExcessWilds {
    pub fn total(&self) -> u8 {
        self.unusable + self.as_natural
    }
}

/// 红中（杠牌字牌）相关的建议
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusHonorHint {
    /// 多余的张数，建议杠出来
    GangExcess(u8),
    /// 可以杠
    CanGang,
    /// 未吃碰，可以全部当癞子用
    UseAllAsWild,
    /// 未吃碰，也可以选择杠
    MayGangInstead,
}

impl fmt::Display for BonusHonorHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BonusHonorHint::GangExcess(n) => write!(f, "有 {} 张多余的杠牌，建议杠出来翻倍", n),
            BonusHonorHint::CanGang => write!(f, "可以开杠翻倍"),
            BonusHonorHint::UseAllAsWild => write!(f, "可以全部当作癞子使用"),
            BonusHonorHint::MayGangInstead => write!(f, "也可以选择开杠翻倍"),
        }
    }
}

/// 杠牌字牌的状况（只作建议，引擎不强制）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusHonorAdvice {
    pub kind: TileKind,
    /// 手中张数
    pub count: u8,
    /// 本局是否同时是癞子
    pub is_wild: bool,
    /// 是否可以暗杠（4 张）
    pub can_gang: bool,
    /// 别人打出时是否可以明杠（3 张）
    pub can_open_gang: bool,
    /// 既是癞子又已吃碰，且多于一张
    pub must_gang: bool,
    /// 超出的张数
    pub excess_count: u8,
    pub recommendations: Vec<BonusHonorHint>,
}

/// 癞子使用建议
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WildSuggestion {
    /// 没有癞子
    NoWilds,
    /// 可以使用全部癞子
    UseAll(u8),
    /// 已吃碰，最多使用指定张数
    Capped(u8),
    /// 多余的癞子建议杠出来
    GangExcess(u8),
    /// 多余的癞子可以当普通牌
    UseAsNatural(u8),
}

impl fmt::Display for WildSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WildSuggestion::NoWilds => write!(f, "没有癞子"),
            WildSuggestion::UseAll(n) => write!(f, "可以使用全部 {} 张癞子", n),
            WildSuggestion::Capped(n) => write!(f, "已吃碰，最多只能使用 {} 张癞子", n),
            WildSuggestion::GangExcess(n) => write!(f, "有 {} 张多余癞子，建议杠出来翻倍", n),
            WildSuggestion::UseAsNatural(n) => write!(f, "有 {} 张癞子可以当普通牌使用", n),
        }
    }
}

/// 癞子使用情况汇总
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WildUsageReport {
    pub total: u8,
    pub usable: u8,
    pub excess: u8,
    pub as_natural: u8,
    pub can_use_multiple: bool,
    pub bonus_honor: Option<BonusHonorAdvice>,
    pub suggestions: SmallVec<[WildSuggestion; 4]>,
}

/// 癞子管理器
///
/// 判断癞子身份、可用张数，并给出多余癞子和杠牌字牌的建议。
/// 管理器只读取玩家状态，从不修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WildTileManager {
    reveal: Option<WildReveal>,
    bonus_honor: TileKind,
    claimed_cap: u8,
}

impl WildTileManager {
    pub fn new(bonus_honor: TileKind, claimed_cap: u8) -> Self {
        Self {
            reveal: None,
            bonus_honor,
            claimed_cap,
        }
    }

    /// 记录本局翻牌结果
    pub fn set_reveal(&mut self, reveal: WildReveal) {
        self.reveal = Some(reveal);
    }

    pub fn reveal(&self) -> Option<&WildReveal> {
        self.reveal.as_ref()
    }

    /// 本局癞子身份（未翻牌时为 None）
    pub fn wild_kind(&self) -> Option<TileKind> {
        self.reveal.map(|r| r.wild_kind)
    }

    pub fn bonus_honor(&self) -> TileKind {
        self.bonus_honor
    }

    /// 杠牌字牌本局是否也是癞子
    pub fn bonus_honor_is_wild(&self) -> bool {
        self.wild_kind() == Some(self.bonus_honor)
    }

    /// 是否是癞子：只看身份，与所在区域无关
    pub fn is_wild(&self, tile: &Tile) -> bool {
        self.wild_kind() == Some(tile.kind())
    }

    /// 未吃碰时可以使用多张癞子
    pub fn can_use_multiple(&self, player: &Player) -> bool {
        !player.has_claimed_meld
    }

    /// 手牌中的癞子张数
    pub fn wild_count(&self, tiles: &[Tile]) -> u8 {
        tiles.iter().filter(|t| self.is_wild(t)).count() as u8
    }

    /// 可使用的癞子张数
    ///
    /// 未吃碰时为全部癞子；吃碰之后最多 `claimed_cap` 张
    pub fn usable_wild_count(&self, player: &Player, tiles: &[Tile]) -> u8 {
        let count = self.wild_count(tiles);
        if self.can_use_multiple(player) {
            count
        } else {
            count.min(self.claimed_cap)
        }
    }

    /// 多余的癞子
    ///
    /// 能按自身身份组成刻子或顺子的记为 `as_natural`，其余记为 `unusable`
    pub fn excess_wilds(&self, player: &Player, tiles: &[Tile]) -> ExcessWilds {
        let total = self.wild_count(tiles);
        let usable = self.usable_wild_count(player, tiles);
        let excess = total - usable;
        if excess == 0 {
            return ExcessWilds::default();
        }

        match self.wild_kind() {
            Some(kind) if self.forms_meld_as_natural(kind, tiles) => ExcessWilds {
                unusable: 0,
                as_natural: excess,
            },
            _ => ExcessWilds {
                unusable: excess,
                as_natural: 0,
            },
        }
    }

    /// 癞子身份的牌能否按自身组成面子
    ///
    /// 刻子：持有至少 3 张该身份的牌；顺子：包含它的某个三连点数都在手中
    fn forms_meld_as_natural(&self, kind: TileKind, tiles: &[Tile]) -> bool {
        let count_of = |k: TileKind| tiles.iter().filter(|t| t.kind() == k).count();
        if count_of(kind) >= 3 {
            return true;
        }

        let Some(rank) = kind.rank() else {
            return false;
        };
        let suit = kind.suit();
        let lowest = rank.saturating_sub(2).max(TileKind::MIN_RANK);
        let highest = rank.min(TileKind::MAX_RANK - 2);
        (lowest..=highest).any(|start| {
            (start..start + 3).all(|r| TileKind::numeral(suit, r).map_or(false, |k| count_of(k) > 0))
        })
    }

    /// 杠牌字牌的建议
    ///
    /// 手中没有时返回 None
    pub fn bonus_honor_advice(&self, player: &Player, tiles: &[Tile]) -> Option<BonusHonorAdvice> {
        let count = tiles.iter().filter(|t| t.kind() == self.bonus_honor).count() as u8;
        if count == 0 {
            return None;
        }

        let is_wild = self.bonus_honor_is_wild();
        let can_gang = count >= 4;
        let can_open_gang = count >= 3;
        let mut must_gang = false;
        let mut excess_count = 0;
        let mut recommendations = Vec::new();

        if is_wild && player.has_claimed_meld {
            if count > 1 {
                must_gang = true;
                excess_count = count - 1;
                recommendations.push(BonusHonorHint::GangExcess(excess_count));
            }
            if can_gang {
                recommendations.push(BonusHonorHint::CanGang);
            }
        } else if is_wild {
            recommendations.push(BonusHonorHint::UseAllAsWild);
            if can_gang {
                recommendations.push(BonusHonorHint::MayGangInstead);
            }
        } else if can_gang {
            recommendations.push(BonusHonorHint::CanGang);
        }

        Some(BonusHonorAdvice {
            kind: self.bonus_honor,
            count,
            is_wild,
            can_gang,
            can_open_gang,
            must_gang,
            excess_count,
            recommendations,
        })
    }

    /// 癞子使用情况汇总
    pub fn usage_report(&self, player: &Player, tiles: &[Tile]) -> WildUsageReport {
        let total = self.wild_count(tiles);
        let usable = self.usable_wild_count(player, tiles);
        let excess = self.excess_wilds(player, tiles);
        let can_use_multiple = self.can_use_multiple(player);

        let mut suggestions = SmallVec::new();
        if total == 0 {
            suggestions.push(WildSuggestion::NoWilds);
        } else {
            if can_use_multiple {
                suggestions.push(WildSuggestion::UseAll(total));
            } else {
                suggestions.push(WildSuggestion::Capped(self.claimed_cap));
            }
            if excess.unusable > 0 {
                suggestions.push(WildSuggestion::GangExcess(excess.unusable));
            }
            if excess.as_natural > 0 {
                suggestions.push(WildSuggestion::UseAsNatural(excess.as_natural));
            }
        }

        WildUsageReport {
            total,
            usable,
            excess: excess.unusable,
            as_natural: excess.as_natural,
            can_use_multiple,
            bonus_honor: self.bonus_honor_advice(player, tiles),
            suggestions,
        }
    }
}
