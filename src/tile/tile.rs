use std::fmt;

use serde::{Deserialize, Serialize};

/// 花色枚举
///
/// 顺序即规范顺序：万、条、筒、字
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    Wan = 0,
    Tiao = 1,
    Tong = 2,
    Honor = 3,
}

/// 字牌（东南西北中发白）
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Honor {
    East = 0,
    South = 1,
    West = 2,
    North = 3,
    Red = 4,
    Green = 5,
    White = 6,
}

impl Honor {
    /// 翻牌循环顺序
    pub const ALL: [Honor; 7] = [
        Honor::East,
        Honor::South,
        Honor::West,
        Honor::North,
        Honor::Red,
        Honor::Green,
        Honor::White,
    ];

    /// 下一张字牌（白 → 东）
    pub fn successor(self) -> Honor {
        Self::ALL[(self as usize + 1) % Self::ALL.len()]
    }

    fn symbol(self) -> &'static str {
        match self {
            Honor::East => "东",
            Honor::South => "南",
            Honor::West => "西",
            Honor::North => "北",
            Honor::Red => "中",
            Honor::Green => "发",
            Honor::White => "白",
        }
    }
}

/// 牌的身份（花色 + 点数）
///
/// 身份创建后不可变；派生的 `Ord` 即规范顺序（万 1-9、条 1-9、筒 1-9、东南西北中发白）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// 万子（1-9）
    Wan(u8),
    /// 条子（1-9）
    Tiao(u8),
    /// 筒子（1-9）
    Tong(u8),
    /// 字牌
    Honor(Honor),
}

impl TileKind {
    /// 身份种类数：27 数牌 + 7 字牌
    pub const COUNT: usize = 34;

    pub const MIN_RANK: u8 = 1;
    pub const MAX_RANK: u8 = 9;

    /// 创建数牌身份，验证输入有效性
    pub fn numeral(suit: Suit, rank: u8) -> Option<Self> {
        if !(Self::MIN_RANK..=Self::MAX_RANK).contains(&rank) {
            return None;
        }
        match suit {
            Suit::Wan => Some(TileKind::Wan(rank)),
            Suit::Tiao => Some(TileKind::Tiao(rank)),
            Suit::Tong => Some(TileKind::Tong(rank)),
            Suit::Honor => None,
        }
    }

    /// 获取花色
    pub fn suit(&self) -> Suit {
        match self {
            TileKind::Wan(_) => Suit::Wan,
            TileKind::Tiao(_) => Suit::Tiao,
            TileKind::Tong(_) => Suit::Tong,
            TileKind::Honor(_) => Suit::Honor,
        }
    }

    /// 获取数字（字牌返回 None）
    pub fn rank(&self) -> Option<u8> {
        match self {
            TileKind::Wan(r) | TileKind::Tiao(r) | TileKind::Tong(r) => Some(*r),
            TileKind::Honor(_) => None,
        }
    }

    /// 规范索引（0-33）
    ///
    /// - 万子：0-8
    /// - 条子：9-17
    /// - 筒子：18-26
    /// - 字牌：27-33
    pub fn index(&self) -> usize {
        match self {
            TileKind::Wan(r) => (*r - 1) as usize,
            TileKind::Tiao(r) => 9 + (*r - 1) as usize,
            TileKind::Tong(r) => 18 + (*r - 1) as usize,
            TileKind::Honor(h) => 27 + *h as usize,
        }
    }

    /// 从规范索引创建身份
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0..=8 => Some(TileKind::Wan(index as u8 + 1)),
            9..=17 => Some(TileKind::Tiao(index as u8 - 8)),
            18..=26 => Some(TileKind::Tong(index as u8 - 17)),
            27..=33 => Some(TileKind::Honor(Honor::ALL[index - 27])),
            _ => None,
        }
    }

    /// 按规范顺序遍历全部 34 种身份
    pub fn all() -> impl Iterator<Item = TileKind> {
        (0..Self::COUNT).filter_map(TileKind::from_index)
    }

    /// 翻牌规则：下一张牌的身份
    ///
    /// 数牌 9 → 1 循环，字牌按东南西北中发白循环
    pub fn successor(&self) -> TileKind {
        match self {
            TileKind::Wan(r) => TileKind::Wan(r % 9 + 1),
            TileKind::Tiao(r) => TileKind::Tiao(r % 9 + 1),
            TileKind::Tong(r) => TileKind::Tong(r % 9 + 1),
            TileKind::Honor(h) => TileKind::Honor(h.successor()),
        }
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileKind::Wan(r) => write!(f, "{}万", r),
            TileKind::Tiao(r) => write!(f, "{}条", r),
            TileKind::Tong(r) => write!(f, "{}筒", r),
            TileKind::Honor(h) => write!(f, "{}", h.symbol()),
        }
    }
}

/// 一张实体牌
///
/// 身份不可变；癞子标记每局设置一次，同一身份的所有牌共享同一标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tile {
    kind: TileKind,
    is_wild: bool,
}

impl Tile {
    /// 总牌数：136 张
    pub const TOTAL_COUNT: usize = 136;

    /// 每种牌的数量
    pub const COPIES: u8 = 4;

    pub fn new(kind: TileKind) -> Self {
        Self { kind, is_wild: false }
    }

    /// 带癞子标记的副本
    pub fn with_wild(mut self, is_wild: bool) -> Self {
        self.is_wild = is_wild;
        self
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn is_wild(&self) -> bool {
        self.is_wild
    }

    /// 如果身份与癞子身份相同则打上癞子标记
    pub(crate) fn mark_wild_if(&mut self, wild_kind: TileKind) {
        if self.kind == wild_kind {
            self.is_wild = true;
        }
    }

    /// 一副完整的牌（按规范顺序，每种 4 张）
    pub fn full_set() -> Vec<Tile> {
        let mut tiles = Vec::with_capacity(Self::TOTAL_COUNT);
        for kind in TileKind::all() {
            for _ in 0..Self::COPIES {
                tiles.push(Tile::new(kind));
            }
        }
        tiles
    }
}

impl From<TileKind> for Tile {
    fn from(kind: TileKind) -> Self {
        Tile::new(kind)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wild {
            write!(f, "{}*", self.kind)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}
