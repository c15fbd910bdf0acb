use serde::{Deserialize, Serialize};

use crate::tile::{Tile, TileKind};

/// 牌组类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeldKind {
    /// 吃（顺子）
    Chi,
    /// 碰（刻子）
    Peng,
    /// 明杠
    Gang,
    /// 暗杠
    ConcealedGang,
}

impl MeldKind {
    /// 是否是从别人弃牌得来的牌组
    pub fn is_claimed(self) -> bool {
        !matches!(self, MeldKind::ConcealedGang)
    }
}

/// 已亮出的牌组
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    pub kind: MeldKind,
    /// 组成牌组的实体牌（含吃碰杠来的那张）
    pub tiles: Vec<Tile>,
    /// 被吃碰杠的弃牌来自哪个座位（暗杠为 None）
    pub claimed_from: Option<u8>,
}

impl Meld {
    pub fn new(kind: MeldKind, tiles: Vec<Tile>, claimed_from: Option<u8>) -> Self {
        let mut tiles = tiles;
        tiles.sort();
        Self { kind, tiles, claimed_from }
    }

    /// 刻子或杠的牌身份（吃返回 None）
    pub fn set_kind(&self) -> Option<TileKind> {
        match self.kind {
            MeldKind::Chi => None,
            _ => self.tiles.first().map(|t| t.kind()),
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
