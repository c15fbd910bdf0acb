use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::tile::{Tile, TileKind};

/// 手牌（Hand）
///
/// 按规范顺序保持有序，出牌时的手牌索引即有序位置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    tiles: Vec<Tile>,
}

impl Hand {
    /// 创建空手牌
    pub fn new() -> Self {
        Self { tiles: Vec::with_capacity(14) }
    }

    /// 从任意顺序的牌创建手牌
    pub fn from_tiles(mut tiles: Vec<Tile>) -> Self {
        tiles.sort();
        Self { tiles }
    }

    /// 添加一张牌（插入到有序位置）
    pub fn add_tile(&mut self, tile: Tile) {
        let pos = self.tiles.partition_point(|t| *t <= tile);
        self.tiles.insert(pos, tile);
    }

    /// 按索引移除一张牌
    pub fn remove_at(&mut self, index: usize) -> Option<Tile> {
        if index < self.tiles.len() {
            Some(self.tiles.remove(index))
        } else {
            None
        }
    }

    /// 移除 `amount` 张指定身份的牌
    ///
    /// 数量不足时不做任何修改，返回 None
    pub fn remove_kind(&mut self, kind: TileKind, amount: u8) -> Option<SmallVec<[Tile; 4]>> {
        if self.count_of(kind) < amount {
            return None;
        }
        let mut removed = SmallVec::new();
        for _ in 0..amount {
            let index = self.find_index(kind)?;
            removed.push(self.tiles.remove(index));
        }
        Some(removed)
    }

    /// 查询某种牌的数量
    pub fn count_of(&self, kind: TileKind) -> u8 {
        self.tiles.iter().filter(|t| t.kind() == kind).count() as u8
    }

    pub fn contains(&self, kind: TileKind) -> bool {
        self.find_index(kind).is_some()
    }

    /// 某种牌第一次出现的索引
    pub fn find_index(&self, kind: TileKind) -> Option<usize> {
        self.tiles.iter().position(|t| t.kind() == kind)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// 获取总牌数
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// 清空手牌
    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    /// 手牌中带癞子标记的牌数
    pub fn wild_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_wild()).count()
    }

    /// 标记所有该身份的牌为癞子
    pub fn mark_wild(&mut self, wild_kind: TileKind) {
        for tile in self.tiles.iter_mut() {
            tile.mark_wild_if(wild_kind);
        }
    }

    /// 所有不同的牌身份（规范顺序）
    pub fn distinct_kinds(&self) -> SmallVec<[TileKind; 14]> {
        let mut result: SmallVec<[TileKind; 14]> = SmallVec::new();
        for tile in &self.tiles {
            if result.last() != Some(&tile.kind()) {
                result.push(tile.kind());
            }
        }
        result
    }
}
