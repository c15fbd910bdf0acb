use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::tile::{Tile, TileKind};
use crate::errors::{EngineResult, GameError};

/// 翻牌结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WildReveal {
    /// 翻开的牌（离开牌墙，不再参与游戏）
    pub flipped: Tile,
    /// 癞子身份（翻开牌的下一张）
    pub wild_kind: TileKind,
}

/// 牌墙（Wall）
///
/// 正常摸牌从牌墙头部取，杠后补牌从牌墙尾部取
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wall {
    /// 牌堆：front 为头部，back 为尾部
    tiles: VecDeque<Tile>,
    /// 本局的翻牌结果
    reveal: Option<WildReveal>,
}

impl Wall {
    /// 创建一副完整的牌墙（136 张，按规范顺序，未洗牌）
    pub fn new() -> Self {
        Self::from_tiles(Tile::full_set())
    }

    /// 按摸牌顺序构造牌墙：第一个元素最先从头部摸出
    pub fn from_tiles(tiles: Vec<Tile>) -> Self {
        Self {
            tiles: tiles.into(),
            reveal: None,
        }
    }

    /// 使用指定随机数发生器洗牌
    ///
    /// Fisher-Yates 洗牌，时间复杂度 O(n)
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.tiles.make_contiguous().shuffle(rng);
    }

    /// 从头部摸一张牌
    pub fn draw_head(&mut self) -> EngineResult<Tile> {
        self.tiles.pop_front().ok_or(GameError::EmptyWall)
    }

    /// 从尾部摸一张牌（杠后补牌）
    pub fn draw_tail(&mut self) -> EngineResult<Tile> {
        self.tiles.pop_back().ok_or(GameError::EmptyWall)
    }

    /// 翻牌确定癞子
    ///
    /// 从头部翻开一张牌，癞子为其下一张牌的身份，并标记牌墙中所有该身份的牌。
    /// 其他区域（手牌、弃牌、牌组）的标记由调用方传播。
    pub fn reveal_wild(&mut self) -> EngineResult<WildReveal> {
        debug_assert!(self.reveal.is_none(), "每局只翻一次牌");

        let flipped = self.draw_head()?;
        let wild_kind = flipped.kind().successor();
        for tile in self.tiles.iter_mut() {
            tile.mark_wild_if(wild_kind);
        }

        let reveal = WildReveal { flipped, wild_kind };
        self.reveal = Some(reveal);
        Ok(reveal)
    }

    /// 本局翻牌结果（未翻牌时为 None）
    pub fn reveal(&self) -> Option<&WildReveal> {
        self.reveal.as_ref()
    }

    /// 查询剩余牌数
    pub fn remaining_count(&self) -> usize {
        self.tiles.len()
    }

    /// 检查牌堆是否为空
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// 按摸牌顺序遍历剩余的牌
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }
}

impl Default for Wall {
    fn default() -> Self {
        Self::new()
    }
}
