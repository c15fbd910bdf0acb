use serde::{Deserialize, Serialize};

use crate::game::meld::Meld;
use crate::tile::{Hand, Tile, TileKind};

/// 玩家状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// 玩家 ID（座位号）
    pub id: u8,
    /// 手牌
    pub hand: Hand,
    /// 已吃/碰/杠的牌组
    pub melds: Vec<Meld>,
    /// 弃牌（按打出顺序）
    pub discards: Vec<Tile>,
    /// 是否吃/碰/明杠过
    ///
    /// 一局之内只会从 false 变成 true，决定可用癞子数
    pub has_claimed_meld: bool,
    /// 是否庄家
    pub is_dealer: bool,
}

impl Player {
    /// 创建新玩家
    pub fn new(id: u8) -> Self {
        Self {
            id,
            hand: Hand::new(),
            melds: Vec::new(),
            discards: Vec::new(),
            has_claimed_meld: false,
            is_dealer: false,
        }
    }

    /// 新一局开始前重置
    pub fn reset(&mut self, is_dealer: bool) {
        self.hand.clear();
        self.melds.clear();
        self.discards.clear();
        self.has_claimed_meld = false;
        self.is_dealer = is_dealer;
    }

    /// 打出手牌中第 `index` 张牌，放入弃牌区
    pub fn discard_at(&mut self, index: usize) -> Option<Tile> {
        let tile = self.hand.remove_at(index)?;
        self.discards.push(tile);
        Some(tile)
    }

    /// 被别人吃碰杠后，取走最后一张弃牌
    pub fn take_last_discard(&mut self) -> Option<Tile> {
        self.discards.pop()
    }

    /// 添加牌组；吃、碰、明杠会设置吃碰标记
    pub fn add_meld(&mut self, meld: Meld) {
        if meld.kind.is_claimed() {
            self.has_claimed_meld = true;
        }
        self.melds.push(meld);
    }

    /// 标记所有区域中的癞子
    pub fn mark_wild(&mut self, wild_kind: TileKind) {
        self.hand.mark_wild(wild_kind);
        for tile in self.discards.iter_mut() {
            tile.mark_wild_if(wild_kind);
        }
        for meld in self.melds.iter_mut() {
            for tile in meld.tiles.iter_mut() {
                tile.mark_wild_if(wild_kind);
            }
        }
    }

    /// 牌组中的牌数
    pub fn meld_tile_count(&self) -> usize {
        self.melds.iter().map(Meld::len).sum()
    }

    /// 玩家持有的全部牌数（手牌 + 牌组 + 弃牌）
    pub fn tile_count(&self) -> usize {
        self.hand.len() + self.meld_tile_count() + self.discards.len()
    }

    /// 按牌组数计算的有效手牌数（每个牌组按 3 张计）
    pub fn effective_hand_size(&self) -> usize {
        self.hand.len() + 3 * self.melds.len()
    }
}
