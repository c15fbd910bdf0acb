use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::tile::{Suit, Tile, TileKind};
use crate::errors::{EngineResult, GameError};

/// 胡牌时的总牌数（含已亮出的牌组，每组按 3 张计）
pub const HAND_SIZE: usize = 14;

/// 胡牌需要的面子数
pub const MELDS_PER_HAND: u8 = 4;

/// 对子的构成
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pair {
    /// 两张相同的牌
    Natural(TileKind),
    /// 一张牌 + 一张癞子
    WithWild(TileKind),
    /// 两张癞子
    Wilds,
}

/// 面子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Group {
    /// 刻子，`wilds` 为补位的癞子数
    Triplet { kind: TileKind, wilds: u8 },
    /// 顺子，`wilds` 为补位的癞子数
    Sequence { suit: Suit, start: u8, wilds: u8 },
    /// 三张癞子
    WildTriplet,
}

/// 胡牌判定结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinResult {
    /// 是否胡牌
    pub is_win: bool,
    /// 对子
    pub pair: Option<Pair>,
    /// 手牌中组成的面子（不含已亮出的牌组）
    pub groups: SmallVec<[Group; 4]>,
    /// 作为癞子使用的牌数
    pub wilds_used: u8,
}

impl WinResult {
    fn not_win() -> Self {
        Self {
            is_win: false,
            pair: None,
            groups: SmallVec::new(),
            wilds_used: 0,
        }
    }
}

/// 计数表上的一次修改
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Take { index: usize, amount: u8 },
    Wilds(u8),
}

/// 带撤销日志的计数表
///
/// 回溯只通过 `checkpoint` / `rollback` 进行，计数永远不会出现负数
#[derive(Debug, Clone)]
pub(crate) struct CountTable {
    counts: [u8; TileKind::COUNT],
    wilds: u8,
    log: Vec<Edit>,
}

impl CountTable {
    pub(crate) fn new(counts: [u8; TileKind::COUNT], wilds: u8) -> Self {
        Self {
            counts,
            wilds,
            log: Vec::with_capacity(16),
        }
    }

    pub(crate) fn count(&self, index: usize) -> u8 {
        self.counts[index]
    }

    pub(crate) fn wilds(&self) -> u8 {
        self.wilds
    }

    pub(crate) fn checkpoint(&self) -> usize {
        self.log.len()
    }

    pub(crate) fn take(&mut self, index: usize, amount: u8) {
        assert!(
            self.counts[index] >= amount,
            "计数表出现负数：索引 {} 剩余 {} 张，试图取 {} 张",
            index,
            self.counts[index],
            amount
        );
        self.counts[index] -= amount;
        self.log.push(Edit::Take { index, amount });
    }

    pub(crate) fn take_wilds(&mut self, amount: u8) {
        if amount == 0 {
            return;
        }
        assert!(self.wilds >= amount, "癞子预算出现负数");
        self.wilds -= amount;
        self.log.push(Edit::Wilds(amount));
    }

    /// 撤销 checkpoint 之后的所有修改
    pub(crate) fn rollback(&mut self, checkpoint: usize) {
        while self.log.len() > checkpoint {
            match self.log.pop() {
                Some(Edit::Take { index, amount }) => self.counts[index] += amount,
                Some(Edit::Wilds(amount)) => self.wilds += amount,
                None => break,
            }
        }
    }

    /// 规范顺序下第一个还有牌的身份
    pub(crate) fn first_nonzero(&self) -> Option<usize> {
        self.counts.iter().position(|&c| c > 0)
    }

    /// 没有剩余的牌，也没有剩余的癞子
    pub(crate) fn is_exhausted(&self) -> bool {
        self.wilds == 0 && self.counts.iter().all(|&c| c == 0)
    }

    #[cfg(test)]
    fn state(&self) -> ([u8; TileKind::COUNT], u8) {
        (self.counts, self.wilds)
    }
}

/// 一次递归回溯搜索
struct Search {
    table: CountTable,
    pair: Option<Pair>,
    groups: SmallVec<[Group; 4]>,
}

impl Search {
    fn new(table: CountTable) -> Self {
        Self {
            table,
            pair: None,
            groups: SmallVec::new(),
        }
    }

    /// 先选对子（只选一次），再组面子
    fn solve(&mut self, melds_needed: u8) -> bool {
        for index in 0..TileKind::COUNT {
            let Some(kind) = TileKind::from_index(index) else {
                continue;
            };
            let count = self.table.count(index);
            if count >= 2 {
                if self.try_pair(Pair::Natural(kind), Some((index, 2)), 0, melds_needed) {
                    return true;
                }
            } else if count == 1
                && self.table.wilds() >= 1
                && self.try_pair(Pair::WithWild(kind), Some((index, 1)), 1, melds_needed)
            {
                return true;
            }
        }

        self.table.wilds() >= 2 && self.try_pair(Pair::Wilds, None, 2, melds_needed)
    }

    fn try_pair(
        &mut self,
        pair: Pair,
        natural: Option<(usize, u8)>,
        wilds: u8,
        melds_needed: u8,
    ) -> bool {
        let checkpoint = self.table.checkpoint();
        if let Some((index, amount)) = natural {
            self.table.take(index, amount);
        }
        self.table.take_wilds(wilds);
        self.pair = Some(pair);

        if self.form_melds(melds_needed) {
            return true;
        }

        self.pair = None;
        self.table.rollback(checkpoint);
        false
    }

    /// 组面子
    ///
    /// 只围绕规范顺序下最小的、仍有牌的身份展开分支：这张牌必定属于某个面子，
    /// 所以只需尝试包含它的刻子和顺子，结果与逐个枚举所有面子等价。
    /// 没有普通牌时剩下的癞子三张一组。
    fn form_melds(&mut self, melds_needed: u8) -> bool {
        if self.groups.len() as u8 == melds_needed {
            return self.table.is_exhausted();
        }

        let Some(index) = self.table.first_nonzero() else {
            return self.table.wilds() >= 3
                && self.try_group(Group::WildTriplet, &[], 3, melds_needed);
        };
        let Some(kind) = TileKind::from_index(index) else {
            return false;
        };

        // 刻子：3 张、2 张 + 1 癞子、1 张 + 2 癞子
        let naturals = self.table.count(index).min(3);
        let shortfall = 3 - naturals;
        if shortfall <= self.table.wilds()
            && self.try_group(
                Group::Triplet { kind, wilds: shortfall },
                &[(index, naturals)],
                shortfall,
                melds_needed,
            )
        {
            return true;
        }

        // 顺子（仅限数牌）：每个在场的点数取一张，缺的用癞子补
        if let Some(rank) = kind.rank() {
            let suit = kind.suit();
            let lowest = rank.saturating_sub(2).max(TileKind::MIN_RANK);
            let highest = rank.min(TileKind::MAX_RANK - 2);
            for start in lowest..=highest {
                let takes: SmallVec<[(usize, u8); 3]> = (start..start + 3)
                    .filter_map(|r| TileKind::numeral(suit, r))
                    .map(|k| k.index())
                    .filter(|&i| self.table.count(i) > 0)
                    .map(|i| (i, 1))
                    .collect();
                let shortfall = 3 - takes.len() as u8;
                if shortfall <= self.table.wilds()
                    && self.try_group(
                        Group::Sequence { suit, start, wilds: shortfall },
                        &takes,
                        shortfall,
                        melds_needed,
                    )
                {
                    return true;
                }
            }
        }

        false
    }

    fn try_group(
        &mut self,
        group: Group,
        takes: &[(usize, u8)],
        wilds: u8,
        melds_needed: u8,
    ) -> bool {
        let checkpoint = self.table.checkpoint();
        for &(index, amount) in takes {
            self.table.take(index, amount);
        }
        self.table.take_wilds(wilds);
        self.groups.push(group);

        if self.form_melds(melds_needed) {
            return true;
        }

        self.groups.pop();
        self.table.rollback(checkpoint);
        false
    }
}

type CacheKey = ([u8; TileKind::COUNT], u8, u8);

/// 胡牌判定器
///
/// 使用递归回溯算法，结果按（计数表，癞子预算，亮出牌组数）缓存
#[derive(Debug, Clone)]
pub struct WinChecker {
    /// 结果缓存
    result_cache: HashMap<CacheKey, WinResult>,
    /// 最大缓存大小（超过后清空缓存）
    max_cache_size: usize,
}

impl WinChecker {
    /// 创建新的胡牌判定器
    pub fn new() -> Self {
        Self::with_cache_size(1000)
    }

    /// 创建新的胡牌判定器（自定义缓存大小）
    pub fn with_cache_size(max_cache_size: usize) -> Self {
        Self {
            result_cache: HashMap::new(),
            max_cache_size,
        }
    }

    /// 判定 14 张牌是否胡牌
    ///
    /// # 参数
    ///
    /// - `tiles`: 14 张牌
    /// - `usable_wilds`: 可作为癞子使用的张数
    pub fn check_win(&mut self, tiles: &[Tile], usable_wilds: u8) -> EngineResult<WinResult> {
        self.check_win_with_melds(tiles, 0, usable_wilds)
    }

    /// 判定手牌是否胡牌（已有亮出的牌组）
    ///
    /// # 参数
    ///
    /// - `tiles`: 手牌，张数必须满足 `tiles.len() + 3 * exposed_melds == 14`
    /// - `exposed_melds`: 已吃/碰/杠的牌组数（杠按一组计）
    /// - `usable_wilds`: 可作为癞子使用的张数
    ///
    /// 超出预算的癞子按自身身份当普通牌使用
    pub fn check_win_with_melds(
        &mut self,
        tiles: &[Tile],
        exposed_melds: u8,
        usable_wilds: u8,
    ) -> EngineResult<WinResult> {
        let count = tiles.len() + 3 * exposed_melds as usize;
        if count != HAND_SIZE || exposed_melds > MELDS_PER_HAND {
            return Err(GameError::MalformedHand { count });
        }

        let (counts, budget) = Self::count_table(tiles, usable_wilds);
        let key = (counts, budget, exposed_melds);
        if let Some(cached) = self.result_cache.get(&key) {
            return Ok(cached.clone());
        }

        let mut search = Search::new(CountTable::new(counts, budget));
        let result = if search.solve(MELDS_PER_HAND - exposed_melds) {
            WinResult {
                is_win: true,
                pair: search.pair,
                groups: search.groups,
                wilds_used: budget,
            }
        } else {
            WinResult::not_win()
        };

        if self.result_cache.len() >= self.max_cache_size {
            self.result_cache.clear();
        }
        self.result_cache.insert(key, result.clone());
        Ok(result)
    }

    /// 把牌分成普通牌计数和癞子预算
    fn count_table(tiles: &[Tile], usable_wilds: u8) -> ([u8; TileKind::COUNT], u8) {
        let mut counts = [0u8; TileKind::COUNT];
        let mut budget = 0u8;
        for tile in tiles {
            if tile.is_wild() && budget < usable_wilds {
                budget += 1;
            } else {
                counts[tile.kind().index()] += 1;
            }
        }
        (counts, budget)
    }

    /// 清空缓存
    pub fn clear_cache(&mut self) {
        self.result_cache.clear();
    }

    #[cfg(test)]
    pub fn cache_size(&self) -> usize {
        self.result_cache.len()
    }
}

impl Default for WinChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// 便捷函数：检查 14 张牌是否胡牌
pub fn is_win(tiles: &[Tile], usable_wilds: u8) -> EngineResult<bool> {
    Ok(WinChecker::new().check_win(tiles, usable_wilds)?.is_win)
}

/// 便捷函数：获取胡牌结果
pub fn check_win(tiles: &[Tile], usable_wilds: u8) -> EngineResult<WinResult> {
    WinChecker::new().check_win(tiles, usable_wilds)
}
