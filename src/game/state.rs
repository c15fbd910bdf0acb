use serde::{Deserialize, Serialize};

use crate::errors::{EngineResult, GameError};
use crate::game::claim::PendingClaims;
use crate::game::constants::NUM_PLAYERS;
use crate::game::meld::Meld;
use crate::game::player::Player;
use crate::game::rules::RuleConfig;
use crate::game::wild::WildTileManager;
use crate::tile::{Tile, TileKind};

/// 游戏阶段
///
/// 只能按 等待 → 发牌 → 进行中 → 结束 的顺序推进
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Waiting,
    Dealing,
    Playing,
    Finished,
}

/// 进行中阶段的回合状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnStage {
    /// 当前玩家需要摸牌
    AwaitingDraw,
    /// 当前玩家需要出牌（也可以暗杠或自摸）
    AwaitingDiscard,
    /// 等待其他玩家响应弃牌（挂起）
    AwaitingClaims,
}

/// 最近一张弃牌
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastDiscard {
    pub tile: Tile,
    pub player: u8,
}

/// 结束原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// 自摸
    SelfDrawn,
    /// 点炮
    Discard { discarder: u8 },
    /// 流局（牌墙摸完）
    WallExhausted,
}

/// 一局的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// 胡牌玩家（流局为 None）
    pub winner: Option<u8>,
    pub reason: EndReason,
}

impl GameOutcome {
    pub fn exhausted() -> Self {
        Self {
            winner: None,
            reason: EndReason::WallExhausted,
        }
    }
}

/// 游戏状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: Phase,
    pub stage: TurnStage,
    /// 玩家（4 个玩家）
    pub players: [Player; NUM_PLAYERS as usize],
    /// 当前玩家 ID
    pub current_player: u8,
    /// 庄家
    pub dealer: u8,
    /// 最近一张还在弃牌区的弃牌（被吃碰杠胡后清空）
    pub last_discard: Option<LastDiscard>,
    /// 挂起的响应（只在 `TurnStage::AwaitingClaims` 时存在）
    pub pending_claims: Option<PendingClaims>,
    /// 当前玩家本回合从牌墙摸到的牌（吃碰后为 None）
    pub drawn: Option<Tile>,
    /// 癞子管理器
    pub wild: WildTileManager,
    /// 当前回合数
    pub turn: u32,
    /// 结果（只在 `Phase::Finished` 时存在）
    pub outcome: Option<GameOutcome>,
}

impl GameState {
    /// 创建新的游戏状态
    pub fn new(config: &RuleConfig) -> Self {
        Self {
            phase: Phase::Waiting,
            stage: TurnStage::AwaitingDraw,
            players: [Player::new(0), Player::new(1), Player::new(2), Player::new(3)],
            current_player: config.dealer,
            dealer: config.dealer,
            last_discard: None,
            pending_claims: None,
            drawn: None,
            wild: WildTileManager::new(TileKind::Honor(config.bonus_honor), config.claimed_wild_cap),
            turn: 0,
            outcome: None,
        }
    }

    /// 获取玩家（不可变引用），座位号由调用方保证有效
    pub(crate) fn player_ref(&self, player_id: u8) -> &Player {
        &self.players[player_id as usize]
    }

    /// 获取玩家（可变引用），座位号由调用方保证有效
    pub(crate) fn player_mut(&mut self, player_id: u8) -> &mut Player {
        &mut self.players[player_id as usize]
    }

    /// 检查游戏是否结束
    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// 进行中且处于指定回合状态
    pub fn is_at(&self, stage: TurnStage) -> bool {
        self.phase == Phase::Playing && self.stage == stage
    }

    /// 按座位号查找玩家，座位号无效时返回 `InvalidTurn`
    pub fn player(&self, player_id: u8) -> EngineResult<&Player> {
        self.players
            .get(player_id as usize)
            .ok_or(GameError::InvalidTurn { player: player_id })
    }

    /// 玩家当前可用的癞子数
    pub fn usable_wilds(&self, player_id: u8) -> EngineResult<u8> {
        let player = self.player(player_id)?;
        Ok(self.wild.usable_wild_count(player, player.hand.tiles()))
    }

    /// 所有玩家持有的牌数（手牌 + 牌组 + 弃牌）
    pub fn tiles_in_play(&self) -> usize {
        self.players.iter().map(Player::tile_count).sum()
    }

    /// 生成只读快照
    ///
    /// 只有 `local_player` 的手牌完整显示，其他玩家只显示张数
    pub fn snapshot(&self, local_player: u8, remaining_wall: usize) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            stage: self.stage,
            current_player: self.current_player,
            wild: self.wild.reveal().map(|r| WildInfo {
                flipped: r.flipped,
                wild_kind: r.wild_kind,
                bonus_honor_is_wild: self.wild.bonus_honor_is_wild(),
            }),
            players: self
                .players
                .iter()
                .map(|p| PlayerSummary::of(p, p.id == local_player))
                .collect(),
            last_discard: self.last_discard,
            remaining_wall,
            outcome: self.outcome,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(&RuleConfig::default())
    }
}

/// 癞子信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WildInfo {
    /// 翻开的牌
    pub flipped: Tile,
    pub wild_kind: TileKind,
    /// 杠牌字牌是否同时是癞子
    pub bonus_honor_is_wild: bool,
}

/// 快照中的玩家信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: u8,
    /// 完整手牌（只对本地玩家可见）
    pub hand: Option<Vec<Tile>>,
    pub hand_count: usize,
    pub melds: Vec<Meld>,
    pub discards: Vec<Tile>,
    pub has_claimed_meld: bool,
    pub is_dealer: bool,
}

impl PlayerSummary {
    fn of(player: &Player, reveal_hand: bool) -> Self {
        Self {
            id: player.id,
            hand: reveal_hand.then(|| player.hand.tiles().to_vec()),
            hand_count: player.hand.len(),
            melds: player.melds.clone(),
            discards: player.discards.clone(),
            has_claimed_meld: player.has_claimed_meld,
            is_dealer: player.is_dealer,
        }
    }
}

/// 提供给展示层的只读快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: Phase,
    pub stage: TurnStage,
    pub current_player: u8,
    pub wild: Option<WildInfo>,
    pub players: Vec<PlayerSummary>,
    pub last_discard: Option<LastDiscard>,
    pub remaining_wall: usize,
    pub outcome: Option<GameOutcome>,
}
