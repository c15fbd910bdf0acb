use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::errors::{EngineResult, GameError};
use crate::game::action::{Action, ClaimDecision, ClaimKind};
use crate::game::action_callback::ActionProvider;
use crate::game::chi::ChiHandler;
use crate::game::claim::{collect_claims, PendingClaims};
use crate::game::constants::{next_seat, INITIAL_HAND_SIZE, NUM_PLAYERS};
use crate::game::kong::KongHandler;
use crate::game::player::Player;
use crate::game::pong::PongHandler;
use crate::game::rules::RuleConfig;
use crate::game::state::{EndReason, GameOutcome, GameSnapshot, GameState, LastDiscard, Phase, TurnStage};
use crate::game::wild::WildUsageReport;
use crate::tile::{Tile, TileKind, Wall, WinChecker};

/// 命令的执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    /// 状态已更新
    Updated(GameSnapshot),
    /// 有玩家可以响应弃牌，等待他们的决定
    AwaitingClaims(PendingClaims),
    /// 一局结束
    GameOver(GameOutcome),
}

/// 牌从牌墙的哪一端摸
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrawEnd {
    Head,
    /// 杠后补牌
    Tail,
}

/// 游戏引擎
///
/// 负责管理游戏流程和动作处理。所有修改都经由这里的命令进行，
/// 命令在修改状态前完成全部校验，校验失败时状态不变。
#[derive(Debug, Clone)]
pub struct GameEngine {
    /// 游戏状态
    pub state: GameState,
    /// 牌墙
    pub wall: Wall,
    config: RuleConfig,
    rng: StdRng,
    checker: WinChecker,
}

impl GameEngine {
    /// 创建新的游戏引擎（默认规则）
    pub fn new() -> Self {
        Self::with_config(RuleConfig::default())
    }

    /// 创建新的游戏引擎
    ///
    /// 庄家和本地玩家的座位号按 4 取模
    pub fn with_config(config: RuleConfig) -> Self {
        let config = config.normalized();
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            state: GameState::new(&config),
            wall: Wall::new(),
            config,
            rng,
            checker: WinChecker::new(),
        }
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// 开始新的一局：洗牌、发牌、翻牌定癞子，庄家摸第一张牌
    pub fn start_game(&mut self) -> EngineResult<ActionResult> {
        let mut wall = Wall::new();
        wall.shuffle_with(&mut self.rng);
        self.start_game_with_wall(wall)
    }

    /// 使用给定的牌墙开始新的一局（不洗牌）
    ///
    /// 只能在等待或结束阶段调用
    pub fn start_game_with_wall(&mut self, wall: Wall) -> EngineResult<ActionResult> {
        if !matches!(self.state.phase, Phase::Waiting | Phase::Finished) {
            return Err(GameError::InvalidTurn { player: self.state.current_player });
        }
        // 发牌 + 翻牌 + 庄家第一张
        if wall.remaining_count() < NUM_PLAYERS as usize * INITIAL_HAND_SIZE + 2 {
            return Err(GameError::EmptyWall);
        }

        let dealer = self.config.dealer;
        self.state = GameState::new(&self.config);
        self.wall = wall;
        for player in self.state.players.iter_mut() {
            player.reset(player.id == dealer);
        }

        self.state.phase = Phase::Dealing;
        for _ in 0..INITIAL_HAND_SIZE {
            for offset in 0..NUM_PLAYERS {
                let seat = (dealer + offset) % NUM_PLAYERS;
                let tile = self.wall.draw_head()?;
                self.state.player_mut(seat).hand.add_tile(tile);
            }
        }

        let reveal = self.wall.reveal_wild()?;
        self.state.wild.set_reveal(reveal);
        for player in self.state.players.iter_mut() {
            player.mark_wild(reveal.wild_kind);
        }
        info!(
            dealer,
            flipped = %reveal.flipped,
            wild = %reveal.wild_kind,
            "发牌完成，翻牌定癞子"
        );

        self.state.phase = Phase::Playing;
        self.state.current_player = dealer;
        self.state.stage = TurnStage::AwaitingDraw;
        self.draw_tile(dealer, DrawEnd::Head)
    }

    /// 摸牌
    ///
    /// 牌墙已空时流局，返回 `GameOver`
    pub fn draw(&mut self, player: u8) -> EngineResult<ActionResult> {
        self.ensure_turn(player, TurnStage::AwaitingDraw)?;
        self.draw_tile(player, DrawEnd::Head)
    }

    /// 出牌
    ///
    /// # 参数
    ///
    /// - `player`: 出牌的玩家
    /// - `hand_index`: 手牌中的有序位置
    ///
    /// # 返回
    ///
    /// 有人可以响应时返回 `AwaitingClaims`，否则轮到下家
    pub fn discard(&mut self, player: u8, hand_index: usize) -> EngineResult<ActionResult> {
        self.ensure_turn(player, TurnStage::AwaitingDiscard)?;

        let len = self.state.player_ref(player).hand.len();
        let tile = self
            .state
            .player_mut(player)
            .discard_at(hand_index)
            .ok_or(GameError::InvalidIndex { index: hand_index, len })?;
        self.state.last_discard = Some(LastDiscard { tile, player });
        self.state.drawn = None;
        self.state.turn += 1;
        debug!(player, tile = %tile, turn = self.state.turn, "出牌");

        match collect_claims(&self.state.players, &self.state.wild, &mut self.checker, player, tile) {
            Some(pending) => {
                debug!(
                    tile = %tile,
                    claimants = ?pending.eligible().iter().map(|c| c.player).collect::<Vec<_>>(),
                    "等待响应"
                );
                self.state.stage = TurnStage::AwaitingClaims;
                self.state.pending_claims = Some(pending.clone());
                Ok(ActionResult::AwaitingClaims(pending))
            }
            None => self.advance_turn(player),
        }
    }

    /// 响应弃牌（吃/碰/杠/胡/过）
    ///
    /// 所有有资格的玩家都做出决定后才裁决；在此之前返回 `AwaitingClaims`
    pub fn respond_to_claim(&mut self, player: u8, decision: ClaimDecision) -> EngineResult<ActionResult> {
        if !self.state.is_at(TurnStage::AwaitingClaims) {
            return Err(GameError::InvalidTurn { player });
        }
        // 在副本上记录，裁决失败时状态不变
        let mut pending = self
            .state
            .pending_claims
            .clone()
            .ok_or(GameError::InvalidTurn { player })?;
        pending.record(player, decision)?;

        if !pending.is_complete() {
            debug!(player, ?decision, "响应弃牌");
            self.state.pending_claims = Some(pending.clone());
            return Ok(ActionResult::AwaitingClaims(pending));
        }

        let result = self.resolve_claims(pending)?;
        debug!(player, ?decision, "响应弃牌");
        Ok(result)
    }

    /// 暗杠：手中四张相同的牌，杠完从牌墙尾部补牌
    pub fn declare_concealed_gang(&mut self, player: u8, kind: TileKind) -> EngineResult<ActionResult> {
        self.ensure_turn(player, TurnStage::AwaitingDiscard)?;
        if !KongHandler::concealed_kong(self.state.player_mut(player), kind) {
            return Err(GameError::IllegalClaim { player, kind: ClaimKind::Gang });
        }
        info!(player, kind = %kind, "暗杠");
        self.draw_tile(player, DrawEnd::Tail)
    }

    /// 自摸胡
    ///
    /// 只能在本回合从牌墙摸牌（含杠后补牌）之后宣告，吃碰之后不能自摸
    pub fn declare_self_draw_win(&mut self, player: u8) -> EngineResult<ActionResult> {
        self.ensure_turn(player, TurnStage::AwaitingDiscard)?;
        if self.state.drawn.is_none() {
            return Err(GameError::IllegalClaim { player, kind: ClaimKind::Win });
        }

        let usable = self.state.usable_wilds(player)?;
        let current = self.state.player_ref(player);
        let result = self.checker.check_win_with_melds(
            current.hand.tiles(),
            current.melds.len() as u8,
            usable,
        )?;
        if !result.is_win {
            return Err(GameError::IllegalClaim { player, kind: ClaimKind::Win });
        }

        debug!(player, ?result, "自摸胡牌分解");
        Ok(self.finish(GameOutcome {
            winner: Some(player),
            reason: EndReason::SelfDrawn,
        }))
    }

    /// 执行一个动作
    pub fn apply(&mut self, player: u8, action: Action) -> EngineResult<ActionResult> {
        match action {
            Action::Draw => self.draw(player),
            Action::Discard { hand_index } => self.discard(player, hand_index),
            Action::Claim(decision) => self.respond_to_claim(player, decision),
            Action::ConcealedGang { kind } => self.declare_concealed_gang(player, kind),
            Action::SelfDrawWin => self.declare_self_draw_win(player),
        }
    }

    /// 运行一局完整的游戏
    ///
    /// 如果还没开局（或上一局已结束）会先开局，然后反复询问提供者直到结束
    ///
    /// # 参数
    ///
    /// - `provider`: 动作提供者，根据游戏状态返回玩家动作
    ///
    /// # 返回
    ///
    /// 本局结果；提供者给出非法动作时返回对应错误
    pub fn run<P: ActionProvider>(&mut self, provider: &mut P) -> EngineResult<GameOutcome> {
        if matches!(self.state.phase, Phase::Waiting | Phase::Finished) {
            self.start_game()?;
        }

        loop {
            if let Some(outcome) = self.state.outcome {
                return Ok(outcome);
            }

            let actor = match &self.state.pending_claims {
                Some(pending) => match pending.awaiting().first() {
                    Some(&player) => player,
                    None => self.state.current_player,
                },
                None => self.state.current_player,
            };
            let action = provider.decide(&self.state, actor);
            self.apply(actor, action)?;
        }
    }

    /// 只读快照
    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot(self.config.local_player, self.wall.remaining_count())
    }

    /// 玩家的癞子使用建议
    pub fn wild_usage(&self, player: u8) -> EngineResult<WildUsageReport> {
        let current = self.state.player(player)?;
        Ok(self.state.wild.usage_report(current, current.hand.tiles()))
    }

    /// 当前所有牌的数量（牌墙 + 玩家 + 翻开的牌），开局后始终为 136
    pub fn accounted_tiles(&self) -> usize {
        let flipped = usize::from(self.wall.reveal().is_some());
        self.wall.remaining_count() + self.state.tiles_in_play() + flipped
    }

    fn ensure_turn(&self, player: u8, stage: TurnStage) -> EngineResult<()> {
        if player >= NUM_PLAYERS || !self.state.is_at(stage) || self.state.current_player != player {
            return Err(GameError::InvalidTurn { player });
        }
        Ok(())
    }

    /// 摸一张牌；牌墙已空时流局
    fn draw_tile(&mut self, player: u8, end: DrawEnd) -> EngineResult<ActionResult> {
        let drawn = match end {
            DrawEnd::Head => self.wall.draw_head(),
            DrawEnd::Tail => self.wall.draw_tail(),
        };
        let Ok(tile) = drawn else {
            info!(player, "牌墙已空，流局");
            return Ok(self.finish(GameOutcome::exhausted()));
        };

        self.state.player_mut(player).hand.add_tile(tile);
        self.state.drawn = Some(tile);
        self.state.current_player = player;
        self.state.stage = TurnStage::AwaitingDiscard;
        debug!(player, tile = %tile, ?end, remaining = self.wall.remaining_count(), "摸牌");
        Ok(ActionResult::Updated(self.snapshot()))
    }

    /// 轮到下家
    fn advance_turn(&mut self, from: u8) -> EngineResult<ActionResult> {
        let next = next_seat(from);
        self.state.current_player = next;
        self.state.stage = TurnStage::AwaitingDraw;
        if self.config.auto_draw {
            self.draw_tile(next, DrawEnd::Head)
        } else {
            Ok(ActionResult::Updated(self.snapshot()))
        }
    }

    /// 裁决并执行响应
    fn resolve_claims(&mut self, pending: PendingClaims) -> EngineResult<ActionResult> {
        let Some((claimant, decision)) = pending.winning_decision() else {
            debug!(discarder = pending.discarder, "全部过");
            self.state.pending_claims = None;
            return self.advance_turn(pending.discarder);
        };

        let discarder = pending.discarder;
        if !Self::can_execute(self.state.player_ref(claimant), pending.tile, decision) {
            let kind = decision.kind().unwrap_or(ClaimKind::Chi);
            return Err(GameError::IllegalClaim { player: claimant, kind });
        }

        self.state.pending_claims = None;
        let tile = self.take_discard(discarder, pending.tile);
        let player = self.state.player_mut(claimant);
        let executed = match decision {
            ClaimDecision::Win => {
                player.hand.add_tile(tile);
                info!(claimant, discarder, tile = %tile, "点炮胡");
                return Ok(self.finish(GameOutcome {
                    winner: Some(claimant),
                    reason: EndReason::Discard { discarder },
                }));
            }
            ClaimDecision::Gang => KongHandler::open_kong(player, tile, discarder),
            ClaimDecision::Peng => PongHandler::pong(player, tile, discarder),
            ClaimDecision::Chi(option) => ChiHandler::chi(player, tile, option, discarder),
            ClaimDecision::Pass => false,
        };
        debug_assert!(executed, "响应的前提条件已经检查过");

        info!(claimant, discarder, tile = %tile, ?decision, "吃碰杠");
        self.state.current_player = claimant;
        self.state.drawn = None;
        match decision {
            ClaimDecision::Gang => self.draw_tile(claimant, DrawEnd::Tail),
            _ => {
                self.state.stage = TurnStage::AwaitingDiscard;
                Ok(ActionResult::Updated(self.snapshot()))
            }
        }
    }

    /// 执行前检查响应的前提条件（手牌在记录决定之后可能已经变化）
    fn can_execute(player: &Player, tile: Tile, decision: ClaimDecision) -> bool {
        let kind = tile.kind();
        match decision {
            ClaimDecision::Win => true,
            ClaimDecision::Gang => KongHandler::can_open_kong(player, kind).is_some(),
            ClaimDecision::Peng => PongHandler::can_pong(player, kind),
            ClaimDecision::Chi(option) => ChiHandler::chi_options(player, kind).contains(&option),
            ClaimDecision::Pass => false,
        }
    }

    /// 从出牌者的弃牌区取走被响应的牌
    fn take_discard(&mut self, discarder: u8, tile: Tile) -> Tile {
        self.state.last_discard = None;
        self.state.player_mut(discarder).take_last_discard().unwrap_or(tile)
    }

    fn finish(&mut self, outcome: GameOutcome) -> ActionResult {
        self.state.phase = Phase::Finished;
        self.state.pending_claims = None;
        self.state.outcome = Some(outcome);
        info!(winner = ?outcome.winner, reason = ?outcome.reason, turn = self.state.turn, "本局结束");
        ActionResult::GameOver(outcome)
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}
