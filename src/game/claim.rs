use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::errors::{EngineResult, GameError};
use crate::game::action::{ChiOption, ClaimDecision, ClaimKind};
use crate::game::chi::ChiHandler;
use crate::game::constants::{seat_distance, NUM_PLAYERS, WIN_PRIORITY};
use crate::game::kong::KongHandler;
use crate::game::player::Player;
use crate::game::pong::PongHandler;
use crate::game::wild::WildTileManager;
use crate::tile::{Tile, WinChecker};

/// 一个可选的响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimOption {
    pub kind: ClaimKind,
    pub priority: u8,
    /// 吃牌的组合（仅吃）
    pub chi_options: SmallVec<[ChiOption; 3]>,
    /// 是否是杠牌字牌的杠
    pub bonus_honor: bool,
}

/// 某个玩家对一次弃牌的全部可选响应（按优先级从高到低）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerClaims {
    pub player: u8,
    /// 与出牌者的座位距离（1 为下家）
    pub seat_distance: u8,
    pub options: SmallVec<[ClaimOption; 4]>,
}

impl PlayerClaims {
    pub fn option(&self, kind: ClaimKind) -> Option<&ClaimOption> {
        self.options.iter().find(|o| o.kind == kind)
    }

    pub fn best_priority(&self) -> u8 {
        self.options.first().map_or(0, |o| o.priority)
    }
}

/// 排序后的单个响应
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedClaim {
    pub player: u8,
    pub kind: ClaimKind,
    pub priority: u8,
    pub seat_distance: u8,
}

/// 等待响应的弃牌
///
/// 每个有资格的玩家恰好给出一个决定（任意顺序），全部决定后才能裁决
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingClaims {
    pub tile: Tile,
    pub discarder: u8,
    eligible: SmallVec<[PlayerClaims; 3]>,
    decisions: [Option<ClaimDecision>; NUM_PLAYERS as usize],
}

impl PendingClaims {
    pub fn new(tile: Tile, discarder: u8, eligible: SmallVec<[PlayerClaims; 3]>) -> Self {
        Self {
            tile,
            discarder,
            eligible,
            decisions: [None; NUM_PLAYERS as usize],
        }
    }

    pub fn eligible(&self) -> &[PlayerClaims] {
        &self.eligible
    }

    /// 某个玩家的可选响应
    pub fn options_for(&self, player: u8) -> Option<&PlayerClaims> {
        self.eligible.iter().find(|c| c.player == player)
    }

    /// 所有响应：优先级从高到低，同优先级按离出牌者的距离从近到远
    pub fn ranked(&self) -> Vec<RankedClaim> {
        let mut ranked: Vec<RankedClaim> = self
            .eligible
            .iter()
            .flat_map(|claims| {
                claims.options.iter().map(move |o| RankedClaim {
                    player: claims.player,
                    kind: o.kind,
                    priority: o.priority,
                    seat_distance: claims.seat_distance,
                })
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(a.seat_distance.cmp(&b.seat_distance))
        });
        ranked
    }

    /// 最高优先级上的各个玩家（每个玩家只列一次）
    pub fn top_contenders(&self) -> SmallVec<[RankedClaim; 3]> {
        let ranked = self.ranked();
        let Some(top) = ranked.first().map(|c| c.priority) else {
            return SmallVec::new();
        };

        let mut contenders: SmallVec<[RankedClaim; 3]> = SmallVec::new();
        for claim in ranked.into_iter().take_while(|c| c.priority == top) {
            if contenders.iter().all(|c| c.player != claim.player) {
                contenders.push(claim);
            }
        }
        contenders
    }

    /// 最高优先级是否有多个玩家竞争（由调用方决定，引擎默认离出牌者近的优先）
    pub fn is_contested(&self) -> bool {
        self.top_contenders().len() > 1
    }

    /// 尚未做出决定的玩家
    pub fn awaiting(&self) -> SmallVec<[u8; 3]> {
        self.eligible
            .iter()
            .map(|c| c.player)
            .filter(|&p| self.decisions[p as usize].is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.awaiting().is_empty()
    }

    /// 记录一个玩家的决定
    ///
    /// 不在名单中或已经决定过返回 `InvalidTurn`；选择了没有提供的响应返回 `IllegalClaim`
    pub fn record(&mut self, player: u8, decision: ClaimDecision) -> EngineResult<()> {
        let Some(claims) = self.options_for(player) else {
            return Err(GameError::InvalidTurn { player });
        };
        if self.decisions[player as usize].is_some() {
            return Err(GameError::InvalidTurn { player });
        }

        if let Some(kind) = decision.kind() {
            let offered = match (claims.option(kind), &decision) {
                (Some(option), ClaimDecision::Chi(chosen)) => option.chi_options.contains(chosen),
                (Some(_), _) => true,
                (None, _) => false,
            };
            if !offered {
                return Err(GameError::IllegalClaim { player, kind });
            }
        }

        self.decisions[player as usize] = Some(decision);
        Ok(())
    }

    /// 裁决：优先级最高的非过决定获胜，同优先级离出牌者近的获胜
    ///
    /// 全部过时返回 None
    pub fn winning_decision(&self) -> Option<(u8, ClaimDecision)> {
        self.eligible
            .iter()
            .filter_map(|claims| {
                let decision = self.decisions[claims.player as usize]?;
                let priority = claims.option(decision.kind()?)?.priority;
                Some((priority, claims.seat_distance, claims.player, decision))
            })
            .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
            .map(|(_, _, player, decision)| (player, decision))
    }
}

/// 计算所有其他玩家对一张弃牌的可选响应
///
/// # 参数
///
/// - `players`: 所有玩家
/// - `wild`: 癞子管理器（决定胡牌时的癞子预算）
/// - `checker`: 胡牌判定器
/// - `discarder`: 出牌者
/// - `tile`: 打出的牌
///
/// # 返回
///
/// 没有任何玩家可以响应时返回 None
pub fn collect_claims(
    players: &[Player],
    wild: &WildTileManager,
    checker: &mut WinChecker,
    discarder: u8,
    tile: Tile,
) -> Option<PendingClaims> {
    let kind = tile.kind();
    let mut eligible: SmallVec<[PlayerClaims; 3]> = SmallVec::new();

    for player in players.iter().filter(|p| p.id != discarder) {
        let distance = seat_distance(discarder, player.id);
        let mut options: SmallVec<[ClaimOption; 4]> = SmallVec::new();

        let mut tiles: Vec<Tile> = player.hand.tiles().to_vec();
        tiles.push(tile);
        let usable = wild.usable_wild_count(player, &tiles);
        let exposed = player.melds.len() as u8;
        if matches!(checker.check_win_with_melds(&tiles, exposed, usable), Ok(r) if r.is_win) {
            options.push(simple_option(ClaimKind::Win, WIN_PRIORITY));
        }

        if KongHandler::can_open_kong(player, kind).is_some() {
            let bonus_honor = kind == wild.bonus_honor();
            let priority = if bonus_honor {
                WIN_PRIORITY
            } else {
                ClaimKind::Gang.base_priority()
            };
            options.push(ClaimOption {
                bonus_honor,
                ..simple_option(ClaimKind::Gang, priority)
            });
        }

        if PongHandler::can_pong(player, kind) {
            options.push(simple_option(ClaimKind::Peng, ClaimKind::Peng.base_priority()));
        }

        if distance == 1 {
            let chi_options = ChiHandler::chi_options(player, kind);
            if !chi_options.is_empty() {
                options.push(ClaimOption {
                    chi_options,
                    ..simple_option(ClaimKind::Chi, ClaimKind::Chi.base_priority())
                });
            }
        }

        if !options.is_empty() {
            options.sort_by(|a, b| b.priority.cmp(&a.priority));
            eligible.push(PlayerClaims {
                player: player.id,
                seat_distance: distance,
                options,
            });
        }
    }

    if eligible.is_empty() {
        None
    } else {
        eligible.sort_by_key(|c| c.seat_distance);
        Some(PendingClaims::new(tile, discarder, eligible))
    }
}

fn simple_option(kind: ClaimKind, priority: u8) -> ClaimOption {
    ClaimOption {
        kind,
        priority,
        chi_options: SmallVec::new(),
        bonus_honor: false,
    }
}
