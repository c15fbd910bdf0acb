//! 基于属性的不变量测试
//!
//! 用 proptest 生成随机种子，按随机的合法动作打完整局，每一步之后检查不变量。

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use laizi_engine::game::kong::KongHandler;
use laizi_engine::{
    ActionResult, ClaimDecision, ClaimKind, GameEngine, GameError, Phase, RuleConfig, Tile, TurnStage,
};

const MAX_STEPS: u32 = 2_000;

fn new_engine(seed: u64) -> GameEngine {
    let config = RuleConfig {
        seed: Some(seed),
        ..RuleConfig::default()
    };
    let mut engine = GameEngine::with_config(config);
    engine.start_game().unwrap();
    engine
}

/// 随机选择一个响应（包括过）
fn pick_claim(engine: &GameEngine, player: u8, rng: &mut StdRng) -> ClaimDecision {
    let Some(claims) = engine
        .state
        .pending_claims
        .as_ref()
        .and_then(|p| p.options_for(player))
    else {
        return ClaimDecision::Pass;
    };

    let choice = rng.gen_range(0..=claims.options.len());
    let Some(option) = claims.options.get(choice) else {
        return ClaimDecision::Pass;
    };
    match option.kind {
        ClaimKind::Win => ClaimDecision::Win,
        ClaimKind::Gang => ClaimDecision::Gang,
        ClaimKind::Peng => ClaimDecision::Peng,
        ClaimKind::Chi => match option.chi_options.first() {
            Some(&chi) => ClaimDecision::Chi(chi),
            None => ClaimDecision::Pass,
        },
    }
}

/// 执行一步随机的合法动作
fn step(engine: &mut GameEngine, rng: &mut StdRng) -> Result<ActionResult, GameError> {
    let current = engine.state.current_player;
    match engine.state.stage {
        TurnStage::AwaitingDraw => engine.draw(current),
        TurnStage::AwaitingClaims => {
            let player = engine
                .state
                .pending_claims
                .as_ref()
                .and_then(|p| p.awaiting().first().copied())
                .unwrap_or(current);
            let decision = pick_claim(engine, player, rng);
            engine.respond_to_claim(player, decision)
        }
        TurnStage::AwaitingDiscard => {
            if let Ok(result) = engine.declare_self_draw_win(current) {
                return Ok(result);
            }
            let player = &engine.state.players[current as usize];
            if let Some(&kind) = KongHandler::concealed_kong_kinds(player).first() {
                return engine.declare_concealed_gang(current, kind);
            }
            let index = rng.gen_range(0..player.hand.len());
            engine.discard(current, index)
        }
    }
}

/// 每一步之后都必须成立的不变量
fn check_invariants(engine: &GameEngine) -> Result<(), TestCaseError> {
    prop_assert_eq!(engine.accounted_tiles(), Tile::TOTAL_COUNT);

    let wild_kind = engine.state.wild.wild_kind();
    prop_assert!(wild_kind.is_some());
    for player in &engine.state.players {
        let all = player
            .hand
            .tiles()
            .iter()
            .chain(player.discards.iter())
            .chain(player.melds.iter().flat_map(|m| m.tiles.iter()));
        for tile in all {
            prop_assert_eq!(tile.is_wild(), Some(tile.kind()) == wild_kind);
        }

        if player.has_claimed_meld {
            let usable = engine.state.usable_wilds(player.id);
            prop_assert!(matches!(usable, Ok(n) if n <= engine.config().claimed_wild_cap));
        }
    }

    if engine.state.phase == Phase::Playing {
        let current = engine.state.current_player;
        for player in &engine.state.players {
            let expected = if player.id == current && engine.state.stage == TurnStage::AwaitingDiscard {
                14
            } else {
                13
            };
            prop_assert_eq!(player.effective_hand_size(), expected, "玩家 {}", player.id);
        }
        prop_assert_eq!(
            engine.state.pending_claims.is_some(),
            engine.state.stage == TurnStage::AwaitingClaims
        );
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// 牌数守恒、手牌张数和癞子标记在随机对局的每一步都成立，且对局会结束
    #[test]
    fn game_invariants_hold(seed in 0u64..1_000_000) {
        let mut engine = new_engine(seed);
        let mut rng = StdRng::seed_from_u64(seed);
        check_invariants(&engine)?;

        let mut steps = 0u32;
        while !engine.state.is_game_over() && steps < MAX_STEPS {
            let result = step(&mut engine, &mut rng);
            prop_assert!(result.is_ok(), "seed {}: 第 {} 步失败 {:?}", seed, steps, result);
            check_invariants(&engine)?;
            steps += 1;
        }

        prop_assert!(engine.state.is_game_over(), "seed {}: 对局没有结束", seed);
        prop_assert!(engine.state.outcome.is_some());
        prop_assert!(engine.state.pending_claims.is_none());
    }

    /// 相同种子的对局完全相同
    #[test]
    fn seeded_games_are_reproducible(seed in 0u64..1_000_000) {
        let mut first = new_engine(seed);
        let mut second = new_engine(seed);
        prop_assert_eq!(&first.state, &second.state);

        let mut rng1 = StdRng::seed_from_u64(seed);
        let mut rng2 = StdRng::seed_from_u64(seed);
        let mut steps = 0u32;
        while !first.state.is_game_over() && steps < MAX_STEPS {
            let a = step(&mut first, &mut rng1);
            let b = step(&mut second, &mut rng2);
            prop_assert_eq!(a, b);
            steps += 1;
        }
        prop_assert_eq!(&first.state, &second.state);
        prop_assert_eq!(&first.wall, &second.wall);
    }
}
