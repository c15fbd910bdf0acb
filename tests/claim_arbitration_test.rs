mod common;

use common::{index_of, set_hand, started_engine};
use laizi_engine::{
    ActionResult, ChiOption, ClaimDecision, ClaimKind, EndReason, GameError, Honor, MeldKind, Phase, Suit,
    TileKind, TurnStage,
};

fn pending_after_discard(result: ActionResult) -> laizi_engine::PendingClaims {
    match result {
        ActionResult::AwaitingClaims(pending) => pending,
        other => panic!("应该等待响应，实际为 {:?}", other),
    }
}

/// 胡、碰、吃同时存在时按优先级排序
fn setup_win_peng_chi() -> laizi_engine::GameEngine {
    let mut engine = started_engine();
    set_hand(&mut engine, 0, "5p 123m 456m 789m 123s 7z");
    set_hand(&mut engine, 1, "34p 777p 888s 999s 67z");
    set_hand(&mut engine, 2, "123m 456m 789m 11s 46p");
    set_hand(&mut engine, 3, "55p 111z 222z 333z 47z");
    engine
}

#[test]
fn test_win_ranked_above_peng_and_chi() {
    let mut engine = setup_win_peng_chi();
    let pending = pending_after_discard(engine.discard(0, index_of(&engine, 0, "5p")).unwrap());

    let ranked = pending.ranked();
    assert_eq!(ranked.len(), 3);
    assert_eq!((ranked[0].player, ranked[0].kind, ranked[0].priority), (2, ClaimKind::Win, 4));
    assert_eq!((ranked[1].player, ranked[1].kind, ranked[1].priority), (3, ClaimKind::Peng, 2));
    assert_eq!((ranked[2].player, ranked[2].kind, ranked[2].priority), (1, ClaimKind::Chi, 1));
    assert!(!pending.is_contested());
    assert_eq!(engine.state.stage, TurnStage::AwaitingClaims);

    // 决定的顺序无关
    let chi = ChiOption { suit: Suit::Tong, ranks: [3, 4] };
    assert!(matches!(
        engine.respond_to_claim(1, ClaimDecision::Chi(chi)).unwrap(),
        ActionResult::AwaitingClaims(_)
    ));
    engine.respond_to_claim(3, ClaimDecision::Peng).unwrap();
    let result = engine.respond_to_claim(2, ClaimDecision::Win).unwrap();

    match result {
        ActionResult::GameOver(outcome) => {
            assert_eq!(outcome.winner, Some(2));
            assert_eq!(outcome.reason, EndReason::Discard { discarder: 0 });
        }
        other => panic!("应该胡牌，实际为 {:?}", other),
    }
    assert_eq!(engine.state.phase, Phase::Finished);
    assert_eq!(engine.state.players[2].hand.len(), 14);
    assert!(engine.state.players[0].discards.is_empty());
    assert!(engine.state.last_discard.is_none());
    assert!(engine.state.pending_claims.is_none());
}

#[test]
fn test_peng_wins_when_winner_passes() {
    let mut engine = setup_win_peng_chi();
    engine.discard(0, index_of(&engine, 0, "5p")).unwrap();

    engine.respond_to_claim(2, ClaimDecision::Pass).unwrap();
    engine.respond_to_claim(3, ClaimDecision::Peng).unwrap();
    engine
        .respond_to_claim(1, ClaimDecision::Chi(ChiOption { suit: Suit::Tong, ranks: [3, 4] }))
        .unwrap();

    // 碰的玩家接着出牌
    assert_eq!(engine.state.current_player, 3);
    assert_eq!(engine.state.stage, TurnStage::AwaitingDiscard);
    let player = &engine.state.players[3];
    assert_eq!(player.melds[0].kind, MeldKind::Peng);
    assert_eq!(player.melds[0].claimed_from, Some(0));
    assert!(player.has_claimed_meld);
    assert_eq!(player.effective_hand_size(), 14);

    // 吃的玩家什么都没变
    assert!(engine.state.players[1].melds.is_empty());
    assert!(!engine.state.players[1].has_claimed_meld);
}

#[test]
fn test_chi_offered_only_to_next_seat() {
    let mut engine = started_engine();
    let pending = pending_after_discard(engine.discard(0, index_of(&engine, 0, "5m")).unwrap());

    // 2、3 号也有 3、4、6、7 万，但不是下家
    assert_eq!(pending.eligible().len(), 1);
    let claims = pending.options_for(1).unwrap();
    assert_eq!(claims.seat_distance, 1);
    assert_eq!(claims.options.len(), 1);
    assert_eq!(claims.options[0].kind, ClaimKind::Chi);
    assert_eq!(claims.options[0].chi_options.len(), 3);
    assert!(pending.options_for(2).is_none());
    assert!(pending.options_for(3).is_none());

    assert_eq!(
        engine.respond_to_claim(2, ClaimDecision::Pass),
        Err(GameError::InvalidTurn { player: 2 })
    );
}

#[test]
fn test_chi_execution() {
    let mut engine = started_engine();
    engine.discard(0, index_of(&engine, 0, "5m")).unwrap();

    // 没有提供的组合
    let wrong = ChiOption { suit: Suit::Wan, ranks: [7, 8] };
    assert_eq!(
        engine.respond_to_claim(1, ClaimDecision::Chi(wrong)),
        Err(GameError::IllegalClaim { player: 1, kind: ClaimKind::Chi })
    );
    assert_eq!(
        engine.respond_to_claim(1, ClaimDecision::Peng),
        Err(GameError::IllegalClaim { player: 1, kind: ClaimKind::Peng })
    );

    let chi = ChiOption { suit: Suit::Wan, ranks: [4, 6] };
    assert!(matches!(
        engine.respond_to_claim(1, ClaimDecision::Chi(chi)).unwrap(),
        ActionResult::Updated(_)
    ));

    let player = &engine.state.players[1];
    assert_eq!(player.melds[0].kind, MeldKind::Chi);
    let meld_kinds: Vec<TileKind> = player.melds[0].tiles.iter().map(|t| t.kind()).collect();
    assert_eq!(meld_kinds, vec![TileKind::Wan(4), TileKind::Wan(5), TileKind::Wan(6)]);
    assert_eq!(player.hand.len(), 11);
    assert!(player.has_claimed_meld);

    assert_eq!(engine.state.current_player, 1);
    assert_eq!(engine.state.stage, TurnStage::AwaitingDiscard);
    assert!(engine.state.players[0].discards.is_empty());
    assert!(engine.state.last_discard.is_none());
    assert_eq!(engine.accounted_tiles(), 136);

    // 吃完直接出牌，不摸牌
    assert_eq!(engine.draw(1), Err(GameError::InvalidTurn { player: 1 }));
    engine.discard(1, 0).unwrap();
}

#[test]
fn test_equal_priority_is_surfaced() {
    let mut engine = started_engine();
    set_hand(&mut engine, 0, "5p 123m 456m 789m 123s 7z");
    set_hand(&mut engine, 1, "123m 456m 789m 11s 46p");
    set_hand(&mut engine, 3, "111z 222z 333z 44z 46p");

    let pending = pending_after_discard(engine.discard(0, index_of(&engine, 0, "5p")).unwrap());
    assert!(pending.is_contested());
    let contenders = pending.top_contenders();
    assert_eq!(contenders.len(), 2);
    assert_eq!((contenders[0].player, contenders[0].kind), (1, ClaimKind::Win));
    assert_eq!((contenders[1].player, contenders[1].kind), (3, ClaimKind::Win));

    // 都要胡时，离出牌者近的优先
    engine.respond_to_claim(3, ClaimDecision::Win).unwrap();
    let result = engine.respond_to_claim(1, ClaimDecision::Win).unwrap();
    assert!(matches!(
        result,
        ActionResult::GameOver(outcome) if outcome.winner == Some(1)
    ));
}

#[test]
fn test_open_gang_draws_from_tail() {
    let mut engine = started_engine();
    set_hand(&mut engine, 2, "999m 111z 222z 333z 4z");
    let pending = pending_after_discard(engine.discard(0, index_of(&engine, 0, "9m")).unwrap());

    let claims = pending.options_for(2).unwrap();
    assert_eq!(claims.options[0].kind, ClaimKind::Gang);
    assert_eq!(claims.options[0].priority, 3);
    assert!(!claims.options[0].bonus_honor);
    assert_eq!(claims.options[1].kind, ClaimKind::Peng);

    engine.respond_to_claim(1, ClaimDecision::Pass).unwrap();
    engine.respond_to_claim(2, ClaimDecision::Gang).unwrap();

    let player = &engine.state.players[2];
    assert_eq!(player.melds[0].kind, MeldKind::Gang);
    assert_eq!(player.melds[0].len(), 4);
    assert!(player.has_claimed_meld);
    // 补的是牌墙尾部的白板
    assert_eq!(player.hand.count_of(TileKind::Honor(Honor::White)), 1);
    assert_eq!(player.effective_hand_size(), 14);
    assert_eq!(engine.state.current_player, 2);
    assert_eq!(engine.state.stage, TurnStage::AwaitingDiscard);
}

#[test]
fn test_bonus_honor_gang_has_win_priority() {
    let mut engine = started_engine();
    set_hand(&mut engine, 0, "5z 123m 456m 789m 123s 7z");
    // 6 条是癞子，和红中组成对子
    set_hand(&mut engine, 1, "123m 456m 789m 111s 6s");
    set_hand(&mut engine, 3, "555z 111p 999p 22s 33s");

    let pending = pending_after_discard(engine.discard(0, index_of(&engine, 0, "5z")).unwrap());
    let gang = pending.options_for(3).unwrap();
    assert_eq!(gang.options[0].kind, ClaimKind::Gang);
    assert_eq!(gang.options[0].priority, 4);
    assert!(gang.options[0].bonus_honor);

    assert!(pending.is_contested());
    assert_eq!(pending.ranked()[0].player, 1);
    assert_eq!(pending.ranked()[0].kind, ClaimKind::Win);

    engine.respond_to_claim(3, ClaimDecision::Gang).unwrap();
    engine.respond_to_claim(1, ClaimDecision::Pass).unwrap();
    assert_eq!(engine.state.current_player, 3);
    assert_eq!(engine.state.players[3].melds[0].set_kind(), Some(TileKind::Honor(Honor::Red)));
}

#[test]
fn test_duplicate_decision_rejected() {
    let mut engine = setup_win_peng_chi();
    engine.discard(0, index_of(&engine, 0, "5p")).unwrap();
    engine.respond_to_claim(3, ClaimDecision::Pass).unwrap();
    assert_eq!(
        engine.respond_to_claim(3, ClaimDecision::Peng),
        Err(GameError::InvalidTurn { player: 3 })
    );
    assert_eq!(
        engine.state.pending_claims.as_ref().map(|p| p.awaiting().len()),
        Some(2)
    );
}
