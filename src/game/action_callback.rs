use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::action::{Action, ClaimDecision};
use crate::game::state::{GameState, TurnStage};

/// 动作提供者 trait
///
/// 引擎之外的决策方（玩家界面、AI、测试脚本）通过它给出动作
pub trait ActionProvider {
    /// 根据游戏状态返回玩家动作
    ///
    /// # 参数
    ///
    /// - `state`: 当前游戏状态
    /// - `player_id`: 需要做决定的玩家 ID
    ///
    /// # 返回
    ///
    /// 玩家选择的动作
    fn decide(&mut self, state: &GameState, player_id: u8) -> Action;
}

/// 随机出牌的提供者
///
/// 需要摸牌时摸牌，所有响应都选择过，出牌时随机选一张
pub struct RandomDiscardProvider<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomDiscardProvider<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomDiscardProvider<StdRng> {
    /// 使用固定种子（可复现）
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ActionProvider for RandomDiscardProvider<R> {
    fn decide(&mut self, state: &GameState, player_id: u8) -> Action {
        match state.stage {
            TurnStage::AwaitingDraw => Action::Draw,
            TurnStage::AwaitingClaims => Action::Claim(ClaimDecision::Pass),
            TurnStage::AwaitingDiscard => {
                let len = state.player_ref(player_id).hand.len().max(1);
                Action::Discard {
                    hand_index: self.rng.gen_range(0..len),
                }
            }
        }
    }
}

/// 函数式动作提供者适配器
///
/// 将函数转换为 ActionProvider trait
pub struct FnActionProvider<F> {
    callback: F,
}

impl<F> FnActionProvider<F>
where
    F: FnMut(&GameState, u8) -> Action,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ActionProvider for FnActionProvider<F>
where
    F: FnMut(&GameState, u8) -> Action,
{
    fn decide(&mut self, state: &GameState, player_id: u8) -> Action {
        (self.callback)(state, player_id)
    }
}
