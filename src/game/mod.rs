/// 游戏逻辑模块
///
/// 包含游戏状态、玩家、动作、癞子规则、响应裁决和流程控制

pub mod constants;
pub mod rules;
pub mod action;
pub mod meld;
pub mod player;
pub mod pong;
pub mod kong;
pub mod chi;
pub mod wild;
pub mod claim;
pub mod state;
pub mod game_engine;
pub mod action_callback;
