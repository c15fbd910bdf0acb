/// 武汉麻将（癞子）规则引擎
///
/// 胡牌判定、癞子使用规则，以及摸牌/出牌/吃碰杠胡的回合状态机

pub mod errors;
pub mod tile;
pub mod game;

// 重新导出常用类型
pub use errors::{EngineResult, GameError};
pub use tile::{Hand, Honor, Suit, Tile, TileKind, Wall, WildReveal, WinChecker, WinResult};
pub use game::action::{Action, ChiOption, ClaimDecision, ClaimKind};
pub use game::action_callback::{ActionProvider, FnActionProvider, RandomDiscardProvider};
pub use game::claim::{PendingClaims, PlayerClaims, RankedClaim};
pub use game::game_engine::{ActionResult, GameEngine};
pub use game::meld::{Meld, MeldKind};
pub use game::player::Player;
pub use game::rules::RuleConfig;
pub use game::state::{EndReason, GameOutcome, GameSnapshot, GameState, Phase, TurnStage};
pub use game::wild::{WildTileManager, WildUsageReport};
