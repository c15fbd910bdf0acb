/// 牌相关模块
///
/// 包含牌（Tile）、牌墙（Wall）、手牌（Hand）和胡牌判定的实现

pub mod tile;
pub mod wall;
pub mod hand;
pub mod win_check;

// 重新导出常用类型
pub use tile::{Honor, Suit, Tile, TileKind};
pub use wall::{Wall, WildReveal};
pub use hand::Hand;
pub use win_check::{check_win, is_win, Group, Pair, WinChecker, WinResult};
