/// 游戏常量定义
///
/// 集中管理所有魔法数字，提高代码可维护性

/// 玩家数量
pub const NUM_PLAYERS: u8 = 4;

/// 起手牌数
pub const INITIAL_HAND_SIZE: usize = 13;

/// 吃/碰/杠/胡 的基础优先级
pub const CHI_PRIORITY: u8 = 1;
pub const PENG_PRIORITY: u8 = 2;
pub const GANG_PRIORITY: u8 = 3;
pub const WIN_PRIORITY: u8 = 4;

/// 下一个座位
pub fn next_seat(seat: u8) -> u8 {
    (seat + 1) % NUM_PLAYERS
}

/// 从 `from` 顺时针数到 `to` 的距离（1..=3，自己为 0）
pub fn seat_distance(from: u8, to: u8) -> u8 {
    (to + NUM_PLAYERS - from) % NUM_PLAYERS
}
