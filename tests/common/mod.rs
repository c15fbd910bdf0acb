//! 测试共用的辅助函数
#![allow(dead_code)]

use laizi_engine::{GameEngine, Hand, Honor, Tile, TileKind, Wall};

/// 解析牌的简写：数字 + 花色，`m` 万、`s` 条、`p` 筒、`z` 字牌（1-7 为东南西北中发白）
///
/// 例如 `"123m 55p 777z"`
pub fn kinds(notation: &str) -> Vec<TileKind> {
    let mut result = Vec::new();
    let mut ranks: Vec<u8> = Vec::new();
    for c in notation.chars() {
        match c {
            '1'..='9' => ranks.push(c as u8 - b'0'),
            'm' | 's' | 'p' | 'z' => {
                for rank in ranks.drain(..) {
                    let kind = match c {
                        'm' => TileKind::Wan(rank),
                        's' => TileKind::Tiao(rank),
                        'p' => TileKind::Tong(rank),
                        _ => TileKind::Honor(Honor::ALL[rank as usize - 1]),
                    };
                    result.push(kind);
                }
            }
            _ => {}
        }
    }
    assert!(ranks.is_empty(), "缺少花色: {}", notation);
    result
}

/// 解析为实体牌，`wild` 身份的牌带癞子标记
pub fn tiles(notation: &str, wild: Option<TileKind>) -> Vec<Tile> {
    kinds(notation)
        .into_iter()
        .map(|k| Tile::new(k).with_wild(Some(k) == wild))
        .collect()
}

/// 用未洗牌的牌墙开局
///
/// 每人起手 1-9 万 + 1-4 条，翻开 5 条，癞子为 6 条，庄家（0 号）摸到 5 条
pub fn started_engine() -> GameEngine {
    let mut engine = GameEngine::new();
    engine
        .start_game_with_wall(Wall::new())
        .expect("开局失败");
    engine
}

/// 替换某个玩家的手牌（按本局癞子打标记）
pub fn set_hand(engine: &mut GameEngine, seat: u8, notation: &str) {
    let wild = engine.state.wild.wild_kind();
    engine.state.players[seat as usize].hand = Hand::from_tiles(tiles(notation, wild));
}

/// 某个玩家手中指定身份的第一张牌的位置
pub fn index_of(engine: &GameEngine, seat: u8, notation: &str) -> usize {
    let kind = kinds(notation)[0];
    engine.state.players[seat as usize]
        .hand
        .find_index(kind)
        .expect("手牌中没有这张牌")
}

/// 翻开指定身份的牌墙：把一张 `flip` 挪到发完牌后的位置
pub fn wall_with_flip(flip: TileKind) -> Wall {
    let mut all = Tile::full_set();
    let pos = all
        .iter()
        .rposition(|t| t.kind() == flip)
        .expect("没有这张牌");
    let tile = all.remove(pos);
    all.insert(52, tile);
    Wall::from_tiles(all)
}
