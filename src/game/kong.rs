use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::game::meld::{Meld, MeldKind};
use crate::game::player::Player;
use crate::tile::{Tile, TileKind};

/// 杠类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KongType {
    /// 明杠（别人打出的牌，手中有三张）
    Open,
    /// 暗杠（手牌中有四张相同的牌，自己杠）
    Concealed,
}

/// 杠操作器
///
/// 杠完之后的补牌（从牌墙尾部）由引擎负责
pub struct KongHandler;

impl KongHandler {
    /// 检查是否可以明杠
    ///
    /// 明杠条件：
    /// 1. 手牌中有三张相同的牌
    /// 2. 别人打出了第四张相同的牌
    pub fn can_open_kong(player: &Player, kind: TileKind) -> Option<KongType> {
        if player.hand.count_of(kind) >= 3 {
            Some(KongType::Open)
        } else {
            None
        }
    }

    /// 检查是否可以暗杠
    ///
    /// 暗杠条件：手牌中有四张相同的牌
    pub fn can_concealed_kong(player: &Player, kind: TileKind) -> Option<KongType> {
        if player.hand.count_of(kind) >= 4 {
            Some(KongType::Concealed)
        } else {
            None
        }
    }

    /// 所有可以暗杠的牌身份（规范顺序）
    pub fn concealed_kong_kinds(player: &Player) -> SmallVec<[TileKind; 3]> {
        player
            .hand
            .distinct_kinds()
            .into_iter()
            .filter(|&kind| Self::can_concealed_kong(player, kind).is_some())
            .collect()
    }

    /// 执行明杠
    ///
    /// # 参数
    ///
    /// - `player`: 玩家（可变引用）
    /// - `tile`: 别人打出的牌
    /// - `from`: 出牌的座位
    ///
    /// # 返回
    ///
    /// 是否成功明杠
    pub fn open_kong(player: &mut Player, tile: Tile, from: u8) -> bool {
        let Some(removed) = player.hand.remove_kind(tile.kind(), 3) else {
            return false;
        };

        let mut tiles = removed.to_vec();
        tiles.push(tile);
        player.add_meld(Meld::new(MeldKind::Gang, tiles, Some(from)));
        true
    }

    /// 执行暗杠
    ///
    /// # 返回
    ///
    /// 是否成功暗杠
    pub fn concealed_kong(player: &mut Player, kind: TileKind) -> bool {
        let Some(removed) = player.hand.remove_kind(kind, 4) else {
            return false;
        };

        player.add_meld(Meld::new(MeldKind::ConcealedGang, removed.to_vec(), None));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_with(kind: TileKind, n: usize) -> Player {
        let mut player = Player::new(2);
        for _ in 0..n {
            player.hand.add_tile(Tile::new(kind));
        }
        player
    }

    #[test]
    fn test_can_open_kong() {
        let player = player_with(TileKind::Tiao(5), 3);
        assert_eq!(KongHandler::can_open_kong(&player, TileKind::Tiao(5)), Some(KongType::Open));
        assert_eq!(KongHandler::can_concealed_kong(&player, TileKind::Tiao(5)), None);

        let player = player_with(TileKind::Tiao(5), 2);
        assert_eq!(KongHandler::can_open_kong(&player, TileKind::Tiao(5)), None);
    }

    #[test]
    fn test_open_kong() {
        let mut player = player_with(TileKind::Tiao(5), 3);
        assert!(KongHandler::open_kong(&mut player, Tile::new(TileKind::Tiao(5)), 1));
        assert!(player.hand.is_empty());
        assert_eq!(player.melds[0].kind, MeldKind::Gang);
        assert_eq!(player.melds[0].len(), 4);
        assert!(player.has_claimed_meld);
    }

    #[test]
    fn test_concealed_kong() {
        let mut player = player_with(TileKind::Honor(crate::tile::Honor::Red), 4);
        player.hand.add_tile(Tile::new(TileKind::Wan(1)));

        assert_eq!(
            KongHandler::concealed_kong_kinds(&player).as_slice(),
            &[TileKind::Honor(crate::tile::Honor::Red)]
        );
        assert!(KongHandler::concealed_kong(&mut player, TileKind::Honor(crate::tile::Honor::Red)));
        assert_eq!(player.hand.len(), 1);
        assert_eq!(player.melds[0].kind, MeldKind::ConcealedGang);
        assert_eq!(player.melds[0].claimed_from, None);

        // 暗杠不算吃碰
        assert!(!player.has_claimed_meld);

        // 不足四张
        assert!(!KongHandler::concealed_kong(&mut player, TileKind::Wan(1)));
    }
}
