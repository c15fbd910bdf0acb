use crate::game::meld::{Meld, MeldKind};
use crate::game::player::Player;
use crate::tile::{Tile, TileKind};

/// 碰牌操作器
pub struct PongHandler;

impl PongHandler {
    /// 检查是否可以碰牌
    ///
    /// 碰牌条件：
    /// 1. 手牌中有两张相同的牌
    /// 2. 别人打出了第三张相同的牌
    ///
    /// # 参数
    ///
    /// - `player`: 玩家
    /// - `kind`: 别人打出的牌的身份
    pub fn can_pong(player: &Player, kind: TileKind) -> bool {
        player.hand.count_of(kind) >= 2
    }

    /// 执行碰牌
    ///
    /// # 参数
    ///
    /// - `player`: 玩家（可变引用）
    /// - `tile`: 别人打出的牌
    /// - `from`: 出牌的座位
    ///
    /// # 返回
    ///
    /// 是否成功碰牌；失败时不修改玩家
    pub fn pong(player: &mut Player, tile: Tile, from: u8) -> bool {
        let Some(removed) = player.hand.remove_kind(tile.kind(), 2) else {
            return false;
        };

        let mut tiles = removed.to_vec();
        tiles.push(tile);
        player.add_meld(Meld::new(MeldKind::Peng, tiles, Some(from)));
        true
    }
}
