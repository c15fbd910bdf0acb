use smallvec::SmallVec;

use crate::game::action::ChiOption;
use crate::game::meld::{Meld, MeldKind};
use crate::game::player::Player;
use crate::tile::{Tile, TileKind};

/// 吃牌操作器
///
/// 只有出牌者的下家可以吃，且只能吃数牌
pub struct ChiHandler;

impl ChiHandler {
    /// 所有可以组成顺子的相邻两张牌
    ///
    /// 依次检查 {r-2, r-1}、{r-1, r+1}、{r+1, r+2}，点数限定在 1-9
    ///
    /// # 参数
    ///
    /// - `player`: 玩家
    /// - `kind`: 别人打出的牌的身份
    ///
    /// # 返回
    ///
    /// 至多 3 个选项，字牌返回空
    pub fn chi_options(player: &Player, kind: TileKind) -> SmallVec<[ChiOption; 3]> {
        let mut options = SmallVec::new();
        let Some(rank) = kind.rank() else {
            return options;
        };
        let suit = kind.suit();

        for offsets in [[-2i8, -1], [-1, 1], [1, 2]] {
            let ranks = offsets.map(|o| rank as i8 + o);
            if ranks.iter().any(|&r| r < TileKind::MIN_RANK as i8 || r > TileKind::MAX_RANK as i8) {
                continue;
            }
            let option = ChiOption {
                suit,
                ranks: ranks.map(|r| r as u8),
            };
            if Self::holds_option(player, &option) {
                options.push(option);
            }
        }
        options
    }

    fn holds_option(player: &Player, option: &ChiOption) -> bool {
        option
            .kinds()
            .iter()
            .all(|k| k.map_or(false, |k| player.hand.contains(k)))
    }

    /// 执行吃牌
    ///
    /// # 参数
    ///
    /// - `player`: 玩家（可变引用）
    /// - `tile`: 别人打出的牌
    /// - `option`: 选择的吃牌组合（必须是 `chi_options` 给出的选项之一）
    /// - `from`: 出牌的座位
    ///
    /// # 返回
    ///
    /// 是否成功吃牌
    pub fn chi(player: &mut Player, tile: Tile, option: ChiOption, from: u8) -> bool {
        if !Self::chi_options(player, tile.kind()).contains(&option) {
            return false;
        }

        let mut tiles = Vec::with_capacity(3);
        for kind in option.kinds().into_iter().flatten() {
            match player.hand.remove_kind(kind, 1) {
                Some(removed) => tiles.extend(removed),
                None => return false,
            }
        }
        tiles.push(tile);
        player.add_meld(Meld::new(MeldKind::Chi, tiles, Some(from)));
        true
    }
}
