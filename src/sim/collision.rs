//! Player versus obstacle hit testing
//!
//! A plain O(n) sweep over live obstacles using the player's shrunk
//! collider. Obstacle counts are tiny (a handful of barrels plus the odd
//! flyer), so no broad phase is needed.

use super::obstacle::{Obstacle, ObstaclePool};
use super::player::PlayerBody;
use super::rect::Rect;

/// First obstacle (in pool order) overlapping the collider, if any
pub fn first_hit<'a>(
    collider: &Rect,
    obstacles: impl IntoIterator<Item = &'a Obstacle>,
) -> Option<&'a Obstacle> {
    obstacles
        .into_iter()
        .find(|o| collider.overlaps(&o.bounds()))
}

/// Check the player against every live obstacle
pub fn resolve(player: &PlayerBody, pool: &ObstaclePool) -> Option<u32> {
    first_hit(&player.collider(), pool.iter()).map(|o| o.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameConfig;
    use crate::sim::obstacle::ObstacleKind;
    use glam::Vec2;

    fn obstacle_at(id: u32, x: f32, y: f32) -> Obstacle {
        Obstacle {
            id,
            kind: ObstacleKind::Ground,
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            size: Vec2::new(32.0, 32.0),
        }
    }

    #[test]
    fn test_hit_on_overlap() {
        let player = PlayerBody::new(&GameConfig::default());
        let collider = player.collider();
        let o = obstacle_at(7, collider.left(), 418.0 - 32.0);
        assert_eq!(first_hit(&collider, [&o]).map(|o| o.id), Some(7));
    }

    #[test]
    fn test_sprite_edge_overlap_is_not_a_hit() {
        // Barrel touches the visible sprite but not the shrunk collider
        let player = PlayerBody::new(&GameConfig::default());
        let sprite = player.sprite_bounds();
        let collider = player.collider();
        let x = sprite.right() - 5.0;
        assert!(x >= collider.right());
        let o = obstacle_at(1, x, 418.0 - 32.0);
        assert!(sprite.overlaps(&o.bounds()));
        assert!(first_hit(&collider, [&o]).is_none());
    }

    #[test]
    fn test_jumping_clears_barrel() {
        let mut player = PlayerBody::new(&GameConfig::default());
        player.y -= 40.0;
        let o = obstacle_at(1, player.x, 418.0 - 32.0);
        assert!(first_hit(&player.collider(), [&o]).is_none());
    }

    #[test]
    fn test_first_hit_in_order() {
        let player = PlayerBody::new(&GameConfig::default());
        let collider = player.collider();
        let a = obstacle_at(3, collider.left() - 10.0, 400.0);
        let b = obstacle_at(4, collider.left() - 5.0, 400.0);
        assert_eq!(first_hit(&collider, [&a, &b]).map(|o| o.id), Some(3));
    }
}
