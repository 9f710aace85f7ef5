//! The runner's body
//!
//! x never changes; y integrates under constant gravity and is clamped to
//! the floor. Hit testing uses a collider narrower than the sprite.

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::scroll::GroundTrack;
use crate::config::GameConfig;

/// Animation the renderer should play; a pure function of `on_ground`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Animation {
    Run,
    Jump,
}

/// What changed during one integration step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepContact {
    pub landed: bool,
    pub left_ground: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBody {
    /// Sprite top-left x
    pub x: f32,
    /// Sprite top-left y
    pub y: f32,
    pub vel_y: f32,
    pub on_ground: bool,
    pub width: f32,
    pub height: f32,
    pub collider_shrink: f32,
    pub gravity: f32,
    pub jump_speed: f32,
}

impl PlayerBody {
    /// Player standing on the floor
    pub fn new(config: &GameConfig) -> Self {
        Self {
            x: config.player.x,
            y: config.floor_y() - config.player.height,
            vel_y: 0.0,
            on_ground: true,
            width: config.player.width,
            height: config.player.height,
            collider_shrink: config.player.collider_shrink,
            gravity: config.physics.gravity,
            jump_speed: config.physics.jump_speed,
        }
    }

    /// Full sprite extent (what the renderer draws)
    pub fn sprite_bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Hit-test rectangle: sprite bounds shrunk horizontally
    pub fn collider(&self) -> Rect {
        self.sprite_bounds().shrink_x(self.collider_shrink)
    }

    pub fn animation(&self) -> Animation {
        if self.on_ground {
            Animation::Run
        } else {
            Animation::Jump
        }
    }

    /// Start a jump. Ignored (returns false) unless standing on the floor.
    pub fn jump(&mut self) -> bool {
        if !self.on_ground {
            return false;
        }
        self.vel_y = -self.jump_speed;
        self.on_ground = false;
        true
    }

    /// Gravity step followed by floor clamping
    pub fn integrate(&mut self, dt: f32, ground: &GroundTrack) -> StepContact {
        let was_on_ground = self.on_ground;
        self.vel_y += self.gravity * dt;
        self.y += self.vel_y * dt;

        match ground.rest(self.y, self.height) {
            Some(rest_y) => {
                self.y = rest_y;
                self.vel_y = 0.0;
                self.on_ground = true;
            }
            None => self.on_ground = false,
        }

        StepContact {
            landed: !was_on_ground && self.on_ground,
            left_ground: was_on_ground && !self.on_ground,
        }
    }
}
