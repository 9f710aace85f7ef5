//! Ground and flying obstacles
//!
//! Barrels are pooled: one that rolls off the left edge is parked, and the
//! next ground spawn brings a parked barrel back at the right edge before
//! allocating a new one. The spawn timer alone sets barrel cadence; the pool
//! only grows to the most barrels ever on screen at once. Flying obstacles
//! are few and short-lived, so they are simply created and dropped.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::scroll::GroundTrack;
use super::spawn::Sampler;
use crate::config::ObstacleConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Ground,
    Flying,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Obstacle {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// Fully past the left edge of the viewport
    pub fn off_screen_left(&self) -> bool {
        self.pos.x + self.size.x <= 0.0
    }
}

/// Per-tick bookkeeping from [`ObstaclePool::advance`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolUpdate {
    /// Barrels that left the screen and were parked for reuse
    pub recycled: Vec<u32>,
    pub despawned: Vec<u32>,
}

/// All obstacles for the current run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstaclePool {
    /// Barrels on screen or entering, in spawn order
    pub ground: Vec<Obstacle>,
    /// Barrels waiting for the next ground spawn
    pub parked: Vec<Obstacle>,
    /// Created on spawn, dropped once off screen
    pub flying: Vec<Obstacle>,
    pub config: ObstacleConfig,
    pub viewport_width: f32,
    pub gravity: f32,
    next_id: u32,
}

impl ObstaclePool {
    pub fn new(config: ObstacleConfig, viewport_width: f32, gravity: f32) -> Self {
        Self {
            ground: Vec::with_capacity(config.pool_capacity),
            parked: Vec::with_capacity(config.pool_capacity),
            flying: Vec::new(),
            config,
            viewport_width,
            gravity,
            next_id: 1,
        }
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Live obstacles (parked barrels excluded)
    pub fn len(&self) -> usize {
        self.ground.len() + self.flying.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Barrels ever allocated this run, live or parked
    pub fn ground_allocated(&self) -> usize {
        self.ground.len() + self.parked.len()
    }

    /// Iterate every live obstacle, barrels first
    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.ground.iter().chain(self.flying.iter())
    }

    /// Put a barrel at the right edge, lifted above the floor so it settles.
    /// A parked barrel is reused when there is one; otherwise a new one is
    /// allocated.
    pub fn spawn_ground(&mut self, ground: &GroundTrack) -> u32 {
        let (w, h) = self.config.ground_size;
        let pos = Vec2::new(
            self.viewport_width,
            ground.floor_y - self.config.ground_spawn_lift - h,
        );
        let vel = Vec2::new(self.config.ground_speed, 0.0);

        let barrel = match self.parked.pop() {
            Some(mut barrel) => {
                barrel.pos = pos;
                barrel.vel = vel;
                log::debug!("Reused ground obstacle {}", barrel.id);
                barrel
            }
            None => {
                let id = self.next_entity_id();
                log::debug!("Spawned ground obstacle {}", id);
                Obstacle {
                    id,
                    kind: ObstacleKind::Ground,
                    pos,
                    vel,
                    size: Vec2::new(w, h),
                }
            }
        };
        let id = barrel.id;
        self.ground.push(barrel);
        id
    }

    /// Add a flying obstacle at the right edge at a random height in the band
    pub fn spawn_flying(&mut self, sampler: &mut dyn Sampler) -> u32 {
        let (w, h) = self.config.flying_size;
        let (lo, hi) = self.config.flying_band;
        let y = sampler.range_f32(lo, hi);
        let id = self.next_entity_id();
        self.flying.push(Obstacle {
            id,
            kind: ObstacleKind::Flying,
            pos: Vec2::new(self.viewport_width, y),
            vel: Vec2::new(self.config.flying_speed, 0.0),
            size: Vec2::new(w, h),
        });
        log::debug!("Spawned flying obstacle {} at y={:.1}", id, y);
        id
    }

    /// Move everything one step, settle barrels on the floor, park barrels
    /// that left the screen and drop flyers that did
    pub fn advance(&mut self, dt: f32, ground: &GroundTrack) -> PoolUpdate {
        let mut update = PoolUpdate::default();
        let gravity = self.gravity;
        let parked = &mut self.parked;

        self.ground.retain_mut(|barrel| {
            barrel.vel.y += gravity * dt;
            barrel.pos += barrel.vel * dt;
            if let Some(rest_y) = ground.rest(barrel.pos.y, barrel.size.y) {
                barrel.pos.y = rest_y;
                barrel.vel.y = 0.0;
            }
            if barrel.off_screen_left() {
                update.recycled.push(barrel.id);
                parked.push(barrel.clone());
                return false;
            }
            true
        });

        for flyer in &mut self.flying {
            flyer.pos += flyer.vel * dt;
        }
        self.flying.retain(|f| {
            let gone = f.off_screen_left();
            if gone {
                update.despawned.push(f.id);
            }
            !gone
        });

        for id in &update.recycled {
            log::debug!("Parked ground obstacle {}", id);
        }
        for id in &update.despawned {
            log::debug!("Despawned flying obstacle {}", id);
        }
        update
    }
}
