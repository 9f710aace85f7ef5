//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Injected sampler only (seeded in real runs)
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod obstacle;
pub mod player;
pub mod rect;
pub mod scroll;
pub mod spawn;
pub mod state;
pub mod tick;

pub use obstacle::{Obstacle, ObstacleKind, ObstaclePool};
pub use player::{Animation, PlayerBody};
pub use rect::Rect;
pub use scroll::{GroundTrack, ScrollLayer, ScrollLayerSet, Segment};
pub use spawn::{DelayCurve, Sampler, SeededSampler, SpawnScheduler, SpawnTimer};
pub use state::{Frame, GameEvent, GameOverReport, GameState, RunPhase, RunState, World};
pub use tick::{TickInput, tick};
