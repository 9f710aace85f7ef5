//! Alitu Runner - A side-scrolling runner game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (parallax, spawning, physics, run state)
//! - `config`: Data-driven game tuning with validation
//! - `persistence`: High score storage (memory, file, LocalStorage)
//! - `platform`: Fixed-step clock and browser bindings
//! - `leaderboard`: Top-10 scoreboard used by the HTTP service
//! - `server`: Axum scoreboard routes (native only)

pub mod config;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
#[cfg(not(target_arch = "wasm32"))]
pub mod server;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use leaderboard::Leaderboard;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the clock will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Viewport dimensions
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 450.0;

    /// Constant gravity (pixels/s², +y is down)
    pub const GRAVITY: f32 = 500.0;
    /// Upward speed applied on jump (pixels/s)
    pub const JUMP_SPEED: f32 = 300.0;

    /// Parallax background
    pub const PARALLAX_SPEEDS: [f32; 5] = [6.0, 18.0, 30.0, 42.0, 54.0];
    pub const PARALLAX_SEGMENT_WIDTH: f32 = 800.0;
    /// Front-most layer cycles through texture variants as it wraps
    pub const VARIANT_LAYER: usize = 4;
    pub const VARIANT_COUNT: u32 = 3;
    /// Wrapped segments overlap their neighbour by this much to hide seams
    pub const SEAM_OVERLAP: f32 = 1.0;

    /// Floor tiles
    pub const GROUND_TILE_SIZE: f32 = 32.0;
    pub const GROUND_SPEED: f32 = 200.0;

    /// Player sprite
    pub const PLAYER_X: f32 = 100.0;
    pub const PLAYER_WIDTH: f32 = 38.0;
    pub const PLAYER_HEIGHT: f32 = 64.0;
    /// Collider width as a fraction of sprite width
    pub const PLAYER_COLLIDER_SHRINK: f32 = 0.3;

    /// Ground obstacles (barrels)
    pub const GROUND_OBSTACLE_SIZE: (f32, f32) = (32.0, 32.0);
    pub const GROUND_OBSTACLE_SPEED: f32 = -200.0;
    /// Height of the barrel's bottom above the floor when it spawns
    pub const GROUND_OBSTACLE_SPAWN_LIFT: f32 = 16.0;
    /// Barrel slots allocated up front; the pool grows past this if needed
    pub const GROUND_POOL_CAPACITY: usize = 6;

    /// Flying obstacles
    pub const FLYING_OBSTACLE_SIZE: (f32, f32) = (32.0, 24.0);
    pub const FLYING_OBSTACLE_SPEED: f32 = -260.0;
    /// Allowed range for the top edge of a flying obstacle
    pub const FLYING_BAND: (f32, f32) = (280.0, 340.0);
    /// Score needed before flying obstacles start spawning
    pub const FLYING_ACTIVATION_SCORE: u64 = 200;

    /// Score gained per running tick
    pub const SCORE_PER_TICK: u64 = 1;
}
