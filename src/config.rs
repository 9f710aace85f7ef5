//! Game tuning and configuration
//!
//! Every value the simulation reads lives here so a run can be reproduced
//! from a seed plus a config. Configs are validated before any component is
//! built; an invalid config never reaches the simulation.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::spawn::DelayCurve;

/// Reasons a config is rejected
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field} range is inverted: min {min} > max {max}")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{field} must be a finite speed in (0, {max}) px/s (got {value})")]
    ScrollSpeed {
        field: &'static str,
        value: f32,
        max: f32,
    },
    #[error("{field} must be finite and negative (leftward) (got {value})")]
    NotLeftward { field: &'static str, value: f32 },
    #[error("collider shrink must be in (0, 1] (got {0})")]
    ColliderShrink(f32),
    #[error("segment width {width} must exceed the seam overlap {overlap}")]
    SegmentTooNarrow { width: f32, overlap: f32 },
    #[error("variant layer {index} does not exist ({layers} layers)")]
    VariantLayerOutOfRange { index: usize, layers: usize },
    #[error("variant count must be at least 1")]
    ZeroVariants,
    #[error("{curve} spawn delay floor must be at least 1 tick")]
    ZeroDelayFloor { curve: &'static str },
    #[error("{curve} spawn delay range is inverted: min {min} > max {max}")]
    InvertedDelayRange {
        curve: &'static str,
        min: u32,
        max: u32,
    },
    #[error("{curve} spawn delay min {min} is below the floor {floor}")]
    DelayBelowFloor {
        curve: &'static str,
        min: u32,
        floor: u32,
    },
    #[error("{curve} difficulty constant must be non-zero")]
    ZeroDifficulty { curve: &'static str },
    #[error("ground obstacle pool capacity must be at least 1")]
    EmptyPool,
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

/// A scroll speed must move each segment less than its own width per step
fn scroll_speed(field: &'static str, value: f32, extent: f32) -> Result<(), ConfigError> {
    let max = extent / SIM_DT;
    if value.is_finite() && value > 0.0 && value < max {
        Ok(())
    } else {
        Err(ConfigError::ScrollSpeed { field, value, max })
    }
}

fn leftward(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value < 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotLeftward { field, value })
    }
}

fn ordered(field: &'static str, (min, max): (f32, f32)) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange { field, min, max })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub jump_speed: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_speed: JUMP_SPEED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// Collider width as a fraction of the sprite width
    pub collider_shrink: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            x: PLAYER_X,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            collider_shrink: PLAYER_COLLIDER_SHRINK,
        }
    }
}

/// One parallax strip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Texture id handed to the renderer
    pub texture: u32,
    /// Scroll speed (pixels/s)
    pub speed: f32,
    /// Unscaled segment width
    pub segment_width: f32,
    #[serde(default = "unit_scale")]
    pub scale: f32,
}

fn unit_scale() -> f32 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallaxConfig {
    pub layers: Vec<LayerConfig>,
    /// Layer that re-textures its segments as they wrap
    pub variant_layer: Option<usize>,
    pub variant_count: u32,
    pub seam_overlap: f32,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            layers: PARALLAX_SPEEDS
                .iter()
                .enumerate()
                .map(|(i, &speed)| LayerConfig {
                    texture: i as u32 + 1,
                    speed,
                    segment_width: PARALLAX_SEGMENT_WIDTH,
                    scale: 1.0,
                })
                .collect(),
            variant_layer: Some(VARIANT_LAYER),
            variant_count: VARIANT_COUNT,
            seam_overlap: SEAM_OVERLAP,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundConfig {
    pub tile_size: f32,
    pub speed: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            tile_size: GROUND_TILE_SIZE,
            speed: GROUND_SPEED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleConfig {
    pub ground_size: (f32, f32),
    /// Horizontal velocity (negative = leftward)
    pub ground_speed: f32,
    pub ground_spawn_lift: f32,
    /// Barrel slots allocated up front
    pub pool_capacity: usize,
    pub flying_size: (f32, f32),
    pub flying_speed: f32,
    /// Range for the top edge of flying obstacles
    pub flying_band: (f32, f32),
    pub flying_activation_score: u64,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            ground_size: GROUND_OBSTACLE_SIZE,
            ground_speed: GROUND_OBSTACLE_SPEED,
            ground_spawn_lift: GROUND_OBSTACLE_SPAWN_LIFT,
            pool_capacity: GROUND_POOL_CAPACITY,
            flying_size: FLYING_OBSTACLE_SIZE,
            flying_speed: FLYING_OBSTACLE_SPEED,
            flying_band: FLYING_BAND,
            flying_activation_score: FLYING_ACTIVATION_SCORE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnConfig {
    pub ground: DelayCurve,
    pub flying: DelayCurve,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            ground: DelayCurve {
                base_min: 90,
                base_max: 180,
                floor: 30,
                difficulty: 1000,
            },
            flying: DelayCurve {
                base_min: 150,
                base_max: 300,
                floor: 45,
                difficulty: 1000,
            },
        }
    }
}

/// Complete game tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub viewport: ViewportConfig,
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub parallax: ParallaxConfig,
    pub ground: GroundConfig,
    pub obstacles: ObstacleConfig,
    pub spawn: SpawnConfig,
    pub score_per_tick: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            physics: PhysicsConfig::default(),
            player: PlayerConfig::default(),
            parallax: ParallaxConfig::default(),
            ground: GroundConfig::default(),
            obstacles: ObstacleConfig::default(),
            spawn: SpawnConfig::default(),
            score_per_tick: SCORE_PER_TICK,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// y coordinate of the walkable floor line
    pub fn floor_y(&self) -> f32 {
        self.viewport.height - self.ground.tile_size
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("viewport.width", self.viewport.width)?;
        positive("viewport.height", self.viewport.height)?;
        positive("physics.gravity", self.physics.gravity)?;
        positive("physics.jump_speed", self.physics.jump_speed)?;
        positive("player.width", self.player.width)?;
        positive("player.height", self.player.height)?;

        let shrink = self.player.collider_shrink;
        if !(shrink > 0.0 && shrink <= 1.0) {
            return Err(ConfigError::ColliderShrink(shrink));
        }

        let overlap = self.parallax.seam_overlap;
        if !(overlap >= 0.0) {
            return Err(ConfigError::NonPositive {
                field: "parallax.seam_overlap",
                value: overlap,
            });
        }
        for layer in &self.parallax.layers {
            positive("parallax.layers.segment_width", layer.segment_width)?;
            positive("parallax.layers.scale", layer.scale)?;
            let width = layer.segment_width * layer.scale;
            if width <= overlap {
                return Err(ConfigError::SegmentTooNarrow { width, overlap });
            }
            scroll_speed("parallax.layers.speed", layer.speed, width)?;
        }
        if let Some(index) = self.parallax.variant_layer {
            if index >= self.parallax.layers.len() {
                return Err(ConfigError::VariantLayerOutOfRange {
                    index,
                    layers: self.parallax.layers.len(),
                });
            }
        }
        if self.parallax.variant_count == 0 {
            return Err(ConfigError::ZeroVariants);
        }

        positive("ground.tile_size", self.ground.tile_size)?;
        if self.ground.tile_size <= overlap {
            return Err(ConfigError::SegmentTooNarrow {
                width: self.ground.tile_size,
                overlap,
            });
        }
        scroll_speed("ground.speed", self.ground.speed, self.ground.tile_size)?;
        if self.ground.tile_size >= self.viewport.height {
            return Err(ConfigError::InvertedRange {
                field: "ground.tile_size",
                min: self.ground.tile_size,
                max: self.viewport.height,
            });
        }

        let obstacles = &self.obstacles;
        positive("obstacles.ground_size.w", obstacles.ground_size.0)?;
        positive("obstacles.ground_size.h", obstacles.ground_size.1)?;
        positive("obstacles.flying_size.w", obstacles.flying_size.0)?;
        positive("obstacles.flying_size.h", obstacles.flying_size.1)?;
        leftward("obstacles.ground_speed", obstacles.ground_speed)?;
        leftward("obstacles.flying_speed", obstacles.flying_speed)?;
        if !(obstacles.ground_spawn_lift >= 0.0 && obstacles.ground_spawn_lift.is_finite()) {
            return Err(ConfigError::NonPositive {
                field: "obstacles.ground_spawn_lift",
                value: obstacles.ground_spawn_lift,
            });
        }
        ordered("obstacles.flying_band", obstacles.flying_band)?;
        if obstacles.pool_capacity == 0 {
            return Err(ConfigError::EmptyPool);
        }

        self.spawn.ground.validate("ground")?;
        self.spawn.flying.validate("flying")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.floor_y(), 418.0);
        assert_eq!(config.parallax.layers.len(), 5);
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = GameConfig::from_json_str(r#"{ "score_per_tick": 2 }"#).unwrap();
        assert_eq!(config.score_per_tick, 2);
        assert_eq!(config.viewport.width, VIEWPORT_WIDTH);
    }

    #[test]
    fn test_inverted_spawn_range_rejected() {
        let json = r#"{
            "spawn": {
                "ground": { "base_min": 200, "base_max": 100, "floor": 10, "difficulty": 1000 },
                "flying": { "base_min": 150, "base_max": 300, "floor": 45, "difficulty": 1000 }
            }
        }"#;
        let err = GameConfig::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvertedDelayRange { curve: "ground", .. }
        ));
    }

    #[test]
    fn test_negative_delay_is_a_parse_error() {
        let json = r#"{
            "spawn": {
                "ground": { "base_min": -5, "base_max": 100, "floor": 1, "difficulty": 1000 },
                "flying": { "base_min": 150, "base_max": 300, "floor": 45, "difficulty": 1000 }
            }
        }"#;
        assert!(matches!(
            GameConfig::from_json_str(json),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_bad_collider_shrink_rejected() {
        let mut config = GameConfig::default();
        config.player.collider_shrink = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ColliderShrink(_))
        ));
    }

    #[test]
    fn test_variant_layer_out_of_range() {
        let mut config = GameConfig::default();
        config.parallax.variant_layer = Some(9);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::VariantLayerOutOfRange { index: 9, .. })
        ));
    }

    #[test]
    fn test_inverted_flying_band_rejected() {
        let mut config = GameConfig::default();
        config.obstacles.flying_band = (340.0, 280.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedRange { field: "obstacles.flying_band", .. })
        ));
    }

    #[test]
    fn test_layer_speed_must_scroll_left() {
        let mut config = GameConfig::default();
        config.parallax.layers[0].speed = -60.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ScrollSpeed { field: "parallax.layers.speed", .. })
        ));

        config.parallax.layers[0].speed = 0.0;
        assert!(config.validate().is_err());

        config.parallax.layers[0].speed = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ScrollSpeed { .. })
        ));
    }

    #[test]
    fn test_layer_speed_capped_by_segment_width() {
        let mut config = GameConfig::default();
        // 800 px segments at 60 steps/s
        config.parallax.layers[2].speed = 48_000.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ScrollSpeed { max, .. }) if (max - 48_000.0).abs() < 1.0
        ));
        config.parallax.layers[2].speed = 47_000.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ground_speed_validated() {
        let mut config = GameConfig::default();
        config.ground.speed = -200.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ScrollSpeed { field: "ground.speed", .. })
        ));
        config.ground.speed = f32::INFINITY;
        assert!(config.validate().is_err());
        // One 32 px tile per step
        config.ground.speed = 32.0 * 60.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_obstacle_speeds_must_be_leftward() {
        let mut config = GameConfig::default();
        config.obstacles.flying_speed = 50.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotLeftward { field: "obstacles.flying_speed", .. })
        ));

        let mut config = GameConfig::default();
        config.obstacles.flying_speed = 0.0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.obstacles.ground_speed = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotLeftward { field: "obstacles.ground_speed", .. })
        ));
    }

    #[test]
    fn test_speed_errors_from_json() {
        let json = r#"{ "obstacles": { "ground_size": [32, 32], "ground_speed": -200,
            "ground_spawn_lift": 16, "pool_capacity": 6, "flying_size": [32, 24],
            "flying_speed": 10, "flying_band": [280, 340], "flying_activation_score": 200 } }"#;
        assert!(matches!(
            GameConfig::from_json_str(json),
            Err(ConfigError::NotLeftward { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = GameConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
