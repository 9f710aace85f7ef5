//! Run state and the per-run world
//!
//! `RunState` is the only owner of score, high score and phase; every change
//! to them goes through its transition methods. `World` holds everything
//! that moves and is thrown away and rebuilt on restart.

use serde::{Deserialize, Serialize};

use super::obstacle::{ObstacleKind, ObstaclePool};
use super::player::{Animation, PlayerBody};
use super::scroll::{GroundTrack, ScrollLayerSet};
use super::spawn::{Sampler, SeededSampler, SpawnScheduler};
use crate::config::{ConfigError, GameConfig};
use crate::persistence::{HighScoreStore, MemoryStore};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Active gameplay
    Running,
    /// Run ended, everything frozen until restart
    GameOver,
}

/// Result of ending a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverReport {
    pub score: u64,
    pub high_score: u64,
    pub new_high_score: bool,
}

/// Something that happened during a tick, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    Landed,
    GroundSpawned { id: u32 },
    /// Barrel left the screen and was parked for reuse
    GroundRecycled { id: u32 },
    FlyingSpawned { id: u32 },
    FlyingDespawned { id: u32 },
    GameOver(GameOverReport),
    Restarted,
}

/// Score, high score and phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub phase: RunPhase,
    pub score: u64,
    pub high_score: u64,
    /// Completed runs this session
    pub runs: u32,
}

impl RunState {
    pub fn new(high_score: u64) -> Self {
        Self {
            phase: RunPhase::Running,
            score: 0,
            high_score,
            runs: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// Add to the score; ignored once the run is over
    pub fn add_score(&mut self, amount: u64) {
        if self.is_running() {
            self.score = self.score.saturating_add(amount);
        }
    }

    /// Running -> GameOver. Returns `None` if the run already ended.
    /// The store is written only when the final score beats the high score.
    pub fn end_run(&mut self, store: &mut dyn HighScoreStore) -> Option<GameOverReport> {
        if !self.is_running() {
            return None;
        }
        self.phase = RunPhase::GameOver;
        self.runs += 1;

        let new_high_score = self.score > self.high_score;
        if new_high_score {
            self.high_score = self.score;
            store.set_high_score(self.score);
            log::info!("New high score: {}", self.score);
        }
        log::info!("Game over with score {}", self.score);

        Some(GameOverReport {
            score: self.score,
            high_score: self.high_score,
            new_high_score,
        })
    }

    /// GameOver -> Running with a zero score. No-op while running.
    pub fn restart(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.phase = RunPhase::Running;
        self.score = 0;
        true
    }
}

/// Everything that moves during a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub layers: ScrollLayerSet,
    pub ground: GroundTrack,
    pub player: PlayerBody,
    pub obstacles: ObstaclePool,
    pub spawner: SpawnScheduler,
}

impl World {
    /// Start-of-run configuration
    pub fn new(config: &GameConfig, sampler: &mut dyn Sampler) -> Self {
        Self {
            layers: ScrollLayerSet::from_config(config),
            ground: GroundTrack::from_config(config),
            player: PlayerBody::new(config),
            obstacles: ObstaclePool::new(
                config.obstacles.clone(),
                config.viewport.width,
                config.physics.gravity,
            ),
            spawner: SpawnScheduler::new(
                config.spawn.ground,
                config.spawn.flying,
                config.obstacles.flying_activation_score,
                sampler,
            ),
        }
    }
}

/// Complete game: config, run state, world and the injected collaborators
pub struct GameState<S = SeededSampler, P = MemoryStore> {
    pub config: GameConfig,
    pub run: RunState,
    pub world: World,
    /// Simulation tick counter (across runs)
    pub time_ticks: u64,
    sampler: S,
    store: P,
}

impl GameState {
    /// Default tuning, seeded RNG, in-memory high score
    pub fn seeded(seed: u64) -> Self {
        Self::build(GameConfig::default(), SeededSampler::new(seed), MemoryStore::new())
    }
}

impl<S: Sampler, P: HighScoreStore> GameState<S, P> {
    /// Validate the config and start the first run
    pub fn new(config: GameConfig, sampler: S, store: P) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, sampler, store))
    }

    fn build(config: GameConfig, mut sampler: S, store: P) -> Self {
        // Missing high score counts as zero
        let high_score = store.get_high_score().unwrap_or(0);
        let world = World::new(&config, &mut sampler);
        log::info!("Run started (high score {})", high_score);
        Self {
            config,
            run: RunState::new(high_score),
            world,
            time_ticks: 0,
            sampler,
            store,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.run.phase
    }

    pub fn score(&self) -> u64 {
        self.run.score
    }

    pub fn high_score(&self) -> u64 {
        self.run.high_score
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn sampler_mut(&mut self) -> &mut S {
        &mut self.sampler
    }

    /// Split borrow for the tick pipeline
    pub(crate) fn parts_mut(&mut self) -> (&mut World, &mut RunState, &mut S, &mut P) {
        (&mut self.world, &mut self.run, &mut self.sampler, &mut self.store)
    }

    /// Discard the world and begin a fresh run. Only valid after game over.
    pub fn restart(&mut self) -> bool {
        if !self.run.restart() {
            return false;
        }
        self.world = World::new(&self.config, &mut self.sampler);
        log::info!("Restarted (run {})", self.run.runs + 1);
        true
    }

    /// Everything the renderer needs for this frame
    pub fn snapshot(&self) -> Frame {
        let world = &self.world;
        Frame {
            layers: world
                .layers
                .layers
                .iter()
                .map(|layer| {
                    layer
                        .segments
                        .iter()
                        .map(|s| SegmentFrame {
                            x: s.x,
                            width: s.extent(),
                            texture: s.texture,
                            variant: s.variant,
                        })
                        .collect()
                })
                .collect(),
            ground_tiles: world.ground.tiles.segments.iter().map(|s| s.x).collect(),
            player: PlayerFrame {
                x: world.player.x,
                y: world.player.y,
                on_ground: world.player.on_ground,
                animation: world.player.animation(),
            },
            obstacles: world
                .obstacles
                .iter()
                .map(|o| ObstacleFrame {
                    id: o.id,
                    kind: o.kind,
                    x: o.pos.x,
                    y: o.pos.y,
                    w: o.size.x,
                    h: o.size.y,
                })
                .collect(),
            score: self.run.score,
            high_score: self.run.high_score,
            phase: self.run.phase,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentFrame {
    pub x: f32,
    pub width: f32,
    pub texture: u32,
    pub variant: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerFrame {
    pub x: f32,
    pub y: f32,
    pub on_ground: bool,
    pub animation: Animation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleFrame {
    pub id: u32,
    pub kind: ObstacleKind,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Render snapshot, back layer first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub layers: Vec<Vec<SegmentFrame>>,
    pub ground_tiles: Vec<f32>,
    pub player: PlayerFrame,
    pub obstacles: Vec<ObstacleFrame>,
    pub score: u64,
    pub high_score: u64,
    pub phase: RunPhase,
}
