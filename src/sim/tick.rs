//! Fixed timestep simulation tick
//!
//! Core game loop that advances one run deterministically. Update order per
//! tick is fixed: scroll and ground, spawn timers, obstacles, player,
//! collision, score.

use super::collision;
use super::spawn::Sampler;
use super::state::{GameEvent, GameState};
use crate::persistence::HighScoreStore;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump key down (edge or hold both work; only honoured on the floor)
    pub jump: bool,
    /// Restart request; only honoured after game over
    pub restart: bool,
}

/// Advance the game by one fixed timestep, returning what happened
pub fn tick<S: Sampler, P: HighScoreStore>(
    state: &mut GameState<S, P>,
    input: &TickInput,
    dt: f32,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Game over freezes everything; only a restart gets through
    if !state.run.is_running() {
        if input.restart && state.restart() {
            events.push(GameEvent::Restarted);
        }
        return events;
    }

    state.time_ticks += 1;
    let score_per_tick = state.config.score_per_tick;
    let (world, run, sampler, store) = state.parts_mut();

    // Background and floor
    world.layers.advance(dt);
    world.ground.advance(dt);

    // Spawn timers
    let due = world.spawner.tick(run.score, sampler);
    if due.ground {
        let id = world.obstacles.spawn_ground(&world.ground);
        events.push(GameEvent::GroundSpawned { id });
    }
    if due.flying {
        let id = world.obstacles.spawn_flying(sampler);
        events.push(GameEvent::FlyingSpawned { id });
    }

    // Obstacle motion, parking and despawning
    let update = world.obstacles.advance(dt, &world.ground);
    events.extend(update.recycled.into_iter().map(|id| GameEvent::GroundRecycled { id }));
    events.extend(update.despawned.into_iter().map(|id| GameEvent::FlyingDespawned { id }));

    // Player
    if input.jump && world.player.jump() {
        events.push(GameEvent::Jumped);
    }
    let contact = world.player.integrate(dt, &world.ground);
    if contact.landed {
        events.push(GameEvent::Landed);
    }

    // Collision ends the run before this tick scores
    if let Some(id) = collision::resolve(&world.player, &world.obstacles) {
        log::debug!("Player hit obstacle {}", id);
        if let Some(report) = run.end_run(store) {
            events.push(GameEvent::GameOver(report));
        }
        return events;
    }

    run.add_score(score_per_tick);
    events
}
