//! Alitu Runner headless entry point
//!
//! The browser build is driven from JS through `platform::web::WebRunner`;
//! natively this runs the simulation without a renderer, which is handy for
//! tuning spawn curves and checking determinism.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;

    use alitu_runner::GameConfig;
    use alitu_runner::consts::SIM_DT;
    use alitu_runner::persistence::{HighScoreStore, JsonFileStore, MemoryStore};
    use alitu_runner::sim::{GameEvent, GameState, ObstacleKind, SeededSampler, TickInput, tick};

    /// How far ahead of the collider a barrel triggers the autopilot (px)
    const AUTOPILOT_LOOKAHEAD: (f32, f32) = (10.0, 60.0);

    #[derive(Debug, Parser)]
    #[command(name = "alitu-runner")]
    #[command(about = "Run the side-scrolling runner simulation headless")]
    struct Cli {
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Simulation steps to run (60 per second)
        #[arg(long, default_value_t = 3600)]
        ticks: u64,
        /// JSON tuning overrides
        #[arg(long)]
        config: Option<PathBuf>,
        /// Persist the high score here instead of in memory
        #[arg(long)]
        high_score_file: Option<PathBuf>,
        /// Jump over barrels automatically
        #[arg(long, default_value_t = false)]
        autopilot: bool,
    }

    type Game = GameState<SeededSampler, Box<dyn HighScoreStore>>;

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let cli = Cli::parse();

        let config = match &cli.config {
            Some(path) => GameConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => GameConfig::default(),
        };
        let store: Box<dyn HighScoreStore> = match &cli.high_score_file {
            Some(path) => Box::new(JsonFileStore::open(path)),
            None => Box::new(MemoryStore::new()),
        };
        let mut state: Game = GameState::new(config, SeededSampler::new(cli.seed), store)
            .context("invalid game config")?;
        log::info!(
            "Running {} ticks with seed {} (high score {})",
            cli.ticks,
            cli.seed,
            state.high_score()
        );

        let mut best = 0;
        let mut input = TickInput::default();
        for _ in 0..cli.ticks {
            input.jump = cli.autopilot && should_jump(&state);
            let events = tick(&mut state, &input, SIM_DT);
            input.restart = false;

            for event in &events {
                match event {
                    GameEvent::GameOver(report) => {
                        best = best.max(report.score);
                        log::info!(
                            "Run {} over: score {} (high {}{})",
                            state.run.runs,
                            report.score,
                            report.high_score,
                            if report.new_high_score { ", new" } else { "" }
                        );
                        input.restart = true;
                    }
                    GameEvent::Restarted => log::debug!("Restarted"),
                    other => log::trace!("{:?}", other),
                }
            }
        }
        best = best.max(state.score());

        println!(
            "runs: {}  best score: {}  high score: {}  phase: {:?}",
            state.run.runs,
            best,
            state.high_score(),
            state.phase()
        );
        Ok(())
    }

    fn should_jump(state: &Game) -> bool {
        let player = &state.world.player;
        if !player.on_ground {
            return false;
        }
        let front = player.collider().right();
        state
            .world
            .obstacles
            .iter()
            .filter(|o| o.kind == ObstacleKind::Ground)
            .any(|o| {
                let gap = o.bounds().left() - front;
                (AUTOPILOT_LOOKAHEAD.0..=AUTOPILOT_LOOKAHEAD.1).contains(&gap)
            })
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

// The wasm entry point is `platform::web::wasm_start`
#[cfg(target_arch = "wasm32")]
fn main() {}
