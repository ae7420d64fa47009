//! Shadow Dance headless runner
//!
//! Plays one level from the catalog in autoplay mode and prints a JSON run
//! summary.
//!
//! Usage: `shadow-dance [settings.json] [level-index]`

use std::path::PathBuf;
use std::process::ExitCode;

use serde::Serialize;
use shadow_dance::Settings;
use shadow_dance::settings::load_catalog;
use shadow_dance::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

const DEFAULT_SETTINGS: &str = "settings.json";
/// Give up on a level that has not finished after this many frames
const MAX_FRAMES: u64 = 200_000;

#[derive(Debug, Default, Serialize)]
struct RunSummary {
    level: String,
    seed: u64,
    frames: u64,
    finished: bool,
    score: i32,
    clear_score: i32,
    cleared: bool,
    effects: Vec<String>,
    enemies_spawned: usize,
    projectiles_fired: usize,
    enemies_destroyed: usize,
}

impl RunSummary {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::EffectApplied(effect) => self.effects.push(effect.display_name().to_string()),
            GameEvent::EnemySpawned => self.enemies_spawned += 1,
            GameEvent::ProjectileFired => self.projectiles_fired += 1,
            GameEvent::EnemyDestroyed => self.enemies_destroyed += 1,
            GameEvent::LevelFinished { cleared, score } => {
                self.finished = true;
                self.cleared = *cleared;
                self.score = *score;
            }
            _ => {}
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS));
    let level_index = match args.next().map(|arg| arg.parse::<usize>()) {
        None => 0,
        Some(Ok(index)) => index,
        Some(Err(e)) => {
            log::error!("Bad level index: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let settings = Settings::load_or_default(&settings_path);
    let catalog = match load_catalog(&settings) {
        Ok(catalog) => catalog,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if !settings.autoplay {
        log::info!("No input device in headless mode, enabling autoplay");
    }

    let seed = settings.resolve_seed();
    log::info!("Shadow Dance starting with seed {}", seed);

    let mut state = GameState::new(seed, catalog);
    if !state.start_level(level_index) {
        log::error!(
            "Level index {} out of range (catalog has {})",
            level_index,
            state.catalog().len()
        );
        return ExitCode::FAILURE;
    }

    let mut summary = RunSummary {
        seed,
        ..Default::default()
    };
    if let Some(level) = state.level.as_ref() {
        summary.level = level.name().to_string();
        summary.clear_score = level.clear_score();
    }

    let input = TickInput {
        autoplay: true,
        ..Default::default()
    };
    while state.phase == GamePhase::Playing && state.frame < MAX_FRAMES {
        tick(&mut state, &input);
        for event in state.drain_events() {
            summary.record(&event);
        }
    }
    summary.frames = state.frame;
    if !summary.finished {
        log::warn!("Level did not finish within {} frames", MAX_FRAMES);
        summary.score = state.level.as_ref().map_or(0, |level| level.score());
    }

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize run summary: {}", e);
            ExitCode::FAILURE
        }
    }
}
