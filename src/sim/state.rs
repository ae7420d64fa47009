//! Session state
//!
//! Everything the frame driver owns between ticks: which screen is up, the
//! global frame counter, the level being played and the label it shows.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::accuracy::Accuracy;
use super::level::Level;
use super::note::EffectKind;
use crate::settings::LevelDef;

/// Current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a level choice
    LevelSelect,
    /// Frames advance
    Playing,
    /// Frozen until the pause key is pressed again
    Paused,
    /// Every note resolved; showing the result
    Finished,
}

/// Notifications for the audio and presentation collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    LevelStarted { index: usize },
    Paused,
    Resumed,
    LevelFinished { cleared: bool, score: i32 },
    ReturnedToSelect,
    EffectApplied(EffectKind),
    EnemySpawned,
    ProjectileFired,
    EnemyDestroyed,
}

/// RNG seed wrapper
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub rng_state: RngState,
    pub phase: GamePhase,
    /// Global frame counter, reset whenever a level starts
    pub frame: u64,
    pub level: Option<Level>,
    pub level_index: Option<usize>,
    pub accuracy: Accuracy,
    /// Pending events, drained by the driver
    pub events: Vec<GameEvent>,
    catalog: Vec<LevelDef>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    pub fn new(seed: u64, catalog: Vec<LevelDef>) -> Self {
        let rng_state = RngState::new(seed);
        Self {
            rng: rng_state.to_rng(),
            rng_state,
            phase: GamePhase::LevelSelect,
            frame: 0,
            level: None,
            level_index: None,
            accuracy: Accuracy::new(),
            events: Vec::new(),
            catalog,
        }
    }

    pub fn catalog(&self) -> &[LevelDef] {
        &self.catalog
    }

    /// Build level `index` from the catalog and start playing it
    ///
    /// Returns false (and stays put) if there is no such level.
    pub fn start_level(&mut self, index: usize) -> bool {
        let Some(def) = self.catalog.get(index) else {
            log::warn!("No level at index {}", index);
            return false;
        };
        self.level = Some(def.build());
        self.level_index = Some(index);
        self.frame = 0;
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::LevelStarted { index });
        log::info!("Started level {} ('{}')", index, def.entry.name);
        true
    }

    /// Leave the result screen
    pub fn return_to_select(&mut self) {
        self.accuracy.clear();
        self.frame = 0;
        self.level = None;
        self.level_index = None;
        self.phase = GamePhase::LevelSelect;
        self.events.push(GameEvent::ReturnedToSelect);
    }

    /// Whether the finished level met its clear score
    pub fn is_cleared(&self) -> Option<bool> {
        match self.phase {
            GamePhase::Finished => self.level.as_ref().map(Level::is_cleared),
            _ => None,
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
