//! Shadow Dance - a lane-based rhythm game
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (notes, lanes, levels, combat)
//! - `renderer`: Draw-request list produced from simulation state
//! - `settings`: Level catalog and run configuration
//! - `error`: Load-time failures

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::LoadError;
pub use settings::{LevelEntry, Settings};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions
    pub const WINDOW_WIDTH: i32 = 1024;
    pub const WINDOW_HEIGHT: i32 = 768;

    /// Vertical position notes are judged against
    pub const TARGET_HEIGHT: i32 = 657;
    /// Vertical centre of a lane background sprite
    pub const LANE_CENTER_Y: i32 = 384;

    /// Starting note speed (units per frame)
    pub const DEFAULT_SPEED: i32 = 2;
    /// Slowest note speed a SlowDown effect can reach
    pub const MIN_SPEED: i32 = 1;
    /// Speed change per SpeedUp/SlowDown effect
    pub const SPEED_STEP: i32 = 1;
    /// Factor applied by each DoubleScore effect
    pub const SCORE_MULTIPLIER_STEP: i32 = 2;
    /// Frames a score multiplier survives without a refreshing DoubleScore
    pub const EFFECT_FRAMES: u32 = 480;

    /// Spawn height of freshly activated notes
    pub const NORMAL_INITIAL_Y: i32 = 100;
    pub const HOLD_INITIAL_Y: i32 = 24;
    /// Distance from a hold note's centre to either end
    pub const HOLD_HEIGHT_OFFSET: i32 = 82;

    /// Frames an accuracy label stays on screen
    pub const LABEL_FRAMES: u32 = 30;
}
