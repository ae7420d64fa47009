//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-driven only, the caller supplies the frame number
//! - Seeded RNG only
//! - Stable iteration order (lanes, enemies and projectiles by insertion)
//! - No rendering, audio or platform dependencies

pub mod accuracy;
pub mod chart;
pub mod collision;
pub mod combat;
pub mod lane;
pub mod level;
pub mod note;
pub mod state;
pub mod tick;

pub use accuracy::{Accuracy, Judgement, Label};
pub use chart::{Chart, LaneDecl, NoteDecl, load_chart};
pub use collision::{closest, detect_collision, distance};
pub use combat::{Combat, CombatStep, Enemy, Guardian, Projectile, closest_enemy, have_enemies};
pub use lane::{Lane, LaneKind, LaneStep, NoteRef, StealCandidate, StealTarget};
pub use level::{Level, LevelStep, Modifiers};
pub use note::{EffectKind, HoldPhase, Note, NoteKind, NoteSpec, NoteState};
pub use state::{GameEvent, GamePhase, GameState, RngState};
pub use tick::{KeyEdge, TickInput, tick};
