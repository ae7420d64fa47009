//! Draw-request surface
//!
//! The simulation never draws. Each frame the driver asks for a list of
//! `DrawCommand`s and hands them to whatever backend it has.

pub mod frame;
pub mod sprite;

pub use frame::{DrawCommand, build_frame};
pub use sprite::Sprite;
