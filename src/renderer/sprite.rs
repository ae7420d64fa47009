//! Sprite identifiers and their image files

use serde::{Deserialize, Serialize};

use crate::sim::{EffectKind, LaneKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sprite {
    Background,
    /// Lane backdrop, centred on the lane
    Lane(LaneKind),
    Note(LaneKind),
    HoldNote(LaneKind),
    /// Special note, picked by its effect
    Effect(EffectKind),
    Enemy,
    Guardian,
    /// Projectile
    Arrow,
}

impl Sprite {
    pub fn resource_path(&self) -> String {
        match self {
            Sprite::Background => "res/background.png".to_string(),
            Sprite::Lane(kind) => format!("res/lane{}.png", kind.as_str()),
            Sprite::Note(kind) => format!("res/note{}.png", kind.as_str()),
            Sprite::HoldNote(kind) => format!("res/holdNote{}.png", kind.as_str()),
            Sprite::Effect(effect) => format!("res/note{}.png", effect.resource_name()),
            Sprite::Enemy => "res/enemy.png".to_string(),
            Sprite::Guardian => "res/guardian.png".to_string(),
            Sprite::Arrow => "res/arrow.png".to_string(),
        }
    }
}
