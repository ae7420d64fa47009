//! Timing accuracy evaluation
//!
//! Maps the distance between a note and the target line to a scoring tier
//! and keeps the transient label shown in the middle of the screen.

use serde::{Deserialize, Serialize};

use super::note::EffectKind;
use crate::consts::{LABEL_FRAMES, WINDOW_HEIGHT};

pub const PERFECT_RADIUS: i32 = 15;
pub const GOOD_RADIUS: i32 = 50;
pub const BAD_RADIUS: i32 = 100;
pub const MISS_RADIUS: i32 = 200;
/// Window within which a special note counts as struck
pub const SPECIAL_RADIUS: i32 = GOOD_RADIUS;

pub const PERFECT_SCORE: i32 = 10;
pub const GOOD_SCORE: i32 = 5;
pub const BAD_SCORE: i32 = -1;
pub const MISS_SCORE: i32 = -5;
pub const SPECIAL_SCORE: i32 = 15;
pub const NOT_SCORED: i32 = 0;

/// Scoring tier reached by a note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Judgement {
    Perfect,
    Good,
    Bad,
    Miss,
    /// Special note struck inside its window
    Special,
}

impl Judgement {
    /// Raw points for this tier (before any score multiplier)
    pub fn score(self) -> i32 {
        match self {
            Judgement::Perfect => PERFECT_SCORE,
            Judgement::Good => GOOD_SCORE,
            Judgement::Bad => BAD_SCORE,
            Judgement::Miss => MISS_SCORE,
            Judgement::Special => SPECIAL_SCORE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Judgement::Perfect => "PERFECT",
            Judgement::Good => "GOOD",
            Judgement::Bad => "BAD",
            Judgement::Miss => "MISS",
            Judgement::Special => "SPECIAL",
        }
    }
}

/// Tier for a triggered regular note at `distance` from the target
///
/// Boundaries belong to the tighter tier. Beyond the miss radius nothing is
/// scored.
pub fn tier_for(distance: i32) -> Option<Judgement> {
    if distance <= PERFECT_RADIUS {
        Some(Judgement::Perfect)
    } else if distance <= GOOD_RADIUS {
        Some(Judgement::Good)
    } else if distance <= BAD_RADIUS {
        Some(Judgement::Bad)
    } else if distance <= MISS_RADIUS {
        Some(Judgement::Miss)
    } else {
        None
    }
}

/// Text shown in the centre of the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Judgement(Judgement),
    Effect(EffectKind),
}

impl Label {
    pub fn text(&self) -> &'static str {
        match self {
            Label::Judgement(j) => j.as_str(),
            Label::Effect(effect) => effect.display_name(),
        }
    }
}

/// Accuracy evaluator plus the label it last produced
#[derive(Debug, Clone, Default)]
pub struct Accuracy {
    label: Option<Label>,
    frames_since_set: u32,
}

impl Accuracy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current label and restart its display countdown
    pub fn set_label(&mut self, label: Label) {
        self.label = Some(label);
        self.frames_since_set = 0;
    }

    /// Forget the label entirely (used when returning to level select)
    pub fn clear(&mut self) {
        self.label = None;
        self.frames_since_set = 0;
    }

    /// Most recent label, whether or not it is still on screen
    pub fn label(&self) -> Option<Label> {
        self.label
    }

    /// Advance the display countdown by one frame
    pub fn tick(&mut self) {
        self.frames_since_set = self.frames_since_set.saturating_add(1);
    }

    /// Label to render this frame, if its display window has not run out
    pub fn visible_label(&self) -> Option<Label> {
        self.label.filter(|_| self.frames_since_set <= LABEL_FRAMES)
    }

    /// Evaluate a note at `height` against `target`
    ///
    /// Regular notes are tiered only when `triggered`. Special notes have a
    /// single window. An untriggered note that has reached the bottom of the
    /// playfield is a miss; special notes miss silently. `None` means the
    /// note is not resolved this frame.
    pub fn evaluate_score(
        &mut self,
        height: i32,
        target: i32,
        triggered: bool,
        is_special: bool,
    ) -> Option<Judgement> {
        let distance = (height - target).abs();

        if triggered && !is_special {
            let tier = tier_for(distance)?;
            self.set_label(Label::Judgement(tier));
            Some(tier)
        } else if triggered {
            (distance <= SPECIAL_RADIUS).then_some(Judgement::Special)
        } else if height >= WINDOW_HEIGHT {
            if !is_special {
                self.set_label(Label::Judgement(Judgement::Miss));
            }
            Some(Judgement::Miss)
        } else {
            None
        }
    }
}
