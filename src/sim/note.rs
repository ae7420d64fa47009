//! Note lifecycle
//!
//! A note starts Dormant, becomes Active once the frame counter reaches its
//! appearance frame, falls toward the target line, and ends Completed when it
//! is struck, missed, or cleared by a bomb. Completed is terminal.

use serde::{Deserialize, Serialize};

use super::accuracy::{Accuracy, Judgement, Label, MISS_SCORE, NOT_SCORED, PERFECT_RADIUS};
use super::tick::KeyEdge;
use crate::consts::{HOLD_HEIGHT_OFFSET, HOLD_INITIAL_Y, NORMAL_INITIAL_Y};

/// Level-wide modifier carried by a special note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    SpeedUp,
    SlowDown,
    DoubleScore,
    Bomb,
}

impl EffectKind {
    /// Parse a level-data note kind (`2x` is accepted for DoubleScore)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SpeedUp" => Some(EffectKind::SpeedUp),
            "SlowDown" => Some(EffectKind::SlowDown),
            "DoubleScore" | "2x" => Some(EffectKind::DoubleScore),
            "Bomb" => Some(EffectKind::Bomb),
            _ => None,
        }
    }

    /// Label shown when the effect fires
    pub fn display_name(self) -> &'static str {
        match self {
            EffectKind::SpeedUp => "Speed Up",
            EffectKind::SlowDown => "Slow Down",
            EffectKind::DoubleScore => "Double Score",
            EffectKind::Bomb => "Lane Clear",
        }
    }

    /// Suffix of the note image for this effect
    pub fn resource_name(self) -> &'static str {
        match self {
            EffectKind::SpeedUp => "SpeedUp",
            EffectKind::SlowDown => "SlowDown",
            EffectKind::DoubleScore => "2x",
            EffectKind::Bomb => "Bomb",
        }
    }

    /// DoubleScore and Bomb notes are worth nothing themselves
    pub fn awards_points(self) -> bool {
        matches!(self, EffectKind::SpeedUp | EffectKind::SlowDown)
    }
}

/// What a level-data record asks to place in a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteSpec {
    Normal,
    Hold,
    Special(EffectKind),
}

impl NoteSpec {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Normal" => Some(NoteSpec::Normal),
            "Hold" => Some(NoteSpec::Hold),
            other => EffectKind::from_name(other).map(NoteSpec::Special),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteState {
    Dormant,
    Active,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldPhase {
    NotStarted,
    HoldStarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteKind {
    Normal,
    Hold { phase: HoldPhase },
    /// `missed` suppresses the effect once the note has been missed or cleared
    Special { effect: EffectKind, missed: bool },
}

/// A single scheduled note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    kind: NoteKind,
    y: i32,
    appearance_frame: u64,
    state: NoteState,
    stolen: bool,
}

impl Note {
    pub fn new(spec: NoteSpec, appearance_frame: u64) -> Self {
        let (kind, y) = match spec {
            NoteSpec::Normal => (NoteKind::Normal, NORMAL_INITIAL_Y),
            NoteSpec::Hold => (
                NoteKind::Hold {
                    phase: HoldPhase::NotStarted,
                },
                HOLD_INITIAL_Y,
            ),
            NoteSpec::Special(effect) => (
                NoteKind::Special {
                    effect,
                    missed: false,
                },
                NORMAL_INITIAL_Y,
            ),
        };
        Self {
            kind,
            y,
            appearance_frame,
            state: NoteState::Dormant,
            stolen: false,
        }
    }

    pub fn normal(appearance_frame: u64) -> Self {
        Self::new(NoteSpec::Normal, appearance_frame)
    }

    pub fn hold(appearance_frame: u64) -> Self {
        Self::new(NoteSpec::Hold, appearance_frame)
    }

    pub fn special(effect: EffectKind, appearance_frame: u64) -> Self {
        Self::new(NoteSpec::Special(effect), appearance_frame)
    }

    pub fn kind(&self) -> NoteKind {
        self.kind
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn appearance_frame(&self) -> u64 {
        self.appearance_frame
    }

    pub fn state(&self) -> NoteState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == NoteState::Active
    }

    pub fn is_completed(&self) -> bool {
        self.state == NoteState::Completed
    }

    pub fn is_stolen(&self) -> bool {
        self.stolen
    }

    pub fn is_special(&self) -> bool {
        matches!(self.kind, NoteKind::Special { .. })
    }

    /// Only active, unclaimed normal notes can be taken by an enemy
    pub fn is_stealable(&self) -> bool {
        self.is_active() && !self.stolen && self.kind == NoteKind::Normal
    }

    /// Flag the note as taken; returns false if it was not stealable
    pub fn mark_stolen(&mut self) -> bool {
        if !self.is_stealable() {
            return false;
        }
        self.stolen = true;
        true
    }

    /// Activate on schedule, then fall by `speed` while active
    pub fn update(&mut self, frame: u64, speed: i32) {
        if self.state == NoteState::Dormant && frame >= self.appearance_frame {
            self.state = NoteState::Active;
        }
        if self.state == NoteState::Active {
            self.y += speed;
        }
    }

    fn complete(&mut self) {
        self.state = NoteState::Completed;
    }

    /// Complete an active note without scoring it (lane clear)
    ///
    /// A cleared special note never applies its effect.
    pub fn force_complete(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        if let NoteKind::Special { effect, .. } = self.kind {
            self.kind = NoteKind::Special {
                effect,
                missed: true,
            };
        }
        self.complete();
        true
    }

    /// Effect to apply, once the note has been completed by a hit
    pub fn effect(&self) -> Option<EffectKind> {
        match self.kind {
            NoteKind::Special {
                effect,
                missed: false,
            } if self.is_completed() => Some(effect),
            _ => None,
        }
    }

    /// Hold notes are judged on the press at their lower end
    fn bottom_height(&self) -> i32 {
        self.y + HOLD_HEIGHT_OFFSET
    }

    /// ...and on the release at their upper end
    fn top_height(&self) -> i32 {
        self.y - HOLD_HEIGHT_OFFSET
    }

    /// Judge the note against this frame's key edges
    ///
    /// Returns the raw score (no multiplier). Dormant and completed notes
    /// always return zero.
    pub fn check_score(&mut self, key: KeyEdge, accuracy: &mut Accuracy, target: i32) -> i32 {
        if !self.is_active() {
            return NOT_SCORED;
        }

        match self.kind {
            NoteKind::Normal => {
                let Some(judgement) = accuracy.evaluate_score(self.y, target, key.pressed, false)
                else {
                    return NOT_SCORED;
                };
                self.complete();
                // Striking a stolen note earns nothing; letting it fall still costs a miss
                if self.stolen && key.pressed {
                    NOT_SCORED
                } else {
                    judgement.score()
                }
            }
            NoteKind::Hold {
                phase: HoldPhase::NotStarted,
            } => {
                let Some(judgement) =
                    accuracy.evaluate_score(self.bottom_height(), target, key.pressed, false)
                else {
                    return NOT_SCORED;
                };
                if judgement == Judgement::Miss {
                    self.complete();
                    return MISS_SCORE;
                }
                self.kind = NoteKind::Hold {
                    phase: HoldPhase::HoldStarted,
                };
                judgement.score()
            }
            NoteKind::Hold {
                phase: HoldPhase::HoldStarted,
            } => match accuracy.evaluate_score(self.top_height(), target, key.released, false) {
                Some(judgement) => {
                    self.complete();
                    judgement.score()
                }
                None if key.released => {
                    self.complete();
                    accuracy.set_label(Label::Judgement(Judgement::Miss));
                    MISS_SCORE
                }
                None => NOT_SCORED,
            },
            NoteKind::Special { effect, .. } => {
                let Some(judgement) = accuracy.evaluate_score(self.y, target, key.pressed, true)
                else {
                    return NOT_SCORED;
                };
                self.complete();
                if judgement == Judgement::Miss {
                    self.kind = NoteKind::Special {
                        effect,
                        missed: true,
                    };
                    return NOT_SCORED;
                }
                if effect.awards_points() {
                    judgement.score()
                } else {
                    NOT_SCORED
                }
            }
        }
    }

    /// Key edges a perfect player would produce for this note this frame
    pub fn autoplay_edge(&self, target: i32) -> KeyEdge {
        if !self.is_active() {
            return KeyEdge::default();
        }
        let near = |height: i32| (height - target).abs() <= PERFECT_RADIUS;
        match self.kind {
            NoteKind::Normal | NoteKind::Special { .. } => KeyEdge::press(near(self.y)),
            NoteKind::Hold {
                phase: HoldPhase::NotStarted,
            } => KeyEdge::press(near(self.bottom_height())),
            NoteKind::Hold {
                phase: HoldPhase::HoldStarted,
            } => KeyEdge::release(near(self.top_height())),
        }
    }
}
