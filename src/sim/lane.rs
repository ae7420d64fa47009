//! Lanes: one input key, one ordered run of notes
//!
//! Only the note under the cursor is judged each frame. The cursor moves past
//! a note once it is completed, so at most one note per lane is in play.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::accuracy::{Accuracy, Label};
use super::level::Modifiers;
use super::note::{EffectKind, Note};
use super::tick::KeyEdge;
use crate::consts::TARGET_HEIGHT;

/// Lane type, which doubles as its key binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaneKind {
    Left,
    Right,
    Up,
    Down,
    /// Bound to the special trigger (space)
    Special,
}

impl LaneKind {
    pub const COUNT: usize = 5;
    pub const ALL: [LaneKind; Self::COUNT] = [
        LaneKind::Left,
        LaneKind::Right,
        LaneKind::Up,
        LaneKind::Down,
        LaneKind::Special,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Left" => Some(LaneKind::Left),
            "Right" => Some(LaneKind::Right),
            "Up" => Some(LaneKind::Up),
            "Down" => Some(LaneKind::Down),
            "Special" => Some(LaneKind::Special),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LaneKind::Left => "Left",
            LaneKind::Right => "Right",
            LaneKind::Up => "Up",
            LaneKind::Down => "Down",
            LaneKind::Special => "Special",
        }
    }

    /// Position in `ALL`
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Result of one lane update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaneStep {
    /// Score with the level multiplier already applied
    pub score: i32,
    /// Effect of a special note completed by a hit this frame
    pub effect: Option<EffectKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lane {
    kind: LaneKind,
    x: i32,
    notes: Vec<Note>,
    cursor: usize,
}

impl Lane {
    pub fn new(kind: LaneKind, x: i32) -> Self {
        Self {
            kind,
            x,
            notes: Vec::new(),
            cursor: 0,
        }
    }

    pub fn kind(&self) -> LaneKind {
        self.kind
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Append a note; notes must be added in chronological order
    pub fn add_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    /// Every note has been struck, missed or cleared
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.notes.len()
    }

    /// Advance the lane by one frame
    ///
    /// Moves every pending note, judges the cursor note and, if it completed,
    /// applies its effect to `modifiers` and steps the cursor. Lane clears
    /// reach beyond this lane, so the caller handles `EffectKind::Bomb`.
    pub fn update(
        &mut self,
        frame: u64,
        key: KeyEdge,
        accuracy: &mut Accuracy,
        modifiers: &mut Modifiers,
    ) -> LaneStep {
        // Notes cleared by a lane clear are passed without scoring
        while self.notes.get(self.cursor).is_some_and(Note::is_completed) {
            self.cursor += 1;
        }

        for note in &mut self.notes[self.cursor..] {
            note.update(frame, modifiers.speed);
        }

        let Some(note) = self.notes.get_mut(self.cursor) else {
            return LaneStep::default();
        };

        let raw = note.check_score(key, accuracy, TARGET_HEIGHT);
        if !note.is_completed() {
            return LaneStep::default();
        }

        let effect = note.effect();
        self.cursor += 1;

        if let Some(effect) = effect {
            log::info!("{} lane triggered {:?}", self.kind.as_str(), effect);
            accuracy.set_label(Label::Effect(effect));
            modifiers.apply(effect);
        }

        LaneStep {
            score: raw.saturating_mul(modifiers.score_multiplier),
            effect,
        }
    }

    /// Complete every active note in the lane without scoring
    pub fn clear_active_notes(&mut self) -> usize {
        self.notes
            .iter_mut()
            .map(Note::force_complete)
            .filter(|&cleared| cleared)
            .count()
    }

    /// Notes to draw: active, unstolen, not yet passed by the cursor
    pub fn visible_notes(&self) -> impl Iterator<Item = &Note> {
        self.notes[self.cursor..]
            .iter()
            .filter(|note| note.is_active() && !note.is_stolen())
    }

    /// Key edges a perfect player would produce for the cursor note
    pub fn autoplay_edge(&self) -> KeyEdge {
        self.notes
            .get(self.cursor)
            .map(|note| note.autoplay_edge(TARGET_HEIGHT))
            .unwrap_or_default()
    }
}

/// Address of a note within a set of lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteRef {
    pub lane: usize,
    pub index: usize,
}

/// A note an enemy could take, with its playfield position
#[derive(Debug, Clone, Copy)]
pub struct StealCandidate {
    pub note: NoteRef,
    pub pos: Vec2,
}

/// Narrow query/command surface the combat code uses to claim notes
pub trait StealTarget {
    /// All notes currently eligible to be stolen
    fn steal_candidates(&self) -> Vec<StealCandidate>;

    /// Flag one note as stolen; false if it is no longer eligible
    fn mark_stolen(&mut self, note: NoteRef) -> bool;
}

impl StealTarget for [Lane] {
    fn steal_candidates(&self) -> Vec<StealCandidate> {
        self.iter()
            .enumerate()
            .flat_map(|(lane_idx, lane)| {
                lane.notes
                    .iter()
                    .enumerate()
                    .filter(|(_, note)| note.is_stealable())
                    .map(move |(index, note)| StealCandidate {
                        note: NoteRef {
                            lane: lane_idx,
                            index,
                        },
                        pos: Vec2::new(lane.x as f32, note.y() as f32),
                    })
            })
            .collect()
    }

    fn mark_stolen(&mut self, note: NoteRef) -> bool {
        self.get_mut(note.lane)
            .and_then(|lane| lane.notes.get_mut(note.index))
            .is_some_and(Note::mark_stolen)
    }
}
