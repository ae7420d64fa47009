//! Level orchestration
//!
//! A level owns its lanes, the level-wide modifiers special notes change, the
//! running score and, for combat levels, the enemies and projectiles.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::accuracy::Accuracy;
use super::chart::Chart;
use super::combat::{Combat, CombatStep};
use super::lane::{Lane, LaneKind};
use super::note::{EffectKind, Note};
use super::tick::TickInput;
use crate::consts::{DEFAULT_SPEED, EFFECT_FRAMES, MIN_SPEED, SCORE_MULTIPLIER_STEP, SPEED_STEP};

/// Level-wide modifiers written by special notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    /// Units every active note falls per frame
    pub speed: i32,
    /// Saturates at `i32::MAX` when doubled repeatedly
    pub score_multiplier: i32,
    /// Frames since the multiplier was last doubled
    pub decay_frames: u32,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            score_multiplier: 1,
            decay_frames: 0,
        }
    }
}

impl Modifiers {
    /// Count one frame; the multiplier lapses once the window has passed
    pub fn tick_decay(&mut self) {
        self.decay_frames = self.decay_frames.saturating_add(1);
        if self.decay_frames > EFFECT_FRAMES {
            self.score_multiplier = 1;
        }
    }

    /// Apply a modifier effect. Lane clears are handled by the level.
    pub fn apply(&mut self, effect: EffectKind) {
        match effect {
            EffectKind::SpeedUp => self.speed += SPEED_STEP,
            EffectKind::SlowDown => self.speed = (self.speed - SPEED_STEP).max(MIN_SPEED),
            EffectKind::DoubleScore => {
                self.decay_frames = 0;
                self.score_multiplier = self.score_multiplier.saturating_mul(SCORE_MULTIPLIER_STEP);
            }
            EffectKind::Bomb => {}
        }
    }
}

/// What happened during one level update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelStep {
    /// Sum of all lane scores, multiplier applied
    pub score: i32,
    /// Effects triggered this frame, in lane order
    pub effects: Vec<EffectKind>,
    /// Notes force-completed by lane clears
    pub notes_cleared: usize,
    pub combat: CombatStep,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    name: String,
    clear_score: i32,
    score: i32,
    modifiers: Modifiers,
    lanes: Vec<Lane>,
    combat: Option<Combat>,
}

impl Level {
    /// An empty level; `with_combat` enables enemies and the guardian
    pub fn new(name: impl Into<String>, clear_score: i32, with_combat: bool) -> Self {
        Self {
            name: name.into(),
            clear_score,
            score: 0,
            modifiers: Modifiers::default(),
            lanes: Vec::new(),
            combat: with_combat.then(Combat::new),
        }
    }

    /// Build lanes and notes from parsed level data
    ///
    /// Each note goes to the first lane of its type. Notes whose lane type was
    /// never declared are dropped.
    pub fn from_chart(
        name: impl Into<String>,
        clear_score: i32,
        chart: &Chart,
        with_combat: bool,
    ) -> Self {
        let mut level = Self::new(name, clear_score, with_combat);
        for decl in &chart.lanes {
            level.add_lane(Lane::new(decl.kind, decl.x));
        }
        for decl in &chart.notes {
            match level.lane_mut(decl.lane) {
                Some(lane) => lane.add_note(Note::new(decl.spec, decl.frame)),
                None => log::debug!("Dropping {:?} note for undeclared lane {:?}", decl.spec, decl.lane),
            }
        }
        log::info!(
            "Level '{}' built: {} lanes, {} notes, clear score {}",
            level.name,
            level.lanes.len(),
            level.lanes.iter().map(|l| l.notes().len()).sum::<usize>(),
            level.clear_score
        );
        level
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clear_score(&self) -> i32 {
        self.clear_score
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    /// Score reached the clear threshold
    pub fn is_cleared(&self) -> bool {
        self.score >= self.clear_score
    }

    pub fn modifiers(&self) -> &Modifiers {
        &self.modifiers
    }

    pub fn speed(&self) -> i32 {
        self.modifiers.speed
    }

    pub fn score_multiplier(&self) -> i32 {
        self.modifiers.score_multiplier
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn add_lane(&mut self, lane: Lane) {
        self.lanes.push(lane);
    }

    /// First lane of the given type
    pub fn lane_mut(&mut self, kind: LaneKind) -> Option<&mut Lane> {
        self.lanes.iter_mut().find(|lane| lane.kind() == kind)
    }

    pub fn combat(&self) -> Option<&Combat> {
        self.combat.as_ref()
    }

    pub fn combat_mut(&mut self) -> Option<&mut Combat> {
        self.combat.as_mut()
    }

    /// Every lane has moved its cursor past its last note
    pub fn check_finished(&self) -> bool {
        self.lanes.iter().all(Lane::is_finished)
    }

    /// Complete every active note in every lane without scoring
    pub fn clear_active_notes(&mut self) -> usize {
        self.lanes.iter_mut().map(Lane::clear_active_notes).sum()
    }

    /// Advance the level by one frame
    ///
    /// Multiplier decay is evaluated first, then lanes in order (a lane clear
    /// takes effect before the next lane updates), then combat.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        frame: u64,
        input: &TickInput,
        accuracy: &mut Accuracy,
        rng: &mut R,
    ) -> LevelStep {
        self.modifiers.tick_decay();

        let mut step = LevelStep::default();
        for idx in 0..self.lanes.len() {
            let key = input.key(self.lanes[idx].kind());
            let lane_step = self.lanes[idx].update(frame, key, accuracy, &mut self.modifiers);
            step.score = step.score.saturating_add(lane_step.score);

            if let Some(effect) = lane_step.effect {
                if effect == EffectKind::Bomb {
                    let cleared = self.clear_active_notes();
                    log::debug!("Lane clear completed {} notes", cleared);
                    step.notes_cleared += cleared;
                }
                step.effects.push(effect);
            }
        }
        self.score = self.score.saturating_add(step.score);

        if let Some(combat) = &mut self.combat {
            step.combat = combat.update(frame, input.fire, self.lanes.as_mut_slice(), rng);
        }

        step
    }
}
