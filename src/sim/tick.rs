//! Per-frame entry point
//!
//! The driver calls `tick` once per rendered frame with the key edges seen
//! during that frame.

use super::combat::have_enemies;
use super::lane::LaneKind;
use super::level::Level;
use super::state::{GameEvent, GamePhase, GameState};

/// Press/release edges for one key during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyEdge {
    pub pressed: bool,
    pub released: bool,
}

impl KeyEdge {
    pub const fn press(pressed: bool) -> Self {
        Self {
            pressed,
            released: false,
        }
    }

    pub const fn release(released: bool) -> Self {
        Self {
            pressed: false,
            released,
        }
    }

    fn merge(self, other: KeyEdge) -> Self {
        Self {
            pressed: self.pressed || other.pressed,
            released: self.released || other.released,
        }
    }
}

/// Input commands for a single frame (edge-triggered)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Lane keys, indexed by `LaneKind::index`
    pub keys: [KeyEdge; LaneKind::COUNT],
    /// Guardian fire trigger
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Level chosen on the select screen
    pub select_level: Option<usize>,
    /// Leave the result screen
    pub confirm: bool,
    /// Demo mode - the simulation plays itself
    pub autoplay: bool,
}

impl TickInput {
    pub fn key(&self, kind: LaneKind) -> KeyEdge {
        self.keys[kind.index()]
    }

    /// Builder: press `kind` this frame
    pub fn press(mut self, kind: LaneKind) -> Self {
        self.keys[kind.index()].pressed = true;
        self
    }

    /// Builder: release `kind` this frame
    pub fn release(mut self, kind: LaneKind) -> Self {
        self.keys[kind.index()].released = true;
        self
    }

    fn merge_key(&mut self, kind: LaneKind, edge: KeyEdge) {
        let slot = &mut self.keys[kind.index()];
        *slot = slot.merge(edge);
    }
}

/// Advance the session by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Resuming consumes the frame; nothing moves until the next one
    if input.pause && state.phase == GamePhase::Paused {
        state.phase = GamePhase::Playing;
        state.events.push(GameEvent::Resumed);
        log::info!("Resumed at frame {}", state.frame);
        return;
    }

    match state.phase {
        GamePhase::LevelSelect => {
            if let Some(index) = input.select_level {
                state.start_level(index);
            }
        }
        GamePhase::Playing => play_frame(state, input),
        GamePhase::Paused => {}
        GamePhase::Finished => {
            if input.confirm {
                state.return_to_select();
            }
        }
    }
}

fn play_frame(state: &mut GameState, input: &TickInput) {
    let Some(level) = state.level.as_mut() else {
        log::warn!("Playing without a level, returning to level select");
        state.phase = GamePhase::LevelSelect;
        return;
    };

    let mut input = input.clone();
    if input.autoplay {
        autoplay(level, &mut input);
    }
    let input = &input;

    state.frame += 1;
    let step = level.update(state.frame, input, &mut state.accuracy, &mut state.rng);
    state.accuracy.tick();

    state
        .events
        .extend(step.effects.iter().copied().map(GameEvent::EffectApplied));
    if step.combat.enemy_spawned {
        state.events.push(GameEvent::EnemySpawned);
    }
    if step.combat.projectile_fired {
        state.events.push(GameEvent::ProjectileFired);
    }
    for _ in 0..step.combat.enemies_destroyed {
        state.events.push(GameEvent::EnemyDestroyed);
    }

    if level.check_finished() {
        let cleared = level.is_cleared();
        let score = level.score();
        log::info!(
            "Level '{}' finished on frame {}: score {} / {} ({})",
            level.name(),
            state.frame,
            score,
            level.clear_score(),
            if cleared { "clear" } else { "try again" }
        );
        state.phase = GamePhase::Finished;
        state.events.push(GameEvent::LevelFinished { cleared, score });
    } else if input.pause {
        state.phase = GamePhase::Paused;
        state.events.push(GameEvent::Paused);
        log::info!("Paused at frame {}", state.frame);
    }
}

/// Fill in the key edges a perfect player would produce
fn autoplay(level: &Level, input: &mut TickInput) {
    for lane in level.lanes() {
        input.merge_key(lane.kind(), lane.autoplay_edge());
    }
    if let Some(combat) = level.combat() {
        if have_enemies(combat.enemies()) && !combat.projectile_in_flight() {
            input.fire = true;
        }
    }
}
