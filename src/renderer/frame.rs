//! Frame composition
//!
//! Commands are emitted back to front: background, HUD, lanes, notes,
//! combat entities, then the accuracy label on top.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::sprite::Sprite;
use crate::consts::{LANE_CENTER_Y, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::sim::{GamePhase, GameState, Level, NoteKind};

const GAME_TITLE: &str = "SHADOW DANCE";
const INSTRUCTIONS: &str = "SELECT LEVELS WITH\nNUMBER KEYS\n\n1          2          3";
const CLEAR_MESSAGE: &str = "CLEAR!";
const TRY_AGAIN_MESSAGE: &str = "TRY AGAIN";
const RETRY_MESSAGE: &str = "PRESS SPACE TO RETURN TO LEVEL SELECTION";

const TITLE_POS: Vec2 = Vec2::new(220.0, 250.0);
const INSTRUCTIONS_POS: Vec2 = Vec2::new(320.0, 440.0);
const SCORE_POS: Vec2 = Vec2::new(35.0, 35.0);
const END_MESSAGE_Y: f32 = 300.0;
const RETRY_MESSAGE_Y: f32 = 500.0;

const TITLE_SIZE: f32 = 64.0;
const INSTRUCTION_SIZE: f32 = 24.0;
const SCORE_SIZE: f32 = 30.0;
const LABEL_SIZE: f32 = 40.0;

/// One thing to put on screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Image centred on `pos`, rotated by `rotation` radians
    Sprite {
        sprite: Sprite,
        pos: Vec2,
        rotation: f32,
    },
    /// Text anchored at `pos` (its centre when `centered`)
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        centered: bool,
    },
}

impl DrawCommand {
    fn sprite(sprite: Sprite, pos: Vec2) -> Self {
        DrawCommand::Sprite {
            sprite,
            pos,
            rotation: 0.0,
        }
    }

    fn text(text: impl Into<String>, pos: Vec2, size: f32) -> Self {
        DrawCommand::Text {
            text: text.into(),
            pos,
            size,
            centered: false,
        }
    }

    fn centered(text: impl Into<String>, pos: Vec2, size: f32) -> Self {
        DrawCommand::Text {
            text: text.into(),
            pos,
            size,
            centered: true,
        }
    }
}

/// Everything to draw for the current state
pub fn build_frame(state: &GameState) -> Vec<DrawCommand> {
    let mut commands = vec![DrawCommand::sprite(Sprite::Background, screen_center())];

    match (state.phase, state.level.as_ref()) {
        (GamePhase::Playing | GamePhase::Paused, Some(level)) => {
            playfield(level, &mut commands);
            if let Some(label) = state.accuracy.visible_label() {
                commands.push(DrawCommand::centered(label.text(), screen_center(), LABEL_SIZE));
            }
        }
        (GamePhase::Finished, Some(level)) => {
            let message = if level.is_cleared() {
                CLEAR_MESSAGE
            } else {
                TRY_AGAIN_MESSAGE
            };
            let center_x = WINDOW_WIDTH as f32 / 2.0;
            commands.push(DrawCommand::centered(
                message,
                Vec2::new(center_x, END_MESSAGE_Y),
                TITLE_SIZE,
            ));
            commands.push(DrawCommand::centered(
                RETRY_MESSAGE,
                Vec2::new(center_x, RETRY_MESSAGE_Y),
                INSTRUCTION_SIZE,
            ));
        }
        _ => {
            commands.push(DrawCommand::text(GAME_TITLE, TITLE_POS, TITLE_SIZE));
            commands.push(DrawCommand::text(
                INSTRUCTIONS,
                INSTRUCTIONS_POS,
                INSTRUCTION_SIZE,
            ));
        }
    }

    commands
}

fn screen_center() -> Vec2 {
    Vec2::new(WINDOW_WIDTH as f32 / 2.0, WINDOW_HEIGHT as f32 / 2.0)
}

fn playfield(level: &Level, commands: &mut Vec<DrawCommand>) {
    commands.push(DrawCommand::text(
        format!("Score {}", level.score()),
        SCORE_POS,
        SCORE_SIZE,
    ));

    for lane in level.lanes() {
        let x = lane.x() as f32;
        commands.push(DrawCommand::sprite(
            Sprite::Lane(lane.kind()),
            Vec2::new(x, LANE_CENTER_Y as f32),
        ));
        for note in lane.visible_notes() {
            let sprite = match note.kind() {
                NoteKind::Normal => Sprite::Note(lane.kind()),
                NoteKind::Hold { .. } => Sprite::HoldNote(lane.kind()),
                NoteKind::Special { effect, .. } => Sprite::Effect(effect),
            };
            commands.push(DrawCommand::sprite(sprite, Vec2::new(x, note.y() as f32)));
        }
    }

    let Some(combat) = level.combat() else {
        return;
    };
    commands.push(DrawCommand::sprite(Sprite::Guardian, combat.guardian().pos()));
    for enemy in combat.enemies().iter().filter(|e| e.is_active()) {
        commands.push(DrawCommand::sprite(Sprite::Enemy, enemy.pos()));
    }
    for projectile in combat.projectiles().iter().filter(|p| p.is_active()) {
        commands.push(DrawCommand::Sprite {
            sprite: Sprite::Arrow,
            pos: projectile.pos(),
            rotation: projectile.rotation(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{LevelDef, LevelEntry};
    use crate::sim::{Chart, EffectKind, LaneKind, TickInput, tick};

    fn state_with(chart: &str, combat: bool) -> GameState {
        let catalog = vec![LevelDef {
            entry: LevelEntry {
                name: "render".to_string(),
                chart: "render.csv".into(),
                track: "render.wav".into(),
                clear_score: 10,
                combat,
            },
            chart: Chart::parse(chart).expect("valid chart"),
        }];
        GameState::new(3, catalog)
    }

    fn texts(commands: &[DrawCommand]) -> Vec<&str> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                DrawCommand::Sprite { .. } => None,
            })
            .collect()
    }

    fn sprites(commands: &[DrawCommand]) -> Vec<(Sprite, Vec2)> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Sprite { sprite, pos, .. } => Some((*sprite, *pos)),
                DrawCommand::Text { .. } => None,
            })
            .collect()
    }

    fn select(state: &mut GameState) {
        let input = TickInput {
            select_level: Some(0),
            ..Default::default()
        };
        tick(state, &input);
    }

    #[test]
    fn test_level_select_screen() {
        let state = state_with("Lane,Left,200\nLeft,Normal,0\n", false);
        let commands = build_frame(&state);
        assert_eq!(commands[0], DrawCommand::sprite(Sprite::Background, screen_center()));
        assert_eq!(texts(&commands), vec![GAME_TITLE, INSTRUCTIONS]);
    }

    #[test]
    fn test_playfield_layout() {
        let mut state = state_with(
            "Lane,Left,200\nLane,Special,600\nLeft,Normal,0\nLeft,Hold,100\nSpecial,Bomb,0\n",
            false,
        );
        select(&mut state);
        for _ in 0..5 {
            tick(&mut state, &TickInput::default());
        }

        let commands = build_frame(&state);
        assert!(commands.contains(&DrawCommand::text("Score 0", SCORE_POS, SCORE_SIZE)));

        let sprites = sprites(&commands);
        assert!(sprites.contains(&(Sprite::Lane(LaneKind::Left), Vec2::new(200.0, 384.0))));
        assert!(sprites.contains(&(Sprite::Lane(LaneKind::Special), Vec2::new(600.0, 384.0))));
        assert!(sprites.contains(&(Sprite::Note(LaneKind::Left), Vec2::new(200.0, 110.0))));
        assert!(sprites.contains(&(Sprite::Effect(EffectKind::Bomb), Vec2::new(600.0, 110.0))));
        // Not yet active
        assert!(!sprites.iter().any(|(s, _)| *s == Sprite::HoldNote(LaneKind::Left)));
        // No combat entities on a plain level
        assert!(!sprites.iter().any(|(s, _)| *s == Sprite::Guardian));
    }

    #[test]
    fn test_combat_entities_drawn() {
        let mut state = state_with("Lane,Left,200\nLeft,Normal,900\n", true);
        select(&mut state);
        for _ in 0..600 {
            tick(&mut state, &TickInput::default());
        }
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire);

        let commands = build_frame(&state);
        let sprites = sprites(&commands);
        assert!(sprites.contains(&(Sprite::Guardian, Vec2::new(800.0, 600.0))));
        assert_eq!(sprites.iter().filter(|(s, _)| *s == Sprite::Enemy).count(), 1);
        assert!(
            commands
                .iter()
                .any(|c| matches!(c, DrawCommand::Sprite { sprite: Sprite::Arrow, .. }))
        );
    }

    #[test]
    fn test_finished_screen() {
        let mut state = state_with("Lane,Left,200\nLeft,Normal,0\n", false);
        select(&mut state);
        while state.phase == GamePhase::Playing {
            tick(&mut state, &TickInput::default());
        }

        let commands = build_frame(&state);
        assert_eq!(texts(&commands), vec![TRY_AGAIN_MESSAGE, RETRY_MESSAGE]);
    }

    #[test]
    fn test_label_drawn_while_visible() {
        let mut state = state_with("Lane,Left,200\nLeft,Normal,0\nLeft,Normal,1000\n", false);
        select(&mut state);
        // First note reaches the target (y = 656) on frame 278
        for _ in 0..278 {
            tick(&mut state, &TickInput::default());
        }
        tick(&mut state, &TickInput::default().press(LaneKind::Left));
        assert!(texts(&build_frame(&state)).contains(&"PERFECT"));

        for _ in 0..40 {
            tick(&mut state, &TickInput::default());
        }
        assert!(!texts(&build_frame(&state)).contains(&"PERFECT"));
    }
}
