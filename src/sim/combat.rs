//! Enemies, the guardian and its projectiles
//!
//! Enemies patrol a horizontal corridor and steal any normal note they touch.
//! The guardian fires projectiles at the nearest enemy on demand. A projectile
//! and the first enemy it touches deactivate each other.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{closest, detect_collision};
use super::lane::StealTarget;
use crate::consts::{WINDOW_HEIGHT, WINDOW_WIDTH};

/// A new enemy appears whenever the frame counter is a multiple of this
pub const ENEMY_SPAWN_INTERVAL: u64 = 600;

/// Patrol corridor and spawn box
pub const ENEMY_X_MIN: f32 = 100.0;
pub const ENEMY_X_MAX: f32 = 900.0;
pub const ENEMY_Y_MIN: f32 = 100.0;
pub const ENEMY_Y_MAX: f32 = 500.0;
pub const ENEMY_SPEED: f32 = 1.0;
/// Reach of an enemy when claiming notes
pub const STEAL_RADIUS: f32 = 104.0;

pub const GUARDIAN_POS: Vec2 = Vec2::new(800.0, 600.0);

pub const PROJECTILE_SPEED: f32 = 6.0;
pub const PROJECTILE_HIT_RADIUS: f32 = 64.0;

/// A note-stealing enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pos: Vec2,
    moving_right: bool,
    active: bool,
}

impl Enemy {
    pub fn new(pos: Vec2, moving_right: bool) -> Self {
        Self {
            pos,
            moving_right,
            active: true,
        }
    }

    /// Spawn at a random point of the spawn box, heading a random way
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let x = rng.random_range(ENEMY_X_MIN..ENEMY_X_MAX);
        let y = rng.random_range(ENEMY_Y_MIN..ENEMY_Y_MAX);
        Self::new(Vec2::new(x, y), rng.random_bool(0.5))
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn is_moving_right(&self) -> bool {
        self.moving_right
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Permanent; enemies never come back
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    fn patrol(&mut self) {
        if self.moving_right {
            self.pos.x += ENEMY_SPEED;
            if self.pos.x >= ENEMY_X_MAX {
                self.moving_right = false;
            }
        } else {
            self.pos.x -= ENEMY_SPEED;
            if self.pos.x <= ENEMY_X_MIN {
                self.moving_right = true;
            }
        }
    }

    /// Move one step, then claim every eligible note within reach
    ///
    /// Returns how many notes were stolen.
    pub fn update<T: StealTarget + ?Sized>(&mut self, field: &mut T) -> usize {
        if !self.active {
            return 0;
        }
        self.patrol();

        let mut stolen = 0;
        for candidate in field.steal_candidates() {
            if detect_collision(candidate.pos, self.pos, STEAL_RADIUS)
                && field.mark_stolen(candidate.note)
            {
                log::debug!("Enemy at {:?} stole note {:?}", self.pos, candidate.note);
                stolen += 1;
            }
        }
        stolen
    }
}

/// True if at least one enemy is still active
pub fn have_enemies(enemies: &[Enemy]) -> bool {
    enemies.iter().any(Enemy::is_active)
}

/// Index of the active enemy nearest to `origin` (first wins on ties)
pub fn closest_enemy(origin: Vec2, enemies: &[Enemy]) -> Option<usize> {
    closest(
        origin,
        enemies
            .iter()
            .enumerate()
            .filter(|(_, enemy)| enemy.is_active())
            .map(|(idx, enemy)| (idx, enemy.pos)),
    )
}

/// Stationary launcher for projectiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guardian {
    pos: Vec2,
}

impl Default for Guardian {
    fn default() -> Self {
        Self { pos: GUARDIAN_POS }
    }
}

impl Guardian {
    pub fn pos(&self) -> Vec2 {
        self.pos
    }
}

/// An arrow flying in a straight line toward where its target was
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pos: Vec2,
    vel: Vec2,
    /// Render angle (radians), fixed at launch
    rotation: f32,
    active: bool,
}

impl Projectile {
    /// Aim from `origin` at the closest active enemy
    ///
    /// Returns `None` when there is nothing to shoot at.
    pub fn spawn(origin: Vec2, enemies: &[Enemy]) -> Option<Self> {
        let target = closest_enemy(origin, enemies)?;
        let vel = (enemies[target].pos - origin).normalize_or_zero() * PROJECTILE_SPEED;
        Some(Self {
            pos: origin,
            vel,
            rotation: vel.y.atan2(vel.x),
            active: true,
        })
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn out_of_bounds(&self) -> bool {
        self.pos.x < 0.0
            || self.pos.x > WINDOW_WIDTH as f32
            || self.pos.y < 0.0
            || self.pos.y > WINDOW_HEIGHT as f32
    }

    /// Fly one step and resolve at most one hit
    ///
    /// Returns the index of the enemy destroyed this frame, if any.
    pub fn update(&mut self, enemies: &mut [Enemy]) -> Option<usize> {
        if !self.active {
            return None;
        }
        self.pos += self.vel;
        if self.out_of_bounds() {
            self.active = false;
            return None;
        }

        let (idx, enemy) = enemies.iter_mut().enumerate().find(|(_, enemy)| {
            enemy.active && detect_collision(enemy.pos, self.pos, PROJECTILE_HIT_RADIUS)
        })?;
        enemy.deactivate();
        self.active = false;
        Some(idx)
    }
}

/// What the combat step did this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombatStep {
    pub enemy_spawned: bool,
    pub projectile_fired: bool,
    pub enemies_destroyed: usize,
    pub notes_stolen: usize,
}

/// Combat state for levels that have enemies
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Combat {
    guardian: Guardian,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
}

impl Combat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guardian(&self) -> &Guardian {
        &self.guardian
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn add_enemy(&mut self, enemy: Enemy) {
        self.enemies.push(enemy);
    }

    /// A projectile is still flying
    pub fn projectile_in_flight(&self) -> bool {
        self.projectiles.iter().any(Projectile::is_active)
    }

    /// Fire at the nearest enemy; ignored when no enemy is active
    pub fn fire(&mut self) -> bool {
        match Projectile::spawn(self.guardian.pos, &self.enemies) {
            Some(projectile) => {
                log::debug!(
                    "Projectile fired from {:?} with velocity {:?}",
                    projectile.pos,
                    projectile.vel
                );
                self.projectiles.push(projectile);
                true
            }
            None => false,
        }
    }

    /// Advance combat by one frame, after the lanes have updated
    pub fn update<T, R>(&mut self, frame: u64, fire: bool, field: &mut T, rng: &mut R) -> CombatStep
    where
        T: StealTarget + ?Sized,
        R: Rng + ?Sized,
    {
        let mut step = CombatStep::default();

        if frame % ENEMY_SPAWN_INTERVAL == 0 {
            let enemy = Enemy::spawn(rng);
            log::debug!("Enemy spawned at {:?} on frame {}", enemy.pos, frame);
            self.enemies.push(enemy);
            step.enemy_spawned = true;
        }

        if fire {
            step.projectile_fired = self.fire();
        }

        for projectile in &mut self.projectiles {
            if projectile.update(&mut self.enemies).is_some() {
                step.enemies_destroyed += 1;
            }
        }

        for enemy in &mut self.enemies {
            step.notes_stolen += enemy.update(field);
        }

        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::lane::{Lane, LaneKind};
    use crate::sim::note::{EffectKind, Note};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn lanes_with_active_notes() -> Vec<Lane> {
        let mut lane = Lane::new(LaneKind::Left, 400);
        lane.add_note(Note::normal(0));
        lane.add_note(Note::hold(0));
        lane.add_note(Note::special(EffectKind::Bomb, 0));
        lane.add_note(Note::normal(5000));
        let mut lanes = vec![lane];
        let mut accuracy = crate::sim::Accuracy::new();
        let mut modifiers = crate::sim::Modifiers::default();
        // One frame: the three frame-0 notes activate at y + 2
        lanes[0].update(1, Default::default(), &mut accuracy, &mut modifiers);
        lanes
    }

    #[test]
    fn test_have_enemies() {
        assert!(!have_enemies(&[]));
        let mut enemy = Enemy::new(Vec2::new(300.0, 300.0), true);
        enemy.deactivate();
        assert!(!have_enemies(std::slice::from_ref(&enemy)));
        assert!(have_enemies(&[enemy, Enemy::new(Vec2::ZERO, false)]));
    }

    #[test]
    fn test_enemy_patrol_reverses_at_bounds() {
        let mut lanes: Vec<Lane> = Vec::new();
        let mut enemy = Enemy::new(Vec2::new(898.0, 200.0), true);
        enemy.update(lanes.as_mut_slice());
        assert!(enemy.is_moving_right());
        enemy.update(lanes.as_mut_slice());
        assert_eq!(enemy.pos().x, 900.0);
        assert!(!enemy.is_moving_right());
        enemy.update(lanes.as_mut_slice());
        assert_eq!(enemy.pos(), Vec2::new(899.0, 200.0));

        let mut enemy = Enemy::new(Vec2::new(101.0, 200.0), false);
        enemy.update(lanes.as_mut_slice());
        assert!(enemy.is_moving_right());
    }

    #[test]
    fn test_enemy_steals_only_normal_notes_in_reach() {
        let mut lanes = lanes_with_active_notes();
        // Notes sit at (400, 102) and (400, 26); enemy lands on (400, 150)
        let mut enemy = Enemy::new(Vec2::new(399.0, 150.0), true);
        let stolen = enemy.update(lanes.as_mut_slice());
        assert_eq!(stolen, 1);

        let notes = lanes[0].notes();
        assert!(notes[0].is_stolen());
        assert!(!notes[1].is_stolen());
        assert!(!notes[2].is_stolen());
        assert!(!notes[3].is_stolen());

        // Already stolen notes are not counted again
        assert_eq!(enemy.update(lanes.as_mut_slice()), 0);
    }

    #[test]
    fn test_enemy_out_of_reach_steals_nothing() {
        let mut lanes = lanes_with_active_notes();
        let mut enemy = Enemy::new(Vec2::new(600.0, 400.0), true);
        assert_eq!(enemy.update(lanes.as_mut_slice()), 0);
        assert!(!lanes[0].notes()[0].is_stolen());
    }

    #[test]
    fn test_inactive_enemy_is_inert() {
        let mut lanes = lanes_with_active_notes();
        let mut enemy = Enemy::new(Vec2::new(400.0, 102.0), true);
        enemy.deactivate();
        assert_eq!(enemy.update(lanes.as_mut_slice()), 0);
        assert_eq!(enemy.pos(), Vec2::new(400.0, 102.0));
    }

    #[test]
    fn test_no_projectile_without_active_enemy() {
        assert!(Projectile::spawn(GUARDIAN_POS, &[]).is_none());
        let mut enemy = Enemy::new(Vec2::new(300.0, 300.0), true);
        enemy.deactivate();
        assert!(Projectile::spawn(GUARDIAN_POS, &[enemy]).is_none());

        let mut combat = Combat::new();
        assert!(!combat.fire());
        assert!(combat.projectiles().is_empty());
    }

    #[test]
    fn test_projectile_aims_at_closest_enemy() {
        let enemies = [
            Enemy::new(Vec2::new(200.0, 600.0), true),
            Enemy::new(Vec2::new(800.0, 300.0), true),
        ];
        let projectile = Projectile::spawn(GUARDIAN_POS, &enemies).expect("enemy is active");
        assert_eq!(projectile.pos(), GUARDIAN_POS);
        assert!((projectile.vel().length() - PROJECTILE_SPEED).abs() < 1e-5);
        assert!((projectile.vel() - Vec2::new(0.0, -6.0)).length() < 1e-5);
        assert!((projectile.rotation() + std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_closest_enemy_tie_keeps_first() {
        let mut enemies = vec![
            Enemy::new(Vec2::new(800.0, 500.0), true),
            Enemy::new(Vec2::new(700.0, 600.0), true),
        ];
        assert_eq!(closest_enemy(GUARDIAN_POS, &enemies), Some(0));
        enemies[0].deactivate();
        assert_eq!(closest_enemy(GUARDIAN_POS, &enemies), Some(1));
    }

    #[test]
    fn test_projectile_leaves_playfield() {
        let enemies = [Enemy::new(Vec2::new(1020.0, 600.0), true)];
        let mut projectile = Projectile::spawn(GUARDIAN_POS, &enemies).expect("enemy is active");
        let mut far_away = [Enemy::new(Vec2::new(100.0, 100.0), true)];
        for _ in 0..60 {
            projectile.update(&mut far_away);
        }
        assert!(!projectile.is_active());
        assert!(far_away[0].is_active());
    }

    #[test]
    fn test_projectile_hits_one_enemy() {
        let mut enemies = vec![
            Enemy::new(Vec2::new(800.0, 540.0), true),
            Enemy::new(Vec2::new(800.0, 545.0), true),
        ];
        let mut projectile = Projectile::spawn(GUARDIAN_POS, &enemies).expect("enemy is active");

        // First step lands at (800, 594): both enemies within 64, only the first goes
        assert_eq!(projectile.update(&mut enemies), Some(0));
        assert!(!projectile.is_active());
        assert!(!enemies[0].is_active());
        assert!(enemies[1].is_active());

        assert_eq!(projectile.update(&mut enemies), None);
    }

    #[test]
    fn test_enemy_spawn_cadence_and_bounds() {
        let mut combat = Combat::new();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut lanes: Vec<Lane> = Vec::new();

        for frame in 1..=1800 {
            combat.update(frame, false, lanes.as_mut_slice(), &mut rng);
        }
        assert_eq!(combat.enemies().len(), 3);
        for enemy in combat.enemies() {
            // Patrol may overshoot the corridor by one step before turning
            let x = enemy.pos().x;
            assert!((ENEMY_X_MIN - ENEMY_SPEED..=ENEMY_X_MAX + ENEMY_SPEED).contains(&x));
            assert!((ENEMY_Y_MIN..ENEMY_Y_MAX).contains(&enemy.pos().y));
        }
    }

    #[test]
    fn test_spawn_is_deterministic_per_seed() {
        let a = Enemy::spawn(&mut Pcg32::seed_from_u64(42));
        let b = Enemy::spawn(&mut Pcg32::seed_from_u64(42));
        assert_eq!(a.pos(), b.pos());
        assert_eq!(a.is_moving_right(), b.is_moving_right());
    }

    #[test]
    fn test_combat_fire_and_destroy() {
        let mut combat = Combat::new();
        combat.add_enemy(Enemy::new(Vec2::new(800.0, 400.0), true));
        let mut rng = Pcg32::seed_from_u64(1);
        let mut lanes: Vec<Lane> = Vec::new();

        let step = combat.update(1, true, lanes.as_mut_slice(), &mut rng);
        assert!(step.projectile_fired);
        assert!(combat.projectile_in_flight());

        let mut destroyed = 0;
        for frame in 2..60 {
            destroyed += combat
                .update(frame, false, lanes.as_mut_slice(), &mut rng)
                .enemies_destroyed;
        }
        assert_eq!(destroyed, 1);
        assert!(!have_enemies(combat.enemies()));
        assert!(!combat.projectile_in_flight());
    }
}
