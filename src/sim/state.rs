//! World state and core simulation types
//!
//! One `World` exists per run. It is created fresh when a run starts and
//! dropped when the next run starts.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::progression::UpgradeOption;
use super::weapon::{Weapon, WeaponKind};
use crate::consts::*;

/// Named display colors (mapped to CSS by the renderer)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Lime,
    Yellow,
    Cyan,
    Red,
    Orange,
    DarkRed,
    Purple,
    Magenta,
    White,
    Green,
}

impl Color {
    pub fn css(&self) -> &'static str {
        match self {
            Color::Lime => "lime",
            Color::Yellow => "yellow",
            Color::Cyan => "cyan",
            Color::Red => "red",
            Color::Orange => "orange",
            Color::DarkRed => "darkred",
            Color::Purple => "purple",
            Color::Magenta => "magenta",
            Color::White => "white",
            Color::Green => "green",
        }
    }
}

/// Things that happened during a tick, for the host to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    EnemyKilled { kind: EnemyKind },
    OrbCollected { value: u32 },
    WaveAdvanced { wave: u32 },
    LevelUp { level: u32 },
    /// Host should shake the play field
    ScreenShake,
    RunEnded,
}

/// The player avatar
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Collision radius (0 once dead)
    pub size: f32,
    pub exp: u32,
    pub level: u32,
    pub exp_to_level_up: u32,
    pub weapons: Vec<Weapon>,
    /// Additive speed multiplier
    pub move_speed_bonus: f32,
    /// Additive orb attraction radius (pixels)
    pub exp_range_bonus: f32,
    /// Last nonzero movement direction (unit length)
    pub facing: Vec2,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0),
            size: PLAYER_RADIUS,
            exp: 0,
            level: 1,
            exp_to_level_up: PLAYER_START_EXP_TO_LEVEL,
            weapons: vec![Weapon::new(WeaponKind::EightWayShot)],
            move_speed_bonus: 0.0,
            exp_range_bonus: 0.0,
            facing: Vec2::NEG_Y,
        }
    }
}

impl Player {
    pub fn current_speed(&self) -> f32 {
        PLAYER_SPEED * (1.0 + self.move_speed_bonus)
    }

    pub fn attraction_range(&self) -> f32 {
        ORB_ATTRACTION_RANGE + self.exp_range_bonus
    }

    pub fn has_weapon(&self, kind: WeaponKind) -> bool {
        self.weapons.iter().any(|w| w.kind == kind)
    }

    pub fn weapon_mut(&mut self, kind: WeaponKind) -> Option<&mut Weapon> {
        self.weapons.iter_mut().find(|w| w.kind == kind)
    }
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnemyKind {
    #[default]
    Normal,
    Fast,
    Tank,
    Shooter,
}

/// Base stats per enemy kind
#[derive(Debug, Clone, Copy)]
pub struct EnemyStats {
    pub hp: i32,
    /// Multiplied by `BASE_ENEMY_SPEED`
    pub speed: f32,
    pub size: f32,
    pub color: Color,
    pub exp: u32,
    pub shoot_interval_ms: Option<f32>,
}

impl EnemyKind {
    pub fn stats(&self) -> EnemyStats {
        match self {
            EnemyKind::Normal => EnemyStats {
                hp: 3,
                speed: 1.0,
                size: 10.0,
                color: Color::Red,
                exp: 1,
                shoot_interval_ms: None,
            },
            EnemyKind::Fast => EnemyStats {
                hp: 2,
                speed: 2.0,
                size: 8.0,
                color: Color::Orange,
                exp: 2,
                shoot_interval_ms: None,
            },
            EnemyKind::Tank => EnemyStats {
                hp: 8,
                speed: 0.5,
                size: 15.0,
                color: Color::DarkRed,
                exp: 3,
                shoot_interval_ms: None,
            },
            EnemyKind::Shooter => EnemyStats {
                hp: 4,
                speed: 0.8,
                size: 12.0,
                color: Color::Purple,
                exp: 2,
                shoot_interval_ms: Some(2000.0),
            },
        }
    }
}

/// An enemy entity
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: f32,
    /// May go negative before the cleanup pass
    pub hp: i32,
    pub max_hp: i32,
    /// Pixels per tick
    pub speed: f32,
    pub color: Color,
    /// Orb value dropped on death
    pub exp: u32,
    pub kind: EnemyKind,
    /// Shooter only (ms)
    pub shoot_cooldown: f32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, pos: Vec2) -> Self {
        let stats = kind.stats();
        Self {
            pos,
            size: stats.size,
            hp: stats.hp,
            max_hp: stats.hp,
            speed: stats.speed * BASE_ENEMY_SPEED,
            color: stats.color,
            exp: stats.exp,
            kind,
            shoot_cooldown: stats.shoot_interval_ms.unwrap_or(0.0),
        }
    }

    /// HP as a fraction of max, clamped to [0, 1]
    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        (self.hp as f32 / self.max_hp as f32).clamp(0.0, 1.0)
    }
}

/// Pierce count carried by area bullets (effectively unlimited)
pub const AREA_PIERCING: u32 = 999;

/// Bullet behavior variants
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BulletKind {
    Normal,
    Piercing,
    /// Stationary damage zone, removed when lifetime runs out
    Area { lifetime_ms: f32 },
    /// Fired by shooter enemies
    Enemy,
}

/// A bullet entity
#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: f32,
    /// Travel direction in radians (none for area bullets)
    pub angle: Option<f32>,
    pub damage: i32,
    /// Remaining pass-through count
    pub piercing: u32,
    pub kind: BulletKind,
    /// Marked for removal
    pub hit: bool,
}

impl Bullet {
    /// A moving player projectile
    pub fn projectile(
        kind: BulletKind,
        pos: Vec2,
        angle: f32,
        size: f32,
        damage: i32,
        piercing: u32,
    ) -> Self {
        Self {
            pos,
            size,
            angle: Some(angle),
            damage,
            piercing,
            kind,
            hit: false,
        }
    }

    /// A stationary area-damage zone
    pub fn area(pos: Vec2, radius: f32, damage: i32, lifetime_ms: f32) -> Self {
        Self {
            pos,
            size: radius,
            angle: None,
            damage,
            piercing: AREA_PIERCING,
            kind: BulletKind::Area { lifetime_ms },
            hit: false,
        }
    }

    /// A shot fired by a shooter enemy toward the player
    pub fn hostile(pos: Vec2, angle: f32) -> Self {
        Self {
            pos,
            size: 4.0,
            angle: Some(angle),
            damage: 1,
            piercing: 0,
            kind: BulletKind::Enemy,
            hit: false,
        }
    }

    pub fn is_hostile(&self) -> bool {
        self.kind == BulletKind::Enemy
    }

    pub fn is_area(&self) -> bool {
        matches!(self.kind, BulletKind::Area { .. })
    }
}

/// An experience pickup
#[derive(Debug, Clone)]
pub struct ExpOrb {
    pub pos: Vec2,
    pub size: f32,
    pub value: u32,
    /// Marked for removal
    pub collected: bool,
}

impl ExpOrb {
    pub fn new(pos: Vec2, size: f32, value: u32) -> Self {
        Self {
            pos,
            size,
            value,
            collected: false,
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub size: f32,
    pub color: Color,
    /// Ticks remaining
    pub lifetime: f32,
}

/// Default particle lifetime (ticks)
pub const PARTICLE_LIFETIME: f32 = 30.0;

/// Default particle cap when no settings are supplied
pub const MAX_PARTICLES: usize = 2000;

/// Complete state of a single run
#[derive(Debug, Clone)]
pub struct World {
    /// Run seed
    pub seed: u64,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub exp_orbs: Vec<ExpOrb>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Seconds survived
    pub elapsed_time: f32,
    /// Current wave (1-based)
    pub current_wave: u32,
    /// Milliseconds into the current wave
    pub wave_timer: f32,
    pub running: bool,
    /// Halted for an upgrade choice
    pub paused: bool,
    /// Offers for the pending upgrade choice
    pub upgrade_choices: Vec<UpgradeOption>,
    /// Events raised since the host last drained them
    pub events: Vec<GameEvent>,
    pub max_particles: usize,
    pub rng: Pcg32,
}

impl World {
    /// Create a new world with the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_particle_cap(seed, MAX_PARTICLES)
    }

    pub fn with_particle_cap(seed: u64, max_particles: usize) -> Self {
        Self {
            seed,
            player: Player::default(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            exp_orbs: Vec::new(),
            particles: Vec::new(),
            elapsed_time: 0.0,
            current_wave: 1,
            wave_timer: 0.0,
            running: true,
            paused: false,
            upgrade_choices: Vec::new(),
            events: Vec::new(),
            max_particles,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Discard everything and start over with a new seed
    pub fn reset(&mut self, seed: u64) {
        *self = Self::with_particle_cap(seed, self.max_particles);
    }

    /// Add a particle unless the cap is reached
    pub fn push_particle(&mut self, particle: Particle) {
        if self.particles.len() < self.max_particles {
            self.particles.push(particle);
        }
    }

    /// Spawn a small spark drifting in a random direction
    pub fn spawn_particle(&mut self, pos: Vec2, color: Color, size: f32) {
        let vel = Vec2::new(
            (self.rng.random::<f32>() - 0.5) * 4.0,
            (self.rng.random::<f32>() - 0.5) * 4.0,
        );
        self.push_particle(Particle {
            pos,
            vel,
            size,
            color,
            lifetime: PARTICLE_LIFETIME,
        });
    }

    /// End the run: death burst, player removed from collision
    ///
    /// Returns false if the run had already ended.
    pub fn end_run(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;

        let origin = self.player.pos;
        for _ in 0..30 {
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * 15.0,
                (self.rng.random::<f32>() - 0.5) * 15.0,
            );
            let size = self.rng.random::<f32>() * 8.0 + 3.0;
            self.push_particle(Particle {
                pos: origin,
                vel,
                size,
                color: Color::Lime,
                lifetime: 60.0,
            });
        }

        self.player.size = 0.0;
        self.events.push(GameEvent::RunEnded);
        log::info!(
            "Run ended at {:.1}s (wave {}, level {})",
            self.elapsed_time,
            self.current_wave,
            self.player.level
        );
        true
    }

    /// Whole seconds survived
    pub fn survived_seconds(&self) -> u64 {
        self.elapsed_time.max(0.0).floor() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_defaults() {
        let world = World::new(1);
        assert!(world.running);
        assert!(!world.paused);
        assert_eq!(world.current_wave, 1);
        assert_eq!(world.player.level, 1);
        assert_eq!(world.player.exp_to_level_up, 5);
        assert_eq!(world.player.weapons.len(), 1);
        assert_eq!(world.player.weapons[0].kind, WeaponKind::EightWayShot);
        assert_eq!(world.player.facing, Vec2::new(0.0, -1.0));
        assert_eq!(world.player.pos, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_enemy_stats_applied() {
        let tank = Enemy::new(EnemyKind::Tank, Vec2::ZERO);
        assert_eq!(tank.hp, 8);
        assert_eq!(tank.max_hp, 8);
        assert!((tank.speed - 0.75).abs() < 1e-6);
        assert_eq!(tank.color, Color::DarkRed);

        let shooter = Enemy::new(EnemyKind::Shooter, Vec2::ZERO);
        assert_eq!(shooter.shoot_cooldown, 2000.0);
        assert_eq!(Enemy::new(EnemyKind::Fast, Vec2::ZERO).shoot_cooldown, 0.0);
    }

    #[test]
    fn test_end_run_only_once() {
        let mut world = World::new(7);
        assert!(world.end_run());
        let particles = world.particles.len();
        assert_eq!(particles, 30);
        assert_eq!(world.player.size, 0.0);

        assert!(!world.end_run());
        assert_eq!(world.particles.len(), particles);
        let ended = world
            .events
            .iter()
            .filter(|e| **e == GameEvent::RunEnded)
            .count();
        assert_eq!(ended, 1);
    }

    #[test]
    fn test_particle_cap() {
        let mut world = World::with_particle_cap(3, 2);
        for _ in 0..5 {
            world.spawn_particle(Vec2::ZERO, Color::Yellow, 3.0);
        }
        assert_eq!(world.particles.len(), 2);
    }

    #[test]
    fn test_reset_keeps_cap() {
        let mut world = World::with_particle_cap(3, 42);
        world.elapsed_time = 99.0;
        world.reset(4);
        assert_eq!(world.seed, 4);
        assert_eq!(world.elapsed_time, 0.0);
        assert_eq!(world.max_particles, 42);
    }
}
