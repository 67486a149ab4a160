//! Simulation module
//!
//! All gameplay logic lives here. Nothing in this module touches rendering
//! or the platform:
//! - One `World` per run, passed explicitly to every phase
//! - All randomness drawn from the world's seeded RNG
//! - Entity collections are compacted once per phase, never mid-iteration

pub mod collision;
pub mod progression;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod weapon;

pub use collision::{HitReport, resolve_bullet_hits, resolve_player_contacts};
pub use progression::{UpgradeOption, apply_upgrade_choice, candidate_upgrades};
pub use spawn::{select_enemy_kind, spawn_chance};
pub use state::{
    Bullet, BulletKind, Color, Enemy, EnemyKind, ExpOrb, GameEvent, Particle, Player, World,
};
pub use tick::{TickInput, tick};
pub use weapon::{Weapon, WeaponKind};
