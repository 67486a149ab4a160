//! Player weapons
//!
//! Each weapon kind fires a fixed pattern that depends only on the player's
//! position, facing, and the weapon's level.

use glam::Vec2;
use std::f32::consts::TAU;

use super::state::{Bullet, BulletKind};

/// Fastest allowed fire interval (ms)
pub const MIN_INTERVAL_MS: f32 = 50.0;
/// Interval reduction per upgrade (ms)
pub const INTERVAL_STEP_MS: f32 = 30.0;
/// Area blast duration (ms)
pub const AREA_LIFETIME_MS: f32 = 200.0;
/// Angular spread between frontal shots (radians)
const FRONTAL_SPREAD: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponKind {
    /// 8 bullets in all directions
    EightWayShot,
    /// 3 bullets fanned around the facing direction
    FrontalShot,
    /// 1 heavy bullet flying left, passes through enemies
    PiercingShot,
    /// Short-lived damage zone around the player
    AreaBlast,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 4] = [
        WeaponKind::EightWayShot,
        WeaponKind::FrontalShot,
        WeaponKind::PiercingShot,
        WeaponKind::AreaBlast,
    ];

    /// Fire interval for a freshly acquired weapon (ms)
    pub fn base_interval_ms(&self) -> f32 {
        match self {
            WeaponKind::EightWayShot => 300.0,
            WeaponKind::FrontalShot => 200.0,
            WeaponKind::PiercingShot => 500.0,
            WeaponKind::AreaBlast => 800.0,
        }
    }

    /// Player level required before this weapon is offered
    pub fn unlock_level(&self) -> u32 {
        match self {
            WeaponKind::EightWayShot | WeaponKind::FrontalShot => 0,
            WeaponKind::PiercingShot => 5,
            WeaponKind::AreaBlast => 8,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WeaponKind::EightWayShot => "Eight-Way Shot",
            WeaponKind::FrontalShot => "Frontal Shot",
            WeaponKind::PiercingShot => "Piercing Shot",
            WeaponKind::AreaBlast => "Area Blast",
        }
    }
}

/// A weapon owned by the player
#[derive(Debug, Clone)]
pub struct Weapon {
    pub kind: WeaponKind,
    /// Milliseconds between shots
    pub interval_ms: f32,
    /// Milliseconds until the next shot
    pub shoot_cooldown: f32,
    pub level: u32,
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        Self {
            kind,
            interval_ms: kind.base_interval_ms(),
            shoot_cooldown: 0.0,
            level: 1,
        }
    }

    pub fn upgrade(&mut self) {
        self.level += 1;
        self.interval_ms = (self.interval_ms - INTERVAL_STEP_MS).max(MIN_INTERVAL_MS);
    }

    /// Count down and fire if ready
    pub fn update(&mut self, delta_ms: f32, origin: Vec2, facing: Vec2, out: &mut Vec<Bullet>) {
        self.shoot_cooldown -= delta_ms;
        if self.shoot_cooldown <= 0.0 {
            out.extend(self.fire(origin, facing));
            self.shoot_cooldown = self.interval_ms;
        }
    }

    /// Bullets produced by one shot
    pub fn fire(&self, origin: Vec2, facing: Vec2) -> Vec<Bullet> {
        let level = self.level as i32;
        match self.kind {
            WeaponKind::EightWayShot => {
                let damage = 1 + level / 3;
                let piercing = if level >= 5 { 1 } else { 0 };
                (0..8)
                    .map(|i| {
                        let angle = TAU / 8.0 * i as f32;
                        Bullet::projectile(BulletKind::Normal, origin, angle, 5.0, damage, piercing)
                    })
                    .collect()
            }
            WeaponKind::FrontalShot => {
                let base = facing.y.atan2(facing.x);
                let damage = 2 + level / 2;
                (-1..=1)
                    .map(|i| {
                        let angle = base + i as f32 * FRONTAL_SPREAD;
                        Bullet::projectile(BulletKind::Normal, origin, angle, 5.0, damage, 0)
                    })
                    .collect()
            }
            WeaponKind::PiercingShot => {
                let angle = 0.0_f32.atan2(-1.0);
                let piercing = (3 + level / 2) as u32;
                vec![Bullet::projectile(
                    BulletKind::Piercing,
                    origin,
                    angle,
                    8.0,
                    3 + level,
                    piercing,
                )]
            }
            WeaponKind::AreaBlast => {
                let radius = 20.0 + 5.0 * self.level as f32;
                vec![Bullet::area(origin, radius, 2 + level, AREA_LIFETIME_MS)]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::AREA_PIERCING;
    use std::f32::consts::PI;

    fn weapon_at_level(kind: WeaponKind, level: u32) -> Weapon {
        let mut weapon = Weapon::new(kind);
        weapon.level = level;
        weapon
    }

    #[test]
    fn test_eight_way_pattern() {
        let bullets = Weapon::new(WeaponKind::EightWayShot).fire(Vec2::ZERO, Vec2::NEG_Y);
        assert_eq!(bullets.len(), 8);
        for (i, b) in bullets.iter().enumerate() {
            let expected = TAU * i as f32 / 8.0;
            assert!((b.angle.unwrap() - expected).abs() < 1e-6);
            assert_eq!(b.damage, 1);
            assert_eq!(b.piercing, 0);
        }

        let bullets = weapon_at_level(WeaponKind::EightWayShot, 6).fire(Vec2::ZERO, Vec2::NEG_Y);
        assert_eq!(bullets[0].damage, 3);
        assert_eq!(bullets[0].piercing, 1);
    }

    #[test]
    fn test_frontal_follows_facing() {
        let bullets = Weapon::new(WeaponKind::FrontalShot).fire(Vec2::ZERO, Vec2::NEG_Y);
        assert_eq!(bullets.len(), 3);
        let center = bullets[1].angle.unwrap();
        assert!((center - (-PI / 2.0)).abs() < 1e-6);
        assert!((bullets[0].angle.unwrap() - (center - 0.1)).abs() < 1e-6);
        assert!((bullets[2].angle.unwrap() - (center + 0.1)).abs() < 1e-6);
        assert_eq!(bullets[0].damage, 2);

        let bullets = weapon_at_level(WeaponKind::FrontalShot, 4).fire(Vec2::ZERO, Vec2::X);
        assert!(bullets[1].angle.unwrap().abs() < 1e-6);
        assert_eq!(bullets[1].damage, 4);
        assert!(bullets.iter().all(|b| b.piercing == 0));
    }

    #[test]
    fn test_piercing_fires_left() {
        let bullets = weapon_at_level(WeaponKind::PiercingShot, 3).fire(Vec2::ZERO, Vec2::X);
        assert_eq!(bullets.len(), 1);
        let b = &bullets[0];
        assert!((b.angle.unwrap() - PI).abs() < 1e-6);
        assert_eq!(b.damage, 6);
        assert_eq!(b.piercing, 4);
        assert_eq!(b.kind, BulletKind::Piercing);
    }

    #[test]
    fn test_area_blast_is_stationary_zone() {
        let origin = Vec2::new(10.0, 20.0);
        let bullets = weapon_at_level(WeaponKind::AreaBlast, 2).fire(origin, Vec2::X);
        assert_eq!(bullets.len(), 1);
        let b = &bullets[0];
        assert_eq!(b.pos, origin);
        assert_eq!(b.size, 30.0);
        assert_eq!(b.damage, 4);
        assert_eq!(b.piercing, AREA_PIERCING);
        assert!(b.angle.is_none());
        assert_eq!(b.kind, BulletKind::Area { lifetime_ms: 200.0 });
    }

    #[test]
    fn test_upgrade_interval_floor() {
        let mut weapon = Weapon::new(WeaponKind::FrontalShot);
        weapon.upgrade();
        assert_eq!(weapon.level, 2);
        assert_eq!(weapon.interval_ms, 170.0);
        for _ in 0..20 {
            weapon.upgrade();
        }
        assert_eq!(weapon.interval_ms, MIN_INTERVAL_MS);
        assert_eq!(weapon.level, 22);
    }

    #[test]
    fn test_cooldown_cycle() {
        let mut weapon = Weapon::new(WeaponKind::EightWayShot);
        let mut out = Vec::new();

        // Fresh weapon fires on its first update
        weapon.update(16.0, Vec2::ZERO, Vec2::NEG_Y, &mut out);
        assert_eq!(out.len(), 8);
        assert_eq!(weapon.shoot_cooldown, 300.0);

        weapon.update(16.0, Vec2::ZERO, Vec2::NEG_Y, &mut out);
        assert_eq!(out.len(), 8);
        assert_eq!(weapon.shoot_cooldown, 284.0);
    }
}
