//! Per-frame simulation tick
//!
//! Phases run in a fixed order: wave timer, player movement, weapons,
//! bullet movement, spawning, enemy AI, collisions, cleanup and drops,
//! orb pickup, leveling, particle decay.

use glam::Vec2;

use super::state::{Bullet, BulletKind, World};
use super::{collision, progression, spawn};
use crate::consts::*;
use crate::{angle_to_vec, direction_to};

/// Distance at which shooter enemies open fire
pub const SHOOTER_RANGE: f32 = 200.0;
/// Downward pull on particles per tick
pub const PARTICLE_GRAVITY: f32 = 0.2;

/// Directional input held during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl TickInput {
    /// Net axis direction, each component in {-1, 0, 1}
    pub fn axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.up {
            axis.y -= 1.0;
        }
        if self.down {
            axis.y += 1.0;
        }
        if self.left {
            axis.x -= 1.0;
        }
        if self.right {
            axis.x += 1.0;
        }
        axis
    }
}

/// Advance the world by one frame of `delta_ms` milliseconds
///
/// Does nothing once the run has ended or while an upgrade choice is pending.
pub fn tick(world: &mut World, input: &TickInput, delta_ms: f32) {
    if !world.running || world.paused {
        return;
    }

    world.elapsed_time += delta_ms / 1000.0;

    spawn::advance_wave_timer(world, delta_ms);
    move_player(world, input);
    update_weapons(world, delta_ms);
    update_bullets(world, delta_ms);
    spawn::spawn_enemies(world);
    update_enemies(world, delta_ms);

    collision::resolve_bullet_hits(world);
    collision::resolve_player_contacts(world);
    progression::remove_defeated_enemies(world);
    world.bullets.retain(|b| !b.hit);

    if world.running {
        progression::update_orbs(world);
        progression::check_level_up(world);
    }

    update_particles(world);
}

/// Move along held axes (diagonals are not normalized) and clamp to the canvas
pub fn move_player(world: &mut World, input: &TickInput) {
    let player = &mut world.player;
    let axis = input.axis();
    player.pos += axis * player.current_speed();
    player.pos = player.pos.clamp(
        Vec2::ZERO,
        Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT),
    );

    // Facing only changes while actually moving
    if axis != Vec2::ZERO {
        player.facing = axis.normalize();
    }
}

fn update_weapons(world: &mut World, delta_ms: f32) {
    let origin = world.player.pos;
    let facing = world.player.facing;
    for weapon in &mut world.player.weapons {
        weapon.update(delta_ms, origin, facing, &mut world.bullets);
    }
}

/// Move projectiles, age area blasts, cull what is gone
pub fn update_bullets(world: &mut World, delta_ms: f32) {
    for bullet in &mut world.bullets {
        match &mut bullet.kind {
            BulletKind::Area { lifetime_ms } => *lifetime_ms -= delta_ms,
            BulletKind::Normal | BulletKind::Piercing | BulletKind::Enemy => {
                if let Some(angle) = bullet.angle {
                    bullet.pos += angle_to_vec(angle) * BULLET_SPEED;
                }
            }
        }
    }

    world.bullets.retain(|b| match b.kind {
        BulletKind::Area { lifetime_ms } => lifetime_ms > 0.0,
        _ => !b.hit && in_cull_bounds(b.pos),
    });
}

fn in_cull_bounds(pos: Vec2) -> bool {
    pos.x > -BULLET_CULL_MARGIN
        && pos.x < CANVAS_WIDTH + BULLET_CULL_MARGIN
        && pos.y > -BULLET_CULL_MARGIN
        && pos.y < CANVAS_HEIGHT + BULLET_CULL_MARGIN
}

/// Chase the player; shooters fire when close enough
pub fn update_enemies(world: &mut World, delta_ms: f32) {
    let target = world.player.pos;
    for enemy in &mut world.enemies {
        let to_player = target - enemy.pos;
        let dist = to_player.length();
        if let Some(dir) = direction_to(enemy.pos, target) {
            enemy.pos += dir * enemy.speed;
        }

        if let Some(interval) = enemy.kind.stats().shoot_interval_ms {
            enemy.shoot_cooldown -= delta_ms;
            if enemy.shoot_cooldown <= 0.0 && dist < SHOOTER_RANGE {
                let angle = to_player.y.atan2(to_player.x);
                world.bullets.push(Bullet::hostile(enemy.pos, angle));
                enemy.shoot_cooldown = interval;
            }
        }
    }
}

/// Drift, fall and fade particles
pub fn update_particles(world: &mut World) {
    for particle in &mut world.particles {
        particle.pos += particle.vel;
        particle.vel.y += PARTICLE_GRAVITY;
        particle.lifetime -= 1.0;
    }
    world.particles.retain(|p| p.lifetime > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Color, Enemy, EnemyKind, ExpOrb, GameEvent, Particle};
    use crate::sim::weapon::{Weapon, WeaponKind};

    /// A world with no weapons so ticks stay quiet
    fn quiet_world(seed: u64) -> World {
        let mut world = World::new(seed);
        world.player.weapons.clear();
        world
    }

    #[test]
    fn test_diagonal_not_normalized() {
        let mut world = quiet_world(1);
        let start = world.player.pos;
        let input = TickInput {
            up: true,
            right: true,
            ..Default::default()
        };
        move_player(&mut world, &input);
        assert_eq!(world.player.pos, start + Vec2::new(3.0, -3.0));
        let f = world.player.facing;
        assert!((f.length() - 1.0).abs() < 1e-6);
        assert!(f.x > 0.0 && f.y < 0.0);
    }

    #[test]
    fn test_facing_persists_when_stopped() {
        let mut world = quiet_world(1);
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        move_player(&mut world, &left);
        move_player(&mut world, &TickInput::default());
        assert_eq!(world.player.facing, Vec2::new(-1.0, 0.0));

        // Opposite keys cancel: no movement, facing unchanged
        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        move_player(&mut world, &both);
        assert_eq!(world.player.facing, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_player_clamped_to_canvas() {
        let mut world = quiet_world(1);
        world.player.pos = Vec2::new(1.0, 599.0);
        world.player.move_speed_bonus = 1.0;
        let input = TickInput {
            left: true,
            down: true,
            ..Default::default()
        };
        move_player(&mut world, &input);
        assert_eq!(world.player.pos, Vec2::new(0.0, 600.0));
    }

    #[test]
    fn test_bullets_move_and_cull() {
        let mut world = quiet_world(1);
        world.bullets.push(Bullet::projectile(
            BulletKind::Normal,
            Vec2::new(100.0, 100.0),
            0.0,
            5.0,
            1,
            0,
        ));
        world.bullets.push(Bullet::projectile(
            BulletKind::Normal,
            Vec2::new(849.0, 100.0),
            0.0,
            5.0,
            1,
            0,
        ));
        update_bullets(&mut world, 16.0);
        assert_eq!(world.bullets.len(), 1);
        assert_eq!(world.bullets[0].pos, Vec2::new(104.0, 100.0));
    }

    #[test]
    fn test_area_lifetime_counts_actual_delta() {
        let mut world = quiet_world(1);
        world.bullets.push(Bullet::area(Vec2::new(5.0, 5.0), 25.0, 3, 200.0));
        update_bullets(&mut world, 120.0);
        assert_eq!(world.bullets.len(), 1);
        assert_eq!(world.bullets[0].pos, Vec2::new(5.0, 5.0));
        assert_eq!(world.bullets[0].kind, BulletKind::Area { lifetime_ms: 80.0 });
        update_bullets(&mut world, 80.0);
        assert!(world.bullets.is_empty());
    }

    #[test]
    fn test_area_removed_regardless_of_hits() {
        let mut world = quiet_world(1);
        let pos = Vec2::new(100.0, 100.0);
        let mut tank = Enemy::new(EnemyKind::Tank, pos);
        tank.speed = 0.0;
        tank.hp = 1000;
        world.enemies.push(tank);
        world.bullets.push(Bullet::area(pos, 25.0, 3, 200.0));

        let mut ticks = 0;
        while !world.bullets.is_empty() {
            tick(&mut world, &TickInput::default(), 50.0);
            ticks += 1;
            assert!(ticks < 10);
        }
        // Alive for 3 ticks, removed on the 4th before collisions
        assert_eq!(ticks, 4);
        assert_eq!(world.enemies[0].hp, 1000 - 9);
    }

    #[test]
    fn test_enemy_pursuit_and_zero_distance_guard() {
        let mut world = quiet_world(1);
        let player_pos = world.player.pos;
        world
            .enemies
            .push(Enemy::new(EnemyKind::Normal, player_pos + Vec2::new(100.0, 0.0)));
        world.enemies.push(Enemy::new(EnemyKind::Normal, player_pos));
        update_enemies(&mut world, 16.0);
        assert!((world.enemies[0].pos.x - (player_pos.x + 98.5)).abs() < 1e-4);
        assert_eq!(world.enemies[1].pos, player_pos);
    }

    #[test]
    fn test_shooter_fires_in_range() {
        let mut world = quiet_world(1);
        let player_pos = world.player.pos;
        let mut shooter = Enemy::new(EnemyKind::Shooter, player_pos + Vec2::new(150.0, 0.0));
        shooter.shoot_cooldown = 10.0;
        world.enemies.push(shooter);
        let mut far = Enemy::new(EnemyKind::Shooter, player_pos + Vec2::new(0.0, 290.0));
        far.shoot_cooldown = 0.0;
        world.enemies.push(far);

        update_enemies(&mut world, 16.0);
        assert_eq!(world.bullets.len(), 1);
        let shot = &world.bullets[0];
        assert!(shot.is_hostile());
        assert!((shot.angle.unwrap() - std::f32::consts::PI).abs() < 1e-5);
        assert_eq!(world.enemies[0].shoot_cooldown, 2000.0);
        assert!(world.enemies[1].shoot_cooldown < 0.0);
    }

    #[test]
    fn test_particles_decay() {
        let mut world = quiet_world(1);
        world.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, 0.0),
            size: 3.0,
            color: Color::Cyan,
            lifetime: 2.0,
        });
        update_particles(&mut world);
        assert_eq!(world.particles[0].pos, Vec2::new(1.0, 0.0));
        assert!((world.particles[0].vel.y - 0.2).abs() < 1e-6);
        update_particles(&mut world);
        assert!(world.particles.is_empty());
    }

    #[test]
    fn test_tick_skipped_when_paused_or_ended() {
        let mut world = quiet_world(1);
        world.paused = true;
        tick(&mut world, &TickInput::default(), 16.0);
        assert_eq!(world.elapsed_time, 0.0);

        world.paused = false;
        world.running = false;
        tick(&mut world, &TickInput::default(), 16.0);
        assert_eq!(world.elapsed_time, 0.0);
    }

    #[test]
    fn test_kill_drops_orb_and_removes_bullet_same_tick() {
        let mut world = quiet_world(3);
        let enemy_pos = Vec2::new(100.0, 100.0);
        let mut enemy = Enemy::new(EnemyKind::Normal, enemy_pos);
        enemy.hp = 1;
        enemy.speed = 0.0;
        world.enemies.push(enemy);
        // Moves 4px right onto the enemy this tick
        world.bullets.push(Bullet::projectile(
            BulletKind::Normal,
            enemy_pos - Vec2::new(4.0, 0.0),
            0.0,
            5.0,
            1,
            0,
        ));

        tick(&mut world, &TickInput::default(), 16.0);
        assert!(world.bullets.is_empty());
        assert!(world.enemies.iter().all(|e| e.pos != enemy_pos));
        assert!(world.exp_orbs.iter().any(|o| o.pos == enemy_pos && o.value == 1));
        assert!(world.events.contains(&GameEvent::EnemyKilled { kind: EnemyKind::Normal }));
    }

    #[test]
    fn test_level_up_pauses_simulation() {
        let mut world = quiet_world(3);
        world.player.exp = 4;
        let player_pos = world.player.pos;
        world.exp_orbs.push(ExpOrb::new(player_pos, 5.0, 3));

        tick(&mut world, &TickInput::default(), 16.0);
        assert_eq!(world.player.level, 2);
        assert_eq!(world.player.exp, 0);
        assert_eq!(world.player.exp_to_level_up, 10);
        assert!(world.paused);

        let elapsed = world.elapsed_time;
        tick(&mut world, &TickInput::default(), 16.0);
        assert_eq!(world.elapsed_time, elapsed);
    }

    #[test]
    fn test_no_pickup_or_level_up_after_run_ends() {
        let mut world = quiet_world(3);
        world.player.exp = 4;
        let player_pos = world.player.pos;
        let mut enemy = Enemy::new(EnemyKind::Normal, player_pos);
        enemy.speed = 0.0;
        world.enemies.push(enemy);
        world.exp_orbs.push(ExpOrb::new(player_pos, 5.0, 5));

        tick(&mut world, &TickInput::default(), 16.0);
        assert!(!world.running);
        assert!(!world.paused);
        assert_eq!(world.player.level, 1);
        assert_eq!(world.player.exp, 4);
        assert_eq!(world.exp_orbs.len(), 1);
        assert!(world.upgrade_choices.is_empty());
        assert!(
            !world
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::LevelUp { .. } | GameEvent::OrbCollected { .. }))
        );
    }

    #[test]
    fn test_weapons_fire_from_player() {
        let mut world = quiet_world(3);
        world.player.weapons.push(Weapon::new(WeaponKind::AreaBlast));
        tick(&mut world, &TickInput::default(), 16.0);
        assert!(world.bullets.iter().any(|b| b.is_area() && b.pos == world.player.pos));
    }
}
