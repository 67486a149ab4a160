//! Collision detection and response
//!
//! Everything is a circle, so every test is a radius-sum overlap. Pairs are
//! checked exhaustively; entity counts stay small enough that no spatial
//! partitioning is needed.

use glam::Vec2;

use super::state::{BulletKind, Color, World};
use crate::circles_overlap;

/// Result of one player-bullet vs enemy pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitReport {
    /// Number of (bullet, enemy) overlaps that dealt damage
    pub hits: usize,
    /// Total damage dealt
    pub damage: i32,
}

/// Apply player-bullet damage to every overlapping enemy
///
/// Each overlapping pair deals damage once per call. Projectiles spend one
/// pierce per enemy hit and are marked `hit` once they have none left; area
/// bullets are never marked and keep hitting on later ticks while alive.
pub fn resolve_bullet_hits(world: &mut World) -> HitReport {
    let mut report = HitReport::default();
    let mut sparks: Vec<(Vec2, Color)> = Vec::new();

    for bullet in world.bullets.iter_mut().filter(|b| !b.is_hostile()) {
        for enemy in &mut world.enemies {
            if !circles_overlap(enemy.pos, enemy.size, bullet.pos, bullet.size) {
                continue;
            }
            enemy.hp -= bullet.damage;
            report.hits += 1;
            report.damage += bullet.damage;

            match bullet.kind {
                BulletKind::Area { .. } => sparks.push((enemy.pos, enemy.color)),
                BulletKind::Normal | BulletKind::Piercing => {
                    sparks.push((bullet.pos, Color::Yellow));
                    if bullet.piercing > 0 {
                        bullet.piercing -= 1;
                    } else {
                        bullet.hit = true;
                    }
                }
                // Filtered out above
                BulletKind::Enemy => {}
            }
        }
    }

    for (pos, color) in sparks {
        world.spawn_particle(pos, color, 3.0);
    }
    report
}

/// Check hostile bullets and enemy bodies against the player
///
/// Any contact ends the run. Living enemies touching the player are removed
/// without a drop. Returns true if the run ended during this call.
pub fn resolve_player_contacts(world: &mut World) -> bool {
    if !world.running {
        return false;
    }
    let player_pos = world.player.pos;
    let player_r = world.player.size;

    let shot = world
        .bullets
        .iter()
        .filter(|b| b.is_hostile())
        .any(|b| circles_overlap(player_pos, player_r, b.pos, b.size));

    let before = world.enemies.len();
    world
        .enemies
        .retain(|e| e.hp <= 0 || !circles_overlap(e.pos, e.size, player_pos, player_r));
    let rammed = world.enemies.len() < before;

    if shot || rammed {
        log::debug!("Player hit (shot: {}, rammed: {})", shot, rammed);
        return world.end_run();
    }
    false
}
