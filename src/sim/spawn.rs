//! Enemy spawning and wave escalation

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, EnemyKind, ExpOrb, GameEvent, World};
use crate::consts::*;

/// Size of wave-bonus orbs
pub const WAVE_BONUS_ORB_SIZE: f32 = 8.0;

/// Per-tick spawn probability
///
/// This is a per-tick chance, not a rate, so faster frame rates spawn more.
pub fn spawn_chance(elapsed_secs: f32, wave: u32) -> f32 {
    0.02 + elapsed_secs * 0.001 + wave.saturating_sub(1) as f32 * 0.005
}

/// Pick an enemy kind from a uniform roll in [0, 1)
///
/// The checks cascade: each satisfied threshold overrides the previous one,
/// so the last match in fast → tank → shooter order wins.
pub fn select_enemy_kind(wave: u32, roll: f32) -> EnemyKind {
    let mut kind = EnemyKind::Normal;
    if wave >= 2 && roll < 0.3 {
        kind = EnemyKind::Fast;
    }
    if wave >= 3 && roll < 0.2 {
        kind = EnemyKind::Tank;
    }
    if wave >= 4 && roll < 0.1 {
        kind = EnemyKind::Shooter;
    }
    kind
}

/// Position just outside the given screen edge (0 top, 1 bottom, 2 left, 3 right)
///
/// `along` is the fraction of the way along that edge.
pub fn edge_position(edge: u32, along: f32) -> Vec2 {
    match edge {
        0 => Vec2::new(along * CANVAS_WIDTH, -SPAWN_MARGIN),
        1 => Vec2::new(along * CANVAS_WIDTH, CANVAS_HEIGHT + SPAWN_MARGIN),
        2 => Vec2::new(-SPAWN_MARGIN, along * CANVAS_HEIGHT),
        _ => Vec2::new(CANVAS_WIDTH + SPAWN_MARGIN, along * CANVAS_HEIGHT),
    }
}

/// Advance the wave clock, rolling over as many waves as `delta_ms` spans
pub fn advance_wave_timer(world: &mut World, delta_ms: f32) {
    world.wave_timer += delta_ms;
    while world.wave_timer >= WAVE_DURATION_MS {
        world.wave_timer -= WAVE_DURATION_MS;
        world.current_wave += 1;
        let wave = world.current_wave;

        let bonus = 5 + wave;
        for _ in 0..bonus {
            let pos = Vec2::new(
                world.rng.random::<f32>() * CANVAS_WIDTH,
                world.rng.random::<f32>() * CANVAS_HEIGHT,
            );
            world.exp_orbs.push(ExpOrb::new(pos, WAVE_BONUS_ORB_SIZE, wave));
        }

        world.events.push(GameEvent::WaveAdvanced { wave });
        log::info!("Wave {} begins ({} bonus orbs)", wave, bonus);
    }
}

/// Maybe spawn one enemy this tick
pub fn spawn_enemies(world: &mut World) {
    let chance = spawn_chance(world.elapsed_time, world.current_wave);
    if world.rng.random::<f32>() >= chance {
        return;
    }

    let edge = world.rng.random_range(0..4u32);
    let along = world.rng.random::<f32>();
    let pos = edge_position(edge, along);

    let roll = world.rng.random::<f32>();
    let kind = select_enemy_kind(world.current_wave, roll);
    log::debug!("Spawned {:?} at ({:.0}, {:.0})", kind, pos.x, pos.y);
    world.enemies.push(Enemy::new(kind, pos));
}
