//! Rendering module
//!
//! Projects a `World` into a flat list of draw commands. The list is
//! backend-agnostic; on the web `canvas` executes it on a 2D context.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use glam::Vec2;

use crate::sim::state::{Color, World};

/// Bar drawn above each enemy
pub const HP_BAR_WIDTH: f32 = 30.0;
pub const HP_BAR_HEIGHT: f32 = 3.0;
const HP_BAR_GAP: f32 = 10.0;

/// Alpha of area-blast zones
const AREA_ALPHA: f32 = 0.3;
/// Lifetime divisor for particle fade in live frames
const LIVE_FADE: f32 = 30.0;
/// Lifetime divisor for particle fade during the end-of-run animation
const DEATH_FADE: f32 = 60.0;

/// One primitive to draw, in painter's order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
        alpha: f32,
    },
    /// Axis-aligned rectangle from its top-left corner
    Rect {
        origin: Vec2,
        size: Vec2,
        color: Color,
    },
}

impl DrawCommand {
    fn circle(center: Vec2, radius: f32, color: Color) -> Self {
        DrawCommand::Circle {
            center,
            radius,
            color,
            alpha: 1.0,
        }
    }
}

/// Frame for a live run
///
/// Order: player, bullets, enemies with HP bars, orbs, particles.
pub fn live_frame(world: &World) -> Vec<DrawCommand> {
    let mut cmds = Vec::with_capacity(
        1 + world.bullets.len()
            + world.enemies.len() * 3
            + world.exp_orbs.len()
            + world.particles.len(),
    );

    cmds.push(DrawCommand::circle(
        world.player.pos,
        world.player.size,
        Color::Lime,
    ));

    for bullet in &world.bullets {
        let (color, alpha) = if bullet.is_hostile() {
            (Color::Magenta, 1.0)
        } else if bullet.is_area() {
            (Color::Yellow, AREA_ALPHA)
        } else {
            (Color::Yellow, 1.0)
        };
        cmds.push(DrawCommand::Circle {
            center: bullet.pos,
            radius: bullet.size,
            color,
            alpha,
        });
    }

    for enemy in &world.enemies {
        cmds.push(DrawCommand::circle(enemy.pos, enemy.size, enemy.color));
        let origin = Vec2::new(
            enemy.pos.x - HP_BAR_WIDTH / 2.0,
            enemy.pos.y - enemy.size - HP_BAR_GAP,
        );
        cmds.push(DrawCommand::Rect {
            origin,
            size: Vec2::new(HP_BAR_WIDTH, HP_BAR_HEIGHT),
            color: Color::White,
        });
        cmds.push(DrawCommand::Rect {
            origin,
            size: Vec2::new(HP_BAR_WIDTH * enemy.hp_fraction(), HP_BAR_HEIGHT),
            color: Color::Green,
        });
    }

    for orb in &world.exp_orbs {
        cmds.push(DrawCommand::circle(orb.pos, orb.size, Color::Cyan));
    }

    push_particles(&mut cmds, world, LIVE_FADE);
    cmds
}

/// Frame for the end-of-run animation: enemies, bullets, particles only
pub fn death_frame(world: &World) -> Vec<DrawCommand> {
    let mut cmds =
        Vec::with_capacity(world.enemies.len() + world.bullets.len() + world.particles.len());

    for enemy in &world.enemies {
        cmds.push(DrawCommand::circle(enemy.pos, enemy.size, enemy.color));
    }
    for bullet in &world.bullets {
        let color = if bullet.is_hostile() {
            Color::Magenta
        } else {
            Color::Yellow
        };
        cmds.push(DrawCommand::circle(bullet.pos, bullet.size, color));
    }

    push_particles(&mut cmds, world, DEATH_FADE);
    cmds
}

fn push_particles(cmds: &mut Vec<DrawCommand>, world: &World, fade: f32) {
    cmds.extend(world.particles.iter().map(|p| DrawCommand::Circle {
        center: p.pos,
        radius: p.size,
        color: p.color,
        alpha: (p.lifetime / fade).clamp(0.0, 1.0),
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Bullet, Enemy, EnemyKind, ExpOrb, Particle};

    fn sample_world() -> World {
        let mut world = World::new(1);
        let mut enemy = Enemy::new(EnemyKind::Normal, Vec2::new(100.0, 100.0));
        enemy.hp = 1;
        world.enemies.push(enemy);
        world.bullets.push(Bullet::hostile(Vec2::new(10.0, 10.0), 0.0));
        world.bullets.push(Bullet::area(Vec2::new(20.0, 20.0), 25.0, 3, 200.0));
        world.exp_orbs.push(ExpOrb::new(Vec2::new(30.0, 30.0), 5.0, 1));
        world.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: 3.0,
            color: Color::Cyan,
            lifetime: 15.0,
        });
        world
    }

    #[test]
    fn test_live_frame_contents() {
        let world = sample_world();
        let cmds = live_frame(&world);
        // player + 2 bullets + enemy with 2 bar rects + orb + particle
        assert_eq!(cmds.len(), 8);
        assert_eq!(
            cmds[0],
            DrawCommand::circle(world.player.pos, 10.0, Color::Lime)
        );
        assert!(matches!(
            cmds[1],
            DrawCommand::Circle { color: Color::Magenta, alpha, .. } if alpha == 1.0
        ));
        assert!(matches!(
            cmds[2],
            DrawCommand::Circle { color: Color::Yellow, alpha, .. } if alpha == 0.3
        ));
        assert!(matches!(
            cmds[7],
            DrawCommand::Circle { alpha, .. } if (alpha - 0.5).abs() < 1e-6
        ));
    }

    #[test]
    fn test_hp_bar_geometry() {
        let world = sample_world();
        let cmds = live_frame(&world);
        assert_eq!(
            cmds[4],
            DrawCommand::Rect {
                origin: Vec2::new(85.0, 80.0),
                size: Vec2::new(30.0, 3.0),
                color: Color::White,
            }
        );
        // 1 of 3 hp left
        let DrawCommand::Rect { origin, size, color } = cmds[5] else {
            panic!("expected hp fill, got {:?}", cmds[5]);
        };
        assert_eq!(origin, Vec2::new(85.0, 80.0));
        assert!((size.x - 10.0).abs() < 1e-4);
        assert_eq!(color, Color::Green);
    }

    #[test]
    fn test_death_frame_skips_player_orbs_and_bars() {
        let world = sample_world();
        let cmds = death_frame(&world);
        assert_eq!(cmds.len(), 4);
        assert!(cmds.iter().all(|c| matches!(c, DrawCommand::Circle { .. })));
        assert!(matches!(
            cmds[2],
            DrawCommand::Circle { color: Color::Yellow, alpha, .. } if alpha == 1.0
        ));
        assert!(matches!(
            cmds[3],
            DrawCommand::Circle { alpha, .. } if (alpha - 0.25).abs() < 1e-6
        ));
    }
}
