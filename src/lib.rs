//! Wave Survivor - a single-screen arcade survival game
//!
//! Core modules:
//! - `sim`: Per-tick simulation (spawning, weapons, collisions, progression)
//! - `game`: Game-mode state machine wrapping one `World` per run
//! - `renderer`: Read-only draw list projection (Canvas2D backend on web)
//! - `highscores`: Best-time persistence
//! - `settings`: Presentation preferences
//! - `input`, `ui`: Held-key map and text projections for the host

pub mod game;
pub mod highscores;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use game::{Game, GameMode};
pub use highscores::{HighScore, MemoryStore, ScoreStore};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Canvas dimensions (pixels)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Nominal frame length, used when the measured delta is unusable
    pub const NOMINAL_FRAME_MS: f32 = 16.0;
    /// Deltas above this are treated as a stall (tab in background)
    pub const MAX_FRAME_MS: f32 = 1000.0;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 3.0;
    pub const PLAYER_RADIUS: f32 = 10.0;
    pub const PLAYER_START_EXP_TO_LEVEL: u32 = 5;
    /// Threshold growth per level
    pub const EXP_THRESHOLD_STEP: u32 = 5;

    /// Enemy speed multiplier applied on top of the per-kind factor
    pub const BASE_ENEMY_SPEED: f32 = 1.5;
    /// Spawn distance outside the visible edge
    pub const SPAWN_MARGIN: f32 = 20.0;

    /// Projectile speed (pixels per tick)
    pub const BULLET_SPEED: f32 = 4.0;
    /// Bullets are culled this far beyond the canvas
    pub const BULLET_CULL_MARGIN: f32 = 50.0;

    /// Orb pickup
    pub const ORB_ATTRACTION_SPEED: f32 = 10.0;
    pub const ORB_ATTRACTION_RANGE: f32 = 50.0;
    pub const ORB_PICKUP_RADIUS: f32 = 15.0;

    /// Wave length (ms)
    pub const WAVE_DURATION_MS: f32 = 30_000.0;
}

/// Unit vector from `from` toward `to`, or `None` when the points coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Option<Vec2> {
    let delta = to - from;
    let dist = delta.length();
    if dist > 0.0 { Some(delta / dist) } else { None }
}

/// Radius-sum overlap test
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Unit vector for an angle in radians
#[inline]
pub fn angle_to_vec(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
