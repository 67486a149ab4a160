//! Game-mode state machine
//!
//! Owns the current run, routes input according to the mode, converts host
//! timestamps into clamped frame deltas and plays the end-of-run sequence.
//!
//! ```text
//! Start --Enter--> Running --level up--> PausedUpgrade --choice--> Running
//!                     |
//!                  run ends
//!                     v
//!                   Dying --500ms--> GameOver --Enter--> Running
//! ```

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::highscores::{HighScore, ScoreStore};
use crate::input::{InputState, KEY_CONFIRM, upgrade_slot_for_key};
use crate::settings::Settings;
use crate::sim::progression::{UpgradeOption, apply_upgrade_choice};
use crate::sim::state::{Color, GameEvent, Particle, World};
use crate::sim::tick;

/// Delay between the end of a run and the summary
pub const GAME_OVER_DELAY_MS: f32 = 500.0;
/// Length of the cosmetic end-of-run animation
pub const DEATH_ANIMATION_MS: f32 = 2000.0;
/// Spacing between shockwave rings
pub const RING_INTERVAL_MS: f32 = 100.0;
/// Particles per shockwave ring
pub const RING_PARTICLES: usize = 20;

const DEATH_GRAVITY: f32 = 0.3;
const DEATH_DRAG: f32 = 0.98;
const RING_LIFETIME: f32 = 40.0;
const RING_PARTICLE_SIZE: f32 = 5.0;

/// Speed and color of each shockwave ring, in emission order
const RINGS: [(f32, Color); 3] = [
    (8.0, Color::White),
    (6.0, Color::Yellow),
    (4.0, Color::Orange),
];

/// Current mode of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Waiting for the first run
    Start,
    Running,
    /// Halted on an upgrade choice
    PausedUpgrade,
    /// Run over, summary not shown yet
    Dying,
    GameOver,
}

/// Final stats of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverSummary {
    pub seconds: u64,
    pub wave: u32,
    pub level: u32,
    pub new_high_score: bool,
}

/// Progress of the end-of-run sequence
#[derive(Debug, Clone, Default)]
struct DeathSequence {
    elapsed_ms: f32,
    rings_emitted: usize,
}

/// Clamp a raw frame delta (ms) to something the simulation can digest
///
/// Non-positive and implausibly large gaps (a backgrounded tab) become one
/// nominal frame.
pub fn clamp_frame_delta(delta_ms: f64) -> f32 {
    if delta_ms.is_nan() || delta_ms <= 0.0 || delta_ms > MAX_FRAME_MS as f64 {
        NOMINAL_FRAME_MS
    } else {
        delta_ms as f32
    }
}

/// The whole game: mode, current run, input and the high score
pub struct Game<S: ScoreStore> {
    mode: GameMode,
    world: Option<World>,
    settings: Settings,
    input: InputState,
    /// Timestamp of the previous frame (none right after a start or resume)
    last_time: Option<f64>,
    high_score: HighScore,
    store: S,
    seeds: Pcg32,
    death: Option<DeathSequence>,
    summary: Option<GameOverSummary>,
    events: Vec<GameEvent>,
}

impl<S: ScoreStore> Game<S> {
    pub fn new(settings: Settings, store: S, seed: u64) -> Self {
        let high_score = HighScore::load(&store);
        Self {
            mode: GameMode::Start,
            world: None,
            settings,
            input: InputState::new(),
            last_time: None,
            high_score,
            store,
            seeds: Pcg32::seed_from_u64(seed),
            death: None,
            summary: None,
            events: Vec::new(),
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// The current (or last finished) run
    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.world.as_mut()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Best survival time in seconds
    pub fn high_score(&self) -> u64 {
        self.high_score.best_seconds
    }

    /// Summary of the last run, once it has been shown
    pub fn game_over_summary(&self) -> Option<GameOverSummary> {
        self.summary
    }

    /// Offers of the pending upgrade prompt (empty otherwise)
    pub fn upgrade_choices(&self) -> &[UpgradeOption] {
        match (&self.world, self.mode) {
            (Some(world), GameMode::PausedUpgrade) => &world.upgrade_choices,
            _ => &[],
        }
    }

    /// Whether the end-of-run animation is still playing
    pub fn death_animation_active(&self) -> bool {
        self.death.is_some()
    }

    /// Whether the host should schedule another frame callback
    pub fn wants_frame(&self) -> bool {
        self.mode == GameMode::Running || self.death.is_some()
    }

    /// Begin a fresh run, discarding the previous one
    pub fn start(&mut self) {
        let seed: u64 = self.seeds.random();
        self.world = Some(World::with_particle_cap(
            seed,
            self.settings.max_particles(),
        ));
        self.mode = GameMode::Running;
        self.last_time = None;
        self.death = None;
        self.summary = None;
        self.events.clear();
        log::info!("Run started (seed {})", seed);
    }

    /// Route a key press according to the current mode
    pub fn key_down(&mut self, key: &str) {
        self.input.press(key);
        match self.mode {
            GameMode::Start | GameMode::GameOver if key == KEY_CONFIRM => self.start(),
            GameMode::PausedUpgrade => {
                if let Some(slot) = upgrade_slot_for_key(key) {
                    self.choose_upgrade(slot);
                }
            }
            _ => {}
        }
    }

    pub fn key_up(&mut self, key: &str) {
        self.input.release(key);
    }

    /// Take the offer at `index` and resume the run
    pub fn choose_upgrade(&mut self, index: usize) -> bool {
        if self.mode != GameMode::PausedUpgrade {
            return false;
        }
        let Some(world) = self.world.as_mut() else {
            return false;
        };
        if !apply_upgrade_choice(world, index) {
            return false;
        }
        self.mode = GameMode::Running;
        // Time spent on the prompt is not simulated
        self.last_time = None;
        true
    }

    /// Advance one host frame at `timestamp_ms`
    pub fn frame(&mut self, timestamp_ms: f64) {
        match self.mode {
            GameMode::Running => self.run_frame(timestamp_ms),
            GameMode::Dying | GameMode::GameOver => self.step_death_animation(),
            GameMode::Start | GameMode::PausedUpgrade => {}
        }
    }

    /// Events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn frame_delta(&mut self, timestamp_ms: f64) -> f32 {
        let delta = match self.last_time {
            Some(last) => clamp_frame_delta(timestamp_ms - last),
            None => NOMINAL_FRAME_MS,
        };
        self.last_time = Some(timestamp_ms);
        delta
    }

    fn run_frame(&mut self, timestamp_ms: f64) {
        let delta = self.frame_delta(timestamp_ms);
        let input = self.input.tick_input();
        let Some(world) = self.world.as_mut() else {
            return;
        };

        tick(world, &input, delta);
        let (running, paused) = (world.running, world.paused);
        self.collect_events();

        if !running {
            self.mode = GameMode::Dying;
            self.death = Some(DeathSequence::default());
        } else if paused {
            self.mode = GameMode::PausedUpgrade;
            self.last_time = None;
        }
    }

    fn collect_events(&mut self) {
        let Some(world) = self.world.as_mut() else {
            return;
        };
        let shake = self.settings.effective_screen_shake();
        self.events.extend(
            world
                .events
                .drain(..)
                .filter(|e| shake || *e != GameEvent::ScreenShake),
        );
    }

    /// One fixed step of the end-of-run sequence
    fn step_death_animation(&mut self) {
        let (Some(death), Some(world)) = (self.death.as_mut(), self.world.as_mut()) else {
            return;
        };

        while death.rings_emitted < RINGS.len()
            && death.elapsed_ms >= death.rings_emitted as f32 * RING_INTERVAL_MS
        {
            emit_shockwave(world, death.rings_emitted);
            death.rings_emitted += 1;
        }

        for particle in &mut world.particles {
            particle.pos += particle.vel;
            particle.vel.y += DEATH_GRAVITY;
            particle.vel.x *= DEATH_DRAG;
            particle.lifetime -= 1.0;
        }
        world.particles.retain(|p| p.lifetime > 0.0);

        death.elapsed_ms += NOMINAL_FRAME_MS;
        let elapsed = death.elapsed_ms;
        self.collect_events();

        if self.mode == GameMode::Dying && elapsed >= GAME_OVER_DELAY_MS {
            self.show_game_over();
        }
        if elapsed >= DEATH_ANIMATION_MS {
            self.death = None;
        }
    }

    fn show_game_over(&mut self) {
        let Some(world) = self.world.as_ref() else {
            return;
        };
        let seconds = world.survived_seconds();
        let new_high_score = self.high_score.submit(seconds, &mut self.store);
        let summary = GameOverSummary {
            seconds,
            wave: world.current_wave,
            level: world.player.level,
            new_high_score,
        };
        log::info!(
            "Game over: {}s, wave {}, level {}",
            summary.seconds,
            summary.wave,
            summary.level
        );
        self.summary = Some(summary);
        self.mode = GameMode::GameOver;
    }
}

/// Push one ring of particles out from where the player died
fn emit_shockwave(world: &mut World, ring: usize) {
    let Some(&(speed, color)) = RINGS.get(ring) else {
        return;
    };
    let origin = world.player.pos;
    for j in 0..RING_PARTICLES {
        let angle = std::f32::consts::TAU / RING_PARTICLES as f32 * j as f32;
        world.push_particle(Particle {
            pos: origin,
            vel: Vec2::from_angle(angle) * speed,
            size: RING_PARTICLE_SIZE,
            color,
            lifetime: RING_LIFETIME,
        });
    }
    world.events.push(GameEvent::ScreenShake);
}
