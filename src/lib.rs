//! Sheep Chase - a single-screen wolf-chases-sheep arcade game
//!
//! Core modules:
//! - `sim`: Simulation core (motion, collisions, scoring, progression)
//! - `session`: Control surface that owns the state and talks to collaborators
//! - `highscores`: High score persistence
//! - `settings`: Player preferences
//! - `tuning`: Data-driven game balance
//! - `audio`: Audio cue sinks
//! - `platform`: Browser/native platform abstraction

pub mod audio;
pub mod highscores;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScoreStore;
pub use session::Session;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Sprite footprints (square)
    pub const WOLF_SIZE: f32 = 40.0;
    pub const SHEEP_SIZE: f32 = 40.0;
    pub const POOP_SIZE: f32 = 30.0;
    pub const POWERUP_SIZE: f32 = 30.0;

    /// Player speed without power-ups (units per tick)
    pub const PLAYER_BASE_SPEED: f32 = 5.0;

    /// Round structure
    pub const MAX_ROUNDS: u32 = 5;
    pub const SHEEP_TO_LEVEL_UP: u32 = 10;
    /// Round timer, in seconds
    pub const ROUND_TIME_SECS: u32 = 120;
    /// Cadence of the wall-clock timer poll
    pub const TIMER_POLL_INTERVAL_MS: u64 = 100;
    /// Announcement pause between rounds
    pub const TRANSITION_MS: u64 = 2000;

    /// Combo resets after this long without a capture
    pub const COMBO_WINDOW_MS: u64 = 2000;
    /// Maximum score contribution of a single capture
    pub const COMBO_SCORE_CAP: u32 = 4;

    /// Obstacle field
    pub const HEDGE_BASE_COUNT: u32 = 5;
    pub const HEDGE_MIN_SIZE: f32 = 40.0;
    pub const HEDGE_SIZE_RANGE: f32 = 60.0;
    pub const HEDGE_EDGE_MARGIN: f32 = 50.0;

    /// Safe-spawn search
    pub const PLAYER_SPAWN_ATTEMPTS: u32 = 50;
    pub const PLAYER_SPAWN_PADDING: f32 = 50.0;
    pub const POWERUP_SPAWN_ATTEMPTS: u32 = 20;

    /// Prey wander timing: heading held for 1000 + U(0, 2000) ms
    pub const WANDER_MIN_MS: f32 = 1000.0;
    pub const WANDER_JITTER_MS: f32 = 2000.0;
    /// Random heading perturbation after an obstacle bounce (total span, radians)
    pub const BOUNCE_JITTER: f32 = 0.5;

    /// Power-ups
    pub const POWERUP_SPAWN_CHANCE: f64 = 0.002;
    pub const MAGNET_RADIUS: f32 = 150.0;
    pub const MAGNET_PULL: f32 = 1.5;

    /// Pointer-follow input
    pub const POINTER_FOLLOW_FACTOR: f32 = 0.1;
    pub const POINTER_DEAD_ZONE: f32 = 5.0;

    /// Visual effects
    pub const PARTICLE_LIFE: u32 = 30;
    pub const SCORE_EFFECT_LIFE: u32 = 40;
    pub const BANNER_EFFECT_LIFE: u32 = 60;
    pub const CAPTURE_PARTICLES: usize = 10;
    pub const PICKUP_PARTICLES: usize = 15;
    pub const SHIELD_PARTICLES: usize = 20;
    /// Default particle budget
    pub const MAX_PARTICLES: usize = 256;
}

/// RGB colors (0xRRGGBB) handed to the renderer
pub mod palette {
    pub const WHITE: u32 = 0xffffff;
    pub const YELLOW: u32 = 0xffff00;
    pub const SPEED_BLUE: u32 = 0x3498db;
    pub const SHIELD_RED: u32 = 0xe74c3c;
    pub const MAGNET_PURPLE: u32 = 0x9b59b6;
}

/// Normalized angle to [0, 2π)
#[inline]
pub fn normalize_heading(angle: f32) -> f32 {
    angle.rem_euclid(std::f32::consts::TAU)
}

/// Unit vector for a heading (radians, y grows downward)
#[inline]
pub fn heading_to_vec(heading: f32) -> Vec2 {
    Vec2::new(heading.cos(), heading.sin())
}
