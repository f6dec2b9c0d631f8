//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Wall-clock time only enters as explicit `now_ms` arguments
//! - Seeded RNG only
//! - Stable iteration order (insertion order of entity lists)
//! - No rendering, audio or storage dependencies

pub mod effects;
pub mod field;
pub mod geometry;
pub mod motion;
pub mod powerups;
pub mod progression;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use geometry::{Rect, overlaps};
pub use progression::{end_game, poll_timer, start_session};
pub use snapshot::{RenderSnapshot, snapshot};
pub use state::{
    GameEvent, GameOverReason, GamePhase, GameState, Hazard, MoveIntent, Player, PowerUp,
    PowerUpKind, Sheep, Trajectory,
};
pub use tick::{TickInput, tick};
