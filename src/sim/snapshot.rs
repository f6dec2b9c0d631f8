//! Render snapshot
//!
//! A flat, serializable view of everything a renderer needs for one frame.
//! Hosts draw from this and never reach into `GameState` directly.

use glam::Vec2;
use serde::Serialize;

use super::geometry::Rect;
use super::state::{GamePhase, GameState, PowerUpKind};
use crate::consts::*;

#[derive(Debug, Clone, Serialize)]
pub struct SpriteView {
    pub pos: Vec2,
    pub size: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PowerUpView {
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub color: u32,
    pub active: bool,
    /// Time left on an active power-up
    pub remaining_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub color: u32,
    pub size: f32,
    /// 1.0 when fresh, fading to 0
    pub alpha: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextView {
    pub pos: Vec2,
    pub text: String,
    pub color: u32,
    pub alpha: f32,
}

/// HUD readouts
#[derive(Debug, Clone, Serialize)]
pub struct Hud {
    pub score: u64,
    pub high_score: u64,
    pub level: u32,
    /// Whole seconds, rounded up
    pub timer: u32,
    pub combo: u32,
    pub sheep_caught: u32,
    pub sheep_needed: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub arena: Vec2,
    pub player: SpriteView,
    pub sheep: Vec<SpriteView>,
    pub hedges: Vec<Rect>,
    /// Unlocked poops only
    pub hazards: Vec<SpriteView>,
    pub powerups: Vec<PowerUpView>,
    pub particles: Vec<ParticleView>,
    pub texts: Vec<TextView>,
    pub hud: Hud,
    pub phase: GamePhase,
    /// Centered overlay text: round announcement or game-over message
    pub banner: Option<String>,
}

/// Capture the current frame
pub fn snapshot(state: &GameState, now_ms: u64) -> RenderSnapshot {
    let banner = match state.phase {
        GamePhase::Playing => None,
        GamePhase::Transitioning { next_level, .. } => Some(format!("ROUND {next_level}!")),
        GamePhase::GameOver { reason } => Some(reason.message().to_string()),
    };

    RenderSnapshot {
        arena: Vec2::new(state.tuning.arena_width, state.tuning.arena_height),
        player: SpriteView {
            pos: state.player.pos,
            size: WOLF_SIZE,
        },
        sheep: state
            .sheep
            .iter()
            .map(|s| SpriteView {
                pos: s.pos,
                size: SHEEP_SIZE,
            })
            .collect(),
        hedges: state.hedges.clone(),
        hazards: state
            .active_hazards()
            .map(|h| SpriteView {
                pos: h.pos,
                size: POOP_SIZE,
            })
            .collect(),
        powerups: state
            .powerups
            .iter()
            .map(|p| PowerUpView {
                kind: p.kind,
                pos: p.pos,
                color: p.kind.color(),
                active: p.active,
                remaining_ms: p.expires_at_ms.map(|t| t.saturating_sub(now_ms)),
            })
            .collect(),
        particles: state
            .particles
            .iter()
            .map(|p| ParticleView {
                pos: p.pos,
                color: p.color,
                size: p.size,
                alpha: p.life as f32 / PARTICLE_LIFE as f32,
            })
            .collect(),
        texts: state
            .score_effects
            .iter()
            .map(|e| TextView {
                pos: e.pos,
                text: e.text.clone(),
                color: e.color,
                alpha: e.alpha,
            })
            .collect(),
        hud: Hud {
            score: state.score,
            high_score: state.high_score,
            level: state.level,
            timer: state.game_timer(),
            combo: state.combo,
            sheep_caught: state.sheep_caught_this_round,
            sheep_needed: state.tuning.sheep_to_level_up,
        },
        phase: state.phase,
        banner,
    }
}
