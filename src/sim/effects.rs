//! Particles and floating text
//!
//! Purely cosmetic. Lifetimes are counted in ticks, not wall-clock time.

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, Particle, ScoreEffect};
use crate::consts::PARTICLE_LIFE;

/// Vertical drift of floating text per tick
const TEXT_RISE: f32 = 2.0;

/// Spawn `count` particles at `pos`, respecting the particle budget
pub fn emit_burst(state: &mut GameState, pos: Vec2, color: u32, count: usize) {
    let room = state.max_particles.saturating_sub(state.particles.len());
    for _ in 0..count.min(room) {
        let size = 5.0 + state.rng.random::<f32>() * 5.0;
        let vel = Vec2::new(
            (state.rng.random::<f32>() - 0.5) * 10.0,
            (state.rng.random::<f32>() - 0.5) * 10.0,
        );
        state.particles.push(Particle {
            pos,
            vel,
            color,
            size,
            life: PARTICLE_LIFE,
        });
    }
}

/// Add a floating text effect
pub fn emit_text(state: &mut GameState, pos: Vec2, text: &str, color: u32, life: u32) {
    state.score_effects.push(ScoreEffect {
        pos,
        text: text.to_string(),
        color,
        life,
        initial_life: life,
        alpha: 1.0,
    });
}

/// Advance and cull particles and text effects by one tick
pub fn age_effects(state: &mut GameState) {
    state.particles.retain_mut(|p| {
        p.pos += p.vel;
        p.life = p.life.saturating_sub(1);
        p.life > 0
    });

    state.score_effects.retain_mut(|e| {
        e.pos.y -= TEXT_RISE;
        e.life = e.life.saturating_sub(1);
        e.alpha = e.life as f32 / e.initial_life.max(1) as f32;
        e.life > 0
    });
}
