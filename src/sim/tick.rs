//! Per-frame simulation tick
//!
//! Core game loop step. Ordering matters: wolf, combo decay, power-up spawn,
//! sheep wander, power-up pickup/expiry, captures, wave refill, poops,
//! effects.

use glam::Vec2;

use super::effects::age_effects;
use super::motion::{
    advance_hazard, intent_displacement, magnet_pull, move_player, pointer_displacement,
    wander_sheep,
};
use super::powerups::{consume_shield, maybe_spawn, update_powerups};
use super::progression::{
    decay_combo, end_game, finish_transition_if_due, record_capture, spawn_next_wave,
};
use super::state::{GameOverReason, GamePhase, GameState, MoveIntent, PowerUpKind};

/// Input for a single tick, filled in by the host's input adapter
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held direction keys
    pub movement: MoveIntent,
    /// Pointer position in arena coordinates; takes over from the keys when set
    pub pointer: Option<Vec2>,
    /// Idle/demo mode - steer toward the nearest sheep
    pub autopilot: bool,
}

/// Advance the game by one frame at wall-clock time `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) {
    if finish_transition_if_due(state, now_ms) {
        return;
    }

    // Don't tick during the round announcement or after game over
    match state.phase {
        GamePhase::Transitioning { .. } | GamePhase::GameOver { .. } => return,
        GamePhase::Playing => {}
    }

    let (width, height) = (state.tuning.arena_width, state.tuning.arena_height);

    // Wolf
    let displacement = player_displacement(state, input);
    move_player(&mut state.player, displacement, &state.hedges, width, height);

    decay_combo(state, now_ms);
    maybe_spawn(state);

    for sheep in &mut state.sheep {
        wander_sheep(sheep, &state.hedges, now_ms, width, height, &mut state.rng);
    }

    update_powerups(state, now_ms);

    // Captures
    let magnet = state.has_active(PowerUpKind::Magnet);
    let (radius, pull) = (state.tuning.magnet_radius, state.tuning.magnet_pull);
    let mut sheep = std::mem::take(&mut state.sheep);
    sheep.retain_mut(|s| {
        // Round already over: leave the rest for the next wave replacement
        if state.is_transitioning() {
            return true;
        }
        if magnet {
            magnet_pull(s, state.player.pos, radius, pull);
        }
        if state.player.rect().overlaps(&s.rect()) {
            record_capture(state, s.center(), now_ms);
            return false;
        }
        true
    });
    state.sheep = sheep;

    if state.is_transitioning() {
        age_effects(state);
        return;
    }

    if state.sheep.is_empty() {
        spawn_next_wave(state, now_ms);
    }

    // Poops
    for i in 0..state.hazards.len() {
        if state.hazards[i].index > state.level {
            continue;
        }
        advance_hazard(&mut state.hazards[i], width, height);
        if state.player.rect().overlaps(&state.hazards[i].rect()) && !consume_shield(state) {
            end_game(state, GameOverReason::Hazard);
            break;
        }
    }

    age_effects(state);
}

/// Turn this tick's input into a wolf displacement
fn player_displacement(state: &GameState, input: &TickInput) -> Vec2 {
    if input.autopilot {
        let center = state.player.center();
        let nearest = state.sheep.iter().map(|s| s.center()).min_by(|a, b| {
            a.distance_squared(center)
                .partial_cmp(&b.distance_squared(center))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        return nearest
            .map(|target| pointer_displacement(&state.player, target))
            .unwrap_or(Vec2::ZERO);
    }

    match input.pointer {
        Some(target) => pointer_displacement(&state.player, target),
        None => intent_displacement(&input.movement, state.player.speed),
    }
}
