//! Scoring, combo, round transitions, timer and game over
//!
//! Phase machine: `Playing -> Transitioning -> Playing (next level)` and
//! `Playing -> GameOver`. Every trigger is a no-op outside the phase it
//! expects, so repeated triggers never double-mutate.

use glam::Vec2;

use super::effects::{emit_burst, emit_text};
use super::field::{generate_hedges, player_spawn, spawn_wave};
use super::motion::initial_hazard;
use super::state::{GameEvent, GameOverReason, GamePhase, GameState};
use crate::consts::*;
use crate::palette;
use crate::tuning::Tuning;

/// Build a fresh, playable session state
pub fn start_session(seed: u64, tuning: Tuning, high_score: u64, now_ms: u64) -> GameState {
    let mut state = GameState::new(seed, tuning, now_ms);
    state.high_score = high_score;
    populate_round(&mut state, now_ms);
    log::info!(
        "Session started (seed {}, high score {}, {} hedges, {} sheep)",
        seed,
        high_score,
        state.hedges.len(),
        state.sheep.len()
    );
    state
}

/// Regenerate hedges, place the wolf and spawn the first wave for `state.level`
fn populate_round(state: &mut GameState, now_ms: u64) {
    let (w, h) = (state.tuning.arena_width, state.tuning.arena_height);
    state.hedges = generate_hedges(state.level, w, h, &mut state.rng);
    state.player.pos = player_spawn(&state.hedges, w, h, &mut state.rng);
    spawn_next_wave(state, now_ms);
    state.events.push(GameEvent::RoundStarted { level: state.level });
}

/// Replace the sheep with a fresh wave
pub fn spawn_next_wave(state: &mut GameState, now_ms: u64) {
    let (w, h) = (state.tuning.arena_width, state.tuning.arena_height);
    state.sheep = spawn_wave(state.level, w, h, now_ms, &mut state.rng);
    let count = state.sheep.len();
    log::info!("Level {}: spawned wave of {} sheep", state.level, count);
    state.events.push(GameEvent::WaveSpawned { count });
}

/// Reset the combo once the capture window has lapsed
pub fn decay_combo(state: &mut GameState, now_ms: u64) {
    if now_ms.saturating_sub(state.last_capture_ms) > state.tuning.combo_window_ms {
        state.combo = 0;
    }
}

/// Score a capture at `at` (the sheep's center)
pub fn record_capture(state: &mut GameState, at: Vec2, now_ms: u64) {
    state.combo += 1;
    state.last_capture_ms = now_ms;

    let gain = state.combo.min(state.tuning.combo_score_cap);
    state.score += u64::from(gain);
    state.sheep_caught_this_round += 1;
    state.time_remaining_ms =
        (state.time_remaining_ms + u64::from(gain) * 1000).min(state.tuning.round_time_ms());

    let color = if state.combo > 1 {
        palette::YELLOW
    } else {
        palette::WHITE
    };
    emit_burst(state, at, color, CAPTURE_PARTICLES);
    emit_text(state, at, &format!("+{gain}"), palette::YELLOW, SCORE_EFFECT_LIFE);
    state.events.push(GameEvent::SheepCaught {
        gain,
        combo: state.combo,
    });

    if state.score > state.high_score {
        state.high_score = state.score;
        state.events.push(GameEvent::NewHighScore(state.score));
    }

    if state.sheep_caught_this_round >= state.tuning.sheep_to_level_up {
        begin_transition(state, now_ms);
    }
}

/// Enter the round-change pause. Returns `false` if no transition started.
pub fn begin_transition(state: &mut GameState, now_ms: u64) -> bool {
    if state.phase != GamePhase::Playing || state.level >= state.tuning.max_rounds {
        return false;
    }

    let next_level = state.level + 1;
    state.phase = GamePhase::Transitioning {
        ends_at_ms: now_ms + state.tuning.transition_ms,
        next_level,
    };
    log::info!("Round {} cleared, starting round {}", state.level, next_level);
    state.events.push(GameEvent::TransitionStarted { next_level });
    true
}

/// Finish a transition whose deadline has passed. Returns `true` if it did.
pub fn finish_transition_if_due(state: &mut GameState, now_ms: u64) -> bool {
    let GamePhase::Transitioning {
        ends_at_ms,
        next_level,
    } = state.phase
    else {
        return false;
    };
    if now_ms < ends_at_ms {
        return false;
    }

    state.level = next_level;
    state.sheep_caught_this_round = 0;
    for i in 0..state.hazards.len() {
        let index = state.hazards[i].index;
        if index <= state.level {
            state.hazards[i] = initial_hazard(index, &state.tuning, &mut state.rng);
        }
    }
    populate_round(state, now_ms);
    state.last_timer_poll_ms = now_ms;
    state.phase = GamePhase::Playing;
    log::info!("Round {} started", state.level);
    true
}

/// Wall-clock timer poll, run on its own ~100ms cadence.
///
/// Time spent transitioning is not charged against the round timer.
pub fn poll_timer(state: &mut GameState, now_ms: u64) {
    match state.phase {
        GamePhase::GameOver { .. } => return,
        GamePhase::Transitioning { .. } => {
            state.last_timer_poll_ms = now_ms;
            return;
        }
        GamePhase::Playing => {}
    }

    let elapsed = now_ms.saturating_sub(state.last_timer_poll_ms);
    state.last_timer_poll_ms = now_ms;
    state.time_remaining_ms = state.time_remaining_ms.saturating_sub(elapsed);

    if state.time_remaining_ms == 0 {
        end_game(state, GameOverReason::TimeUp);
    }
}

/// End the run. A second call is a no-op.
pub fn end_game(state: &mut GameState, reason: GameOverReason) {
    if state.is_game_over() {
        return;
    }
    state.phase = GamePhase::GameOver { reason };
    log::info!(
        "Game over: {} (score {}, level {})",
        reason.message(),
        state.score,
        state.level
    );
    state.events.push(GameEvent::GameOver(reason));
}
