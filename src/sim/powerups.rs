//! Power-up spawning, pickup, expiry and shield consumption

use rand::Rng;

use super::effects::{emit_burst, emit_text};
use super::field::find_clear_spot;
use super::state::{GameEvent, GameState, PowerUp, PowerUpKind};
use crate::consts::*;
use crate::tuning::PowerUpTable;

/// Weighted pick in declared order: draw `U(0, total)` and subtract weights
/// until the remainder drops to zero or below.
pub fn choose_kind<R: Rng>(table: &PowerUpTable, rng: &mut R) -> PowerUpKind {
    let mut roll = rng.random::<f64>() * table.total_weight();
    for kind in PowerUpKind::ALL {
        roll -= table.get(kind).weight;
        if roll <= 0.0 {
            return kind;
        }
    }
    // Float rounding can leave a sliver of remainder
    PowerUpKind::ALL[PowerUpKind::ALL.len() - 1]
}

/// Roll the per-tick spawn chance and drop a power-up on a clear spot
pub fn maybe_spawn(state: &mut GameState) {
    if !state.rng.random_bool(state.tuning.powerup_spawn_chance.clamp(0.0, 1.0)) {
        return;
    }

    let Some(pos) = find_clear_spot(
        &state.hedges,
        POWERUP_SIZE,
        POWERUP_SIZE,
        POWERUP_SPAWN_ATTEMPTS,
        state.tuning.arena_width,
        state.tuning.arena_height,
        &mut state.rng,
    ) else {
        log::debug!("Power-up spawn skipped: no clear spot");
        return;
    };

    let kind = choose_kind(&state.tuning.powerups, &mut state.rng);
    let id = state.next_entity_id();
    state.powerups.push(PowerUp {
        id,
        kind,
        pos,
        active: false,
        expires_at_ms: None,
    });
    log::debug!("Spawned {} power-up #{} at {:?}", kind.label(), id, pos);
    state.events.push(GameEvent::PowerUpSpawned(kind));
}

/// Expire active power-ups and pick up any the wolf is touching
pub fn update_powerups(state: &mut GameState, now_ms: u64) {
    let player_rect = state.player.rect();
    let mut powerups = std::mem::take(&mut state.powerups);

    powerups.retain_mut(|p| {
        if p.active {
            let expired = p.expires_at_ms.is_some_and(|t| now_ms > t);
            if expired {
                deactivate(state, p.kind);
                log::debug!("{} power-up #{} expired", p.kind.label(), p.id);
                state.events.push(GameEvent::PowerUpExpired(p.kind));
            }
            return !expired;
        }

        if player_rect.overlaps(&p.rect()) {
            let duration = state.tuning.powerups.get(p.kind).duration_ms;
            p.active = true;
            p.expires_at_ms = Some(now_ms + duration);
            activate(state, p);
        }
        true
    });

    state.powerups = powerups;
}

fn activate(state: &mut GameState, powerup: &PowerUp) {
    let kind = powerup.kind;
    // Shield and magnet are checked where they apply
    if kind == PowerUpKind::Speed {
        state.player.speed *= 2.0;
    }

    let center = powerup.center();
    emit_burst(state, center, kind.color(), PICKUP_PARTICLES);
    emit_text(state, center, kind.label(), kind.color(), SCORE_EFFECT_LIFE);
    let banner = state.arena_center();
    emit_text(
        state,
        banner,
        &format!("{} activated!", kind.label()),
        kind.color(),
        BANNER_EFFECT_LIFE,
    );

    log::debug!("Picked up {} power-up #{}", kind.label(), powerup.id);
    state.events.push(GameEvent::PowerUpCollected(kind));
}

fn deactivate(state: &mut GameState, kind: PowerUpKind) {
    if kind == PowerUpKind::Speed {
        state.player.speed = state.tuning.player_base_speed;
    }
}

/// Spend one active shield to absorb a poop hit.
///
/// Returns `false` if no shield was active.
pub fn consume_shield(state: &mut GameState) -> bool {
    let Some(idx) = state
        .powerups
        .iter()
        .position(|p| p.active && p.kind == PowerUpKind::Shield)
    else {
        return false;
    };

    let shield = state.powerups.remove(idx);
    let center = state.player.center();
    emit_burst(state, center, PowerUpKind::Shield.color(), SHIELD_PARTICLES);
    let banner = state.arena_center();
    emit_text(
        state,
        banner,
        "Shield Protected!",
        PowerUpKind::Shield.color(),
        BANNER_EFFECT_LIFE,
    );

    log::debug!("Shield #{} absorbed a hit", shield.id);
    state.events.push(GameEvent::ShieldConsumed);
    true
}
