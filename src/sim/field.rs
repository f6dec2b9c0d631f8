//! Obstacle field generation, safe-spawn search and sheep waves

use glam::Vec2;
use rand::Rng;

use super::geometry::Rect;
use super::state::Sheep;
use crate::consts::*;

/// Number of hedges (and sheep per wave) for a level
pub fn field_count(level: u32) -> usize {
    (HEDGE_BASE_COUNT + 2 * level.saturating_sub(1)) as usize
}

/// Scatter hedges for a level.
///
/// Each hedge keeps a 50px margin from the arena edges. Hedges may overlap
/// each other.
pub fn generate_hedges<R: Rng>(level: u32, width: f32, height: f32, rng: &mut R) -> Vec<Rect> {
    (0..field_count(level))
        .map(|_| {
            let w = HEDGE_MIN_SIZE + rng.random::<f32>() * HEDGE_SIZE_RANGE;
            let h = HEDGE_MIN_SIZE + rng.random::<f32>() * HEDGE_SIZE_RANGE;
            let x = HEDGE_EDGE_MARGIN + rng.random::<f32>() * (width - w - 2.0 * HEDGE_EDGE_MARGIN);
            let y = HEDGE_EDGE_MARGIN + rng.random::<f32>() * (height - h - 2.0 * HEDGE_EDGE_MARGIN);
            Rect::new(x, y, w, h)
        })
        .collect()
}

/// Rejection-sample a spot for a `size`-sized sprite that keeps `padding`
/// clear of every hedge. The padding is applied on all four sides of each
/// hedge, so the clearance above and left of a hedge matches the clearance
/// below and right. Returns `None` when every attempt collides.
pub fn find_clear_spot<R: Rng>(
    hedges: &[Rect],
    size: f32,
    padding: f32,
    attempts: u32,
    width: f32,
    height: f32,
    rng: &mut R,
) -> Option<Vec2> {
    for _ in 0..attempts {
        let x = HEDGE_EDGE_MARGIN + rng.random::<f32>() * (width - 2.0 * HEDGE_EDGE_MARGIN);
        let y = HEDGE_EDGE_MARGIN + rng.random::<f32>() * (height - 2.0 * HEDGE_EDGE_MARGIN);
        let candidate = Rect::new(x, y, size, size);
        if hedges.iter().all(|h| !candidate.overlaps(&h.inflate(padding))) {
            return Some(Vec2::new(x, y));
        }
    }
    None
}

/// Wolf spawn point: a clear spot, or the arena centre if none was found
pub fn player_spawn<R: Rng>(hedges: &[Rect], width: f32, height: f32, rng: &mut R) -> Vec2 {
    find_clear_spot(
        hedges,
        WOLF_SIZE,
        PLAYER_SPAWN_PADDING,
        PLAYER_SPAWN_ATTEMPTS,
        width,
        height,
        rng,
    )
    .unwrap_or_else(|| {
        log::warn!("No clear wolf spawn found, falling back to arena center");
        Vec2::new(width / 2.0 - WOLF_SIZE / 2.0, height / 2.0 - WOLF_SIZE / 2.0)
    })
}

/// Spawn a wave of sheep entering from random arena edges
pub fn spawn_wave<R: Rng>(level: u32, width: f32, height: f32, now_ms: u64, rng: &mut R) -> Vec<Sheep> {
    (0..field_count(level))
        .map(|_| {
            let pos = match rng.random_range(0..4) {
                0 => Vec2::new(rng.random::<f32>() * width, -SHEEP_SIZE),
                1 => Vec2::new(width, rng.random::<f32>() * height),
                2 => Vec2::new(rng.random::<f32>() * width, height),
                _ => Vec2::new(-SHEEP_SIZE, rng.random::<f32>() * height),
            };
            Sheep {
                pos,
                speed: 1.0 + rng.random::<f32>(),
                heading: rng.random_range(0.0..std::f32::consts::TAU),
                last_turn_ms: now_ms,
            }
        })
        .collect()
}
