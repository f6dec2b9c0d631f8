//! Axis-aligned rectangle geometry and bounce resolution
//!
//! Every pairwise test in the game (wolf vs sheep, wolf vs poop, wolf vs
//! hedge, wolf vs power-up, spawn checks) is a half-open AABB overlap.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::BOUNCE_JITTER;
use crate::normalize_heading;

/// An axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square sprite footprint at `pos`
    #[inline]
    pub fn square(pos: Vec2, size: f32) -> Self {
        Self::new(pos.x, pos.y, size, size)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Grow the rectangle by `pad` on every side
    pub fn inflate(&self, pad: f32) -> Self {
        Self::new(
            self.x - pad,
            self.y - pad,
            self.width + 2.0 * pad,
            self.height + 2.0 * pad,
        )
    }

    /// Half-open overlap test; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Overlap of two square sprites given their top-left corners and sizes
#[inline]
pub fn overlaps(a: Vec2, b: Vec2, size_a: f32, size_b: f32) -> bool {
    Rect::square(a, size_a).overlaps(&Rect::square(b, size_b))
}

/// Obstacle edge an entity was pushed out through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    /// Reflect a heading off this edge: vertical edges mirror x, horizontal mirror y
    #[inline]
    pub fn reflect(self, heading: f32) -> f32 {
        match self {
            Edge::Left | Edge::Right => normalize_heading(std::f32::consts::PI - heading),
            Edge::Top | Edge::Bottom => normalize_heading(-heading),
        }
    }
}

/// Pick the obstacle edge closest to the entity.
///
/// Depths are measured from the entity's sides to the matching obstacle sides;
/// ties resolve in declared order (left, right, top, bottom).
pub fn nearest_edge(entity: &Rect, obstacle: &Rect) -> Edge {
    let depths = [
        (Edge::Left, entity.x - obstacle.x),
        (Edge::Right, obstacle.right() - entity.right()),
        (Edge::Top, entity.y - obstacle.y),
        (Edge::Bottom, obstacle.bottom() - entity.bottom()),
    ];

    let mut best = depths[0];
    for candidate in &depths[1..] {
        if candidate.1 < best.1 {
            best = *candidate;
        }
    }
    best.0
}

/// Position that places `entity` flush against `edge` of `obstacle`
pub fn push_out(entity: &Rect, obstacle: &Rect, edge: Edge) -> Vec2 {
    match edge {
        Edge::Left => Vec2::new(obstacle.x - entity.width, entity.y),
        Edge::Right => Vec2::new(obstacle.right(), entity.y),
        Edge::Top => Vec2::new(entity.x, obstacle.y - entity.height),
        Edge::Bottom => Vec2::new(entity.x, obstacle.bottom()),
    }
}

/// Bounce an overlapping entity off an obstacle.
///
/// Returns the corrected top-left position and the new heading, which gets a
/// small random perturbation so bounces don't lock into loops.
pub fn resolve_bounce<R: Rng>(
    entity: &Rect,
    heading: f32,
    obstacle: &Rect,
    rng: &mut R,
) -> (Vec2, f32) {
    let edge = nearest_edge(entity, obstacle);
    let pos = push_out(entity, obstacle, edge);
    let jitter = (rng.random::<f32>() - 0.5) * BOUNCE_JITTER;
    (pos, normalize_heading(edge.reflect(heading) + jitter))
}

/// Bounce off the arena walls, letting the sprite hang half over the edge.
///
/// Returns the clamped position and reflected heading.
pub fn bounce_in_arena(pos: Vec2, heading: f32, size: f32, width: f32, height: f32) -> (Vec2, f32) {
    let half = size / 2.0;
    let mut pos = pos;
    let mut heading = heading;

    if pos.x < -half {
        pos.x = -half;
        heading = Edge::Left.reflect(heading);
    } else if pos.x > width - half {
        pos.x = width - half;
        heading = Edge::Right.reflect(heading);
    }

    if pos.y < -half {
        pos.y = -half;
        heading = Edge::Top.reflect(heading);
    } else if pos.y > height - half {
        pos.y = height - half;
        heading = Edge::Bottom.reflect(heading);
    }

    (pos, heading)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f32::consts::PI;

    #[test]
    fn test_overlap_half_open() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 10.0, 10.0);
        let inside = Rect::new(9.0, 9.0, 10.0, 10.0);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
    }

    #[test]
    fn test_square_overlap_sizes() {
        // 40px wolf at origin vs 30px poop just inside its right edge
        assert!(overlaps(Vec2::ZERO, Vec2::new(39.0, 0.0), 40.0, 30.0));
        assert!(!overlaps(Vec2::ZERO, Vec2::new(40.0, 0.0), 40.0, 30.0));
    }

    #[test]
    fn test_nearest_edge_left() {
        let hedge = Rect::new(100.0, 100.0, 80.0, 80.0);
        let sheep = Rect::new(70.0, 120.0, 40.0, 40.0);
        assert_eq!(nearest_edge(&sheep, &hedge), Edge::Left);
        let pos = push_out(&sheep, &hedge, Edge::Left);
        assert_eq!(pos, Vec2::new(60.0, 120.0));
    }

    #[test]
    fn test_nearest_edge_bottom() {
        let hedge = Rect::new(100.0, 100.0, 80.0, 80.0);
        let sheep = Rect::new(120.0, 170.0, 40.0, 40.0);
        assert_eq!(nearest_edge(&sheep, &hedge), Edge::Bottom);
    }

    #[test]
    fn test_nearest_edge_tie_prefers_declared_order() {
        // Entity exactly centered in a square obstacle: all four depths equal
        let hedge = Rect::new(0.0, 0.0, 80.0, 80.0);
        let sheep = Rect::new(20.0, 20.0, 40.0, 40.0);
        assert_eq!(nearest_edge(&sheep, &hedge), Edge::Left);

        // Right and bottom tie, right wins
        let sheep = Rect::new(60.0, 60.0, 40.0, 40.0);
        assert_eq!(nearest_edge(&sheep, &hedge), Edge::Right);
    }

    #[test]
    fn test_edge_reflection() {
        // Heading right bounces back left off a vertical edge
        assert!((Edge::Left.reflect(0.0) - PI).abs() < 1e-5);
        // Heading down bounces up off a horizontal edge
        let up = Edge::Bottom.reflect(PI / 2.0);
        assert!((up - 3.0 * PI / 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_resolve_bounce_pushes_out_and_jitters() {
        let mut rng = Pcg32::seed_from_u64(7);
        let hedge = Rect::new(100.0, 100.0, 80.0, 80.0);
        let sheep = Rect::new(70.0, 120.0, 40.0, 40.0);
        let (pos, heading) = resolve_bounce(&sheep, 0.0, &hedge, &mut rng);
        assert!(!Rect::square(pos, 40.0).overlaps(&hedge));
        assert!((heading - PI).abs() <= BOUNCE_JITTER / 2.0 + 1e-5);
    }

    #[test]
    fn test_bounce_in_arena() {
        let (pos, heading) = bounce_in_arena(Vec2::new(790.0, 300.0), 0.0, 40.0, 800.0, 600.0);
        assert_eq!(pos.x, 780.0);
        assert!((heading - PI).abs() < 1e-5);

        let (pos, _) = bounce_in_arena(Vec2::new(400.0, -30.0), 3.0 * PI / 2.0, 40.0, 800.0, 600.0);
        assert_eq!(pos.y, -20.0);
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            aw in 1.0f32..200.0, ah in 1.0f32..200.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            bw in 1.0f32..200.0, bh in 1.0f32..200.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_square_overlap_is_symmetric(
            ax in 0.0f32..800.0, ay in 0.0f32..600.0,
            bx in 0.0f32..800.0, by in 0.0f32..600.0,
            sa in 10.0f32..60.0, sb in 10.0f32..60.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assert_eq!(overlaps(a, b, sa, sb), overlaps(b, a, sb, sa));
        }
    }
}
