//! Entity motion models
//!
//! - Sheep: random-walk wander with wall and hedge bounces
//! - Poops: five fixed trajectories, one dispatch
//! - Wolf: intent or pointer driven, clamped, rolled back off hedges

use glam::Vec2;
use rand::Rng;

use super::geometry::{Rect, bounce_in_arena, resolve_bounce};
use super::state::{Hazard, MoveIntent, Player, Sheep, Trajectory};
use crate::consts::*;
use crate::heading_to_vec;
use crate::tuning::Tuning;

/// Build poop `index` (1-based) at its starting position and phase
pub fn initial_hazard<R: Rng>(index: u32, tuning: &Tuning, rng: &mut R) -> Hazard {
    let w = tuning.arena_width;
    let h = tuning.arena_height;
    let (pos, trajectory) = match index {
        1 => (Vec2::ZERO, Trajectory::DiagonalSweep { descending: false }),
        2 => (Vec2::new(0.0, h), Trajectory::MirroredSweep { ascending: true }),
        3 => (Vec2::new(w, h / 2.0), Trajectory::MidlineSweep { leftward: true }),
        4 => (Vec2::new(w / 2.0, 0.0), Trajectory::CounterSweep { rightward: true }),
        _ => (
            Vec2::new(w / 2.0, h / 2.0),
            Trajectory::FreeBounce {
                heading: rng.random_range(0.0..std::f32::consts::TAU),
            },
        ),
    };
    Hazard {
        index,
        pos,
        // Later poops are faster: 3, 4, 5, 6, 7
        speed: (index + 2) as f32,
        trajectory,
    }
}

/// Advance one poop along its trajectory
pub fn advance_hazard(hazard: &mut Hazard, width: f32, height: f32) {
    let speed = hazard.speed;
    let pos = &mut hazard.pos;

    match &mut hazard.trajectory {
        Trajectory::DiagonalSweep { descending } => {
            if *descending {
                pos.y += speed;
                if pos.y > height {
                    pos.y = 0.0;
                    *descending = false;
                }
            } else {
                pos.x += speed;
                if pos.x > width {
                    pos.x = 0.0;
                    *descending = true;
                }
            }
        }
        Trajectory::MirroredSweep { ascending } => {
            if *ascending {
                pos.y -= speed;
                if pos.y < 0.0 {
                    // Bottom row, fully on screen
                    pos.y = height - POOP_SIZE;
                    *ascending = false;
                }
            } else {
                pos.x += speed;
                if pos.x > width {
                    pos.x = 0.0;
                    *ascending = true;
                }
            }
        }
        Trajectory::MidlineSweep { leftward } => {
            if *leftward {
                pos.x -= speed;
                if pos.x < 0.0 {
                    *leftward = false;
                }
            } else {
                pos.x += speed;
                if pos.x > width {
                    pos.x = width;
                    *leftward = true;
                }
            }
        }
        Trajectory::CounterSweep { rightward } => {
            if *rightward {
                pos.x += speed;
                if pos.x > width {
                    *rightward = false;
                }
            } else {
                pos.x -= speed;
                if pos.x < 0.0 {
                    *rightward = true;
                }
            }
        }
        Trajectory::FreeBounce { heading } => {
            *pos += heading_to_vec(*heading) * speed;
            let (bounced, new_heading) = bounce_in_arena(*pos, *heading, POOP_SIZE, width, height);
            *pos = bounced;
            *heading = new_heading;
        }
    }
}

/// One wander step for a sheep: maybe turn, move, bounce off walls and hedges
pub fn wander_sheep<R: Rng>(
    sheep: &mut Sheep,
    hedges: &[Rect],
    now_ms: u64,
    width: f32,
    height: f32,
    rng: &mut R,
) {
    let hold_ms = WANDER_MIN_MS + rng.random::<f32>() * WANDER_JITTER_MS;
    if now_ms.saturating_sub(sheep.last_turn_ms) as f32 > hold_ms {
        sheep.heading = rng.random_range(0.0..std::f32::consts::TAU);
        sheep.last_turn_ms = now_ms;
    }

    sheep.pos += heading_to_vec(sheep.heading) * sheep.speed;

    let (pos, heading) = bounce_in_arena(sheep.pos, sheep.heading, SHEEP_SIZE, width, height);
    sheep.pos = pos;
    sheep.heading = heading;

    for hedge in hedges {
        let rect = sheep.rect();
        if rect.overlaps(hedge) {
            let (pos, heading) = resolve_bounce(&rect, sheep.heading, hedge, rng);
            sheep.pos = pos;
            sheep.heading = heading;
        }
    }
}

/// Pull a sheep toward the wolf if it is within magnet range.
///
/// Only the position changes; the wander heading is left alone so the sheep
/// resumes its walk once out of range.
pub fn magnet_pull(sheep: &mut Sheep, player_pos: Vec2, radius: f32, pull: f32) {
    let delta = player_pos - sheep.pos;
    let dist = delta.length();
    if dist < radius && dist > f32::EPSILON {
        sheep.pos += delta / dist * sheep.speed * pull;
    }
}

/// Displacement from held direction keys. Diagonals are not normalized.
pub fn intent_displacement(intent: &MoveIntent, speed: f32) -> Vec2 {
    let mut d = Vec2::ZERO;
    if intent.up {
        d.y -= speed;
    }
    if intent.down {
        d.y += speed;
    }
    if intent.left {
        d.x -= speed;
    }
    if intent.right {
        d.x += speed;
    }
    d
}

/// Displacement that eases the wolf's center toward a pointer target
pub fn pointer_displacement(player: &Player, target: Vec2) -> Vec2 {
    let delta = target - player.center();
    if delta.length() > POINTER_DEAD_ZONE {
        delta * POINTER_FOLLOW_FACTOR
    } else {
        Vec2::ZERO
    }
}

/// Apply a displacement, clamp into the arena, and roll back if it lands on a hedge.
///
/// Returns `true` if the move was blocked.
pub fn move_player(
    player: &mut Player,
    displacement: Vec2,
    hedges: &[Rect],
    width: f32,
    height: f32,
) -> bool {
    let prev = player.pos;
    let next = (prev + displacement).clamp(
        Vec2::ZERO,
        Vec2::new(width - WOLF_SIZE, height - WOLF_SIZE),
    );
    player.pos = next;

    let blocked = hedges.iter().any(|h| player.rect().overlaps(h));
    if blocked {
        player.pos = prev;
    }
    blocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f32::consts::PI;

    fn tuning() -> Tuning {
        Tuning::default()
    }

    #[test]
    fn test_initial_hazards() {
        let mut rng = Pcg32::seed_from_u64(1);
        let h1 = initial_hazard(1, &tuning(), &mut rng);
        let h3 = initial_hazard(3, &tuning(), &mut rng);
        let h5 = initial_hazard(5, &tuning(), &mut rng);
        assert_eq!(h1.pos, Vec2::ZERO);
        assert_eq!(h1.speed, 3.0);
        assert_eq!(h3.pos, Vec2::new(800.0, 300.0));
        assert_eq!(h5.speed, 7.0);
        assert!(matches!(h5.trajectory, Trajectory::FreeBounce { .. }));
    }

    #[test]
    fn test_diagonal_sweep_wraps_and_drops() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut h = initial_hazard(1, &tuning(), &mut rng);
        h.pos.x = 799.0;
        advance_hazard(&mut h, 800.0, 600.0);
        assert_eq!(h.pos.x, 0.0);
        assert_eq!(h.trajectory, Trajectory::DiagonalSweep { descending: true });

        advance_hazard(&mut h, 800.0, 600.0);
        assert_eq!(h.pos, Vec2::new(0.0, 3.0));

        h.pos.y = 599.0;
        advance_hazard(&mut h, 800.0, 600.0);
        assert_eq!(h.pos.y, 0.0);
        assert_eq!(h.trajectory, Trajectory::DiagonalSweep { descending: false });
    }

    #[test]
    fn test_mirrored_sweep_climbs() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut h = initial_hazard(2, &tuning(), &mut rng);
        advance_hazard(&mut h, 800.0, 600.0);
        assert_eq!(h.pos, Vec2::new(0.0, 596.0));

        h.pos.y = 2.0;
        advance_hazard(&mut h, 800.0, 600.0);
        assert_eq!(h.pos.y, 570.0);
        assert_eq!(h.trajectory, Trajectory::MirroredSweep { ascending: false });
        advance_hazard(&mut h, 800.0, 600.0);
        assert_eq!(h.pos.x, 4.0);
    }

    #[test]
    fn test_mirrored_sweep_row_stays_in_arena() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut h = initial_hazard(2, &tuning(), &mut rng);
        let arena = Rect::new(0.0, 0.0, 800.0, 600.0);
        // Wolf parked against the bottom edge
        let wolf = Rect::new(400.0, 560.0, WOLF_SIZE, WOLF_SIZE);
        let mut rows = 0;
        let mut hits = 0;
        for _ in 0..5_000 {
            advance_hazard(&mut h, 800.0, 600.0);
            if h.trajectory == (Trajectory::MirroredSweep { ascending: false }) {
                rows += 1;
                assert!(h.rect().overlaps(&arena), "off-screen row at {:?}", h.pos);
                if h.rect().overlaps(&wolf) {
                    hits += 1;
                }
            }
        }
        assert!(rows > 0);
        assert!(hits > 0);
    }

    #[test]
    fn test_midline_sweep_bounces() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut h = initial_hazard(3, &tuning(), &mut rng);
        advance_hazard(&mut h, 800.0, 600.0);
        assert_eq!(h.pos.x, 795.0);

        h.pos.x = 2.0;
        advance_hazard(&mut h, 800.0, 600.0);
        assert_eq!(h.trajectory, Trajectory::MidlineSweep { leftward: false });

        h.pos.x = 798.0;
        advance_hazard(&mut h, 800.0, 600.0);
        assert_eq!(h.pos.x, 800.0);
        assert_eq!(h.trajectory, Trajectory::MidlineSweep { leftward: true });
        assert_eq!(h.pos.y, 300.0);
    }

    #[test]
    fn test_counter_sweep_bounces() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut h = initial_hazard(4, &tuning(), &mut rng);
        advance_hazard(&mut h, 800.0, 600.0);
        assert_eq!(h.pos.x, 406.0);

        h.pos.x = 797.0;
        advance_hazard(&mut h, 800.0, 600.0);
        assert_eq!(h.trajectory, Trajectory::CounterSweep { rightward: false });
        advance_hazard(&mut h, 800.0, 600.0);
        assert_eq!(h.pos.x, 797.0);
    }

    #[test]
    fn test_free_bounce_reflects() {
        let mut h = Hazard {
            index: 5,
            pos: Vec2::new(780.0, 300.0),
            speed: 7.0,
            trajectory: Trajectory::FreeBounce { heading: 0.0 },
        };
        advance_hazard(&mut h, 800.0, 600.0);
        assert_eq!(h.pos.x, 785.0);
        let Trajectory::FreeBounce { heading } = h.trajectory else {
            panic!("trajectory changed kind");
        };
        assert!((heading - PI).abs() < 1e-5);
    }

    #[test]
    fn test_sheep_keeps_heading_inside_hold_window() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut sheep = Sheep {
            pos: Vec2::new(400.0, 300.0),
            speed: 1.5,
            heading: 0.0,
            last_turn_ms: 1000,
        };
        wander_sheep(&mut sheep, &[], 1500, 800.0, 600.0, &mut rng);
        assert_eq!(sheep.heading, 0.0);
        assert!((sheep.pos.x - 401.5).abs() < 1e-4);
        assert_eq!(sheep.last_turn_ms, 1000);
    }

    #[test]
    fn test_sheep_turns_after_hold_window() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut sheep = Sheep {
            pos: Vec2::new(400.0, 300.0),
            speed: 1.5,
            heading: 0.0,
            last_turn_ms: 0,
        };
        wander_sheep(&mut sheep, &[], 3001, 800.0, 600.0, &mut rng);
        assert_eq!(sheep.last_turn_ms, 3001);
    }

    #[test]
    fn test_sheep_bounces_off_hedge() {
        let mut rng = Pcg32::seed_from_u64(3);
        let hedge = Rect::new(420.0, 280.0, 80.0, 80.0);
        let mut sheep = Sheep {
            pos: Vec2::new(379.5, 300.0),
            speed: 1.0,
            heading: 0.0,
            last_turn_ms: 0,
        };
        wander_sheep(&mut sheep, &[hedge], 10, 800.0, 600.0, &mut rng);
        assert!(!sheep.rect().overlaps(&hedge));
        assert_eq!(sheep.pos.x, 380.0);
        // Now heading roughly left
        assert!(heading_to_vec(sheep.heading).x < 0.0);
    }

    #[test]
    fn test_magnet_pull_leaves_heading() {
        let mut sheep = Sheep {
            pos: Vec2::new(100.0, 0.0),
            speed: 2.0,
            heading: 1.0,
            last_turn_ms: 0,
        };
        magnet_pull(&mut sheep, Vec2::ZERO, 150.0, 1.5);
        assert!((sheep.pos.x - 97.0).abs() < 1e-4);
        assert_eq!(sheep.heading, 1.0);

        let mut far = Sheep {
            pos: Vec2::new(200.0, 0.0),
            ..sheep.clone()
        };
        magnet_pull(&mut far, Vec2::ZERO, 150.0, 1.5);
        assert_eq!(far.pos.x, 200.0);
    }

    #[test]
    fn test_intent_diagonal_not_normalized() {
        let intent = MoveIntent {
            up: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(intent_displacement(&intent, 5.0), Vec2::new(5.0, -5.0));
    }

    #[test]
    fn test_pointer_dead_zone() {
        let player = Player::new(Vec2::new(100.0, 100.0), 5.0);
        assert_eq!(pointer_displacement(&player, Vec2::new(122.0, 121.0)), Vec2::ZERO);
        let d = pointer_displacement(&player, Vec2::new(220.0, 120.0));
        assert!((d.x - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_move_player_clamps() {
        let mut player = Player::new(Vec2::new(2.0, 558.0), 5.0);
        move_player(&mut player, Vec2::new(-5.0, 5.0), &[], 800.0, 600.0);
        assert_eq!(player.pos, Vec2::new(0.0, 560.0));
    }

    #[test]
    fn test_move_player_rolls_back_on_hedge() {
        let hedge = Rect::new(143.0, 100.0, 50.0, 50.0);
        let mut player = Player::new(Vec2::new(100.0, 100.0), 5.0);
        let blocked = move_player(&mut player, Vec2::new(5.0, 0.0), &[hedge], 800.0, 600.0);
        assert!(blocked);
        assert_eq!(player.pos, Vec2::new(100.0, 100.0));
    }

    fn arb_intent() -> impl Strategy<Value = MoveIntent> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(up, down, left, right)| MoveIntent {
                up,
                down,
                left,
                right,
            },
        )
    }

    proptest! {
        #[test]
        fn prop_player_never_rests_on_hedge(
            hedges in prop::collection::vec(
                (50.0f32..650.0, 50.0f32..450.0, 40.0f32..100.0, 40.0f32..100.0),
                1..8,
            ),
            intents in prop::collection::vec(arb_intent(), 1..120),
            speed in prop_oneof![Just(5.0f32), Just(10.0f32), Just(20.0f32)],
        ) {
            let hedges: Vec<Rect> = hedges
                .into_iter()
                .map(|(x, y, w, h)| Rect::new(x, y, w, h))
                .collect();
            // Top-left corner is clear: hedges start at 50 and the wolf is 40 wide
            let mut player = Player::new(Vec2::ZERO, speed);
            for intent in &intents {
                let d = intent_displacement(intent, player.speed);
                move_player(&mut player, d, &hedges, 800.0, 600.0);
                for hedge in &hedges {
                    prop_assert!(!player.rect().overlaps(hedge));
                }
            }
        }
    }
}
