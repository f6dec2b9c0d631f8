//! Game state and core simulation types
//!
//! One `GameState` holds everything a session mutates. It is rebuilt on every
//! start/restart; nothing carries over between sessions except the high score,
//! which is reloaded from the store.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;
use crate::palette;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Round-change announcement; simulation frozen until `ends_at_ms`
    Transitioning { ends_at_ms: u64, next_level: u32 },
    /// Run ended
    GameOver { reason: GameOverReason },
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Round timer ran out
    TimeUp,
    /// Wolf touched a poop without a shield
    Hazard,
}

impl GameOverReason {
    /// Banner text shown on the game-over overlay
    pub fn message(&self) -> &'static str {
        match self {
            GameOverReason::TimeUp => "TIME UP!!!!",
            GameOverReason::Hazard => "POOPED!!!",
        }
    }
}

/// Directional intent flags, held/released by the input adapter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// The wolf
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    /// Units per tick; doubled by each speed power-up
    pub speed: f32,
}

impl Player {
    pub fn new(pos: Vec2, speed: f32) -> Self {
        Self { pos, speed }
    }

    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, WOLF_SIZE)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(WOLF_SIZE / 2.0)
    }
}

/// A wandering sheep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sheep {
    pub pos: Vec2,
    pub speed: f32,
    /// Heading in radians (y grows downward)
    pub heading: f32,
    /// Timestamp of the last wander heading change
    pub last_turn_ms: u64,
}

impl Sheep {
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, SHEEP_SIZE)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(SHEEP_SIZE / 2.0)
    }
}

/// Per-poop motion rule. Each variant carries its own phase state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Trajectory {
    /// Sweep right along a row, then drop down the left edge
    DiagonalSweep { descending: bool },
    /// Mirror of `DiagonalSweep` that climbs instead of dropping
    MirroredSweep { ascending: bool },
    /// Ping-pong across mid-height, starting leftward from the right edge
    MidlineSweep { leftward: bool },
    /// Ping-pong along the top row in the opposite phase
    CounterSweep { rightward: bool },
    /// Constant heading with wall reflection
    FreeBounce { heading: f32 },
}

/// A poop hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    /// 1-based index; unlocked once `level >= index`
    pub index: u32,
    pub pos: Vec2,
    pub speed: f32,
    pub trajectory: Trajectory,
}

impl Hazard {
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, POOP_SIZE)
    }
}

/// Number of poop hazards in the game
pub const HAZARD_COUNT: u32 = 5;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Speed,
    Shield,
    Magnet,
}

impl PowerUpKind {
    /// Declared order, also the order weighted selection walks
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Speed, PowerUpKind::Shield, PowerUpKind::Magnet];

    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::Speed => "speed",
            PowerUpKind::Shield => "shield",
            PowerUpKind::Magnet => "magnet",
        }
    }

    pub fn color(&self) -> u32 {
        match self {
            PowerUpKind::Speed => palette::SPEED_BLUE,
            PowerUpKind::Shield => palette::SHIELD_RED,
            PowerUpKind::Magnet => palette::MAGNET_PURPLE,
        }
    }
}

/// A power-up, either lying on the field or active on the wolf
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub active: bool,
    /// Set once picked up
    pub expires_at_ms: Option<u64>,
}

impl PowerUp {
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, POWERUP_SIZE)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(POWERUP_SIZE / 2.0)
    }
}

/// A particle for visual effects (not gameplay-affecting)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub size: f32,
    /// Frames left to live
    pub life: u32,
}

/// Floating text (score popups, banners)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEffect {
    pub pos: Vec2,
    pub text: String,
    pub color: u32,
    pub life: u32,
    pub initial_life: u32,
    pub alpha: f32,
}

/// Gameplay-significant changes, drained by the session each tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SheepCaught { gain: u32, combo: u32 },
    PowerUpSpawned(PowerUpKind),
    PowerUpCollected(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    ShieldConsumed,
    WaveSpawned { count: usize },
    TransitionStarted { next_level: u32 },
    RoundStarted { level: u32 },
    NewHighScore(u64),
    GameOver(GameOverReason),
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Current round, 1..=max_rounds
    pub level: u32,
    pub score: u64,
    pub high_score: u64,
    pub combo: u32,
    pub last_capture_ms: u64,
    pub sheep_caught_this_round: u32,
    /// Remaining round time
    pub time_remaining_ms: u64,
    /// Last wall-clock timer poll
    pub last_timer_poll_ms: u64,
    pub player: Player,
    pub sheep: Vec<Sheep>,
    pub hedges: Vec<Rect>,
    /// All five poops; only the first `level` are simulated
    pub hazards: Vec<Hazard>,
    pub powerups: Vec<PowerUp>,
    pub particles: Vec<Particle>,
    pub score_effects: Vec<ScoreEffect>,
    /// Particle budget from settings
    pub max_particles: usize,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a bare state: level 1, full timer, no field generated yet.
    ///
    /// Use [`super::start_session`] to get a playable state.
    pub fn new(seed: u64, tuning: Tuning, now_ms: u64) -> Self {
        let center = Vec2::new(
            tuning.arena_width / 2.0 - WOLF_SIZE / 2.0,
            tuning.arena_height / 2.0 - WOLF_SIZE / 2.0,
        );
        let player = Player::new(center, tuning.player_base_speed);
        let time_remaining_ms = tuning.round_time_ms();

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Playing,
            level: 1,
            score: 0,
            high_score: 0,
            combo: 0,
            last_capture_ms: 0,
            sheep_caught_this_round: 0,
            time_remaining_ms,
            last_timer_poll_ms: now_ms,
            player,
            sheep: Vec::new(),
            hedges: Vec::new(),
            hazards: Vec::new(),
            powerups: Vec::new(),
            particles: Vec::new(),
            score_effects: Vec::new(),
            max_particles: MAX_PARTICLES,
            events: Vec::new(),
            next_id: 1,
        };
        let hazards = (1..=HAZARD_COUNT)
            .map(|index| super::motion::initial_hazard(index, &state.tuning, &mut state.rng))
            .collect();
        state.hazards = hazards;
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver { .. })
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, GamePhase::Transitioning { .. })
    }

    /// Timer readout in whole seconds (rounded up, like a countdown display)
    pub fn game_timer(&self) -> u32 {
        self.time_remaining_ms.div_ceil(1000) as u32
    }

    /// Poops currently in play
    pub fn active_hazards(&self) -> impl Iterator<Item = &Hazard> {
        let level = self.level;
        self.hazards.iter().filter(move |h| h.index <= level)
    }

    pub fn has_active(&self, kind: PowerUpKind) -> bool {
        self.powerups.iter().any(|p| p.active && p.kind == kind)
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn arena_center(&self) -> Vec2 {
        Vec2::new(self.tuning.arena_width / 2.0, self.tuning.arena_height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(1, Tuning::default(), 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.game_timer(), 120);
        assert_eq!(state.hazards.len(), HAZARD_COUNT as usize);
        assert_eq!(state.active_hazards().count(), 1);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_game_timer_rounds_up() {
        let mut state = GameState::new(1, Tuning::default(), 0);
        state.time_remaining_ms = 119_001;
        assert_eq!(state.game_timer(), 120);
        state.time_remaining_ms = 119_000;
        assert_eq!(state.game_timer(), 119);
        state.time_remaining_ms = 0;
        assert_eq!(state.game_timer(), 0);
    }

    #[test]
    fn test_entity_ids_increase() {
        let mut state = GameState::new(1, Tuning::default(), 0);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }
}
