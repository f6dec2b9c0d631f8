//! Session control surface
//!
//! Owns the `GameState` and the outer collaborators (high-score store, audio
//! sink). Hosts call `tick` from their frame callback and `poll_timer` from
//! a ~100ms interval; both take `&mut self`, so the two schedules never
//! touch the state concurrently.

use crate::audio::{AudioCue, AudioSink};
use crate::highscores::HighScoreStore;
use crate::settings::Settings;
use crate::sim::{self, GameEvent, GameState, RenderSnapshot, TickInput};
use crate::tuning::Tuning;

pub struct Session {
    state: GameState,
    tuning: Tuning,
    settings: Settings,
    store: Box<dyn HighScoreStore>,
    audio: Box<dyn AudioSink>,
    /// Events handled by the most recent `tick`/`poll_timer`
    recent_events: Vec<GameEvent>,
}

impl Session {
    /// Create a session and start the first run
    pub fn new(
        tuning: Tuning,
        settings: Settings,
        store: Box<dyn HighScoreStore>,
        audio: Box<dyn AudioSink>,
        seed: u64,
        now_ms: u64,
    ) -> Self {
        let state = GameState::new(seed, tuning.clone(), now_ms);
        let mut session = Self {
            state,
            tuning,
            settings,
            store,
            audio,
            recent_events: Vec::new(),
        };
        session.start(seed, now_ms);
        session
    }

    /// Fully reset to a fresh run
    pub fn start(&mut self, seed: u64, now_ms: u64) {
        let high_score = self.store.load_high_score();
        self.state = sim::start_session(seed, self.tuning.clone(), high_score, now_ms);
        self.state.max_particles = self.settings.max_particles();
        self.audio.play(AudioCue::HazardRelease);
        self.dispatch_events();
    }

    pub fn restart(&mut self, seed: u64, now_ms: u64) {
        log::info!("Restarting session");
        self.start(seed, now_ms);
    }

    /// Run one frame and return what to draw
    pub fn tick(&mut self, input: &TickInput, now_ms: u64) -> RenderSnapshot {
        sim::tick(&mut self.state, input, now_ms);
        self.dispatch_events();
        sim::snapshot(&self.state, now_ms)
    }

    /// Wall-clock timer poll
    pub fn poll_timer(&mut self, now_ms: u64) {
        sim::poll_timer(&mut self.state, now_ms);
        self.dispatch_events();
    }

    /// Swap in new settings; particle budget and volume apply immediately
    pub fn apply_settings(&mut self, settings: Settings) {
        self.state.max_particles = settings.max_particles();
        self.audio.set_volume(settings.effective_volume());
        self.settings = settings;
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn recent_events(&self) -> &[GameEvent] {
        &self.recent_events
    }

    fn dispatch_events(&mut self) {
        self.recent_events = self.state.drain_events();

        let mut best = None;
        for event in &self.recent_events {
            match event {
                GameEvent::SheepCaught { .. } => self.audio.play(AudioCue::Capture),
                GameEvent::TransitionStarted { .. } => self.audio.play(AudioCue::HazardRelease),
                GameEvent::NewHighScore(score) => best = Some(*score),
                _ => {}
            }
        }

        // One write per frame, however many captures beat the record
        if let Some(score) = best {
            self.store.save_high_score(score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::highscores::MemoryHighScore;
    use crate::sim::Sheep;
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Shared handles so tests can inspect collaborators the session owns
    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryHighScore>>);

    impl HighScoreStore for SharedStore {
        fn load_high_score(&mut self) -> u64 {
            self.0.borrow_mut().load_high_score()
        }
        fn save_high_score(&mut self, score: u64) {
            self.0.borrow_mut().save_high_score(score);
        }
    }

    #[derive(Clone, Default)]
    struct RecordingAudio(Rc<RefCell<Vec<AudioCue>>>);

    impl AudioSink for RecordingAudio {
        fn play(&mut self, cue: AudioCue) {
            self.0.borrow_mut().push(cue);
        }
    }

    fn quiet_tuning() -> Tuning {
        Tuning {
            powerup_spawn_chance: 0.0,
            ..Tuning::default()
        }
    }

    fn session(high_score: u64) -> (Session, SharedStore, RecordingAudio) {
        let store = SharedStore::default();
        store.0.borrow_mut().high_score = high_score;
        let audio = RecordingAudio::default();
        let session = Session::new(
            quiet_tuning(),
            Settings::default(),
            Box::new(store.clone()),
            Box::new(audio.clone()),
            42,
            0,
        );
        (session, store, audio)
    }

    /// Put one sheep on the wolf and clear the field
    fn bait(session: &mut Session) {
        let state = &mut session.state;
        state.hedges.clear();
        state.sheep = vec![
            Sheep {
                pos: state.player.pos,
                speed: 0.0,
                heading: 0.0,
                last_turn_ms: 0,
            },
            Sheep {
                pos: Vec2::ZERO,
                speed: 0.0,
                heading: 0.0,
                last_turn_ms: 0,
            },
        ];
        // Keep the wolf clear of the first poop's row and the parked sheep
        state.player.pos.y = state.player.pos.y.max(100.0);
        state.sheep[0].pos = state.player.pos;
    }

    #[test]
    fn test_start_loads_high_score_and_releases_hazards() {
        let (session, _store, audio) = session(9);
        assert_eq!(session.state().high_score, 9);
        assert_eq!(session.state().level, 1);
        assert_eq!(session.state().max_particles, Settings::default().max_particles());
        assert_eq!(audio.0.borrow().as_slice(), &[AudioCue::HazardRelease]);
    }

    #[test]
    fn test_capture_plays_cue_and_saves_high_score() {
        let (mut session, store, audio) = session(0);
        bait(&mut session);
        let snap = session.tick(&TickInput::default(), 10);
        assert_eq!(snap.hud.score, 1);
        assert_eq!(snap.hud.high_score, 1);
        assert_eq!(audio.0.borrow().last(), Some(&AudioCue::Capture));
        assert_eq!(store.0.borrow().high_score, 1);
        assert_eq!(store.0.borrow().saves, 1);
    }

    #[test]
    fn test_no_save_below_record() {
        let (mut session, store, _audio) = session(50);
        bait(&mut session);
        session.tick(&TickInput::default(), 10);
        assert_eq!(session.state().score, 1);
        assert_eq!(store.0.borrow().saves, 0);
    }

    #[test]
    fn test_transition_plays_hazard_release() {
        let (mut session, _store, audio) = session(0);
        session.state.sheep_caught_this_round = SHEEP_TO_LEVEL_UP - 1;
        bait(&mut session);
        session.tick(&TickInput::default(), 10);
        assert!(session.state().is_transitioning());
        let cues = audio.0.borrow();
        assert_eq!(&cues[cues.len() - 2..], &[AudioCue::Capture, AudioCue::HazardRelease]);
    }

    #[test]
    fn test_time_up_via_poll() {
        let (mut session, _store, _audio) = session(0);
        session.poll_timer(60_000);
        assert!(!session.is_game_over());
        session.poll_timer(120_000);
        assert!(session.is_game_over());
        assert!(
            session
                .recent_events()
                .contains(&GameEvent::GameOver(crate::sim::GameOverReason::TimeUp))
        );
        let snap = session.tick(&TickInput::default(), 120_016);
        assert_eq!(snap.banner.as_deref(), Some("TIME UP!!!!"));
    }

    #[test]
    fn test_restart_resets_run_but_keeps_record() {
        let (mut session, _store, _audio) = session(0);
        bait(&mut session);
        session.tick(&TickInput::default(), 10);
        session.poll_timer(500_000);
        assert!(session.is_game_over());

        session.restart(43, 600_000);
        let state = session.state();
        assert!(!state.is_game_over());
        assert_eq!(state.score, 0);
        assert_eq!(state.combo, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.game_timer(), 120);
        assert_eq!(state.high_score, 1);
        assert_eq!(state.sheep.len(), 5);
    }

    #[test]
    fn test_particles_disabled_by_settings() {
        let (mut session, _store, _audio) = session(0);
        session.apply_settings(Settings {
            particles: false,
            ..Settings::default()
        });
        bait(&mut session);
        session.tick(&TickInput::default(), 10);
        assert!(session.state().particles.is_empty());
        assert!(!session.state().score_effects.is_empty());
    }

    #[test]
    fn test_settings_volume_reaches_sink() {
        #[derive(Clone, Default)]
        struct VolumeRecorder(Rc<RefCell<Option<f32>>>);
        impl AudioSink for VolumeRecorder {
            fn play(&mut self, _cue: AudioCue) {}
            fn set_volume(&mut self, volume: f32) {
                *self.0.borrow_mut() = Some(volume);
            }
        }

        let recorder = VolumeRecorder::default();
        let mut session = Session::new(
            quiet_tuning(),
            Settings::default(),
            Box::new(MemoryHighScore::default()),
            Box::new(recorder.clone()),
            1,
            0,
        );
        session.apply_settings(Settings {
            muted: true,
            ..Settings::default()
        });
        assert_eq!(*recorder.0.borrow(), Some(0.0));
        assert!(session.settings().muted);
    }
}
