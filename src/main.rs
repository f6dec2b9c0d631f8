//! Sheep Chase entry point
//!
//! Native: headless autopilot run on a simulated clock.
//! Web: wires keyboard/pointer input, the frame loop and the timer interval
//! to a `Session`, and hands each frame's snapshot to the page's renderer.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MouseEvent};

    use sheep_chase::audio::WebAudioSink;
    use sheep_chase::consts::*;
    use sheep_chase::highscores::LocalStorageHighScore;
    use sheep_chase::sim::TickInput;
    use sheep_chase::{Session, Settings, Tuning, platform};

    // Renderer hook supplied by the page
    #[wasm_bindgen(inline_js = "
        export function present_snapshot(json) {
            if (typeof window.sheepChaseRender === 'function') {
                window.sheepChaseRender(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn present_snapshot(json: &str);
    }

    /// Element the page draws the arena into
    const ARENA_ELEMENT_ID: &str = "arena";

    struct Game {
        session: Session,
        input: TickInput,
    }

    pub fn run() {
        platform::init_logging();
        log::info!("Sheep Chase starting...");

        let Some(window) = web_sys::window() else {
            log::warn!("No window, not starting");
            return;
        };

        let settings = Settings::load();
        let audio = WebAudioSink::new(&settings);
        let seed = platform::now_ms();
        let session = Session::new(
            Tuning::default(),
            settings,
            Box::new(LocalStorageHighScore),
            Box::new(audio),
            seed,
            platform::now_ms(),
        );
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            session,
            input: TickInput::default(),
        }));

        setup_input_handlers(&window, game.clone());
        setup_timer(&window, game.clone());
        request_animation_frame(game);

        log::info!("Sheep Chase running!");
    }

    fn set_direction(input: &mut TickInput, key: &str, held: bool) -> bool {
        let flag = match key {
            "ArrowUp" | "w" | "W" => &mut input.movement.up,
            "ArrowDown" | "s" | "S" => &mut input.movement.down,
            "ArrowLeft" | "a" | "A" => &mut input.movement.left,
            "ArrowRight" | "d" | "D" => &mut input.movement.right,
            _ => return false,
        };
        *flag = held;
        // Keys take over from the pointer
        input.pointer = None;
        true
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if set_direction(&mut g.input, &key, true) {
                    return;
                }
                match key.as_str() {
                    " " | "Enter" if g.session.is_game_over() => {
                        g.session.restart(platform::now_ms(), platform::now_ms());
                    }
                    "i" | "I" => {
                        g.input.autopilot = !g.input.autopilot;
                        log::info!("Autopilot: {}", g.input.autopilot);
                    }
                    "m" | "M" => {
                        let mut settings = g.session.settings().clone();
                        settings.muted = !settings.muted;
                        settings.save();
                        g.session.apply_settings(settings);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                set_direction(&mut game.borrow_mut().input, &event.key(), false);
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer, relative to the arena element and scaled to arena units
        {
            let arena = window
                .document()
                .and_then(|d| d.get_element_by_id(ARENA_ELEMENT_ID));
            let Some(arena) = arena else {
                log::warn!("No #{} element, pointer input disabled", ARENA_ELEMENT_ID);
                return;
            };
            let target_el = arena.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = target_el.get_bounding_client_rect();
                let target = arena_point(
                    event.client_x() as f64 - rect.left(),
                    event.client_y() as f64 - rect.top(),
                    rect.width(),
                    rect.height(),
                );
                game.borrow_mut().input.pointer = Some(target);
            });
            let _ = arena
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Map a point inside the arena element's box to arena coordinates
    fn arena_point(x: f64, y: f64, box_width: f64, box_height: f64) -> glam::Vec2 {
        let sx = if box_width > 0.0 { ARENA_WIDTH as f64 / box_width } else { 1.0 };
        let sy = if box_height > 0.0 { ARENA_HEIGHT as f64 / box_height } else { 1.0 };
        glam::Vec2::new((x * sx) as f32, (y * sy) as f32)
    }

    fn setup_timer(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut()>::new(move || {
            game.borrow_mut().session.poll_timer(platform::now_ms());
        });
        let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            TIMER_POLL_INTERVAL_MS as i32,
        );
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            let input = g.input.clone();
            let snapshot = g.session.tick(&input, platform::now_ms());
            match serde_json::to_string(&snapshot) {
                Ok(json) => present_snapshot(&json),
                Err(e) => log::warn!("Failed to serialize snapshot: {}", e),
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Simulated frame length (~60Hz)
#[cfg(not(target_arch = "wasm32"))]
const FRAME_MS: u64 = 16;

/// Give up after ten simulated minutes
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u64 = 10 * 60 * 1000 / FRAME_MS;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use sheep_chase::audio::LogAudio;
    use sheep_chase::consts::TIMER_POLL_INTERVAL_MS;
    use sheep_chase::highscores::FileHighScore;
    use sheep_chase::sim::{GameEvent, TickInput};
    use sheep_chase::{Session, Settings, Tuning, platform};

    platform::init_logging();
    log::info!("Sheep Chase (native, headless) starting...");

    // Usage: sheep-chase [--quality low|medium|high] [--mute] [tuning.json] [seed]
    let mut settings = Settings::load();
    let mut settings_changed = false;
    let mut positional = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--quality" => match args.next() {
                Some(name) => settings_changed |= settings.set_quality(&name),
                None => log::warn!("--quality needs a preset name"),
            },
            "--mute" => {
                settings.muted = true;
                settings_changed = true;
            }
            _ => positional.push(arg),
        }
    }
    if settings_changed {
        settings.save();
    }

    let mut positional = positional.into_iter();
    let tuning = positional
        .next()
        .map(|path| Tuning::load(std::path::Path::new(&path)))
        .unwrap_or_default();
    let seed = positional
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(platform::now_ms);

    let mut session = Session::new(
        tuning,
        settings,
        Box::new(FileHighScore::new()),
        Box::new(LogAudio),
        seed,
        0,
    );
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let log_events = |events: &[GameEvent]| {
        for event in events {
            match event {
                GameEvent::SheepCaught { .. } | GameEvent::PowerUpSpawned(_) => {
                    log::debug!("{:?}", event)
                }
                _ => log::info!("{:?}", event),
            }
        }
    };

    let mut next_poll = TIMER_POLL_INTERVAL_MS;
    let mut frames = 0;
    for frame in 1..=MAX_FRAMES {
        let now = frame * FRAME_MS;
        while next_poll <= now {
            session.poll_timer(next_poll);
            log_events(session.recent_events());
            next_poll += TIMER_POLL_INTERVAL_MS;
        }
        session.tick(&input, now);
        log_events(session.recent_events());
        frames = frame;
        if session.is_game_over() {
            break;
        }
    }

    let state = session.state();
    log::info!(
        "Finished after {} frames: score {}, high score {}, level {}, phase {:?}",
        frames,
        state.score,
        state.high_score,
        state.level,
        state.phase
    );
}
