//! Audio cue sinks
//!
//! The game only names cues; sinks decide how (or whether) to play them.
//! Playback failures never reach the game.

/// Named audio cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// A sheep was caught
    Capture,
    /// Poops released at session start and at each round change
    HazardRelease,
}

impl AudioCue {
    pub fn name(&self) -> &'static str {
        match self {
            AudioCue::Capture => "capture",
            AudioCue::HazardRelease => "hazard-release",
        }
    }
}

/// Something that can play audio cues
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);

    /// Effective playback volume (0.0 - 1.0) after a settings change
    fn set_volume(&mut self, _volume: f32) {}
}

/// Logs cues at debug level (headless runs)
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, cue: AudioCue) {
        log::debug!("audio cue: {}", cue.name());
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSink;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioCue, AudioSink};
    use crate::settings::Settings;

    /// Procedural Web Audio player - no sample files
    pub struct WebAudioSink {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl WebAudioSink {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Bright two-note blip
        fn play_capture(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [660.0, 990.0].iter().enumerate() {
                let delay = i as f64 * 0.06;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.2, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.12).ok();
                }
            }
        }

        /// Low descending splat
        fn play_hazard_release(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                .ok();
            osc.frequency().set_value_at_time(220.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(55.0, t + 0.35)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.45).ok();
        }
    }

    impl AudioSink for WebAudioSink {
        fn play(&mut self, cue: AudioCue) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match cue {
                AudioCue::Capture => self.play_capture(ctx, vol),
                AudioCue::HazardRelease => self.play_hazard_release(ctx, vol),
            }
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }
}
