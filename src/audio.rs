//! Sound effects
//!
//! Every effect is a plain oscillator tone with a short exponential decay, so
//! the simulation events map to a list of [`Tone`]s and any backend that can
//! play a tone can voice the game. On the web that is the Web Audio API.

use crate::sim::GameEvent;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
}

/// One oscillator note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Hz
    pub frequency: f32,
    pub duration_ms: f32,
    pub waveform: Waveform,
    /// Offset from the request (for arpeggios)
    pub delay_ms: f32,
}

impl Tone {
    pub fn new(frequency: f32, duration_ms: f32, waveform: Waveform) -> Self {
        Self {
            frequency,
            duration_ms,
            waveform,
            delay_ms: 0.0,
        }
    }

    pub fn delayed(mut self, delay_ms: f32) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

/// Hazard hit buzz
pub const LIFE_LOST_TONE: Tone = Tone {
    frequency: 200.0,
    duration_ms: 300.0,
    waveform: Waveform::Square,
    delay_ms: 0.0,
};

/// Tones voicing a simulation event
pub fn tones_for_event(event: &GameEvent) -> Vec<Tone> {
    match *event {
        GameEvent::ScorePoint { pitch, .. } => vec![Tone::new(pitch, 100.0, Waveform::Sine)],
        GameEvent::LifeLost { .. } => vec![LIFE_LOST_TONE],
        GameEvent::LevelUp { .. } => vec![
            Tone::new(660.0, 100.0, Waveform::Sine),
            Tone::new(880.0, 100.0, Waveform::Sine).delayed(100.0),
            Tone::new(1100.0, 200.0, Waveform::Sine).delayed(200.0),
        ],
        GameEvent::GameOver { .. } => Vec::new(),
    }
}

/// Something that can voice tones. Playback is fire-and-forget.
pub trait AudioSink {
    fn play(&mut self, tone: &Tone);

    /// Called after the user changes volume settings
    fn set_volume(&mut self, _volume: f32) {}
}

/// Drops every request (native builds, audio unavailable)
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, tone: &Tone) {
        log::trace!("tone {:.0}Hz {:.0}ms", tone.frequency, tone.duration_ms);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, Tone, Waveform};

    /// Peak gain of a tone at full volume
    const PEAK_GAIN: f32 = 0.1;
    /// Gain the envelope decays to
    const FLOOR_GAIN: f32 = 0.01;

    /// Web Audio backend. Clones share the same context.
    #[derive(Clone)]
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(volume: f32) -> Self {
            // May fail outside a secure context; audio is then simply off
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: volume.clamp(0.0, 1.0),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Create an oscillator wired through a gain node
        fn create_osc(
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
    }

    fn oscillator_type(waveform: Waveform) -> OscillatorType {
        match waveform {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Square => OscillatorType::Square,
        }
    }

    impl AudioSink for AudioManager {
        fn play(&mut self, tone: &Tone) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers start the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let Some((osc, gain)) =
                Self::create_osc(ctx, tone.frequency, oscillator_type(tone.waveform))
            else {
                return;
            };
            let t = ctx.current_time() + tone.delay_ms as f64 / 1000.0;
            let end = t + tone.duration_ms as f64 / 1000.0;

            gain.gain().set_value_at_time(PEAK_GAIN * self.volume, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(FLOOR_GAIN * self.volume, end)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(end).ok();
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }
}
