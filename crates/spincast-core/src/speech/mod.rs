// Speech capability: the seam between the engine and a host synthesizer.
//
// The engine never talks to a synthesizer directly. Callers hand labels to
// an `Announcer`, which owns at most one in-flight utterance and runs it on
// a `SpeechBackend`.

pub mod announcer;
pub mod command;

use async_trait::async_trait;
use tracing::debug;

use crate::error::SpeechError;

pub use announcer::Announcer;
pub use command::CommandSpeaker;

/// Sentence spoken by "test voice".
pub const TEST_PHRASE: &str = "This is how the picks will sound.";

// ---------------------------------------------------------------------------
// VoiceSettings
// ---------------------------------------------------------------------------

/// Voice parameters, as multipliers of the synthesizer's defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSettings {
    /// Backend-specific voice identifier; `None` uses the system default.
    pub voice: Option<String>,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        VoiceSettings {
            voice: None,
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

impl VoiceSettings {
    pub const RATE_MIN: f32 = 0.1;
    pub const RATE_MAX: f32 = 10.0;
    pub const PITCH_MIN: f32 = 0.0;
    pub const PITCH_MAX: f32 = 2.0;
    pub const VOLUME_MIN: f32 = 0.0;
    pub const VOLUME_MAX: f32 = 1.0;

    pub fn adjust_rate(&mut self, delta: f32) {
        self.rate = step(self.rate, delta, Self::RATE_MIN, Self::RATE_MAX);
    }

    pub fn adjust_pitch(&mut self, delta: f32) {
        self.pitch = step(self.pitch, delta, Self::PITCH_MIN, Self::PITCH_MAX);
    }

    pub fn adjust_volume(&mut self, delta: f32) {
        self.volume = step(self.volume, delta, Self::VOLUME_MIN, Self::VOLUME_MAX);
    }

    /// Short human-readable form, e.g. `default voice | rate 1.0 | pitch 1.0 | vol 100%`.
    pub fn summary(&self) -> String {
        format!(
            "{} | rate {:.1} | pitch {:.1} | vol {:.0}%",
            self.voice.as_deref().unwrap_or("default voice"),
            self.rate,
            self.pitch,
            self.volume * 100.0
        )
    }
}

/// Add `delta`, clamp, and round to one decimal so repeated steps don't drift.
fn step(value: f32, delta: f32, min: f32, max: f32) -> f32 {
    ((value + delta).clamp(min, max) * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------------

/// Something that can turn text into audible speech.
///
/// `speak` resolves when the utterance has finished. Dropping the returned
/// future must stop the utterance; the announcer relies on this to cancel.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    async fn speak(&self, text: &str, voice: &VoiceSettings) -> Result<(), SpeechError>;

    fn name(&self) -> &str;
}

/// Backend used when speech is disabled or no synthesizer is installed.
#[derive(Debug, Clone, Default)]
pub struct SilentSpeaker;

#[async_trait]
impl SpeechBackend for SilentSpeaker {
    async fn speak(&self, text: &str, _voice: &VoiceSettings) -> Result<(), SpeechError> {
        debug!("Speech disabled, not speaking: {}", text);
        Ok(())
    }

    fn name(&self) -> &str {
        "silent"
    }
}
