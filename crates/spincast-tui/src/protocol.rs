// Messages exchanged between the app orchestrator and the TUI.

use std::time::Duration;

use spincast_core::history::HistoryEntry;
use spincast_core::speech::VoiceSettings;

/// Commands sent from the TUI to the app orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    Spin,
    /// Re-announce the most recent pick.
    SpeakAgain,
    TestVoice,
    /// Replace the pool with items parsed from raw text.
    ApplyList(String),
    /// Replace the pool with the classic 75-ball preset.
    ApplyPreset,
    /// Restore the last applied list and clear the session.
    Reset,
    ToggleRemoveAfterPick,
    ToggleAutoSpeak,
    AdjustVoice(VoiceAdjustment),
    Quit,
}

/// A relative change to one voice parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoiceAdjustment {
    Rate(f32),
    Pitch(f32),
    Volume(f32),
}

/// What the renderer needs to animate an accepted spin.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinAnimationInfo {
    pub start_rotation: f64,
    pub target_rotation: f64,
    /// Same value the orchestrator's settle timer waits for.
    pub duration: Duration,
    pub spin_number: u64,
}

/// Full picture of the wheel for the TUI to render.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelSnapshot {
    pub items: Vec<String>,
    /// Text the list editor opens with.
    pub raw_text: String,
    pub rotation: f64,
    pub spinning: bool,
    pub spin_count: u64,
    /// Most recent picks first, bounded by the configured recap length.
    pub recap: Vec<HistoryEntry>,
    pub history_len: usize,
    pub remove_after_pick: bool,
    pub auto_speak: bool,
    pub voice: VoiceSettings,
    pub speech_backend: String,
}

impl Default for WheelSnapshot {
    fn default() -> Self {
        WheelSnapshot {
            items: Vec::new(),
            raw_text: String::new(),
            rotation: 0.0,
            spinning: false,
            spin_count: 0,
            recap: Vec::new(),
            history_len: 0,
            remove_after_pick: false,
            auto_speak: true,
            voice: VoiceSettings::default(),
            speech_backend: String::new(),
        }
    }
}

/// Updates pushed from the app orchestrator to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    Snapshot(Box<WheelSnapshot>),
    SpinStarted(SpinAnimationInfo),
    SpinSettled { label: String, removed: bool },
    /// Short message for the status bar (rejected actions and confirmations).
    Notice(String),
}
