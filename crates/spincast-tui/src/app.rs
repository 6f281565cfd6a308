// Application state and orchestration logic.
//
// The central event loop that coordinates user commands from the TUI with
// the settle timer of the spin in progress. Owns the spin engine and the
// announcer, and pushes UI updates to the TUI render loop.

use spincast_core::config::Config;
use spincast_core::engine::{SpinEngine, SpinOutcome, SpinTicket};
use spincast_core::error::SpinError;
use spincast_core::speech::{Announcer, VoiceSettings, TEST_PHRASE};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::protocol::{SpinAnimationInfo, UiUpdate, UserCommand, VoiceAdjustment, WheelSnapshot};

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// Sent by the settle timer once the spin animation duration has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinSettled {
    pub generation: u64,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub config: Config,
    pub engine: SpinEngine,
    pub announcer: Announcer,
    pub voice: VoiceSettings,
    /// Timer for the spin in progress. Aborted whenever the pool is replaced
    /// so a superseded spin never settles.
    pub settle_task: Option<JoinHandle<()>>,
    /// Spawned timers send on a clone of this sender.
    pub settle_tx: mpsc::Sender<SpinSettled>,
}

impl AppState {
    pub fn new(
        config: Config,
        engine: SpinEngine,
        announcer: Announcer,
        settle_tx: mpsc::Sender<SpinSettled>,
    ) -> Self {
        let voice = config.speech.voice_settings();
        AppState {
            config,
            engine,
            announcer,
            voice,
            settle_task: None,
            settle_tx,
        }
    }

    /// Build the full snapshot the TUI renders from.
    pub fn build_snapshot(&self) -> WheelSnapshot {
        let settings = self.engine.settings();
        WheelSnapshot {
            items: self.engine.items().to_vec(),
            raw_text: self.engine.raw_text().to_string(),
            rotation: self.engine.rotation(),
            spinning: self.engine.is_spinning(),
            spin_count: self.engine.spin_count(),
            recap: self
                .engine
                .history()
                .recent(self.config.wheel.recap_len)
                .cloned()
                .collect(),
            history_len: self.engine.history().len(),
            remove_after_pick: settings.remove_after_pick,
            auto_speak: settings.auto_speak,
            voice: self.voice.clone(),
            speech_backend: self.announcer.backend_name().to_string(),
        }
    }

    /// Ask the engine for a spin and arm the settle timer for it.
    pub fn start_spin(&mut self) -> Result<SpinTicket, SpinError> {
        let ticket = self.engine.request_spin()?;
        self.cancel_settle_task();

        let tx = self.settle_tx.clone();
        let generation = ticket.generation;
        let duration = ticket.duration;
        self.settle_task = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let _ = tx.send(SpinSettled { generation }).await;
        }));
        Ok(ticket)
    }

    /// Settle the spin identified by `generation`. Stale settles return `None`.
    pub fn finish_spin(&mut self, generation: u64) -> Option<SpinOutcome> {
        let outcome = self.engine.complete_spin(generation)?;
        self.settle_task = None;
        Some(outcome)
    }

    pub fn cancel_settle_task(&mut self) {
        if let Some(handle) = self.settle_task.take() {
            handle.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Main application event loop.
///
/// Runs until a `Quit` command arrives or the command channel closes.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut settle_rx: mpsc::Receiver<SpinSettled>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    // Initial picture so the TUI has something to draw before any input.
    send_snapshot(state.build_snapshot(), &ui_tx).await;

    let mut settle_open = true;

    loop {
        tokio::select! {
            // --- Settle timers (only poll while the channel is open) ---
            settled = settle_rx.recv(), if settle_open => {
                match settled {
                    Some(SpinSettled { generation }) => {
                        handle_settled(&mut state, generation, &ui_tx).await;
                    }
                    None => {
                        info!("Settle channel closed");
                        settle_open = false;
                    }
                }
            }

            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    // Cleanup
    state.cancel_settle_task();
    state.announcer.cancel().await;
    info!("Application event loop exiting");
    Ok(())
}

async fn send_snapshot(snapshot: WheelSnapshot, ui_tx: &mpsc::Sender<UiUpdate>) {
    let _ = ui_tx.send(UiUpdate::Snapshot(Box::new(snapshot))).await;
}

async fn send_notice(ui_tx: &mpsc::Sender<UiUpdate>, message: impl Into<String>) {
    let _ = ui_tx.send(UiUpdate::Notice(message.into())).await;
}

async fn handle_settled(state: &mut AppState, generation: u64, ui_tx: &mpsc::Sender<UiUpdate>) {
    let Some(outcome) = state.finish_spin(generation) else {
        debug!("Ignoring settle for generation {}", generation);
        return;
    };

    if outcome.announce {
        state.announcer.announce(outcome.label.clone(), &state.voice).await;
    }

    let _ = ui_tx
        .send(UiUpdate::SpinSettled {
            label: outcome.label,
            removed: outcome.removed,
        })
        .await;
    send_snapshot(state.build_snapshot(), ui_tx).await;
}

async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::Spin => match state.start_spin() {
            Ok(ticket) => {
                let info = SpinAnimationInfo {
                    start_rotation: ticket.start_rotation,
                    target_rotation: ticket.target_rotation,
                    duration: ticket.duration,
                    spin_number: ticket.spin_number,
                };
                let _ = ui_tx.send(UiUpdate::SpinStarted(info)).await;
                send_snapshot(state.build_snapshot(), ui_tx).await;
            }
            Err(SpinError::EmptyPool) => {
                debug!("Spin rejected: {}", SpinError::EmptyPool);
                send_notice(ui_tx, "The wheel is empty. Press e to add items.").await;
            }
            Err(e) => {
                debug!("Spin rejected: {}", e);
            }
        },
        UserCommand::SpeakAgain => {
            let latest = state.engine.latest().map(|entry| entry.label.clone());
            match latest {
                Some(label) => state.announcer.announce(label, &state.voice).await,
                None => send_notice(ui_tx, "Nothing has been picked yet.").await,
            }
        }
        UserCommand::TestVoice => {
            state.announcer.announce(TEST_PHRASE, &state.voice).await;
        }
        UserCommand::ApplyList(raw) => match state.engine.apply_list(&raw) {
            Ok(count) => {
                state.cancel_settle_task();
                send_notice(ui_tx, format!("Loaded {} items.", count)).await;
                send_snapshot(state.build_snapshot(), ui_tx).await;
            }
            Err(e) => {
                warn!("List not applied: {}", e);
                send_notice(ui_tx, "The list has no items; nothing was changed.").await;
            }
        },
        UserCommand::ApplyPreset => match state.engine.apply_preset() {
            Ok(count) => {
                state.cancel_settle_task();
                send_notice(ui_tx, format!("Loaded the classic preset ({} balls).", count)).await;
                send_snapshot(state.build_snapshot(), ui_tx).await;
            }
            Err(e) => warn!("Preset not applied: {}", e),
        },
        UserCommand::Reset => {
            let count = state.engine.reset();
            state.cancel_settle_task();
            send_notice(ui_tx, format!("Reset to {} items.", count)).await;
            send_snapshot(state.build_snapshot(), ui_tx).await;
        }
        UserCommand::ToggleRemoveAfterPick => {
            let enabled = !state.engine.settings().remove_after_pick;
            state.engine.set_remove_after_pick(enabled);
            info!("Remove after pick: {}", enabled);
            send_snapshot(state.build_snapshot(), ui_tx).await;
        }
        UserCommand::ToggleAutoSpeak => {
            let enabled = !state.engine.settings().auto_speak;
            state.engine.set_auto_speak(enabled);
            info!("Auto-speak: {}", enabled);
            send_snapshot(state.build_snapshot(), ui_tx).await;
        }
        UserCommand::AdjustVoice(adjustment) => {
            match adjustment {
                VoiceAdjustment::Rate(delta) => state.voice.adjust_rate(delta),
                VoiceAdjustment::Pitch(delta) => state.voice.adjust_pitch(delta),
                VoiceAdjustment::Volume(delta) => state.voice.adjust_volume(delta),
            }
            debug!("Voice now {}", state.voice.summary());
            send_snapshot(state.build_snapshot(), ui_tx).await;
        }
        UserCommand::Quit => {
            // Handled in the main loop; should not reach here.
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
