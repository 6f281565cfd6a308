// TUI: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the wheel as last reported by the
// app orchestrator. `UiUpdate` messages arrive over an mpsc channel; the TUI
// applies them to `ViewState` and re-renders at ~30 fps so spins animate
// smoothly.

pub mod animation;
pub mod input;
pub mod layout;
pub mod widgets;

use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::protocol::{UiUpdate, UserCommand, WheelSnapshot};

use animation::SpinAnimation;
use layout::{build_layout, AppLayout};

/// Rotation values closer than this are treated as the same angle.
const ROTATION_EPS: f64 = 1e-9;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// The pick shown in the status bar after a spin settles.
#[derive(Debug, Clone, PartialEq)]
pub struct LastPick {
    pub label: String,
    pub removed: bool,
}

/// TUI-local state that mirrors the application state for rendering.
pub struct ViewState {
    pub snapshot: WheelSnapshot,
    /// Present from `SpinStarted` until the snapshot moves elsewhere.
    pub animation: Option<SpinAnimation>,
    pub last_pick: Option<LastPick>,
    pub notice: Option<String>,
    /// Edit buffer while the list editor is open.
    pub editor: Option<String>,
    /// Hide the sidebar and let the wheel take the full width.
    pub focus_mode: bool,
    pub confirm_quit: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            snapshot: WheelSnapshot::default(),
            animation: None,
            last_pick: None,
            notice: None,
            editor: None,
            focus_mode: false,
            confirm_quit: false,
        }
    }
}

impl ViewState {
    /// Replace the mirrored wheel. An animation heading somewhere other than
    /// the new rotation (reset or list replacement mid-spin) is dropped.
    pub fn apply_snapshot(&mut self, snapshot: WheelSnapshot) {
        if let Some(anim) = &self.animation {
            if (anim.target_rotation - snapshot.rotation).abs() > ROTATION_EPS {
                self.animation = None;
            }
        }
        self.snapshot = snapshot;
    }

    /// Rotation to draw at `now`.
    pub fn displayed_rotation(&self, now: Instant) -> f64 {
        match &self.animation {
            Some(anim) => anim.rotation_at(now),
            None => self.snapshot.rotation,
        }
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.animation
            .as_ref()
            .is_some_and(|anim| !anim.is_finished(now))
    }

    pub fn open_editor(&mut self) {
        self.editor = Some(self.snapshot.raw_text.clone());
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => {
            state.apply_snapshot(*snapshot);
        }
        UiUpdate::SpinStarted(info) => {
            state.animation = Some(SpinAnimation::start(&info, Instant::now()));
            state.last_pick = None;
            state.notice = None;
        }
        UiUpdate::SpinSettled { label, removed } => {
            state.last_pick = Some(LastPick { label, removed });
        }
        UiUpdate::Notice(message) => {
            state.notice = Some(message);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

fn render_frame(frame: &mut Frame, state: &ViewState, now: Instant) {
    let layout = build_layout(frame.area(), state.focus_mode);

    widgets::status_bar::render(frame, layout.status_bar, state, now);
    widgets::wheel::render(
        frame,
        layout.wheel,
        &state.snapshot.items,
        state.displayed_rotation(now),
        state.is_animating(now),
    );
    if !state.focus_mode {
        widgets::recap::render(frame, layout.recap, &state.snapshot);
        widgets::settings::render(frame, layout.settings, &state.snapshot);
    }
    render_help_bar(frame, &layout, state);

    if let Some(buffer) = &state.editor {
        widgets::list_editor::render(frame, frame.area(), buffer);
    }
    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area(), state.snapshot.history_len);
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let text = help_text(state);
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

fn help_text(state: &ViewState) -> &'static str {
    if state.editor.is_some() {
        " Ctrl+S:Apply | Esc:Cancel | one item per line"
    } else {
        " Space:Spin | s:Speak | t:Test voice | e:Edit | b:Bingo | R:Reset | x:Remove | a:Auto-speak | +/-:Rate | [/]:Pitch | </>:Vol | f:Focus | q:Quit"
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // App is shutting down
                    None => break,
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Resize and mouse events: the next tick redraws.
                    }
                    Some(Err(_)) | None => break,
                }
            }

            _ = render_tick.tick() => {
                let now = Instant::now();
                terminal.draw(|frame| render_frame(frame, &view_state, now))?;
            }
        }
    }

    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
