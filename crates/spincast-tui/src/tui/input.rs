// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the app
// orchestrator, or into local ViewState changes (editor buffer, focus mode,
// quit confirmation).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::ViewState;
use crate::protocol::{UserCommand, VoiceAdjustment};

/// Step applied by the voice adjustment keys.
const VOICE_STEP: f32 = 0.1;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator, `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if view_state.editor.is_some() {
        return handle_editor(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Char(' ') | KeyCode::Enter => Some(UserCommand::Spin),
        KeyCode::Char('s') => Some(UserCommand::SpeakAgain),
        KeyCode::Char('t') => Some(UserCommand::TestVoice),
        KeyCode::Char('b') => Some(UserCommand::ApplyPreset),
        KeyCode::Char('R') => Some(UserCommand::Reset),
        KeyCode::Char('x') => Some(UserCommand::ToggleRemoveAfterPick),
        KeyCode::Char('a') => Some(UserCommand::ToggleAutoSpeak),

        KeyCode::Char('+') | KeyCode::Char('=') => voice(VoiceAdjustment::Rate(VOICE_STEP)),
        KeyCode::Char('-') => voice(VoiceAdjustment::Rate(-VOICE_STEP)),
        KeyCode::Char(']') => voice(VoiceAdjustment::Pitch(VOICE_STEP)),
        KeyCode::Char('[') => voice(VoiceAdjustment::Pitch(-VOICE_STEP)),
        KeyCode::Char('>') | KeyCode::Char('.') => voice(VoiceAdjustment::Volume(VOICE_STEP)),
        KeyCode::Char('<') | KeyCode::Char(',') => voice(VoiceAdjustment::Volume(-VOICE_STEP)),

        KeyCode::Char('e') => {
            view_state.open_editor();
            None
        }
        KeyCode::Char('f') => {
            view_state.focus_mode = !view_state.focus_mode;
            None
        }
        KeyCode::Esc => {
            view_state.notice = None;
            None
        }

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

fn voice(adjustment: VoiceAdjustment) -> Option<UserCommand> {
    Some(UserCommand::AdjustVoice(adjustment))
}

/// `y`/`q` confirm, `n`/Esc cancel, everything else is blocked.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// List editor: characters append, Enter starts a new line, Backspace
/// deletes, Ctrl+S applies the buffer and Esc discards it.
fn handle_editor(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    match key_event.code {
        KeyCode::Char('s') if ctrl => view_state.editor.take().map(UserCommand::ApplyList),
        KeyCode::Esc => {
            view_state.editor = None;
            None
        }
        KeyCode::Enter => {
            if let Some(buffer) = view_state.editor.as_mut() {
                buffer.push('\n');
            }
            None
        }
        KeyCode::Backspace => {
            if let Some(buffer) = view_state.editor.as_mut() {
                buffer.pop();
            }
            None
        }
        KeyCode::Char(c) if !ctrl => {
            if let Some(buffer) = view_state.editor.as_mut() {
                buffer.push(c);
            }
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
