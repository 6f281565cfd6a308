// TUI widget modules, one per screen zone or overlay.

pub mod dialog;
pub mod list_editor;
pub mod quit_confirm;
pub mod recap;
pub mod settings;
pub mod status_bar;
pub mod wheel;
