// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +-------------------------+------------------------+
// | Wheel (65%)              | Sidebar (35%)          |
// |                          | +- Recap (60%) -------+|
// |                          | +- Settings (40%) ----+|
// +-------------------------+------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+
//
// Focus mode drops the sidebar and gives the wheel the whole middle row.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: spin state, spin counter, last pick, notices.
    pub status_bar: Rect,
    pub wheel: Rect,
    /// Right sidebar top: most recent picks. Empty in focus mode.
    pub recap: Rect,
    /// Right sidebar bottom: policies and voice. Empty in focus mode.
    pub settings: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect, focus_mode: bool) -> AppLayout {
    // Vertical: status(1) | middle(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(8),    // middle section (wheel + sidebar)
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let status_bar = vertical[0];
    let middle = vertical[1];
    let help_bar = vertical[2];

    if focus_mode {
        return AppLayout {
            status_bar,
            wheel: middle,
            recap: Rect::default(),
            settings: Rect::default(),
            help_bar,
        };
    }

    // Horizontal: wheel (65%) | sidebar (35%)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(middle);

    let wheel = horizontal[0];
    let sidebar = horizontal[1];

    // Sidebar vertical: recap (60%) | settings (40%)
    let sidebar_sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(sidebar);

    AppLayout {
        status_bar,
        wheel,
        recap: sidebar_sections[0],
        settings: sidebar_sections[1],
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
