// Settings panel: pool size, pick policies, and the voice in use.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::protocol::WheelSnapshot;

pub fn render(frame: &mut Frame, area: Rect, snapshot: &WheelSnapshot) {
    let lines = vec![
        Line::from(vec![
            label("Items      "),
            Span::raw(snapshot.items.len().to_string()),
            label("   Spins "),
            Span::raw(snapshot.spin_count.to_string()),
        ]),
        toggle_line("Remove [x] ", snapshot.remove_after_pick),
        toggle_line("Speak  [a] ", snapshot.auto_speak),
        Line::from(vec![label("Voice      "), Span::raw(snapshot.voice.summary())]),
        Line::from(vec![
            label("Speech     "),
            Span::raw(snapshot.speech_backend.clone()),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Settings"));
    frame.render_widget(paragraph, area);
}

fn label(text: &'static str) -> Span<'static> {
    Span::styled(text, Style::default().fg(Color::Gray))
}

/// A label followed by a colored on/off marker.
pub fn toggle_line(name: &'static str, enabled: bool) -> Line<'static> {
    let (text, color) = if enabled {
        ("on", Color::Green)
    } else {
        ("off", Color::DarkGray)
    };
    Line::from(vec![
        label(name),
        Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ])
}
