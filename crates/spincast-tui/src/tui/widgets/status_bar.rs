// Status bar widget: spin state, spin counter, last pick, and notices.

use std::time::Instant;

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

/// Layout: [state indicator] [spin counter] | [last pick] | [notice]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, now: Instant) {
    let spinning = state.snapshot.spinning || state.is_animating(now);
    let (dot, dot_color, text) = spin_indicator(spinning);

    let mut spans = vec![
        Span::styled(format!(" {} ", dot), Style::default().fg(dot_color)),
        Span::styled(text, Style::default().fg(Color::White)),
        Span::styled(
            format!("  Spin {}", state.snapshot.spin_count),
            Style::default().fg(Color::White),
        ),
    ];

    if let Some(pick) = &state.last_pick {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            pick.label.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
        if pick.removed {
            spans.push(Span::styled(
                " (removed)",
                Style::default().fg(Color::DarkGray),
            ));
        }
    }

    if let Some(notice) = &state.notice {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(notice.clone(), Style::default().fg(Color::Cyan)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

pub fn spin_indicator(spinning: bool) -> (&'static str, Color, &'static str) {
    if spinning {
        ("●", Color::Yellow, "Spinning")
    } else {
        ("●", Color::Green, "Ready")
    }
}
