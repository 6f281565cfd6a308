// Recap widget: the most recent picks, newest first.
//
// Each row: "#{ordinal}  {label}  {HH:MM:SS}". The newest row is highlighted.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use spincast_core::history::HistoryEntry;

use crate::protocol::WheelSnapshot;

pub fn render(frame: &mut Frame, area: Rect, snapshot: &WheelSnapshot) {
    let title = format!("Recent picks ({})", snapshot.history_len);

    if snapshot.recap.is_empty() {
        let paragraph = Paragraph::new("  No picks yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = snapshot
        .recap
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let style = if i == 0 {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format_entry(entry, style))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

fn format_entry(entry: &HistoryEntry, style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("#{:<4}", entry.ordinal),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(entry.label.clone(), style),
        Span::styled(
            format!("  {}", entry.picked_at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}
