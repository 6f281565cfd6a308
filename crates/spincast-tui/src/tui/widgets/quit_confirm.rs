// Leave-the-wheel prompt, drawn over everything while
// `ViewState::confirm_quit` is set. Nothing is persisted, so the prompt says
// how many picks the session would lose.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::dialog::{self, DialogSize};

const SIZE: DialogSize = DialogSize::Cells {
    width: 38,
    height: 5,
};

pub fn render(frame: &mut Frame, area: Rect, history_len: usize) {
    let (dialog_area, block) = dialog::open(
        frame,
        area,
        SIZE,
        " Leave the wheel? ".to_string(),
        Color::Yellow,
    );

    let paragraph = Paragraph::new(prompt(history_len))
        .block(block)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

fn prompt(history_len: usize) -> Line<'static> {
    let lost = match history_len {
        0 => "  Quit now?".to_string(),
        1 => "  1 pick will be lost.".to_string(),
        n => format!("  {} picks will be lost.", n),
    };
    Line::from(vec![
        Span::raw(lost),
        Span::raw(" ("),
        Span::styled("y", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw("/"),
        Span::styled("n", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::raw(")"),
    ])
}
