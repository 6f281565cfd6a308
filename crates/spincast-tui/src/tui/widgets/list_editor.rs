// List editor overlay: a modal text box holding the raw list, one item per
// line. Blank lines are dropped when the list is applied.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use spincast_core::pool::parse_list;

use super::dialog::{self, DialogSize};

const SIZE: DialogSize = DialogSize::Percent {
    width: 60,
    height: 70,
};

pub fn render(frame: &mut Frame, area: Rect, buffer: &str) {
    let title = format!(" Edit list ({} items) ", parse_list(buffer).len());
    let (dialog_area, block) = dialog::open(frame, area, SIZE, title, Color::Cyan);
    let block = block.title_bottom(" Ctrl+S apply | Esc cancel ");

    let lines = editor_lines(buffer);
    // Keep the cursor line in view.
    let visible = dialog_area.height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll, 0))
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

/// One rendered line per buffer line, with a block cursor after the last.
pub fn editor_lines(buffer: &str) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = buffer
        .split('\n')
        .map(|line| Line::from(vec![Span::raw(line.to_string())]))
        .collect();
    if let Some(last) = lines.last_mut() {
        last.spans
            .push(Span::styled(" ", Style::default().bg(Color::White)));
    }
    lines
}
