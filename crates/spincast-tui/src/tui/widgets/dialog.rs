// Modal dialog frame shared by the overlays: a cleared, centered box with an
// accent-colored border and title.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Clear};
use ratatui::Frame;

/// How much of the screen a dialog takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogSize {
    /// Fixed cell size, shrunk to fit small terminals.
    Cells { width: u16, height: u16 },
    Percent { width: u16, height: u16 },
}

impl DialogSize {
    fn constraints(self, area: Rect) -> (Constraint, Constraint) {
        match self {
            DialogSize::Cells { width, height } => (
                Constraint::Length(width.min(area.width)),
                Constraint::Length(height.min(area.height)),
            ),
            DialogSize::Percent { width, height } => {
                (Constraint::Percentage(width), Constraint::Percentage(height))
            }
        }
    }
}

/// Rectangle of `size` centered in `area`.
pub fn centered_rect(size: DialogSize, area: Rect) -> Rect {
    let (width, height) = size.constraints(area);
    let vertical = Layout::vertical([height]).flex(Flex::Center).split(area);
    Layout::horizontal([width])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}

/// Clear the dialog's area and return it with its bordered block.
pub fn open(
    frame: &mut Frame,
    area: Rect,
    size: DialogSize,
    title: String,
    accent: Color,
) -> (Rect, Block<'static>) {
    let dialog_area = centered_rect(size, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(Span::styled(
            title,
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ));
    (dialog_area, block)
}
