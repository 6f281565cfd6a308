// Wheel widget: the pool drawn as a circle of slices on a braille canvas.
//
// Angles are degrees clockwise from the top, where the pointer sits. Slice i
// spans [i*slice, (i+1)*slice) in wheel coordinates; on screen every angle is
// offset by the current rotation.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use spincast_core::planner::index_at_pointer;

const RADIUS: f64 = 1.0;
const LABEL_RADIUS: f64 = 0.66;
/// Canvas half-extent along the shorter axis; leaves room for the pointer.
const MARGIN: f64 = 1.2;
const MAX_LABELS: usize = 24;
const MAX_LABEL_CHARS: usize = 12;

const PALETTE: [Color; 6] = [
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Blue,
    Color::Magenta,
];

pub fn render(frame: &mut Frame, area: Rect, items: &[String], rotation: f64, spinning: bool) {
    let title = if spinning {
        format!(" Wheel ({}) spinning ", items.len())
    } else {
        format!(" Wheel ({}) ", items.len())
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if items.is_empty() {
        let paragraph = Paragraph::new("  The wheel is empty. Press e to edit the list or b for the bingo preset.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let inner = block.inner(area);
    let (x_bounds, y_bounds) = canvas_bounds(inner.width, inner.height);
    // Canvas units per terminal column, for centering labels.
    let cell_width = if inner.width > 0 {
        (x_bounds[1] - x_bounds[0]) / inner.width as f64
    } else {
        0.0
    };

    let n = items.len();
    let slice = 360.0 / n as f64;
    let under_pointer = index_at_pointer(rotation, n);
    let stride = label_stride(n);

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius: RADIUS,
                color: Color::White,
            });
            if n > 1 {
                for i in 0..n {
                    let (x, y) = polar(i as f64 * slice + rotation, RADIUS);
                    ctx.draw(&CanvasLine::new(0.0, 0.0, x, y, Color::DarkGray));
                }
            }
            ctx.layer();

            for (i, item) in items.iter().enumerate() {
                let highlighted = Some(i) == under_pointer;
                if i % stride != 0 && !highlighted {
                    continue;
                }
                let label = abbreviate(item, MAX_LABEL_CHARS);
                let center = i as f64 * slice + slice / 2.0 + rotation;
                let (x, y) = polar(center, LABEL_RADIUS);
                let x = x - cell_width * label.chars().count() as f64 / 2.0;
                let style = if highlighted {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(PALETTE[i % PALETTE.len()])
                };
                ctx.print(x, y, Span::styled(label, style));
            }

            ctx.print(
                -cell_width / 2.0,
                RADIUS + 0.1,
                Span::styled("▼", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            );
        });

    frame.render_widget(canvas, area);
}

/// Point at `radius` along the ray `angle_deg` clockwise from the top.
pub fn polar(angle_deg: f64, radius: f64) -> (f64, f64) {
    let radians = angle_deg.to_radians();
    (radius * radians.sin(), radius * radians.cos())
}

/// Canvas bounds that keep the wheel round. Terminal cells are roughly twice
/// as tall as they are wide.
pub fn canvas_bounds(width: u16, height: u16) -> ([f64; 2], [f64; 2]) {
    if width == 0 || height == 0 {
        return ([-MARGIN, MARGIN], [-MARGIN, MARGIN]);
    }
    let aspect = width as f64 / (height as f64 * 2.0);
    if aspect >= 1.0 {
        ([-MARGIN * aspect, MARGIN * aspect], [-MARGIN, MARGIN])
    } else {
        ([-MARGIN, MARGIN], [-MARGIN / aspect, MARGIN / aspect])
    }
}

/// Label every `stride`-th slice so crowded wheels stay readable.
pub fn label_stride(n: usize) -> usize {
    n.div_ceil(MAX_LABELS).max(1)
}

pub fn abbreviate(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    let mut short: String = label.chars().take(max_chars.saturating_sub(1)).collect();
    short.push('…');
    short
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn items(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn polar_points_clockwise_from_top() {
        let (x, y) = polar(0.0, 1.0);
        assert!(x.abs() < EPS && (y - 1.0).abs() < EPS);
        let (x, y) = polar(90.0, 1.0);
        assert!((x - 1.0).abs() < EPS && y.abs() < EPS);
        let (x, y) = polar(180.0, 2.0);
        assert!(x.abs() < EPS && (y + 2.0).abs() < EPS);
    }

    #[test]
    fn bounds_stay_round() {
        let (x, y) = canvas_bounds(80, 20);
        assert!((x[1] - MARGIN * 2.0).abs() < EPS);
        assert!((y[1] - MARGIN).abs() < EPS);

        let (x, y) = canvas_bounds(20, 20);
        assert!((x[1] - MARGIN).abs() < EPS);
        assert!((y[1] - MARGIN * 2.0).abs() < EPS);
    }

    #[test]
    fn bounds_for_empty_area() {
        let (x, y) = canvas_bounds(0, 10);
        assert_eq!(x, [-MARGIN, MARGIN]);
        assert_eq!(y, [-MARGIN, MARGIN]);
    }

    #[test]
    fn label_stride_thins_crowded_wheels() {
        assert_eq!(label_stride(1), 1);
        assert_eq!(label_stride(24), 1);
        assert_eq!(label_stride(25), 2);
        assert_eq!(label_stride(75), 4);
    }

    #[test]
    fn abbreviate_long_labels() {
        assert_eq!(abbreviate("Red", 12), "Red");
        assert_eq!(abbreviate("Extraordinarily long", 8), "Extraor…");
        assert_eq!(abbreviate("Ünïcödé wörds", 4).chars().count(), 4);
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(80, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let pool = items(&["Red", "Orange", "Yellow", "Green", "Blue", "Indigo", "Violet", "Pink"]);
        terminal
            .draw(|frame| render(frame, frame.area(), &pool, 1234.5, true))
            .unwrap();
    }

    #[test]
    fn render_does_not_panic_with_single_item_or_empty() {
        let backend = ratatui::backend::TestBackend::new(40, 12);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &items(&["Only"]), 0.0, false))
            .unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &[], 0.0, false))
            .unwrap();
    }

    #[test]
    fn render_does_not_panic_with_tiny_area() {
        let backend = ratatui::backend::TestBackend::new(3, 2);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let pool: Vec<String> = (1..=75).map(|n| n.to_string()).collect();
        terminal
            .draw(|frame| render(frame, frame.area(), &pool, 77.0, false))
            .unwrap();
    }

    #[test]
    fn planned_target_highlights_picked_label_under_pointer() {
        use spincast_core::planner::plan_rotation;

        let pool = items(&["A", "B", "C", "D", "E"]);
        let slice = 360.0 / pool.len() as f64;
        let backend = ratatui::backend::TestBackend::new(60, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();

        for (idx, label) in pool.iter().enumerate() {
            let target = plan_rotation(idx, slice, 123.4, 7).target;
            terminal
                .draw(|frame| render(frame, frame.area(), &pool, target, false))
                .unwrap();

            let buffer = terminal.backend().buffer();
            let area = buffer.area;
            let highlighted: Vec<(u16, u16, String)> = (0..area.height)
                .flat_map(|y| (0..area.width).map(move |x| (x, y)))
                .filter_map(|(x, y)| {
                    let cell = &buffer[(x, y)];
                    (cell.bg == Color::Yellow).then(|| (x, y, cell.symbol().to_string()))
                })
                .collect();

            assert_eq!(highlighted.len(), 1, "idx {}: {:?}", idx, highlighted);
            let (x, y, symbol) = &highlighted[0];
            assert_eq!(symbol, label, "idx {}", idx);
            // Top half, on the vertical axis through the pointer.
            assert!(*y < area.height / 2, "idx {} at row {}", idx, y);
            assert!(x.abs_diff(area.width / 2) <= 2, "idx {} at column {}", idx, x);
        }
    }

    #[test]
    fn empty_wheel_shows_hint() {
        let backend = ratatui::backend::TestBackend::new(100, 5);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &[], 0.0, false))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("The wheel is empty"));
    }
}
