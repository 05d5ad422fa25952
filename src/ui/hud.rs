//! Chrome shared by the game screens: bordered frame, status bar, help line,
//! and helpers that flip field coordinates (y down) onto the canvas (y up).

use ratatui::prelude::*;
use ratatui::widgets::canvas::{Circle, Rectangle};
use ratatui::widgets::*;

use crate::geometry::{Point, Rect as FieldRect};
use crate::session::Phase;

pub const FIELD_BG: Color = Color::Rgb(10, 10, 20);
pub const SEPARATOR: Color = Color::Rgb(60, 60, 60);

/// Draws the rounded game frame and splits it into status, field and help rows.
pub fn game_layout(frame: &mut Frame, area: Rect, title: &str, accent: Color) -> [Rect; 3] {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .title(format!(" {} ", title))
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status bar
            Constraint::Min(6),    // Game field
            Constraint::Length(1), // Help
        ])
        .split(inner);
    [chunks[0], chunks[1], chunks[2]]
}

/// One `label value` pair for the status bar.
pub fn stat(label: &str, value: String, color: Color) -> Vec<Span<'static>> {
    vec![
        Span::styled(format!(" {} ", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(" │", Style::default().fg(SEPARATOR)),
    ]
}

pub fn render_status(frame: &mut Frame, area: Rect, stats: Vec<Vec<Span<'static>>>) {
    let spans: Vec<Span> = stats.into_iter().flatten().collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Help line that follows the session phase.
pub fn render_help(frame: &mut Frame, area: Rect, phase: Phase, controls: &str) {
    let line = match phase {
        Phase::Idle => Line::from(vec![
            Span::styled(
                " ▶ Press ENTER to start! ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(controls.to_string(), Style::default().fg(Color::DarkGray)),
        ]),
        Phase::Paused => Line::from(Span::styled(
            " ⏸ PAUSED - Press P to resume ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Phase::Terminated => Line::from(vec![
            Span::styled(
                " 💀 GAME OVER! ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "Press ENTER to restart, Esc for menu",
                Style::default().fg(Color::Gray),
            ),
        ]),
        Phase::Playing => Line::from(vec![
            Span::styled(format!(" {} ", controls), Style::default().fg(Color::DarkGray)),
            Span::styled("│ ", Style::default().fg(SEPARATOR)),
            Span::styled("P Pause │ R Restart │ Esc Menu", Style::default().fg(Color::DarkGray)),
        ]),
    };
    frame.render_widget(Paragraph::new(line), area);
}

pub fn rect_shape(rect: &FieldRect, field_height: f64, color: Color) -> Rectangle {
    Rectangle {
        x: rect.x,
        y: field_height - rect.bottom(),
        width: rect.width,
        height: rect.height,
        color,
    }
}

pub fn circle_shape(center: Point, radius: f64, field_height: f64, color: Color) -> Circle {
    Circle {
        x: center.x,
        y: field_height - center.y,
        radius,
        color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_flips_to_canvas_space() {
        let r = FieldRect::new(10.0, 0.0, 20.0, 30.0);
        let shape = rect_shape(&r, 600.0, Color::White);
        assert_eq!(shape.y, 570.0);
        assert_eq!(shape.height, 30.0);
    }

    #[test]
    fn test_circle_flips_to_canvas_space() {
        let c = circle_shape(Point::new(5.0, 100.0), 3.0, 600.0, Color::White);
        assert_eq!(c.y, 500.0);
    }
}
