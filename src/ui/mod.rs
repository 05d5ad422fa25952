pub mod home;
pub mod hud;
pub mod tabs;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::App;
use crate::session::GameSummary;

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),   // Content
        ])
        .split(frame.area());

    tabs::render_tabs(frame, app, chunks[0]);

    match app.current_tab.game() {
        None => home::render_home(frame, chunks[1], app),
        Some(kind) => app.game_mut(kind).render(frame, chunks[1]),
    }

    // Game-over overlay (renders on top of everything)
    if let (Some(_), Some(summary)) = (app.current_tab.game(), app.game_over) {
        let best = app.game(summary.game).best();
        render_game_over(frame, frame.area(), &summary, best);
    }
}

pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width.saturating_sub(4));
    let h = height.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

fn render_game_over(frame: &mut Frame, area: Rect, summary: &GameSummary, best: u32) {
    let overlay_area = centered(area, 44, 12);

    // Clear background
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Rgb(255, 90, 90)))
        .title(" 💀 GAME OVER ")
        .title_style(Style::default().fg(Color::Rgb(255, 90, 90)).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let label = Style::default().fg(Color::Rgb(180, 180, 200));
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  🎮 ", Style::default()),
            Span::styled(
                summary.game.display_name(),
                Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Score: ", label),
            Span::styled(
                summary.score.to_string(),
                Style::default().fg(Color::Rgb(255, 215, 0)).add_modifier(Modifier::BOLD),
            ),
            Span::styled("   Best: ", label),
            Span::styled(best.to_string(), Style::default().fg(Color::Rgb(200, 120, 255))),
        ]),
        Line::from(vec![
            Span::styled("  Time:  ", label),
            Span::styled(
                format!("{}s", summary.elapsed_secs),
                Style::default().fg(Color::Rgb(80, 220, 80)),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Enter", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
            Span::styled(" play again  ", Style::default().fg(Color::Rgb(100, 100, 130))),
            Span::styled("Esc", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
            Span::styled(" back to games", Style::default().fg(Color::Rgb(100, 100, 130))),
        ]),
    ];

    let p = Paragraph::new(lines).style(Style::default().bg(Color::Rgb(15, 15, 25)));
    frame.render_widget(p, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::games::GameKind;
    use crate::scores::LogOnlyReporter;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_every_tab_renders() {
        let mut app = App::new(&Config::default(), Box::new(LogOnlyReporter));
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();
        assert!(screen_text(&terminal).contains("Retro Arcade"));

        for kind in GameKind::all() {
            app.open(*kind);
            terminal.draw(|f| render(f, &mut app)).unwrap();
            assert!(app.game(*kind).viewport().area().width > 0);
        }
    }

    #[test]
    fn test_game_over_overlay_shows_result() {
        let mut app = App::new(&Config::default(), Box::new(LogOnlyReporter));
        app.open(GameKind::Runner);
        app.game_over = Some(GameSummary {
            game: GameKind::Runner,
            score: 130,
            elapsed_secs: 27,
        });
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("GAME OVER"));
        assert!(text.contains("130"));
        assert!(text.contains("27s"));
    }
}
