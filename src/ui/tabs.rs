use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, Tab};
use crate::session::Phase;

const ACTIVE: Color = Color::Rgb(255, 220, 80);
const DIM: Color = Color::Rgb(120, 120, 140);

/// Marker next to a game tab: what the session is doing right now.
pub fn phase_badge(phase: Phase) -> Option<(&'static str, Color)> {
    match phase {
        Phase::Idle => None,
        Phase::Playing => Some(("▶", Color::Rgb(80, 220, 80))),
        Phase::Paused => Some(("⏸", Color::Rgb(255, 160, 60))),
        Phase::Terminated => Some(("✖", Color::Rgb(255, 90, 90))),
    }
}

fn tab_label(app: &App, tab: Tab) -> Line<'static> {
    let style = if tab == app.current_tab {
        Style::default().fg(ACTIVE).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DIM)
    };
    let mut spans = vec![Span::styled(tab.title().to_string(), style)];
    if let Some(kind) = tab.game() {
        let game = app.game(kind);
        if let Some((mark, color)) = phase_badge(game.session().phase()) {
            spans.push(Span::styled(format!("{} ", mark), Style::default().fg(color)));
        }
        if game.best() > 0 {
            spans.push(Span::styled(
                format!("★{} ", game.best()),
                Style::default().fg(Color::Rgb(200, 120, 255)),
            ));
        }
    }
    Line::from(spans)
}

pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::all().iter().map(|t| tab_label(app, *t)).collect();

    let player = match &app.player_name {
        Some(name) => format!(" 👤 {} ", name),
        None => " 👤 guest ".to_string(),
    };
    let live = Tab::all()
        .iter()
        .filter_map(|t| t.game())
        .filter(|kind| app.game(*kind).session().is_running())
        .count();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
        .border_type(BorderType::Rounded)
        .title(" 🕹 Retro Arcade ")
        .title_style(
            Style::default()
                .fg(Color::Rgb(200, 120, 255))
                .add_modifier(Modifier::BOLD),
        )
        .title(
            Line::from(vec![
                Span::styled(
                    format!(" {} live ", live),
                    Style::default().fg(if live > 0 { Color::Rgb(80, 220, 80) } else { DIM }),
                ),
                Span::styled(player, Style::default().fg(Color::Rgb(120, 200, 255))),
            ])
            .right_aligned(),
        );

    let tabs = Tabs::new(titles)
        .block(block)
        .select(app.current_tab.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(ACTIVE).add_modifier(Modifier::BOLD))
        .divider(Span::styled("┊", Style::default().fg(Color::Rgb(60, 60, 80))));

    frame.render_widget(tabs, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::games::GameKind;
    use crate::scores::LogOnlyReporter;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::Duration;

    fn tab_bar(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 3)).unwrap();
        terminal.draw(|f| render_tabs(f, app, f.area())).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_badges_follow_the_session() {
        assert_eq!(phase_badge(Phase::Idle), None);
        assert_eq!(phase_badge(Phase::Playing).map(|b| b.0), Some("▶"));
        assert_eq!(phase_badge(Phase::Paused).map(|b| b.0), Some("⏸"));
        assert_eq!(phase_badge(Phase::Terminated).map(|b| b.0), Some("✖"));
    }

    #[test]
    fn test_tab_bar_shows_running_games_and_player() {
        let mut config = Config::default();
        config.player_name = Some("Ada".to_string());
        let mut app = App::new(&config, Box::new(LogOnlyReporter));
        let idle = tab_bar(&app);
        assert!(idle.contains("Ada"));
        assert!(idle.contains("0 live"));
        assert!(!idle.contains('▶'));

        app.game_mut(GameKind::Stack).start(Duration::ZERO);
        let text = tab_bar(&app);
        assert!(text.contains("1 live"));
        assert!(text.contains('▶'));
    }
}
