use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::App;
use crate::games::GameKind;
use crate::scores::ScoreBoard;

const BANNER: [&str; 3] = [
    "╦═╗╔═╗╔╦╗╦═╗╔═╗  ╔═╗╦═╗╔═╗╔═╗╔╦╗╔═╗",
    "╠╦╝║╣  ║ ╠╦╝║ ║  ╠═╣╠╦╝║  ╠═╣ ║║║╣ ",
    "╩╚═╚═╝ ╩ ╩╚═╚═╝  ╩ ╩╩╚═╚═╝╩ ╩═╩╝╚═╝",
];

struct GameTile {
    key: &'static str,
    icon: &'static str,
    desc: &'static str,
    color: Color,
    border_color: Color,
}

const GAME_TILES: [GameTile; 4] = [
    GameTile { key: "1", icon: "⚪", desc: "Keep the ball\noff the floor!", color: Color::Rgb(120, 200, 255), border_color: Color::Rgb(50, 100, 140) },
    GameTile { key: "2", icon: "🏃", desc: "Dodge the walls\nas they speed up!", color: Color::Rgb(255, 160, 60), border_color: Color::Rgb(140, 80, 30) },
    GameTile { key: "3", icon: "🎯", desc: "Hit targets for\n60 seconds!", color: Color::Rgb(220, 80, 80), border_color: Color::Rgb(120, 40, 40) },
    GameTile { key: "4", icon: "🧱", desc: "Stack blocks as\nhigh as you can!", color: Color::Rgb(80, 220, 80), border_color: Color::Rgb(40, 120, 40) },
];

fn render_game_tile(frame: &mut Frame, area: Rect, kind: GameKind, best: u32, selected: bool) {
    let tile = &GAME_TILES[kind.index()];
    let border_color = if selected { Color::Rgb(255, 220, 80) } else { tile.border_color };
    let border_type = if selected { BorderType::Double } else { BorderType::Rounded };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 { return; }

    let mut lines: Vec<Line> = Vec::new();

    let name_color = if selected { Color::Rgb(255, 255, 255) } else { tile.color };
    lines.push(Line::from(vec![
        Span::styled(format!("[{}] ", tile.key), Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(format!("{} ", tile.icon), Style::default()),
        Span::styled(kind.display_name(), Style::default().fg(name_color).add_modifier(Modifier::BOLD)),
    ]));

    for desc_line in tile.desc.split('\n') {
        lines.push(Line::from(vec![
            Span::styled(desc_line, Style::default().fg(if selected { Color::Rgb(180, 180, 200) } else { Color::Rgb(120, 120, 140) })),
        ]));
    }

    if selected {
        lines.push(Line::from(vec![
            Span::styled("▶ Enter to play", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        ]));
    } else if best > 0 {
        lines.push(Line::from(vec![
            Span::styled(format!("Best {}", best), Style::default().fg(Color::Rgb(100, 100, 130))),
        ]));
    }

    let p = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(p, inner);
}

fn key_line(keys: &'static str, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {:<17}", keys), Style::default().fg(Color::Rgb(80, 200, 255))),
        Span::styled(what, Style::default().fg(Color::Rgb(140, 140, 140))),
    ])
}

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
    ))
}

fn game_controls(kind: GameKind) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from("")];
    match kind {
        GameKind::Bouncing => {
            lines.push(heading("  ⚪ Bounce"));
            lines.push(key_line("Click / Space", "Bounce (+5)"));
            lines.push(Line::from(""));
            lines.push(heading("  ⚠ Avoid"));
            lines.push(key_line("Floor", "Touching it ends the run"));
            lines.push(key_line("Blocks", "Falling from above"));
        }
        GameKind::Runner => {
            lines.push(heading("  🏃 Steer"));
            lines.push(key_line("Mouse", "Runner follows the pointer"));
            lines.push(key_line("↑ ↓", "Nudge the target"));
            lines.push(Line::from(""));
            lines.push(heading("  ⭐ Score"));
            lines.push(key_line("Each wall passed", "+10, speed keeps rising"));
        }
        GameKind::Shooter => {
            lines.push(heading("  🎯 Aim"));
            lines.push(key_line("Mouse / arrows", "Move the crosshair"));
            lines.push(key_line("Click / Space", "Fire from the cannon"));
            lines.push(Line::from(""));
            lines.push(heading("  ⭐ Targets"));
            lines.push(key_line("Big / mid / small", "10 / 20 / 50 points"));
        }
        GameKind::Stack => {
            lines.push(heading("  🧱 Drop"));
            lines.push(key_line("Click / Space", "Drop the sliding block"));
            lines.push(Line::from(""));
            lines.push(heading("  ⭐ Score"));
            lines.push(key_line("Perfect (±5)", "+50, width kept"));
            lines.push(key_line("Overhang", "+10, trimmed away"));
        }
    }
    lines
}

pub fn render_home(frame: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Banner
            Constraint::Length(8), // Game tiles
            Constraint::Min(10),   // Controls and orbs
            Constraint::Length(1), // Footer
        ])
        .split(area);

    // Banner
    let mut banner: Vec<Line> = BANNER.iter().map(|l| Line::from(*l)).collect();
    banner.push(Line::from(Span::styled(
        "⚡ Four quick games ⚡",
        Style::default()
            .fg(Color::Rgb(255, 220, 80))
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    )));
    let banner = Paragraph::new(banner)
        .style(Style::default().fg(Color::Rgb(80, 200, 255)))
        .alignment(Alignment::Center);
    frame.render_widget(banner, chunks[0]);

    // Games section title block
    let games_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
        .title(" 🎮 Games: ←→ Select, Enter to Play ")
        .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD));
    let games_inner = games_block.inner(chunks[1]);
    frame.render_widget(games_block, chunks[1]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
        ])
        .split(games_inner);

    for (i, kind) in GameKind::all().iter().enumerate() {
        let best = app.game(*kind).best();
        render_game_tile(frame, cols[i], *kind, best, app.selected_game == i);
    }

    // Lower area: controls on the left, orbs on the right
    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Percentage(55),
        ])
        .split(chunks[2]);

    let controls_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(lower[0]);

    let controls = Paragraph::new(vec![
        Line::from(""),
        heading("  🔧 Navigation"),
        key_line("Tab / Shift+Tab", "Switch tabs"),
        key_line("1-4 / Enter", "Launch game"),
        key_line("Esc", "Return to Home"),
        key_line("H", "Session scores"),
        key_line("q / Ctrl+C", "Quit"),
        Line::from(""),
        heading("  🎮 Common"),
        key_line("Enter", "Start"),
        key_line("P", "Pause / Unpause"),
        key_line("R", "Restart game"),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .title(" ⌨ Navigation Control ")
            .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(controls, controls_rows[0]);

    let selected = GameKind::all()[app.selected_game];
    let tile = &GAME_TILES[selected.index()];
    let game_ctrl = Paragraph::new(game_controls(selected)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(tile.border_color))
            .title(format!(" {} {} ", tile.icon, selected.display_name()))
            .title_style(Style::default().fg(tile.color).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(game_ctrl, controls_rows[1]);

    app.background.render(frame, lower[1]);

    // Footer
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("  🦀 ", Style::default().fg(Color::Rgb(255, 100, 50))),
        Span::styled(concat!("v", env!("CARGO_PKG_VERSION")), Style::default().fg(Color::Rgb(80, 80, 100))),
        Span::styled("  │  ", Style::default().fg(Color::Rgb(40, 40, 60))),
        Span::styled("H", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(" Scores", Style::default().fg(Color::Rgb(100, 100, 130))),
        Span::styled("  │  ", Style::default().fg(Color::Rgb(40, 40, 60))),
        Span::styled("Click", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(" Pop an orb", Style::default().fg(Color::Rgb(100, 100, 130))),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[3]);

    if app.show_scores {
        render_score_board(frame, area, &app.score_board);
    }
}

fn render_score_board(frame: &mut Frame, area: Rect, board: &ScoreBoard) {
    let overlay_area = super::centered(area, 50, 24);

    // Clear background
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Rgb(255, 200, 80)))
        .title(" 🏆 This Session ")
        .title_style(Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let medals = [
        ("🥇", Color::Rgb(255, 215, 0)),
        ("🥈", Color::Rgb(192, 192, 192)),
        ("🥉", Color::Rgb(205, 127, 50)),
    ];

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(""));

    for kind in GameKind::all() {
        let tile = &GAME_TILES[kind.index()];
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", tile.icon), Style::default()),
            Span::styled(
                kind.display_name(),
                Style::default().fg(tile.color).add_modifier(Modifier::BOLD),
            ),
        ]));

        let scores = board.top_scores(*kind);
        if scores.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("    No scores yet", Style::default().fg(Color::Rgb(60, 60, 80))),
            ]));
        }
        for (entry, (medal, color)) in scores.iter().zip(medals) {
            lines.push(Line::from(vec![
                Span::styled(format!("    {} ", medal), Style::default()),
                Span::styled(
                    format!("{:<6}", entry.score),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{}s", entry.elapsed_secs),
                    Style::default().fg(Color::Rgb(200, 200, 220)),
                ),
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Press ", Style::default().fg(Color::Rgb(80, 80, 100))),
        Span::styled("H", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(" to close", Style::default().fg(Color::Rgb(80, 80, 100))),
    ]));

    let p = Paragraph::new(lines).style(Style::default().bg(Color::Rgb(15, 15, 25)));
    frame.render_widget(p, inner);
}
