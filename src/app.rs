use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};

use crate::background::ParticleField;
use crate::config::Config;
use crate::games::bouncing::BouncingBall;
use crate::games::runner::AvoidanceRunner;
use crate::games::shooter::TargetShooter;
use crate::games::stack::StackGame;
use crate::games::{Game, GameKind};
use crate::input::PointerKind;
use crate::scores::{ScoreBoard, ScoreReporter};
use crate::session::{GameSummary, Outcome, Phase};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Home,
    Bouncing,
    Runner,
    Shooter,
    Stack,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Home, Tab::Bouncing, Tab::Runner, Tab::Shooter, Tab::Stack]
    }

    pub fn title(&self) -> &str {
        match self {
            Tab::Home => " Home ",
            Tab::Bouncing => " Bouncing ",
            Tab::Runner => " Runner ",
            Tab::Shooter => " Shooter ",
            Tab::Stack => " Stack ",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Home => 0,
            Tab::Bouncing => 1,
            Tab::Runner => 2,
            Tab::Shooter => 3,
            Tab::Stack => 4,
        }
    }

    pub fn game(&self) -> Option<GameKind> {
        match self {
            Tab::Home => None,
            Tab::Bouncing => Some(GameKind::Bouncing),
            Tab::Runner => Some(GameKind::Runner),
            Tab::Shooter => Some(GameKind::Shooter),
            Tab::Stack => Some(GameKind::Stack),
        }
    }

    pub fn from_game(kind: GameKind) -> Tab {
        match kind {
            GameKind::Bouncing => Tab::Bouncing,
            GameKind::Runner => Tab::Runner,
            GameKind::Shooter => Tab::Shooter,
            GameKind::Stack => Tab::Stack,
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub current_tab: Tab,
    pub selected_game: usize, // 0-3 for home screen game selection
    pub player_name: Option<String>,
    pub background: ParticleField,
    pub score_board: ScoreBoard,
    pub show_scores: bool,
    /// Set while the game-over overlay is shown.
    pub game_over: Option<GameSummary>,
    games: Vec<Box<dyn Game>>,
    reporter: Box<dyn ScoreReporter>,
}

impl App {
    pub fn new(config: &Config, reporter: Box<dyn ScoreReporter>) -> Self {
        let (w, h) = (config.field.width, config.field.height);
        let games: Vec<Box<dyn Game>> = vec![
            Box::new(BouncingBall::new(w, h)),
            Box::new(AvoidanceRunner::new(w, h)),
            Box::new(TargetShooter::new(w, h)),
            Box::new(StackGame::new(w, h)),
        ];
        Self::with_games(config, games, reporter)
    }

    /// `games` must be ordered like `GameKind::all()`.
    pub fn with_games(
        config: &Config,
        games: Vec<Box<dyn Game>>,
        reporter: Box<dyn ScoreReporter>,
    ) -> Self {
        Self {
            should_quit: false,
            current_tab: Tab::Home,
            selected_game: 0,
            player_name: config.player_name.clone(),
            background: ParticleField::new(config.field.width, config.field.height),
            score_board: ScoreBoard::new(),
            show_scores: false,
            game_over: None,
            games,
            reporter,
        }
    }

    pub fn game(&self, kind: GameKind) -> &dyn Game {
        self.games[kind.index()].as_ref()
    }

    pub fn game_mut(&mut self, kind: GameKind) -> &mut dyn Game {
        self.games[kind.index()].as_mut()
    }

    fn active_game(&mut self) -> Option<&mut dyn Game> {
        let kind = self.current_tab.game()?;
        Some(self.game_mut(kind))
    }

    /// Opens a game's tab directly, as `play <GAME>` does on launch.
    pub fn open(&mut self, kind: GameKind) {
        self.switch_tab(Tab::from_game(kind));
        self.selected_game = kind.index();
    }

    pub fn on_tick(&mut self, now: Duration) {
        if self.current_tab == Tab::Home {
            self.background.update();
            return;
        }
        if self.game_over.is_some() {
            return;
        }
        let outcomes = match self.active_game() {
            Some(game) => game.tick(now),
            None => Vec::new(),
        };
        self.apply(outcomes);
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent, now: Duration) {
        if self.current_tab == Tab::Home {
            if self.show_scores {
                return;
            }
            if let Some(event) = self.background.viewport().translate(mouse) {
                if event.kind == PointerKind::Press {
                    self.background.click(event.at);
                }
            }
            return;
        }
        if self.game_over.is_some() {
            return;
        }
        let outcomes = match self.active_game() {
            Some(game) => match game.viewport().translate(mouse) {
                Some(event) => game.pointer(event, now),
                None => Vec::new(),
            },
            None => Vec::new(),
        };
        self.apply(outcomes);
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Duration) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if let Some(summary) = self.game_over {
            self.handle_game_over_input(key, summary, now);
            return;
        }

        // Global keys
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                if matches!(self.current_tab, Tab::Home) {
                    self.should_quit = true;
                    return;
                }
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.prev_tab();
                } else {
                    self.next_tab();
                }
                return;
            }
            KeyCode::BackTab => {
                self.prev_tab();
                return;
            }
            KeyCode::Esc => {
                if !matches!(self.current_tab, Tab::Home) {
                    self.switch_tab(Tab::Home);
                    return;
                }
            }
            _ => {}
        }

        if matches!(self.current_tab, Tab::Home) {
            self.handle_home_input(key);
            return;
        }

        let outcomes = match self.active_game() {
            Some(game) => game_key(game, key, now),
            None => Vec::new(),
        };
        self.apply(outcomes);
    }

    fn handle_home_input(&mut self, key: KeyEvent) {
        if !key.modifiers.is_empty() && key.modifiers != KeyModifiers::SHIFT {
            return;
        }
        let count = GameKind::all().len();
        match key.code {
            KeyCode::Char(c @ '1'..='4') => {
                let idx = (c as u8 - b'1') as usize;
                self.open(GameKind::all()[idx]);
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                self.show_scores = !self.show_scores;
            }
            KeyCode::Right | KeyCode::Down => {
                self.selected_game = (self.selected_game + 1) % count;
            }
            KeyCode::Left | KeyCode::Up => {
                self.selected_game = (self.selected_game + count - 1) % count;
            }
            KeyCode::Enter => {
                self.open(GameKind::all()[self.selected_game]);
            }
            _ => {}
        }
    }

    fn handle_game_over_input(&mut self, key: KeyEvent, summary: GameSummary, now: Duration) {
        match key.code {
            KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R') => {
                self.game_over = None;
                self.game_mut(summary.game).start(now);
            }
            KeyCode::Esc => {
                self.game_over = None;
                self.switch_tab(Tab::Home);
            }
            _ => {}
        }
    }

    fn apply(&mut self, outcomes: Vec<Outcome>) {
        for outcome in outcomes {
            if let Outcome::Terminated(summary) = outcome {
                self.finish(summary);
            }
        }
    }

    fn finish(&mut self, summary: GameSummary) {
        log::info!(
            "{} over for {}: score {} in {}s",
            summary.game.display_name(),
            self.player_name.as_deref().unwrap_or("anonymous"),
            summary.score,
            summary.elapsed_secs
        );
        self.reporter.report(&summary);
        if self.score_board.record(&summary) {
            log::debug!("{} score {} made the board", summary.game.display_name(), summary.score);
        }
        self.game_over = Some(summary);
    }

    /// Leaving a running game pauses it so its world does not jump when the
    /// tab is shown again.
    fn switch_tab(&mut self, tab: Tab) {
        if tab == self.current_tab {
            return;
        }
        if let Some(game) = self.active_game() {
            if game.session().is_running() {
                game.toggle_pause();
            }
        }
        self.game_over = None;
        self.current_tab = tab;
    }

    fn next_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.switch_tab(tabs[(idx + 1) % tabs.len()]);
    }

    fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.switch_tab(tabs[(idx + tabs.len() - 1) % tabs.len()]);
    }
}

const STEER_KEYS: [(KeyCode, f64, f64); 4] = [
    (KeyCode::Up, 0.0, -1.0),
    (KeyCode::Down, 0.0, 1.0),
    (KeyCode::Left, -1.0, 0.0),
    (KeyCode::Right, 1.0, 0.0),
];

fn game_key(game: &mut dyn Game, key: KeyEvent, now: Duration) -> Vec<Outcome> {
    match key.code {
        KeyCode::Enter => {
            if matches!(game.session().phase(), Phase::Idle | Phase::Terminated) {
                game.start(now);
            }
            Vec::new()
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            game.start(now);
            Vec::new()
        }
        KeyCode::Char('p') | KeyCode::Char('P') => {
            game.toggle_pause();
            Vec::new()
        }
        KeyCode::Char(' ') => game.primary(now),
        code => {
            if let Some((_, dx, dy)) = STEER_KEYS.iter().find(|(k, _, _)| *k == code) {
                if game.session().is_running() {
                    game.steer(*dx, *dy);
                }
            }
            Vec::new()
        }
    }
}
