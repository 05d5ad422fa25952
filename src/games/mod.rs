pub mod bouncing;
pub mod runner;
pub mod shooter;
pub mod stack;

use std::time::Duration;

use ratatui::prelude::*;

use crate::input::{PointerEvent, Viewport};
use crate::session::{Outcome, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum GameKind {
    Bouncing,
    Runner,
    Shooter,
    Stack,
}

impl GameKind {
    pub fn all() -> &'static [GameKind] {
        &[
            GameKind::Bouncing,
            GameKind::Runner,
            GameKind::Shooter,
            GameKind::Stack,
        ]
    }

    /// Name used for score submission and on screen.
    pub fn display_name(&self) -> &'static str {
        match self {
            GameKind::Bouncing => "Bouncing Ball",
            GameKind::Runner => "Avoidance Runner",
            GameKind::Shooter => "Target Shooter",
            GameKind::Stack => "Stack Game",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            GameKind::Bouncing => 0,
            GameKind::Runner => 1,
            GameKind::Shooter => 2,
            GameKind::Stack => 3,
        }
    }
}

/// One mini-game: owns its session and entities, advances one frame per
/// `tick` and draws itself from current state.
pub trait Game {
    fn kind(&self) -> GameKind;
    fn session(&self) -> &Session;
    fn session_mut(&mut self) -> &mut Session;
    /// Field size and where it was last drawn, for pointer mapping.
    fn viewport(&self) -> &Viewport;
    /// Resets score, timers and entities and begins playing.
    fn start(&mut self, now: Duration);
    /// Simulation and collision for one frame. Only called while playing.
    fn step(&mut self, now: Duration) -> Vec<Outcome>;
    fn pointer(&mut self, event: PointerEvent, now: Duration) -> Vec<Outcome>;
    /// Keyboard stand-in for a click.
    fn primary(&mut self, now: Duration) -> Vec<Outcome>;
    fn steer(&mut self, _dx: f64, _dy: f64) {}
    /// Best score across sessions since launch.
    fn best(&self) -> u32;
    fn render(&mut self, frame: &mut Frame, area: Rect);

    /// Frame-clock entry point. The pause gate is checked here, once.
    fn tick(&mut self, now: Duration) -> Vec<Outcome> {
        if !self.session().is_running() {
            return Vec::new();
        }
        self.step(now)
    }

    fn toggle_pause(&mut self) -> bool {
        self.session_mut().toggle_pause()
    }

    fn score(&self) -> u32 {
        self.session().score()
    }

    fn is_game_over(&self) -> bool {
        self.session().is_over()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::bouncing::BouncingBall;
    use crate::games::runner::AvoidanceRunner;
    use crate::games::shooter::TargetShooter;
    use crate::games::stack::StackGame;
    use crate::session::Phase;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn every_game(seed: u64) -> Vec<Box<dyn Game>> {
        vec![
            Box::new(BouncingBall::with_rng(800.0, 600.0, StdRng::seed_from_u64(seed))),
            Box::new(AvoidanceRunner::with_rng(800.0, 600.0, StdRng::seed_from_u64(seed))),
            Box::new(TargetShooter::with_rng(800.0, 600.0, StdRng::seed_from_u64(seed))),
            Box::new(StackGame::new(800.0, 600.0)),
        ]
    }

    #[test]
    fn test_kinds_are_distinct() {
        for (i, kind) in GameKind::all().iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        let games = every_game(1);
        let kinds: Vec<GameKind> = games.iter().map(|g| g.kind()).collect();
        assert_eq!(kinds, GameKind::all());
    }

    #[test]
    fn test_idle_games_ignore_ticks() {
        for mut game in every_game(2) {
            assert_eq!(game.session().phase(), Phase::Idle);
            assert!(game.tick(Duration::from_secs(1)).is_empty());
            assert!(!game.toggle_pause());
            assert!(!game.is_game_over());
        }
    }

    proptest! {
        #[test]
        fn paused_ticks_never_score(seed in 0u64..1000, frames in 1u64..200) {
            for mut game in every_game(seed) {
                game.start(Duration::ZERO);
                game.tick(Duration::from_millis(16));
                if game.is_game_over() {
                    continue;
                }
                let score = game.score();
                prop_assert!(game.toggle_pause());
                for f in 0..frames {
                    let out = game.tick(Duration::from_millis(32 + f * 16));
                    prop_assert!(out.is_empty());
                }
                prop_assert_eq!(game.score(), score);
                prop_assert_eq!(game.session().phase(), Phase::Paused);
            }
        }
    }
}
