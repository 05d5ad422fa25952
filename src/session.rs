use std::time::Duration;

use crate::games::GameKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Playing,
    Paused,
    Terminated,
}

/// Final result of a session, handed to the score reporter and the
/// game-over overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub game: GameKind,
    pub score: u32,
    pub elapsed_secs: u64,
}

/// Side effects produced by a frame or an input intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    ScoreChanged { score: u32 },
    Terminated(GameSummary),
}

/// Live state shared by every game: lifecycle phase, score and timestamps.
///
/// Timestamps come from the host frame clock (time since the arcade started),
/// so sessions can be driven deterministically in tests.
#[derive(Debug, Clone)]
pub struct Session {
    game: GameKind,
    phase: Phase,
    score: f64,
    started_at: Duration,
    ended_at: Option<Duration>,
}

impl Session {
    pub fn new(game: GameKind) -> Self {
        Self {
            game,
            phase: Phase::Idle,
            score: 0.0,
            started_at: Duration::ZERO,
            ended_at: None,
        }
    }

    pub fn start(&mut self, now: Duration) {
        self.phase = Phase::Playing;
        self.score = 0.0;
        self.started_at = now;
        self.ended_at = None;
    }

    /// Flips between Playing and Paused. Returns false when the session is
    /// not in either state.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            Phase::Playing => self.phase = Phase::Paused,
            Phase::Paused => self.phase = Phase::Playing,
            Phase::Idle | Phase::Terminated => return false,
        }
        true
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::Terminated
    }

    /// Whole points earned so far.
    pub fn score(&self) -> u32 {
        self.score.floor() as u32
    }

    pub fn add_score(&mut self, points: f64) -> Outcome {
        self.score += points;
        Outcome::ScoreChanged {
            score: self.score(),
        }
    }

    /// Time since start; frozen once the session terminates.
    pub fn elapsed(&self, now: Duration) -> Duration {
        self.ended_at
            .unwrap_or(now)
            .saturating_sub(self.started_at)
    }

    pub fn terminate(&mut self, now: Duration) -> Outcome {
        let elapsed_secs = self.elapsed(now).as_secs();
        self.terminate_with_time(now, elapsed_secs)
    }

    /// Terminates reporting `elapsed_secs` instead of the measured time.
    pub fn terminate_with_time(&mut self, now: Duration, elapsed_secs: u64) -> Outcome {
        self.phase = Phase::Terminated;
        self.ended_at = Some(now);
        log::info!(
            "{} over: score {} after {}s",
            self.game.display_name(),
            self.score(),
            elapsed_secs
        );
        Outcome::Terminated(GameSummary {
            game: self.game,
            score: self.score(),
            elapsed_secs,
        })
    }
}
