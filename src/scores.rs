use std::thread;

use serde::Serialize;
use thiserror::Error;

use crate::games::GameKind;
use crate::session::GameSummary;

const SCORES_PER_GAME: usize = 3;
const SAVE_SCORE_PATH: &str = "/save_score";

/// Body of the score submission request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreSubmission {
    pub game_name: String,
    pub score: u32,
    pub time_taken: u64,
}

impl From<&GameSummary> for ScoreSubmission {
    fn from(summary: &GameSummary) -> Self {
        Self {
            game_name: summary.game.display_name().to_string(),
            score: summary.score,
            time_taken: summary.elapsed_secs,
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("server answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("could not read response: {0}")]
    Body(#[from] std::io::Error),
}

impl From<ureq::Error> for SubmitError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::Status(status, response) => SubmitError::Status {
                status,
                body: response.into_string().unwrap_or_default(),
            },
            other => SubmitError::Transport(other.to_string()),
        }
    }
}

/// Receives final results. Implementations must not block gameplay.
pub trait ScoreReporter {
    fn report(&self, summary: &GameSummary);
}

/// Posts scores to the arcade server on a detached thread. The outcome is
/// logged and otherwise ignored.
pub struct HttpScoreReporter {
    endpoint: String,
}

impl HttpScoreReporter {
    pub fn new(server_url: &str) -> Self {
        Self {
            endpoint: format!("{}{}", server_url.trim_end_matches('/'), SAVE_SCORE_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ScoreReporter for HttpScoreReporter {
    fn report(&self, summary: &GameSummary) {
        let endpoint = self.endpoint.clone();
        let submission = ScoreSubmission::from(summary);
        let spawned = thread::Builder::new()
            .name("score-submit".into())
            .spawn(move || match post_score(&endpoint, &submission) {
                Ok(body) => log::info!("Score saved: {}", body),
                Err(e) => log::warn!("Error saving score: {}", e),
            });
        if let Err(e) = spawned {
            log::warn!("Could not start score submission: {}", e);
        }
    }
}

/// Used when submission is switched off.
pub struct LogOnlyReporter;

impl ScoreReporter for LogOnlyReporter {
    fn report(&self, summary: &GameSummary) {
        log::info!(
            "Score submission disabled; {} finished with {} in {}s",
            summary.game.display_name(),
            summary.score,
            summary.elapsed_secs
        );
    }
}

/// Blocking POST of one submission. Returns the raw response body.
pub fn post_score(endpoint: &str, submission: &ScoreSubmission) -> Result<String, SubmitError> {
    let response = ureq::post(endpoint)
        .set("Content-Type", "application/json")
        .send_json(submission)?;
    Ok(response.into_string()?)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreEntry {
    pub score: u32,
    pub elapsed_secs: u64,
}

/// Top results per game for this run of the arcade. Kept in memory only.
#[derive(Clone, Default)]
pub struct ScoreBoard {
    scores: [Vec<ScoreEntry>; 4],
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finished session. Returns true if it made the top 3.
    /// Ties keep the earlier entry ahead; faster times win equal scores.
    pub fn record(&mut self, summary: &GameSummary) -> bool {
        if summary.score == 0 {
            return false;
        }
        let entries = &mut self.scores[summary.game.index()];
        let entry = ScoreEntry {
            score: summary.score,
            elapsed_secs: summary.elapsed_secs,
        };
        let pos = entries
            .iter()
            .position(|e| {
                entry.score > e.score || (entry.score == e.score && entry.elapsed_secs < e.elapsed_secs)
            })
            .unwrap_or(entries.len());
        if pos >= SCORES_PER_GAME {
            return false;
        }
        entries.insert(pos, entry);
        entries.truncate(SCORES_PER_GAME);
        true
    }

    pub fn top_scores(&self, game: GameKind) -> &[ScoreEntry] {
        &self.scores[game.index()]
    }
}
