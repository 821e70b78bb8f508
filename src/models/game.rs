//! Score rows, Games built from them, and derived Standings.

use crate::models::error::LeagueError;
use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Unique identifier for a round-robin game.
pub type GameId = String;

/// Reaching this score wins a game of cribbage.
pub const WINNING_SCORE: i64 = 121;

/// One team's score in one game. A game is exactly two of these.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Score {
    pub game_id: GameId,
    pub team_id: TeamId,
    pub score: i64,
}

impl Score {
    pub fn is_win(&self) -> bool {
        self.score >= WINNING_SCORE
    }

    pub fn is_loss(&self) -> bool {
        self.score > 0 && self.score < WINNING_SCORE
    }
}

/// A round-robin game: both score rows, ordered by team id.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub scores: [Score; 2],
}

impl Game {
    /// Build a game from its score rows. Anything other than two rows for two
    /// distinct teams is a consistency error.
    pub fn from_scores(id: &str, mut scores: Vec<Score>) -> Result<Self, LeagueError> {
        if scores.len() != 2 {
            return Err(LeagueError::Inconsistent(format!(
                "game {id} has {} scores, expected 2",
                scores.len()
            )));
        }
        scores.sort_by(|a, b| a.team_id.cmp(&b.team_id));
        let second = scores.pop();
        let first = scores.pop();
        match (first, second) {
            (Some(a), Some(b)) if a.team_id != b.team_id => Ok(Game {
                id: id.to_string(),
                scores: [a, b],
            }),
            _ => Err(LeagueError::Inconsistent(format!(
                "game {id} lists the same team twice"
            ))),
        }
    }

    pub fn team_ids(&self) -> [&str; 2] {
        [&self.scores[0].team_id, &self.scores[1].team_id]
    }

    /// The team that reached 121, if the game is finished.
    pub fn winner(&self) -> Option<&str> {
        self.scores
            .iter()
            .find(|s| s.is_win())
            .map(|s| s.team_id.as_str())
    }
}

/// A team's aggregate record, used for display and bracket seeding.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub team_id: TeamId,
    pub team_name: String,
    pub wins: u32,
    pub losses: u32,
    pub total_score: i64,
}
