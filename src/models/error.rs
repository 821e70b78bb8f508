//! LeagueError: every way a league, ledger or bracket operation can fail.

use crate::models::tournament::Side;

/// Errors that can occur during league operations.
///
/// Validation errors are the caller's fault and are never partially applied.
/// `Database` errors are passed through unchanged. `Inconsistent` means the
/// stored rows break an invariant that this crate relies on.
#[derive(Debug, thiserror::Error)]
pub enum LeagueError {
    /// Round-robin generation only supports 4- or 6-team divisions.
    #[error("can only generate matchups for 4 or 6 teams (got {0})")]
    WrongTeamCount(usize),
    /// The same team was listed twice for matchup generation.
    #[error("team {0} appears more than once")]
    DuplicateTeam(String),
    /// Brackets must hold a power of two teams, from 2 up to 1024.
    #[error("tournament size must be a power of two between 2 and 1024 (got {0})")]
    InvalidBracketSize(usize),
    /// Fewer ranked teams than bracket slots.
    #[error("not enough teams to seed the tournament: need {needed}, have {available}")]
    NotEnoughTeams { needed: usize, available: usize },
    /// The targeted side of a bracket slot is already filled.
    #[error("round {round} game {slot} already has a team on side {side}")]
    SlotTaken { round: usize, slot: usize, side: Side },
    /// No bracket slot at this position.
    #[error("round {round} game {slot} does not exist")]
    SlotNotFound { round: usize, slot: usize },
    /// A winner must be one of the two teams playing the game.
    #[error("team {team_id} is not playing in round {round} game {slot}")]
    WinnerNotInGame { round: usize, slot: usize, team_id: String },
    /// A bracket is already stored; delete it before generating another.
    #[error("a tournament bracket already exists")]
    BracketExists,
    /// Divisions hold exactly 4 or 6 teams.
    #[error("division size must be 4 or 6 (got {0})")]
    InvalidDivisionSize(i64),
    /// The division already holds as many teams as its size allows.
    #[error("division is full ({size} teams)")]
    DivisionFull { size: i64 },
    #[error("team was already assigned to a division")]
    TeamAlreadyInDivision,
    #[error("team is not assigned to a division")]
    TeamNotInDivision,
    /// Round-robin generation needs every team placed in a division.
    #[error("all teams must be in divisions to generate games")]
    UnassignedTeams,
    #[error("a team cannot play against itself")]
    SameTeam,
    #[error("teams in a game must belong to the same division")]
    CrossDivisionGame,
    /// The team has no score row for this game.
    #[error("team {team_id} is not part of game {game_id}")]
    UnknownTeamForGame { game_id: String, team_id: String },
    /// Scores don't describe a finished (or reset) cribbage game.
    #[error("{0}")]
    InvalidScores(String),
    /// Teams referenced by games or the bracket can't be deleted.
    #[error("team {0} still has games or bracket slots")]
    TeamInUse(String),
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
    /// Stored data breaks an invariant (e.g. a game without exactly two scores).
    #[error("inconsistent data: {0}")]
    Inconsistent(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl LeagueError {
    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        LeagueError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// True for errors caused by a bad request rather than a broken store.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            LeagueError::NotFound { .. } | LeagueError::Inconsistent(_) | LeagueError::Database(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LeagueError::NotFound { .. })
    }
}
