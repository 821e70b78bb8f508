//! Data structures for the league: teams, divisions, scores, and the playoff bracket.

mod error;
mod game;
mod team;
mod tournament;

pub use error::LeagueError;
pub use game::{Game, GameId, Score, Standing, WINNING_SCORE};
pub use team::{Division, DivisionId, DivisionWithTeams, Team, TeamId, DIVISION_SIZES};
pub use tournament::{Round, Side, Tournament, TournamentGame};
