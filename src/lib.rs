//! Cribbage league organizer: library with models, scheduling logic, storage and live updates.

pub mod config;
pub mod logic;
pub mod models;
pub mod notifier;
pub mod service;
pub mod store;

pub use config::{Config, DbSource};
pub use logic::{
    compute_standings, first_round_pairs, generate_matchups, next_slot, round_sizes,
    validate_result, MAX_BRACKET_SIZE,
};
pub use models::{
    Division, DivisionWithTeams, Game, GameId, LeagueError, Round, Score, Side, Standing, Team,
    TeamId, Tournament, TournamentGame, WINNING_SCORE,
};
pub use notifier::{Notifier, Subscription};
pub use service::{BracketEngine, Roster, ScoreLedger};
pub use store::Database;
