//! League business logic that needs no storage: matchups, bracket geometry, seeding, standings.

mod bracket;
mod matchups;
mod seeding;
mod standings;

pub use bracket::{all_slots, next_slot, round_sizes, MAX_BRACKET_SIZE};
pub use matchups::{generate_matchups, GAMES_PER_TEAM};
pub use seeding::first_round_pairs;
pub use standings::{compute_standings, sort_standings, validate_result};
