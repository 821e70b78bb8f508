//! Bracket geometry: round sizes and where a winner goes next.

use crate::models::{LeagueError, Side};

/// Largest bracket a league can run.
pub const MAX_BRACKET_SIZE: usize = 1024;

/// Games per round for a `num_teams` bracket: N/2, N/4, ..., 1.
pub fn round_sizes(num_teams: usize) -> Result<Vec<usize>, LeagueError> {
    if num_teams < 2 || num_teams > MAX_BRACKET_SIZE || !num_teams.is_power_of_two() {
        return Err(LeagueError::InvalidBracketSize(num_teams));
    }
    let mut sizes = Vec::new();
    let mut games = num_teams / 2;
    while games >= 1 {
        sizes.push(games);
        games /= 2;
    }
    Ok(sizes)
}

/// Every (round, slot) of a `num_teams` bracket, round by round.
pub fn all_slots(num_teams: usize) -> Result<Vec<(usize, usize)>, LeagueError> {
    Ok(round_sizes(num_teams)?
        .into_iter()
        .enumerate()
        .flat_map(|(round, games)| (0..games).map(move |slot| (round, slot)))
        .collect())
}

/// The slot a winner of (round, slot) moves into: 0,1 → 0; 2,3 → 1; etc.
pub fn next_slot(round: usize, slot: usize) -> (usize, usize, Side) {
    (round + 1, slot / 2, Side::for_slot(slot))
}
