//! Bracket seeding from standings: top seed plays bottom seed.

use crate::logic::bracket::round_sizes;
use crate::models::{LeagueError, Standing, TeamId};

/// Round-0 pairings for a `size`-team bracket: rank i against rank size-1-i
/// (0,15 1,14 2,13 ... for 16 teams). Slot i holds the i-th pair, higher seed
/// on side one. Only the top `size` standings are used.
pub fn first_round_pairs(
    standings: &[Standing],
    size: usize,
) -> Result<Vec<(TeamId, TeamId)>, LeagueError> {
    round_sizes(size)?;
    if standings.len() < size {
        return Err(LeagueError::NotEnoughTeams {
            needed: size,
            available: standings.len(),
        });
    }
    Ok((0..size / 2)
        .map(|i| {
            (
                standings[i].team_id.clone(),
                standings[size - 1 - i].team_id.clone(),
            )
        })
        .collect())
}
