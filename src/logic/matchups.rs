//! Round-robin matchups for a single division: every team plays exactly 3 games.

use crate::models::{LeagueError, Team};
use std::collections::HashSet;

/// Games each team plays in the round-robin stage.
pub const GAMES_PER_TEAM: usize = 3;

/// Generate the division's pairings (4 teams → 6 games, 6 teams → 9 games).
///
/// Two cursors walk the team list in lock step. The second starts one position
/// ahead and gains one more position on every pass, so pass 1 pairs i with i+1,
/// pass 2 pairs i with i+2, and so on, wrapping around. A pairing is skipped if
/// either team already has 3 games. With 6 teams the last two teams end up
/// playing each other twice; that is accepted rather than giving anyone a 4th game.
///
/// The output order depends only on the input order.
pub fn generate_matchups(teams: &[Team]) -> Result<Vec<(Team, Team)>, LeagueError> {
    let n = teams.len();
    if n != 4 && n != 6 {
        return Err(LeagueError::WrongTeamCount(n));
    }
    let mut seen = HashSet::with_capacity(n);
    for t in teams {
        if !seen.insert(t.id.as_str()) {
            return Err(LeagueError::DuplicateTeam(t.id.clone()));
        }
    }

    let mut games_by_team = vec![0usize; n];
    let mut pairs = Vec::with_capacity(n * GAMES_PER_TEAM / 2);
    let mut first = 0usize;
    let mut second = 0usize;

    // Offsets 1..n; offset n would pair teams with themselves.
    for _pass in 1..n {
        second += 1;
        for _ in 0..n {
            let (a, b) = (first % n, second % n);
            first += 1;
            second += 1;

            if games_by_team[a] == GAMES_PER_TEAM || games_by_team[b] == GAMES_PER_TEAM {
                continue;
            }
            pairs.push((teams[a].clone(), teams[b].clone()));
            games_by_team[a] += 1;
            games_by_team[b] += 1;
        }

        if games_by_team.iter().all(|&c| c == GAMES_PER_TEAM) {
            return Ok(pairs);
        }
    }

    Err(LeagueError::Inconsistent(format!(
        "could not schedule {GAMES_PER_TEAM} games for each of {n} teams"
    )))
}
