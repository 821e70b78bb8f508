//! Standings and result validation for round-robin games.

use crate::models::{LeagueError, Score, Standing, Team, WINNING_SCORE};
use std::collections::HashMap;

/// Aggregate score rows into standings, best team first.
///
/// Only teams that have at least one score row and exist in `teams` are listed.
/// Order: wins desc, losses asc, total score desc, then name and id.
pub fn compute_standings(teams: &[Team], scores: &[Score]) -> Vec<Standing> {
    let names: HashMap<&str, &str> = teams
        .iter()
        .map(|t| (t.id.as_str(), t.name.as_str()))
        .collect();

    let mut by_team: HashMap<&str, Standing> = HashMap::new();
    for s in scores {
        let Some(name) = names.get(s.team_id.as_str()) else {
            continue;
        };
        let entry = by_team.entry(s.team_id.as_str()).or_insert_with(|| Standing {
            team_id: s.team_id.clone(),
            team_name: name.to_string(),
            ..Standing::default()
        });
        entry.total_score += s.score;
        if s.is_win() {
            entry.wins += 1;
        } else if s.is_loss() {
            entry.losses += 1;
        }
    }

    let mut standings: Vec<Standing> = by_team.into_values().collect();
    sort_standings(&mut standings);
    standings
}

pub fn sort_standings(standings: &mut [Standing]) {
    standings.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then(a.losses.cmp(&b.losses))
            .then(b.total_score.cmp(&a.total_score))
            .then_with(|| a.team_name.cmp(&b.team_name))
            .then_with(|| a.team_id.cmp(&b.team_id))
    });
}

/// Check a reported result: either both scores are 0 (reset), or exactly one
/// team reached 121 and the loser scored strictly between 0 and 121.
pub fn validate_result(score_1: i64, score_2: i64) -> Result<(), LeagueError> {
    let losing = match (score_1, score_2) {
        (0, 0) => return Ok(()),
        (WINNING_SCORE, s) if s != WINNING_SCORE => s,
        (s, WINNING_SCORE) if s != WINNING_SCORE => s,
        _ => {
            return Err(LeagueError::InvalidScores(format!(
                "either both scores must be 0 or one score must be {WINNING_SCORE}"
            )))
        }
    };
    if losing <= 0 || losing >= WINNING_SCORE {
        return Err(LeagueError::InvalidScores(format!(
            "the losing score must be between 0 and {WINNING_SCORE}"
        )));
    }
    Ok(())
}
