//! Round-robin matchup generation, standings and result validation.

mod common;

use common::teams;
use cribbage_league_web::{
    compute_standings, generate_matchups, validate_result, LeagueError, Score, Team,
};
use std::collections::{HashMap, HashSet};

fn ids(pairs: &[(Team, Team)]) -> Vec<(&str, &str)> {
    pairs
        .iter()
        .map(|(a, b)| (a.id.as_str(), b.id.as_str()))
        .collect()
}

fn unordered(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

fn games_per_team(pairs: &[(Team, Team)]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for (a, b) in pairs {
        *counts.entry(a.id.as_str()).or_insert(0) += 1;
        *counts.entry(b.id.as_str()).or_insert(0) += 1;
    }
    counts
}

#[test]
fn four_teams_play_every_pair_once() {
    let pairs = generate_matchups(&teams(4)).unwrap();
    assert_eq!(pairs.len(), 6);

    let set: HashSet<_> = pairs.iter().map(|(a, b)| unordered(&a.id, &b.id)).collect();
    let expected: HashSet<_> = [
        ("T1", "T2"),
        ("T1", "T3"),
        ("T1", "T4"),
        ("T2", "T3"),
        ("T2", "T4"),
        ("T3", "T4"),
    ]
    .into_iter()
    .map(|(a, b)| unordered(a, b))
    .collect();
    assert_eq!(set, expected);
    assert!(games_per_team(&pairs).values().all(|&c| c == 3));
}

#[test]
fn four_team_order_is_stable() {
    let pairs = generate_matchups(&teams(4)).unwrap();
    assert_eq!(
        ids(&pairs),
        vec![
            ("T1", "T2"),
            ("T2", "T3"),
            ("T3", "T4"),
            ("T4", "T1"),
            ("T1", "T3"),
            ("T2", "T4"),
        ]
    );
}

#[test]
fn six_teams_play_three_games_each() {
    let pairs = generate_matchups(&teams(6)).unwrap();
    assert_eq!(pairs.len(), 9);
    assert_eq!(games_per_team(&pairs).len(), 6);
    assert!(games_per_team(&pairs).values().all(|&c| c == 3));

    let mut seen = HashMap::new();
    for (a, b) in &pairs {
        *seen.entry(unordered(&a.id, &b.id)).or_insert(0) += 1;
    }
    let repeated: Vec<_> = seen.iter().filter(|(_, &n)| n > 1).collect();
    assert_eq!(repeated.len(), 1);
    assert_eq!(*repeated[0].1, 2);
}

#[test]
fn six_team_order_is_stable() {
    let pairs = generate_matchups(&teams(6)).unwrap();
    assert_eq!(
        ids(&pairs),
        vec![
            ("T1", "T2"),
            ("T2", "T3"),
            ("T3", "T4"),
            ("T4", "T5"),
            ("T5", "T6"),
            ("T6", "T1"),
            ("T1", "T3"),
            ("T2", "T4"),
            ("T6", "T5"),
        ]
    );
}

#[test]
fn other_sizes_are_rejected() {
    for n in [0, 2, 3, 5, 8] {
        assert!(matches!(
            generate_matchups(&teams(n)),
            Err(LeagueError::WrongTeamCount(got)) if got == n
        ));
    }
}

#[test]
fn duplicate_teams_are_rejected() {
    let mut list = teams(4);
    list[3] = list[0].clone();
    assert!(matches!(
        generate_matchups(&list),
        Err(LeagueError::DuplicateTeam(id)) if id == "T1"
    ));
}

fn score(game: &str, team: &str, score: i64) -> Score {
    Score {
        game_id: game.to_string(),
        team_id: team.to_string(),
        score,
    }
}

#[test]
fn standings_rank_wins_then_losses_then_points() {
    let roster = teams(4);
    let scores = vec![
        score("g1", "T1", 121),
        score("g1", "T2", 90),
        score("g2", "T3", 121),
        score("g2", "T4", 100),
        score("g3", "T1", 60),
        score("g3", "T3", 121),
        // unplayed
        score("g4", "T2", 0),
        score("g4", "T4", 0),
    ];
    let standings = compute_standings(&roster, &scores);
    let order: Vec<_> = standings.iter().map(|s| s.team_id.as_str()).collect();
    assert_eq!(order, vec!["T3", "T1", "T4", "T2"]);

    let t3 = &standings[0];
    assert_eq!((t3.wins, t3.losses, t3.total_score), (2, 0, 242));
    assert_eq!(t3.team_name, "Team 3");
    let t1 = &standings[1];
    assert_eq!((t1.wins, t1.losses, t1.total_score), (1, 1, 181));
}

#[test]
fn standings_skip_teams_without_scores_or_roster_entry() {
    let roster = teams(3);
    let scores = vec![score("g1", "T1", 121), score("g1", "ghost", 50)];
    let standings = compute_standings(&roster, &scores);
    assert_eq!(standings.len(), 1);
    assert_eq!(standings[0].team_id, "T1");
}

#[test]
fn standings_ties_fall_back_to_name() {
    let roster = teams(2);
    let scores = vec![score("g1", "T2", 0), score("g1", "T1", 0)];
    let standings = compute_standings(&roster, &scores);
    let order: Vec<_> = standings.iter().map(|s| s.team_id.as_str()).collect();
    assert_eq!(order, vec!["T1", "T2"]);
}

#[test]
fn results_must_be_finished_or_reset() {
    assert!(validate_result(0, 0).is_ok());
    assert!(validate_result(121, 95).is_ok());
    assert!(validate_result(1, 121).is_ok());
    assert!(validate_result(121, 120).is_ok());

    for (a, b) in [(121, 121), (121, 0), (0, 121), (100, 90), (121, 130), (50, 0), (121, -5)] {
        assert!(
            matches!(validate_result(a, b), Err(LeagueError::InvalidScores(_))),
            "{a}-{b} should be rejected"
        );
    }
}
