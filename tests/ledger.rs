//! Score ledger: scheduling, score updates, standings and change notifications.

mod common;

use common::{full_division, league};
use cribbage_league_web::{store, LeagueError};
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test]
async fn round_robin_covers_every_division() {
    let l = league().await;
    let (_, four) = full_division(&l.roster, "North", 4).await;
    let (_, six) = full_division(&l.roster, "South", 6).await;

    let games = l.ledger.generate_round_robin().await.unwrap();
    assert_eq!(games.len(), 6 + 9);
    assert_eq!(l.ledger.all_games().await.unwrap().len(), 15);

    for team in four.iter().chain(six.iter()) {
        let played = l.ledger.games_for_team(&team.id).await.unwrap();
        assert_eq!(played.len(), 3, "{} should play 3 games", team.name);
        for (id, game) in &played {
            assert_eq!(id, &game.id);
            assert!(game.team_ids().contains(&team.id.as_str()));
        }
    }

    // Nobody plays outside their division.
    for game in &games {
        let [a, b] = game.team_ids();
        let in_four = |id: &str| four.iter().any(|t| t.id == id);
        assert_eq!(in_four(a), in_four(b));
        assert!(game.scores.iter().all(|s| s.score == 0));
    }
}

#[tokio::test]
async fn unassigned_team_blocks_generation() {
    let l = league().await;
    full_division(&l.roster, "North", 4).await;
    l.roster.create_team("Stray").await.unwrap();

    assert!(matches!(
        l.ledger.generate_round_robin().await,
        Err(LeagueError::UnassignedTeams)
    ));
    assert!(l.ledger.all_games().await.unwrap().is_empty());
}

#[tokio::test]
async fn short_division_writes_no_games() {
    let l = league().await;
    full_division(&l.roster, "North", 4).await;
    let partial = l.roster.create_division("South", 6).await.unwrap();
    for name in ["S1", "S2", "S3"] {
        let t = l.roster.create_team(name).await.unwrap();
        l.roster.assign_to_division(&t.id, &partial.id).await.unwrap();
    }

    assert!(matches!(
        l.ledger.generate_round_robin().await,
        Err(LeagueError::WrongTeamCount(3))
    ));
    assert!(l.ledger.all_games().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_game_checks_teams() {
    let l = league().await;
    let (_, north) = full_division(&l.roster, "North", 4).await;
    let (_, south) = full_division(&l.roster, "South", 4).await;

    assert!(matches!(
        l.ledger.create_game(&north[0].id, &north[0].id).await,
        Err(LeagueError::SameTeam)
    ));
    assert!(matches!(
        l.ledger.create_game(&north[0].id, &south[0].id).await,
        Err(LeagueError::CrossDivisionGame)
    ));
    let err = l.ledger.create_game(&north[0].id, "nobody").await.unwrap_err();
    assert!(err.is_not_found());

    let id = l.ledger.create_game(&north[0].id, &north[1].id).await.unwrap();
    let game = l.ledger.game(&id).await.unwrap();
    assert_eq!(game.scores.len(), 2);
    assert_eq!(l.ledger.score(&id, &north[1].id).await.unwrap(), 0);
}

#[tokio::test]
async fn scores_update_together_or_not_at_all() {
    let l = league().await;
    let (_, north) = full_division(&l.roster, "North", 4).await;
    let id = l.ledger.create_game(&north[0].id, &north[1].id).await.unwrap();

    let err = l
        .ledger
        .update_scores(&id, &north[0].id, 121, &north[2].id, 80)
        .await
        .unwrap_err();
    assert!(matches!(err, LeagueError::UnknownTeamForGame { .. }));
    assert_eq!(l.ledger.score(&id, &north[0].id).await.unwrap(), 0);

    l.ledger
        .update_scores(&id, &north[0].id, 121, &north[1].id, 80)
        .await
        .unwrap();
    assert_eq!(l.ledger.score(&id, &north[0].id).await.unwrap(), 121);
    assert_eq!(l.ledger.score(&id, &north[1].id).await.unwrap(), 80);
    assert_eq!(l.ledger.game(&id).await.unwrap().winner(), Some(north[0].id.as_str()));

    l.ledger.update_score(&id, &north[1].id, 95).await.unwrap();
    assert_eq!(l.ledger.score(&id, &north[1].id).await.unwrap(), 95);
}

#[tokio::test]
async fn record_result_rejects_unfinished_games() {
    let l = league().await;
    let (_, north) = full_division(&l.roster, "North", 4).await;
    let id = l.ledger.create_game(&north[0].id, &north[1].id).await.unwrap();

    let err = l
        .ledger
        .record_result(&id, &north[0].id, 100, &north[1].id, 90)
        .await
        .unwrap_err();
    assert!(matches!(err, LeagueError::InvalidScores(_)));
    assert!(err.is_validation());
    assert_eq!(l.ledger.score(&id, &north[0].id).await.unwrap(), 0);

    l.ledger
        .record_result(&id, &north[0].id, 60, &north[1].id, 121)
        .await
        .unwrap();
    l.ledger
        .record_result(&id, &north[0].id, 0, &north[1].id, 0)
        .await
        .unwrap();
    assert_eq!(l.ledger.game(&id).await.unwrap().winner(), None);
}

#[tokio::test]
async fn unknown_game_is_not_found() {
    let l = league().await;
    assert!(l.ledger.game("missing").await.unwrap_err().is_not_found());
    assert!(l.ledger.games_for_team("missing").await.unwrap().is_empty());
}

#[tokio::test]
async fn standings_follow_results() {
    let l = league().await;
    let (_, north) = full_division(&l.roster, "North", 4).await;
    l.ledger.generate_round_robin().await.unwrap();
    assert_eq!(l.ledger.standings().await.unwrap().len(), 4);

    // North4 wins all of its games, everything else stays unplayed.
    let star = &north[3].id;
    for (id, game) in l.ledger.games_for_team(star).await.unwrap() {
        let [a, b] = game.team_ids();
        let other = if a == star.as_str() { b } else { a };
        l.ledger.record_result(&id, star, 121, other, 70).await.unwrap();
    }

    let standings = l.ledger.standings().await.unwrap();
    assert_eq!(standings[0].team_id, *star);
    assert_eq!((standings[0].wins, standings[0].losses), (3, 0));
    assert_eq!(standings[0].total_score, 363);
    for s in &standings[1..] {
        assert_eq!((s.wins, s.losses, s.total_score), (0, 1, 70));
    }
    let rest: Vec<&str> = standings[1..].iter().map(|s| s.team_name.as_str()).collect();
    assert_eq!(rest, vec!["North1", "North2", "North3"]);
}

#[tokio::test]
async fn delete_all_clears_games() {
    let l = league().await;
    full_division(&l.roster, "North", 4).await;
    l.ledger.generate_round_robin().await.unwrap();
    l.ledger.delete_all().await.unwrap();
    assert!(l.ledger.all_games().await.unwrap().is_empty());
    assert!(l.ledger.standings().await.unwrap().is_empty());
}

#[tokio::test]
async fn viewers_are_woken_after_score_changes() {
    let l = league().await;
    let (_, north) = full_division(&l.roster, "North", 4).await;
    let id = l.ledger.create_game(&north[0].id, &north[1].id).await.unwrap();

    let mut viewer = l.score_updates.subscribe();
    l.ledger
        .record_result(&id, &north[0].id, 121, &north[1].id, 99)
        .await
        .unwrap();
    timeout(Duration::from_secs(1), viewer.recv())
        .await
        .expect("no signal after score update")
        .unwrap();

    // A rejected result changes nothing and wakes nobody.
    let _ = l
        .ledger
        .record_result(&id, &north[0].id, 5, &north[1].id, 5)
        .await;
    assert!(timeout(Duration::from_millis(100), viewer.recv()).await.is_err());

    viewer.unsubscribe().await;
    assert_eq!(l.score_updates.subscriber_count(), 0);
}

#[tokio::test]
async fn games_across_divisions_are_reported() {
    let l = league().await;
    let (_, north) = full_division(&l.roster, "North", 4).await;
    let (_, south) = full_division(&l.roster, "South", 4).await;
    l.ledger.create_game(&north[0].id, &north[1].id).await.unwrap();

    // Bypass the ledger's checks to store a game that breaks the division rule.
    let mut conn = l.db.pool().acquire().await.unwrap();
    store::scores::insert_game(&mut conn, "stray", &north[2].id, &south[0].id)
        .await
        .unwrap();
    drop(conn);

    assert!(matches!(
        l.ledger.all_games().await,
        Err(LeagueError::Inconsistent(_))
    ));
    assert!(matches!(
        l.ledger.games_for_team(&south[0].id).await,
        Err(LeagueError::Inconsistent(_))
    ));
    assert_eq!(l.ledger.games_for_team(&north[0].id).await.unwrap().len(), 1);
}
