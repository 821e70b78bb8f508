//! Score ledger: round-robin games, their scores, and standings.

use crate::logic::{compute_standings, generate_matchups, validate_result};
use crate::models::{Game, LeagueError, Score, Standing, Team};
use crate::notifier::Notifier;
use crate::store::{self, Database};
use sqlx::SqliteConnection;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Records games and scores. Viewers subscribed to `notifier` are woken after
/// every committed change.
#[derive(Clone)]
pub struct ScoreLedger {
    db: Database,
    notifier: Notifier,
}

impl ScoreLedger {
    pub fn new(db: Database, notifier: Notifier) -> Self {
        Self { db, notifier }
    }

    /// Schedule a game between two teams of the same division.
    pub async fn create_game(&self, team_1: &str, team_2: &str) -> Result<String, LeagueError> {
        let mut tx = self.db.begin().await?;
        let id = insert_checked_game(&mut tx, team_1, team_2).await?;
        tx.commit().await?;
        self.notifier.notify();
        Ok(id)
    }

    /// Generate every division's round-robin games in one transaction.
    ///
    /// All teams must be in a division. Divisions and their teams are taken in
    /// name order so the schedule is reproducible.
    pub async fn generate_round_robin(&self) -> Result<Vec<Game>, LeagueError> {
        let mut tx = self.db.begin().await?;
        let teams = store::teams::all(&mut tx).await?;

        let divisions = store::divisions::all(&mut tx).await?;
        let names: HashMap<&str, &str> = divisions
            .iter()
            .map(|d| (d.id.as_str(), d.name.as_str()))
            .collect();

        let mut by_division: BTreeMap<(String, String), Vec<Team>> = BTreeMap::new();
        for team in teams {
            let Some(division_id) = team.division_id.clone() else {
                return Err(LeagueError::UnassignedTeams);
            };
            let Some(name) = names.get(division_id.as_str()) else {
                return Err(LeagueError::not_found("division", division_id));
            };
            by_division
                .entry((name.to_string(), division_id))
                .or_default()
                .push(team);
        }

        let mut games = Vec::new();
        for ((division_name, _), teams) in by_division {
            let pairs = generate_matchups(&teams)?;
            log::debug!("Division {division_name}: {} games", pairs.len());
            for (a, b) in pairs {
                let id = Uuid::new_v4().to_string();
                store::scores::insert_game(&mut tx, &id, &a.id, &b.id).await?;
                games.push(Game::from_scores(
                    &id,
                    vec![new_score(&id, &a.id), new_score(&id, &b.id)],
                )?);
            }
        }

        tx.commit().await?;
        log::info!("Generated {} round-robin games", games.len());
        self.notifier.notify();
        Ok(games)
    }

    /// Set one team's score.
    pub async fn update_score(&self, game_id: &str, team_id: &str, score: i64) -> Result<(), LeagueError> {
        let mut conn = self.db.pool().acquire().await?;
        update_one(&mut conn, game_id, team_id, score).await?;
        self.notifier.notify();
        Ok(())
    }

    /// Set both scores of a game together. Both teams must be in the game.
    pub async fn update_scores(
        &self,
        game_id: &str,
        team_1: &str,
        score_1: i64,
        team_2: &str,
        score_2: i64,
    ) -> Result<(), LeagueError> {
        let mut tx = self.db.begin().await?;
        update_one(&mut tx, game_id, team_1, score_1).await?;
        update_one(&mut tx, game_id, team_2, score_2).await?;
        tx.commit().await?;
        log::info!("Game {game_id}: {team_1} {score_1}, {team_2} {score_2}");
        self.notifier.notify();
        Ok(())
    }

    /// Record a finished (121 vs. less) or reset (0 vs. 0) game.
    pub async fn record_result(
        &self,
        game_id: &str,
        team_1: &str,
        score_1: i64,
        team_2: &str,
        score_2: i64,
    ) -> Result<(), LeagueError> {
        if let Err(e) = validate_result(score_1, score_2) {
            log::warn!("Rejected result for game {game_id}: {e}");
            return Err(e);
        }
        self.update_scores(game_id, team_1, score_1, team_2, score_2)
            .await
    }

    pub async fn score(&self, game_id: &str, team_id: &str) -> Result<i64, LeagueError> {
        let mut conn = self.db.pool().acquire().await?;
        store::scores::get_score(&mut conn, game_id, team_id)
            .await?
            .ok_or_else(|| LeagueError::UnknownTeamForGame {
                game_id: game_id.to_string(),
                team_id: team_id.to_string(),
            })
    }

    pub async fn game(&self, game_id: &str) -> Result<Game, LeagueError> {
        let mut conn = self.db.pool().acquire().await?;
        let scores = store::scores::for_game(&mut conn, game_id).await?;
        if scores.is_empty() {
            return Err(LeagueError::not_found("game", game_id));
        }
        Game::from_scores(game_id, scores)
    }

    /// Games the team plays in, keyed by game id.
    pub async fn games_for_team(&self, team_id: &str) -> Result<BTreeMap<String, Game>, LeagueError> {
        let mut conn = self.db.pool().acquire().await?;
        let scores = store::scores::for_team_games(&mut conn, team_id).await?;
        let teams = store::teams::all(&mut conn).await?;
        Ok(group_games(scores, &teams)?
            .into_iter()
            .map(|g| (g.id.clone(), g))
            .collect())
    }

    pub async fn all_games(&self) -> Result<Vec<Game>, LeagueError> {
        let mut conn = self.db.pool().acquire().await?;
        let scores = store::scores::all(&mut conn).await?;
        let teams = store::teams::all(&mut conn).await?;
        group_games(scores, &teams)
    }

    pub async fn standings(&self) -> Result<Vec<Standing>, LeagueError> {
        let mut conn = self.db.pool().acquire().await?;
        standings(&mut conn).await
    }

    /// Remove every game and score.
    pub async fn delete_all(&self) -> Result<(), LeagueError> {
        let mut conn = self.db.pool().acquire().await?;
        let removed = store::scores::delete_all(&mut conn).await?;
        log::info!("Deleted all games ({removed} score rows)");
        self.notifier.notify();
        Ok(())
    }
}

/// Standings read on an existing connection, so callers can use them inside a transaction.
pub(crate) async fn standings(conn: &mut SqliteConnection) -> Result<Vec<Standing>, LeagueError> {
    let teams = store::teams::all(conn).await?;
    let scores = store::scores::all(conn).await?;
    Ok(compute_standings(&teams, &scores))
}

fn new_score(game_id: &str, team_id: &str) -> Score {
    Score {
        game_id: game_id.to_string(),
        team_id: team_id.to_string(),
        score: 0,
    }
}

async fn insert_checked_game(
    conn: &mut SqliteConnection,
    team_1: &str,
    team_2: &str,
) -> Result<String, LeagueError> {
    if team_1 == team_2 {
        return Err(LeagueError::SameTeam);
    }
    let first = store::teams::get(conn, team_1)
        .await?
        .ok_or_else(|| LeagueError::not_found("team", team_1))?;
    let second = store::teams::get(conn, team_2)
        .await?
        .ok_or_else(|| LeagueError::not_found("team", team_2))?;
    match (&first.division_id, &second.division_id) {
        (Some(a), Some(b)) if a == b => {}
        _ => return Err(LeagueError::CrossDivisionGame),
    }

    let id = Uuid::new_v4().to_string();
    store::scores::insert_game(conn, &id, team_1, team_2).await?;
    log::debug!("Created game {id}: {} vs. {}", first.name, second.name);
    Ok(id)
}

async fn update_one(
    conn: &mut SqliteConnection,
    game_id: &str,
    team_id: &str,
    score: i64,
) -> Result<(), LeagueError> {
    match store::scores::update_score(conn, game_id, team_id, score).await? {
        1 => Ok(()),
        0 => Err(LeagueError::UnknownTeamForGame {
            game_id: game_id.to_string(),
            team_id: team_id.to_string(),
        }),
        n => Err(LeagueError::Inconsistent(format!(
            "score update for game {game_id} touched {n} rows"
        ))),
    }
}

/// Group score rows into games of exactly two rows each, both teams in the
/// same division.
fn group_games(scores: Vec<Score>, teams: &[Team]) -> Result<Vec<Game>, LeagueError> {
    let divisions: HashMap<&str, Option<&str>> = teams
        .iter()
        .map(|t| (t.id.as_str(), t.division_id.as_deref()))
        .collect();

    let mut by_game: BTreeMap<String, Vec<Score>> = BTreeMap::new();
    for s in scores {
        by_game.entry(s.game_id.clone()).or_default().push(s);
    }
    by_game
        .into_iter()
        .map(|(id, rows)| {
            let game = Game::from_scores(&id, rows)?;
            let [a, b] = game.team_ids();
            match (divisions.get(a), divisions.get(b)) {
                (Some(Some(x)), Some(Some(y))) if x == y => Ok(game),
                _ => Err(LeagueError::Inconsistent(format!(
                    "game {id} should not be played across divisions"
                ))),
            }
        })
        .collect()
}
