//! `Scores` table: one row per (game, team).

use crate::models::Score;
use sqlx::SqliteConnection;

const SELECT_SCORES: &str = "SELECT GameID AS game_id, TeamID AS team_id, Score AS score FROM Scores";

pub async fn create_table(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS Scores (
            GameID VARCHAR(36) NOT NULL,
            TeamID VARCHAR(36) NOT NULL,
            Score SMALLINT NOT NULL DEFAULT 0,

            PRIMARY KEY (GameID, TeamID)
        )",
    )
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Insert both rows of a new game with score 0. One statement, so both or neither land.
pub async fn insert_game(
    conn: &mut SqliteConnection,
    game_id: &str,
    team_1: &str,
    team_2: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO Scores (GameID, TeamID, Score) VALUES (?, ?, 0), (?, ?, 0)")
        .bind(game_id)
        .bind(team_1)
        .bind(game_id)
        .bind(team_2)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Returns rows updated; 0 means the team isn't in that game.
pub async fn update_score(
    conn: &mut SqliteConnection,
    game_id: &str,
    team_id: &str,
    score: i64,
) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("UPDATE Scores SET Score = ? WHERE GameID = ? AND TeamID = ?")
        .bind(score)
        .bind(game_id)
        .bind(team_id)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}

pub async fn get_score(
    conn: &mut SqliteConnection,
    game_id: &str,
    team_id: &str,
) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT Score FROM Scores WHERE GameID = ? AND TeamID = ?")
        .bind(game_id)
        .bind(team_id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn for_game(conn: &mut SqliteConnection, game_id: &str) -> Result<Vec<Score>, sqlx::Error> {
    sqlx::query_as::<_, Score>(&format!("{SELECT_SCORES} WHERE GameID = ? ORDER BY TeamID"))
        .bind(game_id)
        .fetch_all(&mut *conn)
        .await
}

/// Every score row of every game the team plays in, grouped by game.
pub async fn for_team_games(
    conn: &mut SqliteConnection,
    team_id: &str,
) -> Result<Vec<Score>, sqlx::Error> {
    sqlx::query_as::<_, Score>(&format!(
        "{SELECT_SCORES} WHERE GameID IN (SELECT GameID FROM Scores WHERE TeamID = ?)
            ORDER BY GameID, TeamID"
    ))
    .bind(team_id)
    .fetch_all(&mut *conn)
    .await
}

pub async fn all(conn: &mut SqliteConnection) -> Result<Vec<Score>, sqlx::Error> {
    sqlx::query_as::<_, Score>(&format!("{SELECT_SCORES} ORDER BY GameID, TeamID"))
        .fetch_all(&mut *conn)
        .await
}

pub async fn delete_all(conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM Scores").execute(&mut *conn).await?;
    Ok(res.rows_affected())
}
