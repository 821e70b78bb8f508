//! `Teams` table.

use crate::models::Team;
use sqlx::SqliteConnection;

const SELECT_TEAMS: &str = "SELECT ID AS id, Name AS name, DivisionID AS division_id FROM Teams";

pub async fn create_table(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS Teams (
            ID VARCHAR(36) PRIMARY KEY,
            Name VARCHAR(255) NOT NULL,
            DivisionID VARCHAR(36)
        )",
    )
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn insert(conn: &mut SqliteConnection, team: &Team) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO Teams (ID, Name, DivisionID) VALUES (?, ?, ?)")
        .bind(&team.id)
        .bind(&team.name)
        .bind(team.division_id.as_deref())
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn rename(conn: &mut SqliteConnection, id: &str, name: &str) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("UPDATE Teams SET Name = ? WHERE ID = ?")
        .bind(name)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}

pub async fn delete(conn: &mut SqliteConnection, id: &str) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM Teams WHERE ID = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}

pub async fn get(conn: &mut SqliteConnection, id: &str) -> Result<Option<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(&format!("{SELECT_TEAMS} WHERE ID = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn all(conn: &mut SqliteConnection) -> Result<Vec<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(&format!("{SELECT_TEAMS} ORDER BY Name, ID"))
        .fetch_all(&mut *conn)
        .await
}

pub async fn without_division(conn: &mut SqliteConnection) -> Result<Vec<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(&format!(
        "{SELECT_TEAMS} WHERE DivisionID IS NULL ORDER BY Name, ID"
    ))
    .fetch_all(&mut *conn)
    .await
}

pub async fn for_division(
    conn: &mut SqliteConnection,
    division_id: &str,
) -> Result<Vec<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(&format!(
        "{SELECT_TEAMS} WHERE DivisionID = ? ORDER BY Name, ID"
    ))
    .bind(division_id)
    .fetch_all(&mut *conn)
    .await
}

pub async fn count_in_division(
    conn: &mut SqliteConnection,
    division_id: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM Teams WHERE DivisionID = ?")
        .bind(division_id)
        .fetch_one(&mut *conn)
        .await
}

/// Set the team's division only if it has none. Returns rows updated (0 or 1).
pub async fn assign_to_division(
    conn: &mut SqliteConnection,
    team_id: &str,
    division_id: &str,
) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("UPDATE Teams SET DivisionID = ? WHERE ID = ? AND DivisionID IS NULL")
        .bind(division_id)
        .bind(team_id)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}

/// Clear the team's division only if it is `division_id`. Returns rows updated (0 or 1).
pub async fn unassign(
    conn: &mut SqliteConnection,
    team_id: &str,
    division_id: &str,
) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("UPDATE Teams SET DivisionID = NULL WHERE ID = ? AND DivisionID = ?")
        .bind(team_id)
        .bind(division_id)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}

pub async fn unassign_division(
    conn: &mut SqliteConnection,
    division_id: &str,
) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("UPDATE Teams SET DivisionID = NULL WHERE DivisionID = ?")
        .bind(division_id)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}

/// True if any score row or bracket slot mentions the team.
pub async fn is_referenced(conn: &mut SqliteConnection, team_id: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM Scores WHERE TeamID = ?1)
            OR EXISTS(SELECT 1 FROM TournamentGames
                WHERE TeamID1 = ?1 OR TeamID2 = ?1 OR Winner = ?1)",
    )
    .bind(team_id)
    .fetch_one(&mut *conn)
    .await
}

/// True if the team has any round-robin game.
pub async fn has_games(conn: &mut SqliteConnection, team_id: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM Scores WHERE TeamID = ?)")
        .bind(team_id)
        .fetch_one(&mut *conn)
        .await
}

/// Some member of the division that has a round-robin game, if any.
pub async fn scheduled_member(
    conn: &mut SqliteConnection,
    division_id: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT Teams.ID FROM Teams
            JOIN Scores ON Scores.TeamID = Teams.ID
            WHERE Teams.DivisionID = ?
            LIMIT 1",
    )
    .bind(division_id)
    .fetch_optional(&mut *conn)
    .await
}
