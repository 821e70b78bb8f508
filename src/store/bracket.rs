//! `TournamentGames` table: the playoff bracket as sparse (round, slot) rows.

use crate::models::{LeagueError, Side, TournamentGame};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection};

const SELECT_GAMES: &str = "SELECT Round AS round, Idx AS slot, TeamID1 AS team_id_1, \
     TeamID2 AS team_id_2, Winner AS winner FROM TournamentGames";

#[derive(FromRow)]
struct SlotRow {
    round: i64,
    slot: i64,
    team_id_1: Option<String>,
    team_id_2: Option<String>,
    winner: Option<String>,
}

impl TryFrom<SlotRow> for TournamentGame {
    type Error = LeagueError;

    fn try_from(row: SlotRow) -> Result<Self, Self::Error> {
        let position = |v: i64| {
            usize::try_from(v).map_err(|_| {
                LeagueError::Inconsistent(format!(
                    "bracket row has negative position ({}, {})",
                    row.round, row.slot
                ))
            })
        };
        Ok(TournamentGame {
            round: position(row.round)?,
            slot: position(row.slot)?,
            team_ids: [row.team_id_1, row.team_id_2],
            winner: row.winner,
        })
    }
}

fn team_column(side: Side) -> &'static str {
    match side {
        Side::One => "TeamID1",
        Side::Two => "TeamID2",
    }
}

pub async fn create_table(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS TournamentGames (
            Round INTEGER NOT NULL,
            Idx INTEGER NOT NULL,
            TeamID1 VARCHAR(36),
            TeamID2 VARCHAR(36),
            Winner VARCHAR(36),

            PRIMARY KEY (Round, Idx)
        )",
    )
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn count(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM TournamentGames")
        .fetch_one(&mut *conn)
        .await
}

/// Insert empty games for every (round, slot) in one statement.
pub async fn insert_empty(
    conn: &mut SqliteConnection,
    slots: &[(usize, usize)],
) -> Result<(), sqlx::Error> {
    if slots.is_empty() {
        return Ok(());
    }
    let mut qb = QueryBuilder::<Sqlite>::new("INSERT INTO TournamentGames (Round, Idx) ");
    qb.push_values(slots, |mut row, &(round, slot)| {
        row.push_bind(round as i64).push_bind(slot as i64);
    });
    qb.build().execute(&mut *conn).await?;
    Ok(())
}

/// Fill one side of a slot only if that side is still empty. Returns rows updated.
pub async fn put_team(
    conn: &mut SqliteConnection,
    round: usize,
    slot: usize,
    side: Side,
    team_id: &str,
) -> Result<u64, sqlx::Error> {
    let column = team_column(side);
    let res = sqlx::query(&format!(
        "UPDATE TournamentGames SET {column} = ? WHERE Round = ? AND Idx = ? AND {column} IS NULL"
    ))
    .bind(team_id)
    .bind(round as i64)
    .bind(slot as i64)
    .execute(&mut *conn)
    .await?;
    Ok(res.rows_affected())
}

pub async fn set_winner(
    conn: &mut SqliteConnection,
    round: usize,
    slot: usize,
    team_id: &str,
) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("UPDATE TournamentGames SET Winner = ? WHERE Round = ? AND Idx = ?")
        .bind(team_id)
        .bind(round as i64)
        .bind(slot as i64)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}

pub async fn get(
    conn: &mut SqliteConnection,
    round: usize,
    slot: usize,
) -> Result<Option<TournamentGame>, LeagueError> {
    let row = sqlx::query_as::<_, SlotRow>(&format!("{SELECT_GAMES} WHERE Round = ? AND Idx = ?"))
        .bind(round as i64)
        .bind(slot as i64)
        .fetch_optional(&mut *conn)
        .await?;
    row.map(TournamentGame::try_from).transpose()
}

/// All slots ordered by round, then slot.
pub async fn all(conn: &mut SqliteConnection) -> Result<Vec<TournamentGame>, LeagueError> {
    let rows = sqlx::query_as::<_, SlotRow>(&format!("{SELECT_GAMES} ORDER BY Round, Idx"))
        .fetch_all(&mut *conn)
        .await?;
    rows.into_iter().map(TournamentGame::try_from).collect()
}

pub async fn delete_all(conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM TournamentGames")
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}
