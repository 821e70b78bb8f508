//! `Divisions` table.

use crate::models::Division;
use sqlx::SqliteConnection;

const SELECT_DIVISIONS: &str = "SELECT ID AS id, Name AS name, Size AS size FROM Divisions";

pub async fn create_table(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS Divisions (
            ID VARCHAR(36) PRIMARY KEY,
            Name VARCHAR(255) NOT NULL,
            Size TINYINT NOT NULL
        )",
    )
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn insert(conn: &mut SqliteConnection, division: &Division) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO Divisions (ID, Name, Size) VALUES (?, ?, ?)")
        .bind(&division.id)
        .bind(&division.name)
        .bind(division.size)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn rename(conn: &mut SqliteConnection, id: &str, name: &str) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("UPDATE Divisions SET Name = ? WHERE ID = ?")
        .bind(name)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}

pub async fn update_size(conn: &mut SqliteConnection, id: &str, size: i64) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("UPDATE Divisions SET Size = ? WHERE ID = ?")
        .bind(size)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}

pub async fn delete(conn: &mut SqliteConnection, id: &str) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM Divisions WHERE ID = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}

pub async fn get(conn: &mut SqliteConnection, id: &str) -> Result<Option<Division>, sqlx::Error> {
    sqlx::query_as::<_, Division>(&format!("{SELECT_DIVISIONS} WHERE ID = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn all(conn: &mut SqliteConnection) -> Result<Vec<Division>, sqlx::Error> {
    sqlx::query_as::<_, Division>(&format!("{SELECT_DIVISIONS} ORDER BY Name, ID"))
        .fetch_all(&mut *conn)
        .await
}
