//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use cribbage_league_web::{BracketEngine, Database, Notifier, Roster, ScoreLedger, Team};

/// Fresh in-memory league with every table created.
pub async fn database() -> Database {
    let db = Database::in_memory().await.unwrap();
    db.init().await.unwrap();
    db
}

pub struct League {
    pub db: Database,
    pub roster: Roster,
    pub ledger: ScoreLedger,
    pub bracket: BracketEngine,
    pub score_updates: Notifier,
    pub bracket_updates: Notifier,
}

pub async fn league() -> League {
    let db = database().await;
    let score_updates = Notifier::new();
    let bracket_updates = Notifier::new();
    League {
        roster: Roster::new(db.clone()),
        ledger: ScoreLedger::new(db.clone(), score_updates.clone()),
        bracket: BracketEngine::new(db.clone(), bracket_updates.clone()),
        db,
        score_updates,
        bracket_updates,
    }
}

/// In-memory teams T1..Tn, for the pure logic functions.
pub fn teams(n: usize) -> Vec<Team> {
    (1..=n)
        .map(|i| Team {
            id: format!("T{i}"),
            name: format!("Team {i}"),
            division_id: None,
        })
        .collect()
}

/// Create a division of `size` and fill it with `size` new teams named `{prefix}1..`.
pub async fn full_division(roster: &Roster, prefix: &str, size: i64) -> (String, Vec<Team>) {
    let division = roster.create_division(prefix, size).await.unwrap();
    let mut members = Vec::new();
    for i in 1..=size {
        let team = roster.create_team(&format!("{prefix}{i}")).await.unwrap();
        roster.assign_to_division(&team.id, &division.id).await.unwrap();
        members.push(team);
    }
    (division.id, members)
}
