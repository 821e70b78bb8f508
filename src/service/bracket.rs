//! Bracket engine: creates, seeds, advances and tears down the playoff bracket.

use crate::logic::{all_slots, first_round_pairs, next_slot};
use crate::models::{LeagueError, Side, Tournament};
use crate::notifier::Notifier;
use crate::service::ledger;
use crate::store::{self, Database};
use sqlx::SqliteConnection;

/// Owns the bracket rows. Every committed change wakes `notifier`'s subscribers.
#[derive(Clone)]
pub struct BracketEngine {
    db: Database,
    notifier: Notifier,
}

impl BracketEngine {
    pub fn new(db: Database, notifier: Notifier) -> Self {
        Self { db, notifier }
    }

    /// Create an empty `num_teams` bracket (a power of two). All or nothing.
    pub async fn initialize_tournament(&self, num_teams: usize) -> Result<(), LeagueError> {
        let mut tx = self.db.begin().await?;
        initialize(&mut tx, num_teams).await?;
        tx.commit().await?;
        log::info!("Initialized {num_teams}-team bracket");
        self.notifier.notify();
        Ok(())
    }

    /// Fill one empty side of a slot. A side that already holds a team is never overwritten.
    pub async fn put_team_into_slot(
        &self,
        round: usize,
        slot: usize,
        side: Side,
        team_id: &str,
    ) -> Result<(), LeagueError> {
        let mut conn = self.db.pool().acquire().await?;
        put_team(&mut conn, round, slot, side, team_id).await?;
        self.notifier.notify();
        Ok(())
    }

    /// Record the winner of a slot. The caller must make sure `team_id` plays in it;
    /// use [`BracketEngine::advance_winner`] for the checked version.
    pub async fn set_winner(&self, round: usize, slot: usize, team_id: &str) -> Result<(), LeagueError> {
        let mut conn = self.db.pool().acquire().await?;
        set_winner(&mut conn, round, slot, team_id).await?;
        self.notifier.notify();
        Ok(())
    }

    /// Record `team_id` as the winner of (round, slot) and move it into the next
    /// round, in one transaction. In the final this only records the champion.
    pub async fn advance_winner(
        &self,
        from_round: usize,
        from_slot: usize,
        team_id: &str,
    ) -> Result<(), LeagueError> {
        let mut tx = self.db.begin().await?;
        let game = store::bracket::get(&mut tx, from_round, from_slot)
            .await?
            .ok_or(LeagueError::SlotNotFound {
                round: from_round,
                slot: from_slot,
            })?;
        if !game.has_team(team_id) {
            log::warn!("Team {team_id} can't win round {from_round} game {from_slot}: not playing");
            return Err(LeagueError::WinnerNotInGame {
                round: from_round,
                slot: from_slot,
                team_id: team_id.to_string(),
            });
        }

        set_winner(&mut tx, from_round, from_slot, team_id).await?;

        let (round, slot, side) = next_slot(from_round, from_slot);
        if store::bracket::get(&mut tx, round, slot).await?.is_some() {
            put_team(&mut tx, round, slot, side, team_id).await?;
            log::info!("Team {team_id} advanced to round {round} game {slot}");
        } else {
            log::info!("Team {team_id} won the tournament");
        }

        tx.commit().await?;
        self.notifier.notify();
        Ok(())
    }

    /// The stored bracket; empty if none has been created.
    pub async fn load_tournament(&self) -> Result<Tournament, LeagueError> {
        let mut conn = self.db.pool().acquire().await?;
        let games = store::bracket::all(&mut conn).await?;
        Ok(Tournament::from_games(games))
    }

    /// Create a `size`-team bracket seeded from the current standings: the top
    /// seed plays the bottom seed, second plays second-to-last, and so on.
    pub async fn seed_from_standings(&self, size: usize) -> Result<(), LeagueError> {
        let mut tx = self.db.begin().await?;
        let standings = ledger::standings(&mut tx).await?;
        let pairs = first_round_pairs(&standings, size)?;

        initialize(&mut tx, size).await?;
        for (slot, (high, low)) in pairs.iter().enumerate() {
            put_team(&mut tx, 0, slot, Side::One, high).await?;
            put_team(&mut tx, 0, slot, Side::Two, low).await?;
        }

        tx.commit().await?;
        log::info!("Seeded {size}-team bracket from standings");
        self.notifier.notify();
        Ok(())
    }

    /// Remove the whole bracket.
    pub async fn delete_tournament(&self) -> Result<(), LeagueError> {
        let mut conn = self.db.pool().acquire().await?;
        let removed = store::bracket::delete_all(&mut conn).await?;
        log::info!("Deleted bracket ({removed} games)");
        self.notifier.notify();
        Ok(())
    }
}

async fn initialize(conn: &mut SqliteConnection, num_teams: usize) -> Result<(), LeagueError> {
    let slots = all_slots(num_teams)?;
    if store::bracket::count(conn).await? > 0 {
        return Err(LeagueError::BracketExists);
    }
    store::bracket::insert_empty(conn, &slots).await?;
    Ok(())
}

async fn put_team(
    conn: &mut SqliteConnection,
    round: usize,
    slot: usize,
    side: Side,
    team_id: &str,
) -> Result<(), LeagueError> {
    if store::bracket::put_team(conn, round, slot, side, team_id).await? == 1 {
        return Ok(());
    }
    match store::bracket::get(conn, round, slot).await? {
        Some(_) => Err(LeagueError::SlotTaken { round, slot, side }),
        None => Err(LeagueError::SlotNotFound { round, slot }),
    }
}

async fn set_winner(
    conn: &mut SqliteConnection,
    round: usize,
    slot: usize,
    team_id: &str,
) -> Result<(), LeagueError> {
    match store::bracket::set_winner(conn, round, slot, team_id).await? {
        0 => Err(LeagueError::SlotNotFound { round, slot }),
        _ => Ok(()),
    }
}
