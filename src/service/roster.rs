//! Roster: team registration and division membership.

use crate::models::{Division, DivisionWithTeams, LeagueError, Team};
use crate::store::{self, Database};
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct Roster {
    db: Database,
}

impl Roster {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Register a team with no division.
    pub async fn create_team(&self, name: &str) -> Result<Team, LeagueError> {
        let team = Team {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            division_id: None,
        };
        let mut conn = self.db.pool().acquire().await?;
        store::teams::insert(&mut conn, &team).await?;
        log::info!("Created team {} ({})", team.name, team.id);
        Ok(team)
    }

    pub async fn rename_team(&self, id: &str, name: &str) -> Result<(), LeagueError> {
        let mut conn = self.db.pool().acquire().await?;
        match store::teams::rename(&mut conn, id, name.trim()).await? {
            0 => Err(LeagueError::not_found("team", id)),
            _ => Ok(()),
        }
    }

    /// Delete a team that no game or bracket slot refers to.
    pub async fn delete_team(&self, id: &str) -> Result<(), LeagueError> {
        let mut tx = self.db.begin().await?;
        if store::teams::is_referenced(&mut tx, id).await? {
            log::warn!("Refusing to delete team {id}: still scheduled");
            return Err(LeagueError::TeamInUse(id.to_string()));
        }
        if store::teams::delete(&mut tx, id).await? == 0 {
            return Err(LeagueError::not_found("team", id));
        }
        tx.commit().await?;
        log::info!("Deleted team {id}");
        Ok(())
    }

    pub async fn get_team(&self, id: &str) -> Result<Team, LeagueError> {
        let mut conn = self.db.pool().acquire().await?;
        store::teams::get(&mut conn, id)
            .await?
            .ok_or_else(|| LeagueError::not_found("team", id))
    }

    /// All teams, ordered by name.
    pub async fn all_teams(&self) -> Result<Vec<Team>, LeagueError> {
        let mut conn = self.db.pool().acquire().await?;
        Ok(store::teams::all(&mut conn).await?)
    }

    pub async fn teams_without_division(&self) -> Result<Vec<Team>, LeagueError> {
        let mut conn = self.db.pool().acquire().await?;
        Ok(store::teams::without_division(&mut conn).await?)
    }

    pub async fn teams_for_division(&self, division_id: &str) -> Result<Vec<Team>, LeagueError> {
        let mut conn = self.db.pool().acquire().await?;
        Ok(store::teams::for_division(&mut conn, division_id).await?)
    }

    pub async fn create_division(&self, name: &str, size: i64) -> Result<Division, LeagueError> {
        if !Division::is_valid_size(size) {
            return Err(LeagueError::InvalidDivisionSize(size));
        }
        let division = Division {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            size,
        };
        let mut conn = self.db.pool().acquire().await?;
        store::divisions::insert(&mut conn, &division).await?;
        log::info!("Created division {} ({} teams)", division.name, division.size);
        Ok(division)
    }

    pub async fn rename_division(&self, id: &str, name: &str) -> Result<(), LeagueError> {
        let mut conn = self.db.pool().acquire().await?;
        match store::divisions::rename(&mut conn, id, name.trim()).await? {
            0 => Err(LeagueError::not_found("division", id)),
            _ => Ok(()),
        }
    }

    /// Change the target size. The division can't shrink below its current membership.
    pub async fn resize_division(&self, id: &str, size: i64) -> Result<(), LeagueError> {
        if !Division::is_valid_size(size) {
            return Err(LeagueError::InvalidDivisionSize(size));
        }
        let mut tx = self.db.begin().await?;
        let members = store::teams::count_in_division(&mut tx, id).await?;
        if members > size {
            return Err(LeagueError::DivisionFull { size });
        }
        if store::divisions::update_size(&mut tx, id, size).await? == 0 {
            return Err(LeagueError::not_found("division", id));
        }
        tx.commit().await?;
        Ok(())
    }

    /// Delete a division; its teams become unassigned. Refused while any
    /// member has games.
    pub async fn delete_division(&self, id: &str) -> Result<(), LeagueError> {
        let mut tx = self.db.begin().await?;
        if let Some(team_id) = store::teams::scheduled_member(&mut tx, id).await? {
            log::warn!("Refusing to delete division {id}: team {team_id} has games");
            return Err(LeagueError::TeamInUse(team_id));
        }
        store::teams::unassign_division(&mut tx, id).await?;
        if store::divisions::delete(&mut tx, id).await? == 0 {
            return Err(LeagueError::not_found("division", id));
        }
        tx.commit().await?;
        log::info!("Deleted division {id}");
        Ok(())
    }

    pub async fn get_division(&self, id: &str) -> Result<Division, LeagueError> {
        let mut conn = self.db.pool().acquire().await?;
        store::divisions::get(&mut conn, id)
            .await?
            .ok_or_else(|| LeagueError::not_found("division", id))
    }

    pub async fn all_divisions(&self) -> Result<Vec<Division>, LeagueError> {
        let mut conn = self.db.pool().acquire().await?;
        Ok(store::divisions::all(&mut conn).await?)
    }

    pub async fn division_with_teams(&self, id: &str) -> Result<DivisionWithTeams, LeagueError> {
        let mut conn = self.db.pool().acquire().await?;
        let division = store::divisions::get(&mut conn, id)
            .await?
            .ok_or_else(|| LeagueError::not_found("division", id))?;
        let teams = store::teams::for_division(&mut conn, id).await?;
        Ok(DivisionWithTeams { division, teams })
    }

    /// Place a team in a division. The team must not already have one and the
    /// division must have room.
    pub async fn assign_to_division(&self, team_id: &str, division_id: &str) -> Result<(), LeagueError> {
        let mut tx = self.db.begin().await?;
        let division = store::divisions::get(&mut tx, division_id)
            .await?
            .ok_or_else(|| LeagueError::not_found("division", division_id))?;
        let team = store::teams::get(&mut tx, team_id)
            .await?
            .ok_or_else(|| LeagueError::not_found("team", team_id))?;
        if team.is_assigned() {
            return Err(LeagueError::TeamAlreadyInDivision);
        }
        if store::teams::count_in_division(&mut tx, division_id).await? >= division.size {
            log::warn!("Division {} is full", division.name);
            return Err(LeagueError::DivisionFull {
                size: division.size,
            });
        }
        match store::teams::assign_to_division(&mut tx, team_id, division_id).await? {
            0 => return Err(LeagueError::TeamAlreadyInDivision),
            1 => {}
            n => {
                return Err(LeagueError::Inconsistent(format!(
                    "assigning team {team_id} updated {n} rows"
                )))
            }
        }
        tx.commit().await?;
        log::info!("Assigned team {} to division {}", team.name, division.name);
        Ok(())
    }

    /// Take a team out of `division_id`. A team with games stays put.
    pub async fn unassign_from_division(&self, team_id: &str, division_id: &str) -> Result<(), LeagueError> {
        let mut tx = self.db.begin().await?;
        if store::teams::has_games(&mut tx, team_id).await? {
            log::warn!("Refusing to unassign team {team_id}: still scheduled");
            return Err(LeagueError::TeamInUse(team_id.to_string()));
        }
        match store::teams::unassign(&mut tx, team_id, division_id).await? {
            0 => {
                store::teams::get(&mut tx, team_id)
                    .await?
                    .ok_or_else(|| LeagueError::not_found("team", team_id))?;
                Err(LeagueError::TeamNotInDivision)
            }
            _ => {
                tx.commit().await?;
                log::info!("Unassigned team {team_id} from division {division_id}");
                Ok(())
            }
        }
    }
}
