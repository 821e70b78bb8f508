//! Team and Division data structures.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Unique identifier for a team (uuid string).
pub type TeamId = String;

/// Unique identifier for a division (uuid string).
pub type DivisionId = String;

/// Division sizes supported by the round-robin format.
pub const DIVISION_SIZES: [i64; 2] = [4, 6];

/// A registered team. A team belongs to at most one division.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// None until an operator places the team in a division.
    pub division_id: Option<DivisionId>,
}

impl Team {
    pub fn is_assigned(&self) -> bool {
        self.division_id.is_some()
    }
}

/// A round-robin pool of 4 or 6 teams.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Division {
    pub id: DivisionId,
    pub name: String,
    /// Target size: 4 or 6.
    pub size: i64,
}

impl Division {
    pub fn is_valid_size(size: i64) -> bool {
        DIVISION_SIZES.contains(&size)
    }
}

/// A division together with its current members (for API responses).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DivisionWithTeams {
    #[serde(flatten)]
    pub division: Division,
    pub teams: Vec<Team>,
}

impl DivisionWithTeams {
    pub fn is_full(&self) -> bool {
        self.teams.len() as i64 >= self.division.size
    }
}
