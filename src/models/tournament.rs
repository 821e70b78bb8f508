//! Playoff bracket: TournamentGame slots, Rounds, and the reconstructed Tournament.

use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which half of a bracket slot a team occupies.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    One,
    Two,
}

impl Side {
    /// Side of the next-round slot fed by `slot`: even slots fill side one, odd slots side two.
    pub fn for_slot(slot: usize) -> Self {
        if slot % 2 == 0 {
            Side::One
        } else {
            Side::Two
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::One => 0,
            Side::Two => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::One => write!(f, "1"),
            Side::Two => write!(f, "2"),
        }
    }
}

/// One game position in the bracket, keyed by (round, slot).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentGame {
    pub round: usize,
    pub slot: usize,
    /// Side one, side two. Each is filled at most once.
    pub team_ids: [Option<TeamId>; 2],
    /// Set once the game is decided; one of `team_ids`.
    pub winner: Option<TeamId>,
}

impl TournamentGame {
    pub fn empty(round: usize, slot: usize) -> Self {
        Self {
            round,
            slot,
            ..Self::default()
        }
    }

    pub fn team(&self, side: Side) -> Option<&str> {
        self.team_ids[side.index()].as_deref()
    }

    pub fn has_team(&self, team_id: &str) -> bool {
        self.team_ids.iter().flatten().any(|t| t == team_id)
    }

    /// Both sides filled and no winner yet.
    pub fn is_ready(&self) -> bool {
        self.team_ids.iter().all(Option::is_some) && self.winner.is_none()
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub games: Vec<TournamentGame>,
}

/// The whole bracket, round 0 first. Empty when no bracket is stored.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub rounds: Vec<Round>,
}

impl Tournament {
    /// Rebuild the bracket from stored slots in one pass. Each round is sized to
    /// its highest slot index + 1; missing positions become empty games.
    pub fn from_games(games: impl IntoIterator<Item = TournamentGame>) -> Self {
        let mut rounds: Vec<Round> = Vec::new();
        for game in games {
            if rounds.len() <= game.round {
                rounds.resize_with(game.round + 1, Round::default);
            }
            let round_idx = game.round;
            let round = &mut rounds[round_idx];
            if round.games.len() <= game.slot {
                let start = round.games.len();
                round
                    .games
                    .extend((start..=game.slot).map(|slot| TournamentGame::empty(round_idx, slot)));
            }
            let slot = game.slot;
            round.games[slot] = game;
        }
        Self { rounds }
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Teams the bracket was created for.
    pub fn size(&self) -> usize {
        self.rounds.first().map_or(0, |r| r.games.len() * 2)
    }

    pub fn game(&self, round: usize, slot: usize) -> Option<&TournamentGame> {
        self.rounds.get(round)?.games.get(slot)
    }

    /// Winner of the final, once it has been played.
    pub fn champion(&self) -> Option<&str> {
        let last = self.rounds.last()?;
        match last.games.as_slice() {
            [final_game] => final_game.winner.as_deref(),
            _ => None,
        }
    }
}
