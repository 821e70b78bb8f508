//! Stateful league components built on the store: roster, score ledger, bracket engine.

mod bracket;
mod ledger;
mod roster;

pub use bracket::BracketEngine;
pub use ledger::ScoreLedger;
pub use roster::Roster;
