//! Soldiers, bases and teams

pub mod base;
pub mod soldier;
pub mod team;

pub use base::Base;
pub use soldier::{Inventory, LifeState, Soldier, SoldierStats};
pub use team::{draw_teams, Roster, RosterLookup, Team, PALETTE};
