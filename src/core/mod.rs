pub mod config;
pub mod error;
pub mod types;

pub use config::GameConfig;
pub use error::{ActionError, GameError, MapLoadError, Result};
pub use types::{CellPos, DamageKind, Direction, Rgb, SimTime, SoldierId, TeamId};
