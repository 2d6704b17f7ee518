use thiserror::Error;

use crate::core::types::{CellPos, SoldierId};

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid maze dimensions {width}x{height} (minimum is 3x3)")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Not enough free cells to place {what}: needed {needed}, available {available}")]
    InsufficientFreeCells {
        what: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("Invalid action: {0}")]
    InvalidAction(#[from] ActionError),

    #[error("Map load error: {0}")]
    MapLoad(#[from] MapLoadError),

    #[error("Soldier not found: {0}")]
    SoldierNotFound(SoldierId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Policy error: {0}")]
    PolicyError(String),

    #[error("Remote model error: {0}")]
    RemoteModel(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Reasons an action submission is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("{0} is dead")]
    SoldierDead(SoldierId),

    #[error("{soldier} cannot move into {target}")]
    Blocked { soldier: SoldierId, target: CellPos },

    #[error("{0} has no target in attack range")]
    NoTargetInRange(SoldierId),
}

/// Failures while reading a text map
#[derive(Error, Debug)]
pub enum MapLoadError {
    #[error("map is empty")]
    Empty,

    #[error("line {line} has width {found}, expected {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown character {ch:?} at line {line}, column {column}")]
    UnknownCharacter { ch: char, line: usize, column: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
