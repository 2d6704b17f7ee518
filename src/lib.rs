//! Flag Maze - tick-driven maze capture-the-flag simulation

pub mod core;
pub mod entity;
pub mod items;
pub mod maze;
pub mod policy;
pub mod simulation;
