//! Collectible items and their placement on the map

pub mod catalog;
pub mod economy;

pub use catalog::{ItemCatalog, ItemCategory, ItemKind, ItemProperties};
pub use economy::ItemEconomy;
