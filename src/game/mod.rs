//! Core game logic: entity records, the sled-backed store, quest and scheme
//! lifecycles, reward accrual, and the leaderboard projection.

pub mod errors;
pub mod leaderboard;
pub mod progress;
pub mod quest;
pub mod scheme;
pub mod seed_loader;
pub mod store;
pub mod types;

pub use errors::GameError;
pub use store::{GameStore, GameStoreBuilder};
