//! # KrishiQuest - Gamified Farming Education Backend
//!
//! KrishiQuest is a REST backend for a farming-education application. Farmers
//! create a profile and a farm, work through sustainable-farming quests with
//! per-step progress, apply for government schemes, check mandi prices, and
//! compare sustainability scores on a leaderboard.
//!
//! ## Features
//!
//! - **Quest Engine**: catalog quests with fixed coin/XP/badge rewards, per-step
//!   progress vectors, and a guarded completion transition with a server-side
//!   75% step gate.
//! - **Reward Accrual**: quest completion atomically folds rewards into the
//!   user's progress record under a per-user lock, keeping badge sets
//!   duplicate-free and totals monotonically non-decreasing.
//! - **Scheme Applications**: government-scheme catalog with apply and
//!   approve/reject transitions.
//! - **Market Prices**: append-only mandi quotes filterable by district or crop.
//! - **Leaderboard**: sustainability-score ranking with gram-panchayat and
//!   district filters joined through each user's farm.
//! - **Embedded Storage**: sled trees per entity with bincode-encoded,
//!   schema-versioned records and JSON seed catalogs.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use krishiquest::api::create_router;
//! use krishiquest::config::Config;
//! use krishiquest::game::GameStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let store = Arc::new(GameStore::open(&config.storage.data_dir)?);
//!     let app = create_router(store);
//!
//!     let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.server.port)).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`game`] - Entity records, the sled store, quest/scheme lifecycles, accrual, leaderboard
//! - [`api`] - axum router and route handlers
//! - [`config`] - Configuration management
//! - [`validation`] - Payload validation rules
//! - [`metrics`] - Process-wide operation counters

pub mod api;
pub mod config;
pub mod game;
pub mod logutil;
pub mod metrics;
pub mod validation;
