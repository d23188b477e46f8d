//! HTTP API - JSON-over-HTTP surface for the game store
//!
//! Provides:
//! - Onboarding endpoints (users, farms)
//! - Quest catalog, quest attempts, and the completion/accrual endpoint
//! - Scheme catalog and applications
//! - Market prices and the leaderboard

pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::game::GameStore;

/// Shared handler state: the store carries its own interior synchronization
/// (sled trees plus the per-user accrual locks).
pub type SharedStore = Arc<GameStore>;

/// Create the API router
pub fn create_router(store: SharedStore) -> Router {
    Router::new()
        // Users
        .route("/api/users", post(routes::create_user))
        .route("/api/users/:id", get(routes::get_user))
        .route("/api/users/mobile/:mobile", get(routes::get_user_by_mobile))
        // Farms
        .route("/api/farms", post(routes::create_farm))
        .route("/api/farms/user/:user_id", get(routes::get_farm_by_user))
        // Quest catalog and attempts. GET takes a user id, PATCH an attempt
        // id; the segment shares one parameter name for the route tree.
        .route("/api/quests", get(routes::list_quests))
        .route("/api/user-quests", post(routes::start_quest))
        .route(
            "/api/user-quests/:id",
            get(routes::list_user_quests).patch(routes::update_quest_step),
        )
        .route(
            "/api/user-quests/:id/complete",
            post(routes::complete_quest),
        )
        // Progress
        .route("/api/user-progress/:user_id", get(routes::get_progress))
        // Schemes
        .route("/api/schemes", get(routes::list_schemes))
        .route("/api/user-schemes", post(routes::apply_for_scheme))
        .route(
            "/api/user-schemes/:id",
            get(routes::list_user_schemes).patch(routes::decide_scheme),
        )
        // Market prices
        .route("/api/market-prices", get(routes::list_market_prices))
        // Leaderboard
        .route("/api/leaderboard", get(routes::leaderboard))
        // Service status
        .route("/api/status", get(routes::api_status))
        .route("/health", get(routes::health))
        .with_state(store)
}
