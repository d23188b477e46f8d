//! API route handlers
//!
//! One handler per endpoint with an explicit request struct for every create
//! or update, so malformed payloads are rejected at the boundary instead of
//! reaching the store as duck-typed maps.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::SharedStore;
use crate::game::leaderboard::LeaderboardEntry;
use crate::game::quest;
use crate::game::scheme::{self, SchemeDecision};
use crate::game::types::{
    FarmRecord, MarketPriceRecord, ProgressRecord, QuestRecord, SchemeRecord, SchemeStatus,
    UserQuestRecord, UserRecord, UserSchemeRecord,
};
use crate::game::GameError;
use crate::metrics;
use crate::validation;

/// Uniform error envelope: `{"error": "..."}` with a status derived from the
/// error taxonomy (Validation → 400, NotFound → 404, Conflict → 409, the
/// rest → 500).
pub struct ApiError(GameError);

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            GameError::Validation(_) => StatusCode::BAD_REQUEST,
            GameError::NotFound(_) => StatusCode::NOT_FOUND,
            GameError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("request failed: {}", self.0);
        }
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// === Users ===

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub mobile_number: String,
    pub age_group: String,
    #[serde(default)]
    pub language: Option<String>,
}

/// POST /api/users - create a user together with its progress record
pub async fn create_user(
    State(store): State<SharedStore>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<UserRecord>, ApiError> {
    validation::validate_name(&req.name).map_err(GameError::from)?;
    validation::validate_mobile_number(&req.mobile_number).map_err(GameError::from)?;
    validation::validate_age_group(&req.age_group).map_err(GameError::from)?;
    let language = req.language.unwrap_or_else(|| "hi".to_string());
    validation::validate_language(&language).map_err(GameError::from)?;

    let user = store.create_user(UserRecord::new(
        &req.name,
        &req.mobile_number,
        &req.age_group,
        &language,
    ))?;
    metrics::inc_users_created();
    Ok(Json(user))
}

/// GET /api/users/:id
pub async fn get_user(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<UserRecord>, ApiError> {
    Ok(Json(store.get_user(&id)?))
}

/// GET /api/users/mobile/:mobile
pub async fn get_user_by_mobile(
    State(store): State<SharedStore>,
    Path(mobile): Path<String>,
) -> Result<Json<UserRecord>, ApiError> {
    let user = store
        .find_user_by_mobile(&mobile)?
        .ok_or_else(|| GameError::NotFound(format!("user with mobile: {}", mobile)))?;
    Ok(Json(user))
}

// === Farms ===

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFarmRequest {
    pub user_id: String,
    pub state: String,
    pub district: String,
    pub taluk: String,
    pub gram_panchayat: String,
    pub village: String,
    pub farm_size: String,
    pub soil_type: String,
    pub primary_crops: Vec<String>,
    pub water_source: String,
}

/// POST /api/farms
pub async fn create_farm(
    State(store): State<SharedStore>,
    Json(req): Json<CreateFarmRequest>,
) -> Result<Json<FarmRecord>, ApiError> {
    for (field, value) in [
        ("state", &req.state),
        ("district", &req.district),
        ("taluk", &req.taluk),
        ("gramPanchayat", &req.gram_panchayat),
        ("village", &req.village),
        ("farmSize", &req.farm_size),
        ("soilType", &req.soil_type),
        ("waterSource", &req.water_source),
    ] {
        validation::require_text(field, value).map_err(GameError::from)?;
    }
    validation::validate_primary_crops(&req.primary_crops).map_err(GameError::from)?;

    let farm = FarmRecord::new(
        &req.user_id,
        &req.state,
        &req.district,
        &req.taluk,
        &req.gram_panchayat,
        &req.village,
    )
    .with_farm_size(&req.farm_size)
    .with_soil_type(&req.soil_type)
    .with_primary_crops(req.primary_crops.clone())
    .with_water_source(&req.water_source);

    Ok(Json(store.create_farm(farm)?))
}

/// GET /api/farms/user/:user_id
pub async fn get_farm_by_user(
    State(store): State<SharedStore>,
    Path(user_id): Path<String>,
) -> Result<Json<FarmRecord>, ApiError> {
    let farm = store
        .find_farm_by_user(&user_id)?
        .ok_or_else(|| GameError::NotFound(format!("farm for user: {}", user_id)))?;
    Ok(Json(farm))
}

// === Quests ===

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
}

/// GET /api/quests?category=
pub async fn list_quests(
    State(store): State<SharedStore>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<QuestRecord>>, ApiError> {
    Ok(Json(store.list_quests(query.category.as_deref())?))
}

/// GET /api/user-quests/:user_id
pub async fn list_user_quests(
    State(store): State<SharedStore>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<UserQuestRecord>>, ApiError> {
    Ok(Json(store.list_user_quests(&user_id)?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartQuestRequest {
    pub user_id: String,
    pub quest_id: String,
}

/// POST /api/user-quests - start a quest attempt
pub async fn start_quest(
    State(store): State<SharedStore>,
    Json(req): Json<StartQuestRequest>,
) -> Result<Json<UserQuestRecord>, ApiError> {
    Ok(Json(quest::start_quest(&store, &req.user_id, &req.quest_id)?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestStepRequest {
    pub step_index: usize,
    pub done: bool,
}

/// PATCH /api/user-quests/:id - mark one step done (or not done)
pub async fn update_quest_step(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(req): Json<UpdateQuestStepRequest>,
) -> Result<Json<UserQuestRecord>, ApiError> {
    Ok(Json(quest::set_step_progress(
        &store,
        &id,
        req.step_index,
        req.done,
    )?))
}

/// POST /api/user-quests/:id/complete - guarded completion plus accrual
pub async fn complete_quest(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<UserQuestRecord>, ApiError> {
    Ok(Json(quest::complete_quest(&store, &id)?))
}

// === Progress ===

/// GET /api/user-progress/:user_id
pub async fn get_progress(
    State(store): State<SharedStore>,
    Path(user_id): Path<String>,
) -> Result<Json<ProgressRecord>, ApiError> {
    Ok(Json(store.get_progress(&user_id)?))
}

// === Schemes ===

/// GET /api/schemes?category=
pub async fn list_schemes(
    State(store): State<SharedStore>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<SchemeRecord>>, ApiError> {
    Ok(Json(store.list_schemes(query.category.as_deref())?))
}

/// GET /api/user-schemes/:user_id
pub async fn list_user_schemes(
    State(store): State<SharedStore>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<UserSchemeRecord>>, ApiError> {
    Ok(Json(store.list_user_schemes(&user_id)?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplySchemeRequest {
    pub user_id: String,
    pub scheme_id: String,
}

/// POST /api/user-schemes - apply for a scheme
pub async fn apply_for_scheme(
    State(store): State<SharedStore>,
    Json(req): Json<ApplySchemeRequest>,
) -> Result<Json<UserSchemeRecord>, ApiError> {
    Ok(Json(scheme::apply_for_scheme(
        &store,
        &req.user_id,
        &req.scheme_id,
    )?))
}

#[derive(Debug, Deserialize)]
pub struct DecideSchemeRequest {
    pub status: SchemeStatus,
}

/// PATCH /api/user-schemes/:id - approve or reject a pending application
pub async fn decide_scheme(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(req): Json<DecideSchemeRequest>,
) -> Result<Json<UserSchemeRecord>, ApiError> {
    let decision = match req.status {
        SchemeStatus::Approved => SchemeDecision::Approve,
        SchemeStatus::Rejected => SchemeDecision::Reject,
        other => {
            return Err(GameError::Validation(format!(
                "status must be approved or rejected, got {:?}",
                other
            ))
            .into())
        }
    };
    Ok(Json(scheme::decide_application(&store, &id, decision)?))
}

// === Market prices ===

#[derive(Debug, Deserialize)]
pub struct MarketPriceQuery {
    pub district: Option<String>,
    pub crop: Option<String>,
}

/// GET /api/market-prices?district=&crop=
///
/// A crop filter returns that crop's quotes newest first; otherwise quotes
/// are listed oldest first, optionally restricted to one district.
pub async fn list_market_prices(
    State(store): State<SharedStore>,
    Query(query): Query<MarketPriceQuery>,
) -> Result<Json<Vec<MarketPriceRecord>>, ApiError> {
    let prices = match query.crop.as_deref() {
        Some(crop) => store.latest_prices_by_crop(crop)?,
        None => store.list_market_prices(query.district.as_deref())?,
    };
    Ok(Json(prices))
}

// === Leaderboard ===

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardQuery {
    pub gram_panchayat: Option<String>,
    pub district: Option<String>,
}

/// GET /api/leaderboard?gramPanchayat=&district=
pub async fn leaderboard(
    State(store): State<SharedStore>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    Ok(Json(crate::game::leaderboard::leaderboard(
        &store,
        query.gram_panchayat.as_deref(),
        query.district.as_deref(),
    )?))
}

// === Service status ===

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub version: String,
    pub users: usize,
    pub farms: usize,
    pub quests: usize,
    pub user_quests: usize,
    pub schemes: usize,
    pub user_schemes: usize,
    pub market_prices: usize,
    pub metrics: metrics::Snapshot,
}

/// GET /api/status
pub async fn api_status(State(store): State<SharedStore>) -> Json<StatusResponse> {
    let counts = store.counts();
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        users: counts.users,
        farms: counts.farms,
        quests: counts.quests,
        user_quests: counts.user_quests,
        schemes: counts.schemes,
        user_schemes: counts.user_schemes,
        market_prices: counts.market_prices,
        metrics: metrics::snapshot(),
    })
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    "OK"
}
