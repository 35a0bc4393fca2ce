use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{MatchesResponse, SwipeResponse, SwipeRightRequest},
    services::DiscoverySelector,
};
use crate::{
    auth::AuthUser, error::AppError, matches::MatchEngine, state::AppState, users::UserView,
};

pub fn discover_routes() -> Router<AppState> {
    Router::new()
        .route("/discover/user", get(random_user))
        .route("/discover/swipe-right", post(swipe_right))
        .route("/discover/matches", get(list_matches))
}

#[instrument(skip(selector, auth), fields(user_id = %auth.user_id))]
pub async fn random_user(
    State(selector): State<DiscoverySelector>,
    auth: AuthUser,
) -> Result<Json<UserView>, AppError> {
    Ok(Json(selector.pick_random(auth.user_id).await?))
}

#[instrument(skip(engine, auth, payload), fields(user_id = %auth.user_id))]
pub async fn swipe_right(
    State(engine): State<MatchEngine>,
    auth: AuthUser,
    payload: Result<Json<SwipeRightRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SwipeResponse>), AppError> {
    let Json(body) = payload?;
    let target_id = body
        .user_id
        .ok_or_else(|| AppError::validation("user_id is required"))?;

    let outcome = engine.swipe_right(auth.user_id, target_id).await?;
    let status = if SwipeResponse::created(&outcome) {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome.into())))
}

#[instrument(skip(engine, auth), fields(user_id = %auth.user_id))]
pub async fn list_matches(
    State(engine): State<MatchEngine>,
    auth: AuthUser,
) -> Result<Json<MatchesResponse>, AppError> {
    let matches = engine.user_matches(auth.user_id).await?;
    Ok(Json(MatchesResponse {
        count: matches.len(),
        matches,
    }))
}
