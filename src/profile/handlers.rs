use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{dto::SavePlaylistRequest, services::Profiles};
use crate::{
    auth::AuthUser,
    error::AppError,
    playlists::Playlist,
    state::AppState,
    users::{ProfileUpdate, UserView},
};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

pub fn playlist_routes() -> Router<AppState> {
    Router::new().route("/playlist", get(get_playlist).post(save_playlist))
}

#[instrument(skip(profiles, auth), fields(user_id = %auth.user_id))]
pub async fn get_profile(
    State(profiles): State<Profiles>,
    auth: AuthUser,
) -> Result<Json<UserView>, AppError> {
    Ok(Json(profiles.get(auth.user_id).await?))
}

#[instrument(skip(profiles, auth, payload), fields(user_id = %auth.user_id))]
pub async fn update_profile(
    State(profiles): State<Profiles>,
    auth: AuthUser,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<UserView>, AppError> {
    let Json(update) = payload?;
    Ok(Json(profiles.update(auth.user_id, update).await?))
}

#[instrument(skip(profiles, auth), fields(user_id = %auth.user_id))]
pub async fn get_playlist(
    State(profiles): State<Profiles>,
    auth: AuthUser,
) -> Result<Json<Playlist>, AppError> {
    Ok(Json(profiles.get_playlist(auth.user_id).await?))
}

#[instrument(skip(profiles, auth, payload), fields(user_id = %auth.user_id))]
pub async fn save_playlist(
    State(profiles): State<Profiles>,
    auth: AuthUser,
    payload: Result<Json<SavePlaylistRequest>, JsonRejection>,
) -> Result<Json<Playlist>, AppError> {
    let Json(body) = payload?;
    Ok(Json(profiles.save_playlist(auth.user_id, body.songs).await?))
}
