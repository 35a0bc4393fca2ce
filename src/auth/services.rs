use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{info, instrument, warn};

use super::{
    dto::{LoginRequest, RegisterRequest, SessionResponse},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
};
use crate::{
    error::AppError,
    state::AppState,
    users::{NewUser, UserStore, UserView},
    validation::{is_valid_email, validate_password, validate_taste_list},
};

/// Registration and login over the user store.
#[derive(Clone)]
pub struct Credentials {
    users: Arc<dyn UserStore>,
    keys: JwtKeys,
}

impl FromRef<AppState> for Credentials {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.users.clone(), JwtKeys::from_ref(state))
    }
}

impl Credentials {
    pub fn new(users: Arc<dyn UserStore>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register(&self, req: RegisterRequest) -> Result<UserView, AppError> {
        if req.email.is_empty() {
            return Err(AppError::validation("Email is required"));
        }
        if req.password.is_empty() {
            return Err(AppError::validation("Password is required"));
        }
        if !is_valid_email(&req.email) {
            return Err(AppError::validation("Invalid email format"));
        }
        validate_password(&req.password)?;
        validate_taste_list("favorite_songs", &req.favorite_songs)?;
        validate_taste_list("favorite_artists", &req.favorite_artists)?;
        validate_taste_list("favorite_genres", &req.favorite_genres)?;

        if self.users.find_by_email(&req.email).await?.is_some() {
            warn!("email already registered");
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = hash_password(&req.password).map_err(AppError::Internal)?;
        let created = self
            .users
            .create(NewUser {
                email: req.email,
                password_hash,
                favorite_songs: req.favorite_songs,
                favorite_artists: req.favorite_artists,
                favorite_genres: req.favorite_genres,
                spotify_username: req.spotify_username,
            })
            .await?;

        // a concurrent registration can win between the lookup and the insert
        let user = created.ok_or(AppError::DuplicateEmail)?;
        info!(user_id = %user.id, "user registered");
        Ok(user.into())
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn authenticate(&self, req: LoginRequest) -> Result<SessionResponse, AppError> {
        if req.email.is_empty() {
            return Err(AppError::validation("Email is required"));
        }
        if req.password.is_empty() {
            return Err(AppError::validation("Password is required"));
        }

        let Some(user) = self.users.find_by_email(&req.email).await? else {
            warn!("login unknown email");
            return Err(AppError::InvalidCredentials);
        };

        let ok = verify_password(&req.password, &user.password_hash).map_err(AppError::Internal)?;
        if !ok {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AppError::InvalidCredentials);
        }

        let token = self
            .keys
            .issue(user.id, &user.email)
            .map_err(AppError::Internal)?;
        info!(user_id = %user.id, "user logged in");
        Ok(SessionResponse {
            token,
            user_id: user.id,
            email: user.email,
        })
    }
}
