use std::sync::Arc;

use axum::extract::FromRef;
use rand::Rng;
use tracing::debug;
use uuid::Uuid;

use crate::{
    error::AppError,
    state::AppState,
    users::{UserStore, UserView},
};

/// Uniform random pick over everyone but the caller.
#[derive(Clone)]
pub struct DiscoverySelector {
    users: Arc<dyn UserStore>,
}

impl FromRef<AppState> for DiscoverySelector {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.users.clone())
    }
}

impl DiscoverySelector {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn pick_random(&self, excluding: Uuid) -> Result<UserView, AppError> {
        if self.users.find_by_id(excluding).await?.is_none() {
            return Err(AppError::NotFound("User not found"));
        }

        let candidates = self.users.count_except(excluding).await?;
        if candidates <= 0 {
            return Err(AppError::NoCandidates);
        }
        let offset = rand::thread_rng().gen_range(0..candidates);
        debug!(candidates, offset, "discovery pick");

        self.users
            .nth_except(excluding, offset)
            .await?
            .map(UserView::from)
            .ok_or(AppError::NoCandidates)
    }
}
