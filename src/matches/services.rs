use std::sync::Arc;

use axum::extract::FromRef;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{repo::MatchStore, repo_types::MatchRecord};
use crate::{
    error::AppError,
    state::AppState,
    swipes::{SwipeEdge, SwipeLedger},
    users::{UserStore, UserView},
};

/// What a right swipe did to the pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// The pair is matched. `is_new` is true only for the call that created it.
    Matched { record: MatchRecord, is_new: bool },
    /// One-sided interest. `is_new` is false when the edge was already there.
    Swiped { edge: SwipeEdge, is_new: bool },
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchEntry {
    pub match_id: Uuid,
    pub matched_user: UserView,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Reconciles right swipes into canonical match records.
#[derive(Clone)]
pub struct MatchEngine {
    users: Arc<dyn UserStore>,
    ledger: SwipeLedger,
    matches: Arc<dyn MatchStore>,
}

impl FromRef<AppState> for MatchEngine {
    fn from_ref(state: &AppState) -> Self {
        Self::new(
            state.users.clone(),
            SwipeLedger::new(state.swipes.clone()),
            state.matches.clone(),
        )
    }
}

impl MatchEngine {
    pub fn new(
        users: Arc<dyn UserStore>,
        ledger: SwipeLedger,
        matches: Arc<dyn MatchStore>,
    ) -> Self {
        Self {
            users,
            ledger,
            matches,
        }
    }

    #[instrument(skip(self))]
    pub async fn swipe_right(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> Result<SwipeOutcome, AppError> {
        if actor_id == target_id {
            return Err(AppError::SelfSwipe);
        }
        if self.users.find_by_id(actor_id).await?.is_none() {
            return Err(AppError::NotFound("User not found"));
        }
        if self.users.find_by_id(target_id).await?.is_none() {
            return Err(AppError::NotFound("Swiped user not found"));
        }

        if let Some(record) = self.matches.find_by_users(actor_id, target_id).await? {
            return Ok(SwipeOutcome::Matched {
                record,
                is_new: false,
            });
        }

        if let Some(matched) = self.consume_reciprocal(actor_id, target_id).await? {
            return Ok(matched);
        }

        let (edge, is_new) = self.ledger.record_right_swipe(actor_id, target_id).await?;

        // the target may have swiped back while this edge was being written
        if let Some(matched) = self.consume_reciprocal(actor_id, target_id).await? {
            return Ok(matched);
        }
        if let Some(record) = self.matches.find_by_users(actor_id, target_id).await? {
            return Ok(SwipeOutcome::Matched {
                record,
                is_new: false,
            });
        }

        Ok(SwipeOutcome::Swiped { edge, is_new })
    }

    async fn consume_reciprocal(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> Result<Option<SwipeOutcome>, AppError> {
        if self.ledger.find_edge(target_id, actor_id).await?.is_none() {
            return Ok(None);
        }
        let Some((record, is_new)) = self
            .matches
            .create_from_reciprocal(actor_id, target_id)
            .await?
        else {
            return Ok(None);
        };
        if is_new {
            info!(match_id = %record.id, %actor_id, %target_id, "match created");
        }
        Ok(Some(SwipeOutcome::Matched { record, is_new }))
    }

    /// All matches of `user_id`, newest first, resolved to the other participant.
    #[instrument(skip(self))]
    pub async fn user_matches(&self, user_id: Uuid) -> Result<Vec<MatchEntry>, AppError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound("User not found"));
        }

        let records = self.matches.list_for_user(user_id).await?;
        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            let other_id = record.other(user_id);
            match self.users.find_by_id(other_id).await? {
                Some(other) => entries.push(MatchEntry {
                    match_id: record.id,
                    matched_user: other.into(),
                    created_at: record.created_at,
                }),
                None => warn!(match_id = %record.id, %other_id, "matched user missing"),
            }
        }
        Ok(entries)
    }
}
