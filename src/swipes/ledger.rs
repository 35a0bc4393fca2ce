use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::{repo::SwipeStore, repo_types::SwipeEdge};
use crate::error::AppError;

/// Directed right-swipe facts. Knows nothing about reciprocity.
#[derive(Clone)]
pub struct SwipeLedger {
    store: Arc<dyn SwipeStore>,
}

impl SwipeLedger {
    pub fn new(store: Arc<dyn SwipeStore>) -> Self {
        Self { store }
    }

    /// Idempotent: a repeated swipe returns the original edge with `false`.
    pub async fn record_right_swipe(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> Result<(SwipeEdge, bool), AppError> {
        let (edge, created) = self.store.insert_if_absent(actor_id, target_id).await?;
        debug!(%actor_id, %target_id, created, "swipe recorded");
        Ok((edge, created))
    }

    pub async fn find_edge(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> Result<Option<SwipeEdge>, AppError> {
        Ok(self.store.find(actor_id, target_id).await?)
    }

    #[allow(dead_code)]
    pub async fn delete_edge(&self, actor_id: Uuid, target_id: Uuid) -> Result<bool, AppError> {
        let removed = self.store.delete(actor_id, target_id).await?;
        debug!(%actor_id, %target_id, removed, "swipe deleted");
        Ok(removed)
    }
}
