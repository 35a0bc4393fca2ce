use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// A directed "actor liked target" fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct SwipeEdge {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub target_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
