use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Undirected match, stored once per unordered pair with `user_id_low < user_id_high`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct MatchRecord {
    pub id: Uuid,
    pub user_id_low: Uuid,
    pub user_id_high: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl MatchRecord {
    /// The participant that is not `user_id`.
    pub fn other(&self, user_id: Uuid) -> Uuid {
        if self.user_id_low == user_id {
            self.user_id_high
        } else {
            self.user_id_low
        }
    }
}

/// Sort a pair into its canonical `(low, high)` form.
pub fn canonical_pair(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
