use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgExecutor, Postgres, Transaction};
use uuid::Uuid;

use super::repo_types::{canonical_pair, MatchRecord};
use crate::{db::PgStore, swipes::repo::delete_edge};

#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Turn a pending reciprocal swipe into a match in one atomic step.
    ///
    /// If `target_id` has right-swiped `actor_id`, that edge and any
    /// `actor_id -> target_id` edge are removed and the canonical match is
    /// created (or read back if it already exists). Returns `None` and writes
    /// nothing when there is no reciprocal edge. The flag is true iff this
    /// call inserted the match row.
    async fn create_from_reciprocal(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> anyhow::Result<Option<(MatchRecord, bool)>>;

    async fn find_by_users(&self, a: Uuid, b: Uuid) -> anyhow::Result<Option<MatchRecord>>;

    /// Every match involving `user_id`, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<MatchRecord>>;
}

/// Insert the canonical pair unless present. `None` on conflict.
async fn insert_match_tx(
    tx: &mut Transaction<'_, Postgres>,
    low: Uuid,
    high: Uuid,
) -> anyhow::Result<Option<MatchRecord>> {
    let record = sqlx::query_as::<_, MatchRecord>(
        r#"
        INSERT INTO matches (id, user_id_low, user_id_high)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id_low, user_id_high) DO NOTHING
        RETURNING id, user_id_low, user_id_high, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(low)
    .bind(high)
    .fetch_optional(&mut **tx)
    .await
    .context("insert match")?;
    Ok(record)
}

async fn select_match<'e, E>(conn: E, low: Uuid, high: Uuid) -> anyhow::Result<Option<MatchRecord>>
where
    E: PgExecutor<'e>,
{
    let record = sqlx::query_as::<_, MatchRecord>(
        r#"
        SELECT id, user_id_low, user_id_high, created_at
          FROM matches
         WHERE user_id_low = $1 AND user_id_high = $2
        "#,
    )
    .bind(low)
    .bind(high)
    .fetch_optional(conn)
    .await
    .context("find match by users")?;
    Ok(record)
}

#[async_trait]
impl MatchStore for PgStore {
    async fn create_from_reciprocal(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> anyhow::Result<Option<(MatchRecord, bool)>> {
        let mut tx = self.pool.begin().await.context("begin tx")?;

        // dropping the transaction rolls it back
        if !delete_edge(&mut *tx, target_id, actor_id).await? {
            return Ok(None);
        }
        delete_edge(&mut *tx, actor_id, target_id).await?;

        let (low, high) = canonical_pair(actor_id, target_id);
        let outcome = match insert_match_tx(&mut tx, low, high).await? {
            Some(record) => (record, true),
            None => {
                let existing = select_match(&mut *tx, low, high)
                    .await?
                    .context("match vanished after insert conflict")?;
                (existing, false)
            }
        };

        tx.commit().await.context("commit tx")?;
        Ok(Some(outcome))
    }

    async fn find_by_users(&self, a: Uuid, b: Uuid) -> anyhow::Result<Option<MatchRecord>> {
        let (low, high) = canonical_pair(a, b);
        select_match(&self.pool, low, high).await
    }

    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<MatchRecord>> {
        let rows = sqlx::query_as::<_, MatchRecord>(
            r#"
            SELECT id, user_id_low, user_id_high, created_at
              FROM matches
             WHERE user_id_low = $1 OR user_id_high = $1
             ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("list matches for user")?;
        Ok(rows)
    }
}
