use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgExecutor;
use uuid::Uuid;

use super::repo_types::SwipeEdge;
use crate::db::PgStore;

#[async_trait]
pub trait SwipeStore: Send + Sync {
    /// Insert the edge unless it exists. The flag is true iff this call inserted it.
    async fn insert_if_absent(&self, actor_id: Uuid, target_id: Uuid)
        -> anyhow::Result<(SwipeEdge, bool)>;

    async fn find(&self, actor_id: Uuid, target_id: Uuid) -> anyhow::Result<Option<SwipeEdge>>;

    async fn delete(&self, actor_id: Uuid, target_id: Uuid) -> anyhow::Result<bool>;
}

#[async_trait]
impl SwipeStore for PgStore {
    async fn insert_if_absent(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> anyhow::Result<(SwipeEdge, bool)> {
        let inserted = sqlx::query_as::<_, SwipeEdge>(
            r#"
            INSERT INTO swipe_right (id, actor_id, target_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (actor_id, target_id) DO NOTHING
            RETURNING id, actor_id, target_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(actor_id)
        .bind(target_id)
        .fetch_optional(&self.pool)
        .await
        .context("insert swipe")?;

        if let Some(edge) = inserted {
            return Ok((edge, true));
        }
        let existing = self
            .find(actor_id, target_id)
            .await?
            .context("swipe vanished after insert conflict")?;
        Ok((existing, false))
    }

    async fn find(&self, actor_id: Uuid, target_id: Uuid) -> anyhow::Result<Option<SwipeEdge>> {
        let edge = sqlx::query_as::<_, SwipeEdge>(
            r#"
            SELECT id, actor_id, target_id, created_at
              FROM swipe_right
             WHERE actor_id = $1 AND target_id = $2
            "#,
        )
        .bind(actor_id)
        .bind(target_id)
        .fetch_optional(&self.pool)
        .await
        .context("find swipe")?;
        Ok(edge)
    }

    async fn delete(&self, actor_id: Uuid, target_id: Uuid) -> anyhow::Result<bool> {
        delete_edge(&self.pool, actor_id, target_id).await
    }
}

/// Remove one directed edge. Also runs inside the match transaction.
pub(crate) async fn delete_edge<'e, E>(
    conn: E,
    actor_id: Uuid,
    target_id: Uuid,
) -> anyhow::Result<bool>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM swipe_right WHERE actor_id = $1 AND target_id = $2")
        .bind(actor_id)
        .bind(target_id)
        .execute(conn)
        .await
        .context("delete swipe")?;
    Ok(result.rows_affected() > 0)
}
