use anyhow::Context;
use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use super::repo_types::{Playlist, PlaylistRow, Tracklist};
use crate::db::PgStore;

#[async_trait]
pub trait PlaylistStore: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Option<Playlist>>;

    /// Create the user's playlist or replace every song of the existing one.
    async fn upsert(&self, user_id: Uuid, songs: &Tracklist) -> anyhow::Result<Playlist>;
}

#[async_trait]
impl PlaylistStore for PgStore {
    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Option<Playlist>> {
        let row = sqlx::query_as::<_, PlaylistRow>(
            r#"
            SELECT id, user_id, songs, created_at, updated_at
              FROM playlists
             WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("find playlist by user")?;
        Ok(row.map(Playlist::from))
    }

    async fn upsert(&self, user_id: Uuid, songs: &Tracklist) -> anyhow::Result<Playlist> {
        let row = sqlx::query_as::<_, PlaylistRow>(
            r#"
            INSERT INTO playlists (id, user_id, songs)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id)
            DO UPDATE SET songs = EXCLUDED.songs, updated_at = now()
            RETURNING id, user_id, songs, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(Json(songs))
        .fetch_one(&self.pool)
        .await
        .context("upsert playlist")?;
        Ok(row.into())
    }
}
