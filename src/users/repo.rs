use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{NewUser, ProfileUpdate, User};
use crate::db::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

    /// Insert a user. Returns `None` when the email is already taken.
    async fn create(&self, new: NewUser) -> anyhow::Result<Option<User>>;

    /// Apply the present fields and bump `updated_at`. `None` if no such user.
    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate)
        -> anyhow::Result<Option<User>>;

    async fn count_except(&self, id: Uuid) -> anyhow::Result<i64>;

    /// The `offset`-th user in id order, skipping `id`.
    async fn nth_except(&self, id: Uuid, offset: i64) -> anyhow::Result<Option<User>>;
}

const USER_COLUMNS: &str = "id, email, password_hash, favorite_songs, favorite_artists, \
                            favorite_genres, spotify_username, created_at, updated_at";

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn create(&self, new: NewUser) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, email, password_hash, favorite_songs, favorite_artists,
                               favorite_genres, spotify_username)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (email) DO NOTHING
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.favorite_songs)
        .bind(&new.favorite_artists)
        .bind(&new.favorite_genres)
        .bind(&new.spotify_username)
        .fetch_optional(&self.pool)
        .await
        .context("insert user")?;
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> anyhow::Result<Option<User>> {
        let (set_spotify, spotify) = match &update.spotify_username {
            Some(value) => (true, value.clone()),
            None => (false, None),
        };
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET favorite_songs   = COALESCE($2, favorite_songs),
                   favorite_artists = COALESCE($3, favorite_artists),
                   favorite_genres  = COALESCE($4, favorite_genres),
                   spotify_username = CASE WHEN $5 THEN $6 ELSE spotify_username END,
                   updated_at       = now()
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.favorite_songs.clone())
        .bind(update.favorite_artists.clone())
        .bind(update.favorite_genres.clone())
        .bind(set_spotify)
        .bind(spotify)
        .fetch_optional(&self.pool)
        .await
        .context("update user profile")?;
        Ok(user)
    }

    async fn count_except(&self, id: Uuid) -> anyhow::Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id <> $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .context("count candidate users")?;
        Ok(count)
    }

    async fn nth_except(&self, id: Uuid, offset: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
              FROM users
             WHERE id <> $1
             ORDER BY id
            OFFSET $2
             LIMIT 1
            "#
        ))
        .bind(id)
        .bind(offset)
        .fetch_optional(&self.pool)
        .await
        .context("fetch candidate user")?;
        Ok(user)
    }
}
