use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String, // Argon2 PHC string, never leaves the crate
    pub favorite_songs: Vec<String>,
    pub favorite_artists: Vec<String>,
    pub favorite_genres: Vec<String>,
    pub spotify_username: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Public part of the user returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub favorite_songs: Vec<String>,
    pub favorite_artists: Vec<String>,
    pub favorite_genres: Vec<String>,
    pub spotify_username: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserView {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            favorite_songs: u.favorite_songs,
            favorite_artists: u.favorite_artists,
            favorite_genres: u.favorite_genres,
            spotify_username: u.spotify_username,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Fields needed to insert a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub favorite_songs: Vec<String>,
    pub favorite_artists: Vec<String>,
    pub favorite_genres: Vec<String>,
    pub spotify_username: Option<String>,
}

/// Sparse profile update. `None` leaves the column untouched; for
/// `spotify_username`, `Some(None)` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub favorite_songs: Option<Vec<String>>,
    pub favorite_artists: Option<Vec<String>>,
    pub favorite_genres: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    pub spotify_username: Option<Option<String>>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.favorite_songs.is_none()
            && self.favorite_artists.is_none()
            && self.favorite_genres.is_none()
            && self.spotify_username.is_none()
    }
}

// Distinguishes an explicit `null` from a missing key.
fn present<'de, T, D>(de: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(de).map(Some)
}
