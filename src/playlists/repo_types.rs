use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

pub const PLAYLIST_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub song_name: String,
    pub artist_name: String,
}

/// A complete playlist body. The array length makes partial playlists unrepresentable.
pub type Tracklist = [Song; PLAYLIST_LEN];

#[derive(Debug, FromRow)]
pub struct PlaylistRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub songs: Json<Tracklist>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Playlist {
    pub id: Uuid,
    pub user_id: Uuid,
    pub songs: Tracklist,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<PlaylistRow> for Playlist {
    fn from(r: PlaylistRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            songs: r.songs.0,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
