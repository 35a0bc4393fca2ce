use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    error::AppError,
    playlists::{Playlist, PlaylistStore, Song},
    state::AppState,
    users::{ProfileUpdate, UserStore, UserView},
    validation::{validate_playlist_songs, validate_taste_list},
};

/// Profile and playlist reads/writes for a single user.
#[derive(Clone)]
pub struct Profiles {
    users: Arc<dyn UserStore>,
    playlists: Arc<dyn PlaylistStore>,
}

impl FromRef<AppState> for Profiles {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.users.clone(), state.playlists.clone())
    }
}

impl Profiles {
    pub fn new(users: Arc<dyn UserStore>, playlists: Arc<dyn PlaylistStore>) -> Self {
        Self { users, playlists }
    }

    pub async fn get(&self, user_id: Uuid) -> Result<UserView, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(UserView::from)
            .ok_or(AppError::NotFound("User not found"))
    }

    #[instrument(skip(self, update))]
    pub async fn update(&self, user_id: Uuid, update: ProfileUpdate) -> Result<UserView, AppError> {
        let current = self.get(user_id).await?;

        // every present field is checked before anything is written
        let lists = [
            ("favorite_songs", &update.favorite_songs),
            ("favorite_artists", &update.favorite_artists),
            ("favorite_genres", &update.favorite_genres),
        ];
        for (field, items) in lists {
            if let Some(items) = items {
                validate_taste_list(field, items)?;
            }
        }

        if update.is_empty() {
            return Ok(current);
        }

        let user = self
            .users
            .update_profile(user_id, &update)
            .await?
            .ok_or(AppError::NotFound("User not found"))?;
        info!(%user_id, "profile updated");
        Ok(user.into())
    }

    pub async fn get_playlist(&self, user_id: Uuid) -> Result<Playlist, AppError> {
        self.get(user_id).await?;
        self.playlists
            .find_by_user(user_id)
            .await?
            .ok_or(AppError::NotFound("Playlist not found"))
    }

    #[instrument(skip(self, songs))]
    pub async fn save_playlist(
        &self,
        user_id: Uuid,
        songs: Option<Vec<Song>>,
    ) -> Result<Playlist, AppError> {
        self.get(user_id).await?;
        let songs = match songs {
            Some(songs) if !songs.is_empty() => songs,
            _ => return Err(AppError::validation("Songs array is required")),
        };
        let tracklist = validate_playlist_songs(songs)?;

        let playlist = self.playlists.upsert(user_id, &tracklist).await?;
        info!(%user_id, playlist_id = %playlist.id, "playlist saved");
        Ok(playlist)
    }
}
