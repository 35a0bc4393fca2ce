use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    error::AppError,
    playlists::{Song, Tracklist, PLAYLIST_LEN},
};

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Taste lists (songs, artists, genres) may be empty but never hold blank entries.
pub fn validate_taste_list(field: &str, items: &[String]) -> Result<(), AppError> {
    if items.iter().any(|item| item.trim().is_empty()) {
        return Err(AppError::validation(format!(
            "All items in {field} must be non-empty strings"
        )));
    }
    Ok(())
}

/// Check a submitted playlist and fix its length in the type.
pub fn validate_playlist_songs(songs: Vec<Song>) -> Result<Tracklist, AppError> {
    if songs.len() != PLAYLIST_LEN {
        return Err(AppError::validation(format!(
            "Playlist must contain exactly {PLAYLIST_LEN} songs"
        )));
    }
    for (i, song) in songs.iter().enumerate() {
        if song.song_name.trim().is_empty() {
            return Err(AppError::validation(format!(
                "Song at index {i} must have a non-empty 'song_name'"
            )));
        }
        if song.artist_name.trim().is_empty() {
            return Err(AppError::validation(format!(
                "Song at index {i} must have a non-empty 'artist_name'"
            )));
        }
    }
    Tracklist::try_from(songs).map_err(|_| AppError::validation("Playlist length changed"))
}
