use serde::Deserialize;

use crate::playlists::Song;

/// Request body for saving the top-ten playlist.
#[derive(Debug, Deserialize)]
pub struct SavePlaylistRequest {
    #[serde(default)]
    pub songs: Option<Vec<Song>>,
}
