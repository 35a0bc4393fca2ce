pub mod repo;
pub mod repo_types;

pub use repo::PlaylistStore;
pub use repo_types::{Playlist, Song, Tracklist, PLAYLIST_LEN};
