//! HTTP API handlers for songbook-server

pub mod health;
pub mod library;
pub mod params;
pub mod songs;

pub use health::health_routes;
pub use library::list_library;
pub use songs::{add_song, delete_song, get_song, get_song_lyrics, patch_song, update_song};
