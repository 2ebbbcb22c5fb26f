//! # Songbook Common Library
//!
//! Shared code for the songbook catalog service including:
//! - Song models and date conversion
//! - Song repository and library listing queries
//! - Lyrics verse pagination
//! - Configuration loading
//! - Database bootstrap

pub mod config;
pub mod date;
pub mod db;
pub mod error;
pub mod lyrics;
pub mod models;

pub use error::{Error, Result};
pub use lyrics::VerseSeparator;
pub use models::{LibraryFilter, NewSong, Song, SongPatch, SongVerses};
