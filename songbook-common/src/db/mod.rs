//! Database access: bootstrap, song repository, library listing

pub mod init;
pub mod library;
pub mod songs;

pub use init::*;
pub use library::{list_songs, LibraryQuery};
pub use songs::*;
