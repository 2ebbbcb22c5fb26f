//! Outbound service clients

pub mod metadata_client;

pub use metadata_client::{MetadataClient, MetadataError, SongDetails};
