//! songbook-server library - song catalog HTTP service
//!
//! Routes:
//! - `GET /library` filtered, paginated listing
//! - `POST /songs`, `GET|PUT|PATCH|DELETE /songs/:id`
//! - `GET /songs/:id/lyrics` verse pagination
//! - `GET /health`

use axum::Router;
use songbook_common::VerseSeparator;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod services;

pub use error::{ApiError, ApiResult};
use services::MetadataClient;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Enrichment lookups for newly added songs
    pub metadata: MetadataClient,
    /// How stored lyrics are split into verses
    pub verse_separator: VerseSeparator,
}

impl AppState {
    pub fn new(db: SqlitePool, metadata: MetadataClient, verse_separator: VerseSeparator) -> Self {
        Self {
            db,
            metadata,
            verse_separator,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let songs = Router::new()
        .route("/library", get(api::list_library))
        .route("/songs", post(api::add_song))
        .route(
            "/songs/:id",
            get(api::get_song)
                .put(api::update_song)
                .patch(api::patch_song)
                .delete(api::delete_song),
        )
        .route("/songs/:id/lyrics", get(api::get_song_lyrics));

    Router::new()
        .merge(songs)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
