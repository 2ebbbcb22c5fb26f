//! Library listing endpoint

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use songbook_common::models::provided;
use songbook_common::{db, LibraryFilter, Song};
use tracing::debug;

use super::params::{optional_query_date, required_positive};
use crate::{ApiResult, AppState};

/// Query parameters for `GET /library`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryParams {
    pub title: Option<String>,
    pub group: Option<String>,
    pub release_date: Option<String>,
    pub lyrics: Option<String>,
    pub link: Option<String>,
    pub page: Option<String>,
    pub songs_per_page: Option<String>,
}

/// GET /library
///
/// Lists songs matching every supplied filter, ordered by id.
/// `page` and `songsPerPage` are required.
pub async fn list_library(
    State(state): State<AppState>,
    params: Result<Query<LibraryParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Song>>> {
    let Query(params) = params?;

    let page = required_positive("page", params.page.as_deref())?;
    let songs_per_page = required_positive("songsPerPage", params.songs_per_page.as_deref())?;
    let release_date = optional_query_date("releaseDate", params.release_date.as_deref())?;

    let filter = LibraryFilter {
        title: provided(params.title),
        group: provided(params.group),
        release_date,
        lyrics: provided(params.lyrics),
        link: provided(params.link),
    };

    let limit = i64::from(songs_per_page);
    let offset = i64::from(page - 1) * limit;

    debug!(page, songs_per_page, ?filter, "listing library");
    let songs = db::list_songs(&state.db, &filter, limit, offset).await?;
    debug!(count = songs.len(), "library page fetched");

    Ok(Json(songs))
}
