//! Song endpoints: create, read, full and partial update, delete, lyrics

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use songbook_common::models::provided;
use songbook_common::{date, db, NewSong, Song, SongPatch, SongVerses};
use tracing::{debug, info};

use super::params::{parse_song_id, required_positive};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Body of `POST /songs`
#[derive(Debug, Deserialize)]
pub struct AddSongRequest {
    pub title: Option<String>,
    pub group: Option<String>,
}

/// Response of `POST /songs`
#[derive(Debug, Serialize)]
pub struct SongCreated {
    pub id: i64,
}

/// Body of `PUT` and `PATCH /songs/:id`
///
/// `releaseDate` is `DD.MM.YYYY`. For PATCH, absent and empty fields keep the
/// stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongRequest {
    pub title: Option<String>,
    pub group: Option<String>,
    pub release_date: Option<String>,
    pub lyrics: Option<String>,
    pub link: Option<String>,
}

/// Query parameters for `GET /songs/:id/lyrics`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricsParams {
    pub page: Option<String>,
    pub verses_per_page: Option<String>,
}

/// POST /songs
///
/// Enriches the song from the metadata provider and stores it.
pub async fn add_song(
    State(state): State<AppState>,
    payload: Result<Json<AddSongRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SongCreated>)> {
    let Json(request) = payload?;

    let (title, group) = match (provided(request.title), provided(request.group)) {
        (Some(title), Some(group)) => (title, group),
        _ => {
            return Err(ApiError::Unprocessable(
                "title and group are required".to_string(),
            ))
        }
    };

    let details = state.metadata.fetch_details(&group, &title).await?;
    debug!(%title, %group, release_date = %details.release_date, "metadata received");

    let song = NewSong {
        title,
        group,
        release_date: details.release_date,
        lyrics: details.lyrics,
        link: details.link,
    };
    let id = db::add_song(&state.db, &song).await?;

    info!(song_id = id, title = %song.title, group = %song.group, "song added");
    Ok((StatusCode::CREATED, Json(SongCreated { id })))
}

/// GET /songs/:id
pub async fn get_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Song>> {
    let id = parse_song_id(&id)?;
    let song = db::find_song(&state.db, id).await?;
    Ok(Json(song))
}

/// PUT /songs/:id
///
/// Replaces every field; all five are required.
pub async fn update_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SongRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let id = parse_song_id(&id)?;
    let Json(request) = payload?;

    let song = full_song(request)?;
    db::update_song(&state.db, id, &song).await?;

    info!(song_id = id, "song updated");
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /songs/:id
///
/// Overwrites only the fields given with non-empty values.
pub async fn patch_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SongRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let id = parse_song_id(&id)?;
    let Json(request) = payload?;

    let patch = SongPatch {
        release_date: provided(request.release_date)
            .map(|value| date::parse_display(&value))
            .transpose()?,
        title: provided(request.title),
        group: provided(request.group),
        lyrics: provided(request.lyrics),
        link: provided(request.link),
    };
    if patch.is_empty() {
        return Err(ApiError::Unprocessable(
            "at least one field must be provided".to_string(),
        ));
    }

    db::patch_song(&state.db, id, &patch).await?;

    info!(song_id = id, "song patched");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /songs/:id
pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_song_id(&id)?;
    db::delete_song(&state.db, id).await?;

    info!(song_id = id, "song deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /songs/:id/lyrics
pub async fn get_song_lyrics(
    State(state): State<AppState>,
    Path(id): Path<String>,
    params: Result<Query<LyricsParams>, QueryRejection>,
) -> ApiResult<Json<SongVerses>> {
    let id = parse_song_id(&id)?;
    let Query(params) = params?;

    let page = required_positive("page", params.page.as_deref())?;
    let verses_per_page = required_positive("versesPerPage", params.verses_per_page.as_deref())?;

    let verses =
        db::get_lyrics_page(&state.db, id, page, verses_per_page, state.verse_separator).await?;
    debug!(song_id = id, page, verses_per_page, count = verses.len(), "lyrics page fetched");

    Ok(Json(SongVerses {
        verses,
        page,
        verses_per_page,
    }))
}

/// Convert a PUT body into a complete song, naming every missing field
fn full_song(request: SongRequest) -> ApiResult<NewSong> {
    let fields = [
        ("title", provided(request.title)),
        ("group", provided(request.group)),
        ("releaseDate", provided(request.release_date)),
        ("lyrics", provided(request.lyrics)),
        ("link", provided(request.link)),
    ];

    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::Unprocessable(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }

    let [title, group, release_date, lyrics, link] =
        fields.map(|(_, value)| value.unwrap_or_default());

    Ok(NewSong {
        release_date: date::parse_display(&release_date)?,
        title,
        group,
        lyrics,
        link,
    })
}
