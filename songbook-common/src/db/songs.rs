//! Song repository
//!
//! One statement per operation. Update, patch and delete use the statement's
//! affected-row count as the existence check and report a missing id as
//! [`Error::NotFound`].

use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::date;
use crate::db::library::fold_case;
use crate::lyrics::{self, VerseSeparator};
use crate::models::{non_empty, NewSong, Song, SongPatch};
use crate::{Error, Result};

/// Decode a `songs` row, reading the stored date back into a calendar date
pub(crate) fn song_from_row(row: &SqliteRow) -> Result<Song> {
    let decode = |e| Error::store("error while decoding song", e);

    let release_date: String = row.try_get("release_date").map_err(decode)?;

    Ok(Song {
        id: row.try_get("id").map_err(decode)?,
        title: row.try_get("title").map_err(decode)?,
        group: row.try_get("group_name").map_err(decode)?,
        release_date: date::from_canonical(&release_date)?,
        lyrics: row.try_get("lyrics").map_err(decode)?,
        link: row.try_get("link").map_err(decode)?,
    })
}

/// Insert a song and return its store-assigned id
pub async fn add_song(pool: &SqlitePool, song: &NewSong) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO songs (title, group_name, release_date, lyrics, link,
                           title_folded, group_folded, lyrics_folded, link_folded)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&song.title)
    .bind(&song.group)
    .bind(date::to_canonical(song.release_date))
    .bind(&song.lyrics)
    .bind(&song.link)
    .bind(fold_case(&song.title))
    .bind(fold_case(&song.group))
    .bind(fold_case(&song.lyrics))
    .bind(fold_case(&song.link))
    .execute(pool)
    .await
    .map_err(|e| Error::store("error while adding song", e))?;

    Ok(result.last_insert_rowid())
}

/// Load a single song by id
pub async fn find_song(pool: &SqlitePool, id: i64) -> Result<Song> {
    let row = sqlx::query(
        "SELECT id, title, group_name, release_date, lyrics, link FROM songs WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| Error::store("error while fetching song", e))?;

    match row {
        Some(row) => song_from_row(&row),
        None => Err(Error::song_not_found(id)),
    }
}

/// Overwrite every field of song `id`
pub async fn update_song(pool: &SqlitePool, id: i64, song: &NewSong) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE songs
        SET title = ?, group_name = ?, release_date = ?, lyrics = ?, link = ?,
            title_folded = ?, group_folded = ?, lyrics_folded = ?, link_folded = ?
        WHERE id = ?
        "#,
    )
    .bind(&song.title)
    .bind(&song.group)
    .bind(date::to_canonical(song.release_date))
    .bind(&song.lyrics)
    .bind(&song.link)
    .bind(fold_case(&song.title))
    .bind(fold_case(&song.group))
    .bind(fold_case(&song.lyrics))
    .bind(fold_case(&song.link))
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| Error::store("error while updating song", e))?;

    if result.rows_affected() == 0 {
        return Err(Error::song_not_found(id));
    }

    Ok(())
}

/// Apply a partial update to song `id`.
///
/// Each column keeps its stored value when the supplied value is empty, so the
/// whole patch is a single statement with no prior read. An empty patch is a
/// no-op that still reports a missing id.
pub async fn patch_song(pool: &SqlitePool, id: i64, patch: &SongPatch) -> Result<()> {
    let release_date = patch.release_date.map(date::to_canonical);
    let title = non_empty(&patch.title).unwrap_or_default();
    let group = non_empty(&patch.group).unwrap_or_default();
    let lyrics = non_empty(&patch.lyrics).unwrap_or_default();
    let link = non_empty(&patch.link).unwrap_or_default();

    let result = sqlx::query(
        r#"
        UPDATE songs
        SET title = COALESCE(NULLIF(?, ''), title),
            group_name = COALESCE(NULLIF(?, ''), group_name),
            release_date = COALESCE(NULLIF(?, ''), release_date),
            lyrics = COALESCE(NULLIF(?, ''), lyrics),
            link = COALESCE(NULLIF(?, ''), link),
            title_folded = COALESCE(NULLIF(?, ''), title_folded),
            group_folded = COALESCE(NULLIF(?, ''), group_folded),
            lyrics_folded = COALESCE(NULLIF(?, ''), lyrics_folded),
            link_folded = COALESCE(NULLIF(?, ''), link_folded)
        WHERE id = ?
        "#,
    )
    .bind(title)
    .bind(group)
    .bind(release_date.unwrap_or_default())
    .bind(lyrics)
    .bind(link)
    .bind(fold_case(title))
    .bind(fold_case(group))
    .bind(fold_case(lyrics))
    .bind(fold_case(link))
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| Error::store("error while patching song", e))?;

    if result.rows_affected() == 0 {
        return Err(Error::song_not_found(id));
    }

    Ok(())
}

/// Physically delete song `id`
pub async fn delete_song(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM songs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| Error::store("error while deleting song", e))?;

    if result.rows_affected() == 0 {
        return Err(Error::song_not_found(id));
    }

    Ok(())
}

/// Fetch the lyrics of song `id` and return one page of its verses
pub async fn get_lyrics_page(
    pool: &SqlitePool,
    id: i64,
    page: u32,
    page_size: u32,
    separator: VerseSeparator,
) -> Result<Vec<String>> {
    let lyrics: Option<String> = sqlx::query_scalar("SELECT lyrics FROM songs WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| Error::store("error while fetching song lyrics", e))?;

    let lyrics = lyrics.ok_or_else(|| Error::song_not_found(id))?;

    lyrics::paginate(&lyrics, page, page_size, separator)
}
