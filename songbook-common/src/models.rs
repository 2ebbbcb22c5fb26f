//! Song models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A song record as stored in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: i64,
    pub title: String,
    pub group: String,
    #[serde(with = "crate::date::display_format")]
    pub release_date: NaiveDate,
    pub lyrics: String,
    pub link: String,
}

/// All mutable fields of a song, used for create and full update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
    pub title: String,
    pub group: String,
    pub release_date: NaiveDate,
    pub lyrics: String,
    pub link: String,
}

/// Partial update; `None` or an empty string leaves the stored value unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongPatch {
    pub title: Option<String>,
    pub group: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub lyrics: Option<String>,
    pub link: Option<String>,
}

impl SongPatch {
    /// True when applying the patch would change nothing
    pub fn is_empty(&self) -> bool {
        non_empty(&self.title).is_none()
            && non_empty(&self.group).is_none()
            && self.release_date.is_none()
            && non_empty(&self.lyrics).is_none()
            && non_empty(&self.link).is_none()
    }
}

/// One page of a song's verses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongVerses {
    pub verses: Vec<String>,
    pub page: u32,
    pub verses_per_page: u32,
}

/// Optional listing criteria; an absent or empty field imposes no constraint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryFilter {
    /// Case-insensitive title prefix
    pub title: Option<String>,
    /// Case-insensitive group prefix
    pub group: Option<String>,
    /// Exact release date
    pub release_date: Option<NaiveDate>,
    /// Case-insensitive lyrics substring
    pub lyrics: Option<String>,
    /// Case-insensitive link substring
    pub link: Option<String>,
}

/// Treat `Some("")` the same as `None`
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Owned form of the same rule: only `""` counts as absent, whitespace is text
pub fn provided(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
