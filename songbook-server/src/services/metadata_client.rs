//! Song metadata provider client
//!
//! Newly added songs are enriched from `GET {base_url}/info?group=..&song=..`,
//! which answers with release date, lyrics and a link.

use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Metadata client errors
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned status {0}")]
    Status(u16),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid release date {0:?}")]
    InvalidDate(String),
}

/// Song details returned by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongDetails {
    pub release_date: NaiveDate,
    pub lyrics: String,
    pub link: String,
}

/// Wire shape of `/info`; some providers name the lyrics field `text`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InfoResponse {
    release_date: String,
    #[serde(default, alias = "text")]
    lyrics: String,
    #[serde(default)]
    link: String,
}

impl TryFrom<InfoResponse> for SongDetails {
    type Error = MetadataError;

    fn try_from(info: InfoResponse) -> Result<Self, Self::Error> {
        let release_date = songbook_common::date::parse_display(&info.release_date)
            .map_err(|_| MetadataError::InvalidDate(info.release_date.clone()))?;
        Ok(Self {
            release_date,
            lyrics: info.lyrics,
            link: info.link,
        })
    }
}

/// HTTP client for the metadata provider
#[derive(Debug, Clone)]
pub struct MetadataClient {
    http: reqwest::Client,
    base_url: String,
}

impl MetadataClient {
    /// `base_url` may omit the scheme, in which case `http://` is assumed
    pub fn new(base_url: &str) -> Result<Self, MetadataError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: normalize_base_url(base_url),
        })
    }

    /// Look up release date, lyrics and link for a song
    pub async fn fetch_details(
        &self,
        group: &str,
        title: &str,
    ) -> Result<SongDetails, MetadataError> {
        let url = format!("{}/info", self.base_url);
        debug!(url = %url, group, title, "querying metadata provider");

        let response = self
            .http
            .get(&url)
            .query(&[("group", group), ("song", title)])
            .send()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MetadataError::Status(status.as_u16()));
        }

        let info: InfoResponse = response
            .json()
            .await
            .map_err(|e| MetadataError::Parse(e.to_string()))?;

        info.try_into()
    }
}

fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}
