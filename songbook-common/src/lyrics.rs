//! Lyrics verse pagination
//!
//! Verses are blocks of text separated by a blank line. Which line ending the
//! blank line uses depends on how the lyrics were authored, so the separator is
//! a configuration value resolved once at startup rather than a property of the
//! host the service runs on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

const UNIX_SEPARATOR: &str = "\n\n";
const WINDOWS_SEPARATOR: &str = "\r\n\r\n";

/// Blank-line form that delimits verses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerseSeparator {
    /// Accept either `\n\n` or `\r\n\r\n`
    #[default]
    Auto,
    /// `\n\n` only
    Unix,
    /// `\r\n\r\n` only
    Windows,
}

impl FromStr for VerseSeparator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(VerseSeparator::Auto),
            "unix" | "lf" => Ok(VerseSeparator::Unix),
            "windows" | "crlf" => Ok(VerseSeparator::Windows),
            other => Err(Error::Config(format!(
                "unknown verse separator {:?} (expected auto, unix or windows)",
                other
            ))),
        }
    }
}

impl fmt::Display for VerseSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VerseSeparator::Auto => "auto",
            VerseSeparator::Unix => "unix",
            VerseSeparator::Windows => "windows",
        };
        f.write_str(name)
    }
}

impl VerseSeparator {
    /// Split lyrics into verses, preserving order
    pub fn split<'a>(&self, lyrics: &'a str) -> Vec<&'a str> {
        match self {
            VerseSeparator::Unix => lyrics.split(UNIX_SEPARATOR).collect(),
            VerseSeparator::Windows => lyrics.split(WINDOWS_SEPARATOR).collect(),
            VerseSeparator::Auto => split_any(lyrics),
        }
    }
}

/// Split on whichever separator form appears first at each position.
///
/// Separators are ASCII so every match position is a char boundary.
fn split_any(lyrics: &str) -> Vec<&str> {
    let bytes = lyrics.as_bytes();
    let mut verses = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let rest = &bytes[i..];
        let matched = if rest.starts_with(WINDOWS_SEPARATOR.as_bytes()) {
            WINDOWS_SEPARATOR.len()
        } else if rest.starts_with(UNIX_SEPARATOR.as_bytes()) {
            UNIX_SEPARATOR.len()
        } else {
            0
        };

        if matched > 0 {
            verses.push(&lyrics[start..i]);
            i += matched;
            start = i;
        } else {
            i += 1;
        }
    }

    verses.push(&lyrics[start..]);
    verses
}

/// Return page `page` (1-based) of `page_size` verses.
///
/// A page past the end is an empty result, not an error.
pub fn paginate(
    lyrics: &str,
    page: u32,
    page_size: u32,
    separator: VerseSeparator,
) -> Result<Vec<String>> {
    if page == 0 {
        return Err(Error::InvalidInput("page must be at least 1".to_string()));
    }
    if page_size == 0 {
        return Err(Error::InvalidInput(
            "verses per page must be at least 1".to_string(),
        ));
    }

    let verses = separator.split(lyrics);

    let page_size = page_size as usize;
    let start = (page as usize - 1).saturating_mul(page_size);
    if start >= verses.len() {
        return Ok(Vec::new());
    }
    let end = start.saturating_add(page_size).min(verses.len());

    Ok(verses[start..end].iter().map(|v| v.to_string()).collect())
}
