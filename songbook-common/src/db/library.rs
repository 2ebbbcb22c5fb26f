//! Library listing with optional filters and LIMIT/OFFSET pagination
//!
//! Each supplied filter becomes one predicate. Predicates are kept in a fixed
//! order and rendered with numbered placeholders (`?1`, `?2`, ...), and the
//! bind loop walks the same list, so placeholder positions always line up with
//! bound values. `limit` and `offset` take the last two positions.
//!
//! SQLite's `LIKE` only folds ASCII case, so text filters compare against the
//! `*_folded` columns with a parameter folded the same way.

use sqlx::SqlitePool;

use crate::date;
use crate::db::songs::song_from_row;
use crate::models::{non_empty, LibraryFilter, Song};
use crate::{Error, Result};

const SELECT_SONGS: &str =
    "SELECT id, title, group_name, release_date, lyrics, link FROM songs WHERE 1=1";

/// How a filter value is compared against its column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Case-insensitive "starts with"
    Prefix,
    /// Case-insensitive "contains"
    Substring,
    /// Equality
    Exact,
}

/// One `AND` term of the listing query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub column: &'static str,
    pub kind: MatchKind,
    pub value: String,
}

impl Predicate {
    fn clause(&self, position: usize) -> String {
        match self.kind {
            MatchKind::Exact => format!("{} = ?{}", self.column, position),
            MatchKind::Prefix | MatchKind::Substring => {
                format!("{} LIKE ?{} ESCAPE '\\'", self.column, position)
            }
        }
    }

    /// Value bound for this predicate's placeholder
    pub fn param(&self) -> String {
        match self.kind {
            MatchKind::Prefix => format!("{}%", escape_like(&fold_case(&self.value))),
            MatchKind::Substring => format!("%{}%", escape_like(&fold_case(&self.value))),
            MatchKind::Exact => self.value.clone(),
        }
    }
}

/// Case folding shared by stored `*_folded` columns and filter parameters
pub(crate) fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Escape LIKE wildcards so user text matches literally
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// A filtered, paginated listing of songs ordered by id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryQuery {
    predicates: Vec<Predicate>,
    limit: i64,
    offset: i64,
}

impl LibraryQuery {
    pub fn new(filter: &LibraryFilter, limit: i64, offset: i64) -> Self {
        let text = |value: &Option<String>| non_empty(value).map(str::to_string);

        let schema = [
            ("title_folded", MatchKind::Prefix, text(&filter.title)),
            ("group_folded", MatchKind::Prefix, text(&filter.group)),
            (
                "release_date",
                MatchKind::Exact,
                filter.release_date.map(date::to_canonical),
            ),
            ("lyrics_folded", MatchKind::Substring, text(&filter.lyrics)),
            ("link_folded", MatchKind::Substring, text(&filter.link)),
        ];

        let predicates = schema
            .into_iter()
            .filter_map(|(column, kind, value)| {
                value.map(|value| Predicate {
                    column,
                    kind,
                    value,
                })
            })
            .collect();

        Self {
            predicates,
            limit,
            offset,
        }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Render the statement text
    pub fn sql(&self) -> String {
        let mut sql = String::from(SELECT_SONGS);

        for (i, predicate) in self.predicates.iter().enumerate() {
            sql.push_str(" AND ");
            sql.push_str(&predicate.clause(i + 1));
        }

        let next = self.predicates.len() + 1;
        sql.push_str(&format!(" ORDER BY id LIMIT ?{} OFFSET ?{}", next, next + 1));
        sql
    }

    /// Run the query and decode every row
    pub async fn fetch(&self, pool: &SqlitePool) -> Result<Vec<Song>> {
        let sql = self.sql();

        let mut query = sqlx::query(&sql);
        for predicate in &self.predicates {
            query = query.bind(predicate.param());
        }

        let rows = query
            .bind(self.limit)
            .bind(self.offset)
            .fetch_all(pool)
            .await
            .map_err(|e| Error::store("error while fetching library", e))?;

        rows.iter().map(song_from_row).collect()
    }
}

/// List songs matching `filter`, at most `limit` rows starting at `offset`
pub async fn list_songs(
    pool: &SqlitePool,
    filter: &LibraryFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<Song>> {
    if limit < 0 || offset < 0 {
        return Err(Error::InvalidInput(format!(
            "limit and offset must not be negative (limit={}, offset={})",
            limit, offset
        )));
    }

    LibraryQuery::new(filter, limit, offset).fetch(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{add_song, init_memory_database};
    use crate::models::NewSong;
    use chrono::NaiveDate;

    fn new_song(
        title: &str,
        group: &str,
        date: (i32, u32, u32),
        lyrics: &str,
        link: &str,
    ) -> NewSong {
        NewSong {
            title: title.to_string(),
            group: group.to_string(),
            release_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            lyrics: lyrics.to_string(),
            link: link.to_string(),
        }
    }

    async fn seeded_pool() -> SqlitePool {
        let pool = init_memory_database().await.unwrap();
        let songs = [
            new_song(
                "Hello World",
                "Muse",
                (2006, 7, 16),
                "Ooh baby\n\nSecond verse",
                "https://example.com/hello",
            ),
            new_song(
                "Uprising",
                "Muse",
                (2009, 8, 3),
                "Paranoia is in bloom",
                "https://video.example.org/uprising",
            ),
            new_song(
                "Help!",
                "The Beatles",
                (1965, 7, 19),
                "Help me if you can",
                "https://example.com/help",
            ),
        ];
        for song in &songs {
            add_song(&pool, song).await.unwrap();
        }
        pool
    }

    fn titles(songs: &[Song]) -> Vec<&str> {
        songs.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn test_sql_without_filters() {
        let query = LibraryQuery::new(&LibraryFilter::default(), 10, 0);
        assert!(query.predicates().is_empty());
        assert_eq!(
            query.sql(),
            "SELECT id, title, group_name, release_date, lyrics, link FROM songs WHERE 1=1 \
             ORDER BY id LIMIT ?1 OFFSET ?2"
        );
    }

    #[test]
    fn test_placeholders_follow_predicate_order() {
        let filter = LibraryFilter {
            group: Some("Mu".to_string()),
            link: Some("video".to_string()),
            release_date: NaiveDate::from_ymd_opt(2009, 8, 3),
            ..Default::default()
        };
        let query = LibraryQuery::new(&filter, 5, 10);

        let columns: Vec<_> = query.predicates().iter().map(|p| p.column).collect();
        assert_eq!(columns, vec!["group_folded", "release_date", "link_folded"]);

        let sql = query.sql();
        assert!(sql.contains("AND group_folded LIKE ?1 ESCAPE '\\'"));
        assert!(sql.contains("AND release_date = ?2"));
        assert!(sql.contains("AND link_folded LIKE ?3 ESCAPE '\\'"));
        assert!(sql.ends_with("ORDER BY id LIMIT ?4 OFFSET ?5"));

        let params: Vec<_> = query.predicates().iter().map(Predicate::param).collect();
        assert_eq!(params, vec!["mu%", "2009-08-03", "%video%"]);
    }

    #[test]
    fn test_empty_strings_impose_no_constraint() {
        let filter = LibraryFilter {
            title: Some(String::new()),
            group: Some(String::new()),
            release_date: None,
            lyrics: Some(String::new()),
            link: Some(String::new()),
        };
        assert!(LibraryQuery::new(&filter, 10, 0).predicates().is_empty());
    }

    #[test]
    fn test_wildcards_are_escaped() {
        assert_eq!(escape_like("100%_a\\b"), "100\\%\\_a\\\\b");
    }

    #[tokio::test]
    async fn test_no_filters_returns_all_rows() {
        let pool = seeded_pool().await;
        let songs = list_songs(&pool, &LibraryFilter::default(), 10, 0).await.unwrap();
        assert_eq!(titles(&songs), vec!["Hello World", "Uprising", "Help!"]);
    }

    #[tokio::test]
    async fn test_limit_offset_pages_have_no_gap_or_overlap() {
        let pool = seeded_pool().await;
        let filter = LibraryFilter::default();

        let first = list_songs(&pool, &filter, 2, 0).await.unwrap();
        let second = list_songs(&pool, &filter, 2, 2).await.unwrap();

        assert_eq!(titles(&first), vec!["Hello World", "Uprising"]);
        assert_eq!(titles(&second), vec!["Help!"]);
        assert!(first[1].id < second[0].id);
    }

    #[tokio::test]
    async fn test_title_prefix_is_case_insensitive() {
        let pool = seeded_pool().await;

        for prefix in ["hel", "HELLO"] {
            let filter = LibraryFilter {
                title: Some(prefix.to_string()),
                ..Default::default()
            };
            let songs = list_songs(&pool, &filter, 10, 0).await.unwrap();
            assert!(titles(&songs).contains(&"Hello World"), "prefix {}", prefix);
        }

        let filter = LibraryFilter {
            title: Some("world".to_string()),
            ..Default::default()
        };
        let songs = list_songs(&pool, &filter, 10, 0).await.unwrap();
        assert!(songs.is_empty());
    }

    #[tokio::test]
    async fn test_cyrillic_filters_are_case_insensitive() {
        let pool = seeded_pool().await;
        add_song(
            &pool,
            &new_song(
                "Звезда по имени Солнце",
                "Кино",
                (1989, 1, 1),
                "Белый снег, серый лёд",
                "https://example.com/zvezda",
            ),
        )
        .await
        .unwrap();

        let filters = [
            LibraryFilter {
                title: Some("звезда".to_string()),
                ..Default::default()
            },
            LibraryFilter {
                title: Some("ЗВЕЗДА".to_string()),
                ..Default::default()
            },
            LibraryFilter {
                group: Some("КИНО".to_string()),
                ..Default::default()
            },
            LibraryFilter {
                lyrics: Some("БЕЛЫЙ".to_string()),
                ..Default::default()
            },
        ];

        for filter in &filters {
            let songs = list_songs(&pool, filter, 10, 0).await.unwrap();
            assert_eq!(titles(&songs), vec!["Звезда по имени Солнце"], "{:?}", filter);
        }

        let filter = LibraryFilter {
            title: Some("солнце".to_string()),
            ..Default::default()
        };
        assert!(list_songs(&pool, &filter, 10, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_group_prefix() {
        let pool = seeded_pool().await;
        let filter = LibraryFilter {
            group: Some("the b".to_string()),
            ..Default::default()
        };
        let songs = list_songs(&pool, &filter, 10, 0).await.unwrap();
        assert_eq!(titles(&songs), vec!["Help!"]);
    }

    #[tokio::test]
    async fn test_lyrics_and_link_substring() {
        let pool = seeded_pool().await;

        let filter = LibraryFilter {
            lyrics: Some("IN BLOOM".to_string()),
            ..Default::default()
        };
        let songs = list_songs(&pool, &filter, 10, 0).await.unwrap();
        assert_eq!(titles(&songs), vec!["Uprising"]);

        let filter = LibraryFilter {
            link: Some("example.com".to_string()),
            ..Default::default()
        };
        let songs = list_songs(&pool, &filter, 10, 0).await.unwrap();
        assert_eq!(titles(&songs), vec!["Hello World", "Help!"]);
    }

    #[tokio::test]
    async fn test_release_date_is_exact() {
        let pool = seeded_pool().await;

        let filter = LibraryFilter {
            release_date: NaiveDate::from_ymd_opt(1965, 7, 19),
            ..Default::default()
        };
        let songs = list_songs(&pool, &filter, 10, 0).await.unwrap();
        assert_eq!(titles(&songs), vec!["Help!"]);

        let filter = LibraryFilter {
            release_date: NaiveDate::from_ymd_opt(1965, 7, 20),
            ..Default::default()
        };
        assert!(list_songs(&pool, &filter, 10, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_filters_combine_with_and() {
        let pool = seeded_pool().await;
        let filter = LibraryFilter {
            group: Some("muse".to_string()),
            lyrics: Some("baby".to_string()),
            ..Default::default()
        };
        let songs = list_songs(&pool, &filter, 10, 0).await.unwrap();
        assert_eq!(titles(&songs), vec!["Hello World"]);
    }

    #[tokio::test]
    async fn test_percent_in_filter_matches_literally() {
        let pool = seeded_pool().await;
        add_song(
            &pool,
            &new_song("100% Pure", "Muse", (2010, 1, 1), "", ""),
        )
        .await
        .unwrap();

        let filter = LibraryFilter {
            title: Some("100%".to_string()),
            ..Default::default()
        };
        let songs = list_songs(&pool, &filter, 10, 0).await.unwrap();
        assert_eq!(titles(&songs), vec!["100% Pure"]);

        let filter = LibraryFilter {
            title: Some("%".to_string()),
            ..Default::default()
        };
        let songs = list_songs(&pool, &filter, 10, 0).await.unwrap();
        assert!(songs.is_empty());
    }

    #[tokio::test]
    async fn test_no_match_is_empty_list() {
        let pool = seeded_pool().await;
        let filter = LibraryFilter {
            title: Some("Nothing like this".to_string()),
            ..Default::default()
        };
        let songs = list_songs(&pool, &filter, 10, 0).await.unwrap();
        assert!(songs.is_empty());
    }

    #[tokio::test]
    async fn test_negative_limit_rejected() {
        let pool = seeded_pool().await;
        let err = list_songs(&pool, &LibraryFilter::default(), -1, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_bad_stored_date_is_surfaced() {
        let pool = seeded_pool().await;
        sqlx::query("UPDATE songs SET release_date = 'not a date' WHERE title = 'Uprising'")
            .execute(&pool)
            .await
            .unwrap();

        let err = list_songs(&pool, &LibraryFilter::default(), 10, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidStoredDate { .. }));
    }
}
