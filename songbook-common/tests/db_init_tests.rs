//! On-disk database bootstrap

use chrono::NaiveDate;
use songbook_common::db;
use songbook_common::NewSong;
use tempfile::TempDir;

fn sample() -> NewSong {
    NewSong {
        title: "Starlight".to_string(),
        group: "Muse".to_string(),
        release_date: NaiveDate::from_ymd_opt(2006, 9, 4).unwrap(),
        lyrics: "Far away\nThis ship is taking me far away".to_string(),
        link: "https://example.com/starlight".to_string(),
    }
}

#[tokio::test]
async fn test_init_creates_nested_directories() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("data").join("nested").join("songbook.db");

    let pool = db::init_database(&db_path).await.unwrap();
    assert!(db_path.exists());

    let id = db::add_song(&pool, &sample()).await.unwrap();
    assert_eq!(id, 1);
    pool.close().await;
}

#[tokio::test]
async fn test_reopening_keeps_existing_rows() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("songbook.db");

    let pool = db::init_database(&db_path).await.unwrap();
    let id = db::add_song(&pool, &sample()).await.unwrap();
    pool.close().await;

    let pool = db::init_database(&db_path).await.unwrap();
    let song = db::find_song(&pool, id).await.unwrap();
    assert_eq!(song.title, "Starlight");
    assert_eq!(song.release_date, NaiveDate::from_ymd_opt(2006, 9, 4).unwrap());
    pool.close().await;
}
