//! Whole-run behavior: backup, language seeding, parallel sites and fatal errors

use crate::common::*;
use coach_scraper::cache::CacheStore;
use coach_scraper::config::SiteConfig;
use coach_scraper::crawler::{build_http_client, run_scrape, PaginatorState, Pipeline};
use coach_scraper::locale::{Locale, WhatlangDetector};
use coach_scraper::storage::{PersistenceGateway, SqliteStorage, Storage, StorageError};
use coach_scraper::{CoachError, CoachRecord, ConfigError, Site, Title};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::MockServer;

fn backup_tables(db_path: &std::path::Path) -> Vec<String> {
    let conn = Connection::open(db_path).unwrap();
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND (name LIKE 'coaches\\_%' ESCAPE '\\'
                                    OR name LIKE 'languages\\_%' ESCAPE '\\')
             ORDER BY name",
        )
        .unwrap();
    stmt.query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .map(Result::unwrap)
        .collect()
}

#[tokio::test]
async fn test_run_scrape_backs_up_then_loads() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("coaches.db");

    mount_listing(&server, 1, &["alice"]).await;
    mount_listing(&server, 2, &[]).await;
    mount_coach(&server, "alice", 2222).await;

    let storage = SqliteStorage::open(&db_path).unwrap();
    storage.initialize_schema().unwrap();
    let gateway = PersistenceGateway::new(storage);
    let mut old = CoachRecord::new(Site::Lichess, "alice");
    old.blitz = Some(1000);
    gateway.upsert(&old).unwrap();

    let config = create_test_config(&server.uri(), &dir.path().join("data"), 10);
    let reports = run_scrape(
        &config,
        &[Site::Lichess],
        gateway.clone(),
        Arc::new(WhatlangDetector),
    )
    .await
    .unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].jobs.completed, 1);

    let alice = gateway
        .with_storage(|s| s.get_coach(Site::Lichess, "alice"))
        .unwrap()
        .unwrap();
    assert_eq!(alice.blitz, Some(2222));

    let languages = gateway.with_storage(|s| s.count_languages()).unwrap();
    assert_eq!(languages as usize, Locale::all().len());

    // The snapshot holds the row as it was before the run
    let backups = backup_tables(&db_path);
    assert_eq!(backups.len(), 2);
    let coaches_backup = backups
        .iter()
        .find(|name| name.starts_with("coaches_"))
        .unwrap();
    let conn = Connection::open(&db_path).unwrap();
    let old_blitz: i64 = conn
        .query_row(
            &format!(
                "SELECT blitz FROM \"{}\" WHERE username = 'alice'",
                coaches_backup
            ),
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(old_blitz, 1000);
}

#[tokio::test]
async fn test_run_scrape_aborts_without_schema() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(&server, 1, &["alice"]).await;

    let gateway = PersistenceGateway::new(SqliteStorage::open_in_memory().unwrap());
    let config = create_test_config(&server.uri(), dir.path(), 10);

    let result = run_scrape(
        &config,
        &[Site::Lichess],
        gateway,
        Arc::new(WhatlangDetector),
    )
    .await;

    assert!(matches!(
        result,
        Err(CoachError::Storage(StorageError::MissingTable(_)))
    ));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_run_scrape_sites_in_parallel() {
    let delay_ms = 400;
    let delay = Duration::from_millis(delay_ms);

    let chesscom = MockServer::start().await;
    let lichess = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_chesscom_listing(&chesscom, 1, &["dave"]).await;
    mount_chesscom_listing(&chesscom, 2, &[]).await;
    mount_chesscom_coach(&chesscom, "dave", 2400).await;

    mount_listing(&lichess, 1, &["alice", "bob"]).await;
    mount_listing(&lichess, 2, &[]).await;
    mount_coach(&lichess, "alice", 2100).await;
    mount_coach(&lichess, "bob", 1900).await;

    let mut config = create_test_config(&lichess.uri(), dir.path(), 10);
    config.sites.lichess.request_delay_ms = Some(delay_ms);
    config.sites.chesscom = SiteConfig {
        base_url: Some(chesscom.uri()),
        max_pages: Some(10),
        request_delay_ms: Some(delay_ms),
    };
    let gateway = create_gateway();

    let started = Instant::now();
    let reports = run_scrape(
        &config,
        &[Site::Chesscom, Site::Lichess],
        gateway.clone(),
        Arc::new(WhatlangDetector),
    )
    .await
    .unwrap();
    let elapsed = started.elapsed();

    // chess.com waits twice (coach, empty page), lichess three times
    // (two coaches, empty page). Run one after the other that is five waits.
    assert!(elapsed >= delay * 3, "run took {:?}", elapsed);
    assert!(elapsed < delay * 9 / 2, "run took {:?}", elapsed);

    assert_eq!(reports.len(), 2);
    let chesscom_report = &reports[0];
    let lichess_report = &reports[1];

    assert_eq!(chesscom_report.site, Site::Chesscom);
    assert_eq!(chesscom_report.requests, 4);
    assert_eq!(chesscom_report.jobs.completed, 1);
    assert_eq!(chesscom_report.end_state, PaginatorState::Exhausted);
    assert_eq!(request_count(&chesscom).await, 4);

    assert_eq!(lichess_report.site, Site::Lichess);
    assert_eq!(lichess_report.requests, 6);
    assert_eq!(lichess_report.jobs.completed, 2);
    assert_eq!(request_count(&lichess).await, 6);

    let dave = gateway
        .with_storage(|s| s.get_coach(Site::Chesscom, "dave"))
        .unwrap()
        .expect("dave should be stored");
    assert_eq!(dave.name.as_deref(), Some("Coach dave"));
    assert_eq!(dave.title, Some(Title::GM));
    assert_eq!(dave.rapid, Some(2350));
    assert_eq!(dave.blitz, Some(2400));
    assert_eq!(dave.bullet, Some(2450));
    assert_eq!(
        dave.image_url.as_deref(),
        Some("https://images.chesscomfiles.com/uploads/v1/user/dave.jpeg")
    );

    let cached = CacheStore::new(dir.path(), Site::Chesscom);
    assert!(cached.has_artifact("dave", "dave.html").await);
    assert!(cached.has_artifact("dave", "stats.json").await);

    let chesscom_rows = gateway.with_storage(|s| s.count_coaches(Site::Chesscom)).unwrap();
    let lichess_rows = gateway.with_storage(|s| s.count_coaches(Site::Lichess)).unwrap();
    assert_eq!(chesscom_rows, 1);
    assert_eq!(lichess_rows, 2);
}

#[tokio::test]
async fn test_run_scrape_rejects_invalid_config() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(&server, 1, &["alice"]).await;

    let mut config = create_test_config(&server.uri(), dir.path(), 10);
    config.scraper.workers = 0;
    let gateway = create_gateway();

    let result = run_scrape(
        &config,
        &[Site::Lichess],
        gateway.clone(),
        Arc::new(WhatlangDetector),
    )
    .await;

    assert!(matches!(
        result,
        Err(CoachError::Config(ConfigError::Validation(_)))
    ));
    assert_eq!(request_count(&server).await, 0);

    // Rejected before languages were seeded
    let languages = gateway.with_storage(|s| s.count_languages()).unwrap();
    assert_eq!(languages, 0);
}

#[tokio::test]
async fn test_pipeline_fails_on_unusable_data_dir() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(&server, 1, &["alice"]).await;

    // A regular file where the cache directory should go
    let blocker = dir.path().join("data");
    std::fs::write(&blocker, "not a directory").unwrap();

    let config = create_test_config(&server.uri(), &blocker, 10);
    let client = build_http_client(&config.user_agent).unwrap();
    let result = Pipeline::new(
        config.site_settings(Site::Lichess),
        client,
        Path::new(&config.scraper.data_dir),
        create_gateway(),
        Arc::new(WhatlangDetector),
        config.scraper.workers,
    )
    .run()
    .await;

    assert!(matches!(result, Err(CoachError::Io(_))));
    assert_eq!(request_count(&server).await, 0);
}
