//! Shared fixtures: fake lichess and chess.com directories served by wiremock

use coach_scraper::config::{Config, SiteConfig};
use coach_scraper::crawler::{build_http_client, Pipeline, PipelineReport};
use coach_scraper::locale::WhatlangDetector;
use coach_scraper::storage::{PersistenceGateway, SqliteStorage, Storage};
use coach_scraper::Site;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CONTACT: &str = "test@example.com";

pub const LISTING_PATH: &str = "/coach/all/all/alphabetical";

pub const CHESSCOM_LISTING_PATH: &str = "/coaches";

/// Creates a test configuration pointing lichess at the mock server
pub fn create_test_config(base_url: &str, data_dir: &Path, max_pages: u32) -> Config {
    let mut config = Config::default();
    config.user_agent.contact = CONTACT.to_string();
    config.scraper.data_dir = data_dir.display().to_string();
    config.scraper.workers = 2;
    config.sites.lichess = SiteConfig {
        base_url: Some(base_url.to_string()),
        max_pages: Some(max_pages),
        request_delay_ms: Some(0),
    };
    config
}

/// In-memory database with the schema in place
pub fn create_gateway() -> PersistenceGateway<SqliteStorage> {
    let storage = SqliteStorage::open_in_memory().expect("open in-memory database");
    storage.initialize_schema().expect("initialize schema");
    PersistenceGateway::new(storage)
}

/// Runs the lichess pipeline once
pub async fn run_lichess<S: Storage + Send + 'static>(
    config: &Config,
    gateway: PersistenceGateway<S>,
) -> PipelineReport {
    let client = build_http_client(&config.user_agent).expect("build client");
    Pipeline::new(
        config.site_settings(Site::Lichess),
        client,
        Path::new(&config.scraper.data_dir),
        gateway,
        Arc::new(WhatlangDetector),
        config.scraper.workers,
    )
    .run()
    .await
    .expect("pipeline run")
}

pub fn listing_html(usernames: &[&str]) -> String {
    let mut html = String::from("<html><body><div class=\"list\">");
    for username in usernames {
        html.push_str(&format!(
            r#"<article class="coach-widget"><a class="overlay" href="/coach/{}"></a></article>"#,
            username
        ));
    }
    html.push_str("</div></body></html>");
    html
}

pub fn coach_html(username: &str) -> String {
    format!(
        r#"<html><body>
        <img class="picture" src="https://image.lichess1.org/display?path={}.jpg">
        <table><tr class="languages"><td>English, Français</td></tr></table>
        </body></html>"#,
        username
    )
}

pub fn profile_html(username: &str, blitz: i64) -> String {
    format!(
        r#"<html><body>
        <div class="profile-side"><div class="user-infos">
          <strong class="name">Coach {u}</strong>
        </div></div>
        <span class="utitle">IM</span>
        <a href="/@/{u}/perf/blitz"><rating><strong>{blitz}</strong></rating></a>
        <a href="/@/{u}/perf/rapid"><rating><strong>{rapid}?</strong></rating></a>
        </body></html>"#,
        u = username,
        blitz = blitz,
        rapid = blitz - 100
    )
}

/// Serves listing page `page_no`
pub async fn mount_listing(server: &MockServer, page_no: u32, usernames: &[&str]) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", page_no.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(usernames)))
        .mount(server)
        .await;
}

/// Serves listing page `page_no` with an error status
pub async fn mount_listing_status(server: &MockServer, page_no: u32, status: u16) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", page_no.to_string()))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Serves both documents of one coach
pub async fn mount_coach(server: &MockServer, username: &str, blitz: i64) {
    mount_slow_coach(server, username, blitz, Duration::ZERO).await;
}

/// Serves both documents of one coach, each response held back by `delay`
pub async fn mount_slow_coach(server: &MockServer, username: &str, blitz: i64, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(format!("/coach/{}", username)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(coach_html(username))
                .set_delay(delay),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/@/{}", username)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(profile_html(username, blitz))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

pub fn chesscom_listing_html(usernames: &[&str]) -> String {
    let mut html = String::from("<html><body><div class=\"members-categories\">");
    for username in usernames {
        html.push_str(&format!(
            r#"<a class="members-categories-username" href="/member/{u}">{u}</a>"#,
            u = username
        ));
    }
    html.push_str("</div></body></html>");
    html
}

pub fn chesscom_profile_html(username: &str) -> String {
    format!(
        r#"<html><body>
        <div class="profile-header-avatar">
          <img src="https://images.chesscomfiles.com/uploads/v1/user/{u}.jpeg">
        </div>
        <a class="profile-card-chesstitle" href="/members/titled-players">GM</a>
        <div class="profile-card-name">Coach {u}</div>
        </body></html>"#,
        u = username
    )
}

pub fn chesscom_stats_json(rapid: i64, blitz: i64, bullet: i64) -> String {
    format!(
        r#"{{"stats":[
            {{"key":"rapid","stats":{{"rating":{}}}}},
            {{"key":"lightning","stats":{{"rating":{}}}}},
            {{"key":"bullet","stats":{{"rating":{}}}}}
        ]}}"#,
        rapid, blitz, bullet
    )
}

/// Serves chess.com listing page `page_no`
pub async fn mount_chesscom_listing(server: &MockServer, page_no: u32, usernames: &[&str]) {
    Mock::given(method("GET"))
        .and(path(CHESSCOM_LISTING_PATH))
        .and(query_param("sortBy", "alphabetical"))
        .and(query_param("page", page_no.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(chesscom_listing_html(usernames)))
        .mount(server)
        .await;
}

/// Serves the profile page and stats callback of one chess.com coach
pub async fn mount_chesscom_coach(server: &MockServer, username: &str, blitz: i64) {
    Mock::given(method("GET"))
        .and(path(format!("/member/{}", username)))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(chesscom_profile_html(username)),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/callback/member/stats/{}", username)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(chesscom_stats_json(blitz - 50, blitz, blitz + 50)),
        )
        .mount(server)
        .await;
}

/// Number of requests the server has seen so far
pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or_default()
}

/// Number of listing page requests the server has seen so far
pub async fn listing_request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| {
            requests
                .iter()
                .filter(|request| request.url.path() == LISTING_PATH)
                .count()
        })
        .unwrap_or_default()
}
