//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full mirror cycle end-to-end against a temporary output tree.

use site_mirror::config::CrawlConfig;
use site_mirror::crawler::{crawl, Coordinator};
use site_mirror::output::CrawlOutcome;
use site_mirror::url::host_key;
use site_mirror::MirrorError;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a fast test configuration seeded at the server root
fn create_test_config(server: &MockServer, out: &TempDir) -> CrawlConfig {
    let mut config =
        CrawlConfig::new(&format!("{}/", server.uri())).expect("Failed to parse seed URL");
    config.output_dir = out.path().to_path_buf();
    config.user_agent = "TestBot/1.0".to_string();
    config.delay = Duration::ZERO;
    config.request_timeout = Duration::from_secs(5);
    config.deadline = Duration::from_secs(10);
    config.respect_robots = false;
    config
}

/// Directory holding the mirror of the given server
fn host_dir(server: &MockServer, out: &TempDir) -> PathBuf {
    let url = Url::parse(&server.uri()).expect("Failed to parse server URL");
    out.path()
        .join(host_key(&url).expect("Failed to extract host"))
}

fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.into())
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_full_mirror_single_site() {
    let server = MockServer::start().await;

    mount(
        &server,
        "/",
        html(
            r#"<html><head><title>Home</title>
            <link rel="stylesheet" href="/style.css">
            </head><body>
            <img src="/logo.png">
            <a href="/about">About</a>
            </body></html>"#,
        ),
        1,
    )
    .await;
    mount(&server, "/about", html("<html><body>About us</body></html>"), 1).await;
    mount(
        &server,
        "/style.css",
        ResponseTemplate::new(200)
            .set_body_string("body { background: url('bg.png'); }")
            .insert_header("content-type", "text/css"),
        1,
    )
    .await;
    mount(
        &server,
        "/logo.png",
        ResponseTemplate::new(200)
            .set_body_bytes(vec![0x89, b'P', b'N', b'G'])
            .insert_header("content-type", "image/png"),
        1,
    )
    .await;
    mount(
        &server,
        "/bg.png",
        ResponseTemplate::new(200)
            .set_body_bytes(vec![1u8, 2, 3])
            .insert_header("content-type", "image/png"),
        1,
    )
    .await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&server, &out);

    let report = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Crawl failed");

    assert_eq!(report.outcome, CrawlOutcome::Completed);
    assert_eq!(report.stats.fetched, 5);
    assert_eq!(report.stats.saved, 5);
    assert_eq!(report.stats.fetch_failures, 0);

    let root = host_dir(&server, &out);
    assert!(std::fs::read_to_string(root.join("index.html"))
        .unwrap()
        .contains("<title>Home</title>"));
    assert_eq!(
        std::fs::read_to_string(root.join("about/index.html")).unwrap(),
        "<html><body>About us</body></html>"
    );
    assert!(root.join("style.css").is_file());
    assert_eq!(
        std::fs::read(root.join("logo.png")).unwrap(),
        vec![0x89, b'P', b'N', b'G']
    );
    assert_eq!(std::fs::read(root.join("bg.png")).unwrap(), vec![1u8, 2, 3]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_each_url_fetched_once_with_many_workers() {
    let server = MockServer::start().await;

    let nav = r#"<a href="/">Home</a>
        <a href="/a">A</a>
        <a href="/b">B</a>
        <a href="/c">C</a>
        <img src="/shared.png">"#;

    for route in ["/", "/a", "/b", "/c"] {
        mount(&server, route, html(format!("<html><body>{}</body></html>", nav)), 1).await;
    }
    mount(
        &server,
        "/shared.png",
        ResponseTemplate::new(200).insert_header("content-type", "image/png"),
        1,
    )
    .await;

    let out = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &out);
    config.workers = 8;
    config.max_depth = 3;

    let report = crawl(config).await.expect("Crawl failed");

    assert_eq!(report.outcome, CrawlOutcome::Completed);
    assert_eq!(report.stats.fetched, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_depth_zero_fetches_seed_and_resources_only() {
    let server = MockServer::start().await;

    mount(
        &server,
        "/",
        html(r#"<html><body><img src="/pic.png"><a href="/deep">Deep</a></body></html>"#),
        1,
    )
    .await;
    mount(
        &server,
        "/pic.png",
        ResponseTemplate::new(200).insert_header("content-type", "image/png"),
        1,
    )
    .await;
    mount(&server, "/deep", html("<html></html>"), 0).await;

    let out = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &out);
    config.max_depth = 0;

    let report = crawl(config).await.expect("Crawl failed");
    assert_eq!(report.stats.fetched, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_links_stop_at_max_depth_but_resources_do_not() {
    let server = MockServer::start().await;

    mount(
        &server,
        "/",
        html(r#"<html><body><a href="/level1">1</a></body></html>"#),
        1,
    )
    .await;
    mount(
        &server,
        "/level1",
        html(r#"<html><body><img src="/level1.png"><a href="/level2">2</a></body></html>"#),
        1,
    )
    .await;
    mount(
        &server,
        "/level1.png",
        ResponseTemplate::new(200).insert_header("content-type", "image/png"),
        1,
    )
    .await;
    mount(&server, "/level2", html("<html></html>"), 0).await;

    let out = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &out);
    config.max_depth = 1;

    let report = crawl(config).await.expect("Crawl failed");
    assert_eq!(report.outcome, CrawlOutcome::Completed);
    assert_eq!(report.stats.fetched, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_domain_only_skips_foreign_hosts() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;

    mount(
        &server,
        "/",
        html(format!(
            r#"<html><body><a href="{}/external">Elsewhere</a></body></html>"#,
            other.uri()
        )),
        1,
    )
    .await;
    mount(&other, "/external", html("<html></html>"), 0).await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&server, &out);

    crawl(config).await.expect("Crawl failed");
    assert!(!host_dir(&other, &out).exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_foreign_hosts_followed_when_not_same_domain_only() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;

    mount(
        &server,
        "/",
        html(format!(
            r#"<html><body><a href="{}/external">Elsewhere</a></body></html>"#,
            other.uri()
        )),
        1,
    )
    .await;
    mount(&other, "/external", html("<html>external</html>"), 1).await;

    let out = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &out);
    config.same_domain_only = false;

    crawl(config).await.expect("Crawl failed");
    assert_eq!(
        std::fs::read_to_string(host_dir(&other, &out).join("external/index.html")).unwrap(),
        "<html>external</html>"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_missing_robots_does_not_abort() {
    let server = MockServer::start().await;

    mount(&server, "/robots.txt", ResponseTemplate::new(404), 1).await;
    mount(&server, "/", html("<html>home</html>"), 1).await;

    let out = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &out);
    config.respect_robots = true;

    let report = crawl(config).await.expect("Crawl failed");
    assert_eq!(report.outcome, CrawlOutcome::Completed);
    assert!(host_dir(&server, &out).join("index.html").is_file());
    assert!(!host_dir(&server, &out).join("robots.txt").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_robots_saved_and_disallowed_seed_still_crawled() {
    let server = MockServer::start().await;

    mount(
        &server,
        "/robots.txt",
        ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /"),
        1,
    )
    .await;
    mount(&server, "/", html("<html>home</html>"), 1).await;

    let out = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &out);
    config.respect_robots = true;

    crawl(config).await.expect("Crawl failed");

    let root = host_dir(&server, &out);
    assert_eq!(
        std::fs::read_to_string(root.join("robots.txt")).unwrap(),
        "User-agent: *\nDisallow: /"
    );
    assert!(root.join("index.html").is_file());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_robots_server_error_is_fatal() {
    let server = MockServer::start().await;

    mount(&server, "/robots.txt", ResponseTemplate::new(500), 1).await;
    mount(&server, "/", html("<html>home</html>"), 0).await;

    let out = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &out);
    config.respect_robots = true;

    let result = crawl(config).await;
    assert!(matches!(
        result,
        Err(MirrorError::RobotsStatus { status: 500, .. })
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_robots_unreachable_is_fatal() {
    let out = TempDir::new().unwrap();
    let mut config = CrawlConfig::new("http://127.0.0.1:1/").unwrap();
    config.output_dir = out.path().to_path_buf();
    config.request_timeout = Duration::from_secs(2);

    let result = crawl(config).await;
    assert!(matches!(result, Err(MirrorError::RobotsFetch { .. })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_deadline_stops_slow_crawl() {
    let server = MockServer::start().await;

    mount(
        &server,
        "/",
        html(r#"<html><body><a href="/slow1">1</a><a href="/slow2">2</a></body></html>"#),
        1,
    )
    .await;
    for route in ["/slow1", "/slow2"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(html("<html>slow</html>").set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;
    }

    let out = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &out);
    config.deadline = Duration::from_millis(500);
    config.request_timeout = Duration::from_secs(30);

    let report = tokio::time::timeout(Duration::from_secs(3), crawl(config))
        .await
        .expect("Crawl did not stop at its deadline")
        .expect("Deadline must not be an error");

    assert_eq!(report.outcome, CrawlOutcome::DeadlineReached);
    assert!(report.timed_out());
    assert!(report.elapsed < Duration::from_secs(3));
    assert!(host_dir(&server, &out).join("index.html").is_file());
}

#[tokio::test]
async fn test_unwritable_output_dir_is_fatal() {
    let server = MockServer::start().await;
    mount(&server, "/", html("<html></html>"), 0).await;

    let out = TempDir::new().unwrap();
    let blocker = out.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let mut config = create_test_config(&server, &out);
    config.output_dir = blocker.join("mirror");

    let result = crawl(config).await;
    assert!(matches!(result, Err(MirrorError::OutputDir { .. })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_fetch_failures_do_not_abort_run() {
    let server = MockServer::start().await;

    mount(
        &server,
        "/",
        html(r#"<html><body><a href="/missing">Gone</a><a href="/ok">Fine</a></body></html>"#),
        1,
    )
    .await;
    mount(&server, "/missing", ResponseTemplate::new(404), 1).await;
    mount(&server, "/ok", html("<html>ok</html>"), 1).await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&server, &out);

    let report = crawl(config).await.expect("Crawl failed");

    assert_eq!(report.outcome, CrawlOutcome::Completed);
    assert_eq!(report.stats.fetch_failures, 1);
    assert_eq!(report.stats.saved, 2);
    assert!(host_dir(&server, &out).join("ok/index.html").is_file());
    assert!(!host_dir(&server, &out).join("missing").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_queries_kept_only_on_html_urls() {
    let server = MockServer::start().await;

    mount(
        &server,
        "/",
        html(
            r#"<html><body>
            <a href="/search?q=1">Search</a>
            <a href="/list.html?page=2">Page 2</a>
            <script src="/app.js?v=1"></script>
            <script src="/app.js?v=2"></script>
            </body></html>"#,
        ),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html("<html>search</html>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/list.html"))
        .and(query_param("page", "2"))
        .respond_with(html("<html>list</html>"))
        .expect(1)
        .mount(&server)
        .await;
    mount(
        &server,
        "/app.js",
        ResponseTemplate::new(200)
            .set_body_string("console.log(1);")
            .insert_header("content-type", "application/javascript"),
        1,
    )
    .await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&server, &out);

    let report = crawl(config).await.expect("Crawl failed");
    assert_eq!(report.stats.fetch_failures, 0);

    let root = host_dir(&server, &out);
    assert!(root.join("search/index.html").is_file());
    assert!(root.join("list.html").is_file());
    assert!(root.join("app.js").is_file());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_save_failure_does_not_abort_run() {
    let server = MockServer::start().await;

    // `/x` is saved as a file while `/x/y.png` needs `x` as a directory, so
    // whichever lands second cannot be written
    mount(
        &server,
        "/",
        html(
            r#"<html><body>
            <img src="/x/y.png">
            <a href="/x">Blob</a>
            <a href="/ok">Fine</a>
            </body></html>"#,
        ),
        1,
    )
    .await;
    mount(
        &server,
        "/x",
        ResponseTemplate::new(200)
            .set_body_bytes(vec![1u8, 2, 3])
            .insert_header("content-type", "application/octet-stream"),
        1,
    )
    .await;
    mount(
        &server,
        "/x/y.png",
        ResponseTemplate::new(200)
            .set_body_bytes(vec![4u8, 5, 6])
            .insert_header("content-type", "image/png"),
        1,
    )
    .await;
    mount(&server, "/ok", html("<html>ok</html>"), 1).await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&server, &out);

    let report = crawl(config).await.expect("Crawl failed");

    assert_eq!(report.outcome, CrawlOutcome::Completed);
    assert_eq!(report.stats.fetched, 4);
    assert_eq!(report.stats.save_failures, 1);
    assert_eq!(report.stats.saved, 3);
    assert_eq!(report.stats.fetch_failures, 0);

    let root = host_dir(&server, &out);
    assert!(root.join("index.html").is_file());
    assert!(root.join("ok/index.html").is_file());
}
