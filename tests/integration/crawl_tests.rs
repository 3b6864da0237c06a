//! Integration tests for the crawl stage
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, including the resource-link store.

use hdl_harvest::config::Config;
use hdl_harvest::crawler::run_crawl;
use hdl_harvest::storage::read_links;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling the mock server
fn create_test_config(server: &MockServer, dir: &TempDir, max_depth: u32) -> Config {
    let mut config = Config::for_site(format!("{}/", server.uri()), "127.0.0.1");
    config.crawler.max_depth = max_depth;
    config.crawler.request_delay_ms = 0;
    config.crawler.request_timeout_ms = 2000;
    config.output.links_path = dir.path().join("processed/links.txt").display().to_string();
    config.output.dataset_path = dir.path().join("raw/dataset.jsonl").display().to_string();
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page: &str, body: &str, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .expect(expected_hits)
        .mount(server)
        .await;
}

fn stored_links(config: &Config) -> Vec<String> {
    read_links(Path::new(&config.output.links_path)).expect("link store should be readable")
}

#[tokio::test]
async fn test_full_crawl_writes_resource_links() {
    let server = MockServer::start().await;
    let base = server.uri();
    let port = server.address().port();
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir, 4);

    mount_page(
        &server,
        "/",
        &format!(
            r##"<a href="/verilog/index.html">Tutorial</a>
               <a href="/code/adder.v">Adder</a>
               <a href="http://localhost:{}/other.html">Elsewhere</a>
               <a href="/images/logo.gif">Logo</a>
               <a href="mailto:webmaster@asic-world.com">Mail</a>
               <a href="#top">Top</a>"##,
            port
        ),
        1,
    )
    .await;

    mount_page(
        &server,
        "/verilog/index.html",
        r#"<a href="../code/counter.v">Counter</a>
           <a href="/code/adder.v">Adder again</a>
           <a href="/">Home</a>
           <a href="deep/level2.html">Deeper</a>"#,
        1,
    )
    .await;

    mount_page(
        &server,
        "/verilog/deep/level2.html",
        r#"<a href="/code/mux.v">Mux</a>"#,
        1,
    )
    .await;

    let report = run_crawl(&config, false, None).await.expect("crawl should succeed");

    assert_eq!(
        stored_links(&config),
        vec![
            format!("{}/code/adder.v", base),
            format!("{}/code/counter.v", base),
            format!("{}/code/mux.v", base),
        ]
    );

    let depths: Vec<u32> = report.visited.iter().map(|task| task.depth).collect();
    assert_eq!(depths, vec![0, 1, 2]);
    assert_eq!(report.resources_discovered, 3);
    assert_eq!(report.resources_known, 0);
    assert_eq!(report.pages_failed, 0);
    assert_eq!(report.links_off_domain, 1);
    assert!(!report.interrupted);
    assert!(report.finished_at.is_some());
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir, 1);

    mount_page(&server, "/", r#"<a href="/p1.html">1</a>"#, 1).await;
    mount_page(
        &server,
        "/p1.html",
        r#"<a href="/p2.html">2</a><a href="/code/shallow.v">v</a>"#,
        1,
    )
    .await;
    // Depth 2 is beyond the limit and must never be requested
    mount_page(&server, "/p2.html", r#"<a href="/code/deep.v">v</a>"#, 0).await;

    let report = run_crawl(&config, false, None).await.unwrap();

    assert_eq!(report.visited.len(), 2);
    assert!(report.visited.iter().all(|task| task.depth <= 1));
    assert_eq!(
        stored_links(&config),
        vec![format!("{}/code/shallow.v", server.uri())]
    );
}

#[tokio::test]
async fn test_crawl_visits_in_breadth_first_order() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir, 4);

    mount_page(&server, "/", r#"<a href="/a.html">a</a><a href="/b.html">b</a>"#, 1).await;
    mount_page(&server, "/a.html", r#"<a href="/c.html">c</a><a href="/b.html">b</a>"#, 1).await;
    mount_page(&server, "/b.html", r#"<a href="/d.html">d</a><a href="/a.html">a</a>"#, 1).await;
    mount_page(&server, "/c.html", r#"<a href="/">home</a>"#, 1).await;
    mount_page(&server, "/d.html", r#"<a href="/c.html">c</a>"#, 1).await;

    let report = run_crawl(&config, false, None).await.unwrap();

    let order: Vec<String> = report
        .visited
        .iter()
        .map(|task| task.url.to_string())
        .collect();
    assert_eq!(
        order,
        vec![
            format!("{}/", base),
            format!("{}/a.html", base),
            format!("{}/b.html", base),
            format!("{}/c.html", base),
            format!("{}/d.html", base),
        ]
    );

    let depths: Vec<u32> = report.visited.iter().map(|task| task.depth).collect();
    assert!(depths.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[tokio::test]
async fn test_failed_pages_do_not_halt_the_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir, 4);
    config.crawler.request_timeout_ms = 300;

    mount_page(
        &server,
        "/",
        r#"<a href="/code/first.v">first</a>
           <a href="/slow.html">slow</a>
           <a href="/broken.html">broken</a>
           <a href="/good.html">good</a>"#,
        1,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/slow.html"))
        .respond_with(html(r#"<a href="/code/never.v">never</a>"#).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken.html"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    mount_page(&server, "/good.html", r#"<a href="/code/second.v">second</a>"#, 1).await;

    let report = run_crawl(&config, false, None).await.unwrap();

    assert_eq!(report.visited.len(), 4);
    assert_eq!(report.pages_failed, 2);
    assert_eq!(
        stored_links(&config),
        vec![
            format!("{}/code/first.v", base),
            format!("{}/code/second.v", base),
        ]
    );
}

#[tokio::test]
async fn test_rerun_does_not_duplicate_links() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir, 2);

    mount_page(
        &server,
        "/",
        r#"<a href="/code/adder.v">a</a><a href="/code/alu.v">b</a>"#,
        2,
    )
    .await;

    let first = run_crawl(&config, false, None).await.unwrap();
    assert_eq!(first.resources_discovered, 2);

    let second = run_crawl(&config, false, None).await.unwrap();
    assert_eq!(second.resources_known, 2);
    assert_eq!(second.resources_discovered, 0);

    assert_eq!(stored_links(&config).len(), 2);
}

#[tokio::test]
async fn test_fresh_crawl_truncates_link_store() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir, 2);

    let links_path = Path::new(&config.output.links_path);
    std::fs::create_dir_all(links_path.parent().unwrap()).unwrap();
    std::fs::write(links_path, "https://stale.example/old.v\n").unwrap();

    mount_page(&server, "/", r#"<a href="/code/adder.v">a</a>"#, 1).await;

    let report = run_crawl(&config, true, None).await.unwrap();

    assert_eq!(report.resources_known, 0);
    assert_eq!(
        stored_links(&config),
        vec![format!("{}/code/adder.v", server.uri())]
    );
}

#[tokio::test]
async fn test_requests_are_spaced_by_the_delay() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir, 2);
    config.crawler.request_delay_ms = 100;

    mount_page(&server, "/", r#"<a href="/a.html">a</a><a href="/b.html">b</a>"#, 1).await;
    mount_page(&server, "/a.html", "", 1).await;
    mount_page(&server, "/b.html", "", 1).await;

    let report = run_crawl(&config, false, None).await.unwrap();

    assert_eq!(report.visited.len(), 3);
    assert!(
        report.elapsed() >= Duration::from_millis(200),
        "three requests finished in {:?}",
        report.elapsed()
    );
}

#[tokio::test]
async fn test_redirect_target_is_processed_once() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir, 3);

    mount_page(
        &server,
        "/",
        r#"<a href="/old.html">old</a><a href="/new.html">new</a>"#,
        1,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/old.html"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/new.html", base).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;

    mount_page(&server, "/new.html", r#"<a href="/code/moved.v">moved</a>"#, 1).await;

    let report = run_crawl(&config, false, None).await.unwrap();

    let visited: Vec<&str> = report.visited.iter().map(|task| task.url.path()).collect();
    assert_eq!(visited, vec!["/", "/old.html"]);
    assert_eq!(stored_links(&config), vec![format!("{}/code/moved.v", base)]);
}

#[tokio::test]
async fn test_redirect_off_domain_is_not_followed() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir, 3);
    let off_domain = format!("http://localhost:{}/elsewhere.html", server.address().port());

    mount_page(&server, "/", r#"<a href="/away.html">away</a>"#, 1).await;

    Mock::given(method("GET"))
        .and(path("/away.html"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", off_domain.as_str()))
        .mount(&server)
        .await;

    mount_page(&server, "/elsewhere.html", r#"<a href="/code/leak.v">leak</a>"#, 0).await;

    let report = run_crawl(&config, false, None).await.unwrap();

    assert_eq!(report.pages_failed, 1);
    assert!(stored_links(&config).is_empty());
}
