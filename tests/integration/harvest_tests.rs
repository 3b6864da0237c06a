//! Integration tests for the harvest stage
//!
//! These tests serve resource files from a wiremock server and check the
//! records written to the dataset store.

use hdl_harvest::config::Config;
use hdl_harvest::crawler::run_crawl;
use hdl_harvest::harvest::run_harvest;
use hdl_harvest::storage::{read_records, DatasetRecord};
use hdl_harvest::HarvestError;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HALF_ADDER: &str = "module half_adder(input a, b, output sum, carry);\n  assign sum = a ^ b;\n  assign carry = a & b;\nendmodule";
const ADDER_TB: &str = "module adder_tb;\n  reg a, b;\n  half_adder dut(.a(a), .b(b));\nendmodule";
const UART: &str = "module uart(input rx, output tx);\n  assign tx = rx;\nendmodule";

/// Creates a test configuration with both stores inside `dir`
fn create_test_config(server: &MockServer, dir: &TempDir) -> Config {
    let mut config = Config::for_site(format!("{}/", server.uri()), "127.0.0.1");
    config.crawler.request_delay_ms = 0;
    config.harvest.request_delay_ms = 0;
    config.harvest.request_timeout_ms = 2000;
    config.output.links_path = dir.path().join("processed/links.txt").display().to_string();
    config.output.dataset_path = dir.path().join("raw/dataset.jsonl").display().to_string();
    config
}

fn write_links(config: &Config, links: &[String]) {
    let links_path = Path::new(&config.output.links_path);
    std::fs::create_dir_all(links_path.parent().unwrap()).unwrap();
    std::fs::write(links_path, links.join("\n") + "\n").unwrap();
}

fn stored_records(config: &Config) -> Vec<DatasetRecord> {
    let stored = read_records(Path::new(&config.output.dataset_path)).unwrap();
    assert_eq!(stored.malformed_lines, 0);
    stored.records
}

async fn mount_resource(server: &MockServer, resource: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(resource))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Serves one resource of each outcome and writes the link store for them
async fn mount_mixed_resources(server: &MockServer, config: &Config) {
    Mock::given(method("GET"))
        .and(path("/code/half_adder.v"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!("\n\n{}\n   \n", HALF_ADDER)))
        .mount(server)
        .await;
    mount_resource(server, "/code/adder_tb.v", ADDER_TB).await;
    mount_resource(server, "/code/tiny.v", "module t;").await;
    mount_resource(server, "/code/uart.v", UART).await;

    let base = server.uri();
    write_links(
        config,
        &[
            format!("{}/code/half_adder.v", base),
            format!("{}/code/adder_tb.v", base),
            format!("{}/code/tiny.v", base),
            String::new(),
            format!("{}/code/uart.v", base),
            format!("{}/code/missing.v", base),
            format!("{}/code/half_adder.v", base),
        ],
    );
}

#[tokio::test]
async fn test_harvest_classifies_and_emits() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir);
    mount_mixed_resources(&server, &config).await;

    let report = run_harvest(&config, false, None).await.expect("harvest should succeed");

    assert_eq!(report.total_urls, 5);
    assert_eq!(report.accepted, 1);
    assert_eq!(report.excluded, 1);
    assert_eq!(report.too_short, 1);
    assert_eq!(report.not_relevant, 1);
    assert_eq!(report.fetch_failed, 1);
    assert_eq!(report.skipped_existing, 0);
    assert!(!report.interrupted);

    let records = stored_records(&config);
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.source_url, format!("{}/code/half_adder.v", server.uri()));
    assert_eq!(record.filename, "half_adder.v");
    assert_eq!(record.prompt, "Write Verilog code for Half Adder.");
    assert_eq!(record.content, HALF_ADDER);
    assert_eq!(record.provenance.origin, server.uri());
    assert_eq!(record.provenance.source, "asic-world");
    assert_eq!(record.provenance.category, "auto-crawled");
}

#[tokio::test]
async fn test_missing_link_store_fails_before_any_request() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = run_harvest(&config, false, None).await.unwrap_err();

    assert!(matches!(err, HarvestError::MissingInputStore { .. }));
    assert!(!Path::new(&config.output.dataset_path).exists());
    assert!(!dir.path().join("raw").exists());
}

#[tokio::test]
async fn test_rerun_skips_emitted_resources() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir);

    Mock::given(method("GET"))
        .and(path("/code/half_adder.v"))
        .respond_with(ResponseTemplate::new(200).set_body_string(HALF_ADDER))
        .expect(1)
        .mount(&server)
        .await;
    mount_resource(&server, "/code/uart.v", UART).await;

    let base = server.uri();
    write_links(
        &config,
        &[
            format!("{}/code/half_adder.v", base),
            format!("{}/code/uart.v", base),
        ],
    );

    let first = run_harvest(&config, false, None).await.unwrap();
    assert_eq!(first.accepted, 1);

    let second = run_harvest(&config, false, None).await.unwrap();
    assert_eq!(second.skipped_existing, 1);
    assert_eq!(second.accepted, 0);
    assert_eq!(second.not_relevant, 1);

    assert_eq!(stored_records(&config).len(), 1);
}

#[tokio::test]
async fn test_fresh_harvest_truncates_dataset() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir);

    mount_resource(&server, "/code/half_adder.v", HALF_ADDER).await;
    write_links(&config, &[format!("{}/code/half_adder.v", server.uri())]);

    run_harvest(&config, false, None).await.unwrap();
    let report = run_harvest(&config, true, None).await.unwrap();

    assert_eq!(report.skipped_existing, 0);
    assert_eq!(report.accepted, 1);
    assert_eq!(stored_records(&config).len(), 1);
}

#[tokio::test]
async fn test_crawl_then_harvest() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir);

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
               <a href="/code/half_adder.v">Half adder</a>
               <a href="/code/adder_tb.v">Testbench</a>
               <a href="/code/4bit_counter.v">Counter</a>
               </body></html>"#,
        ))
        .mount(&server)
        .await;
    mount_resource(&server, "/code/half_adder.v", HALF_ADDER).await;
    mount_resource(&server, "/code/adder_tb.v", ADDER_TB).await;
    mount_resource(
        &server,
        "/code/4bit_counter.v",
        "module counter4(input clk, output reg [3:0] q);\n  always @(posedge clk) q <= q + 1;\nendmodule",
    )
    .await;

    let crawl = run_crawl(&config, false, None).await.unwrap();
    assert_eq!(crawl.resources_discovered, 3);

    let harvest = run_harvest(&config, false, None).await.unwrap();
    assert_eq!(harvest.total_urls, 3);
    assert_eq!(harvest.accepted, 2);
    assert_eq!(harvest.excluded, 1);

    let prompts: Vec<String> = stored_records(&config)
        .into_iter()
        .map(|record| record.prompt)
        .collect();
    assert_eq!(
        prompts,
        vec![
            "Write Verilog code for Half Adder.".to_string(),
            "Write Verilog code for 4Bit Counter.".to_string(),
        ]
    );
}
