//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the quote site and exercise the
//! full crawl cycle: structured fetch, markup fallback, dedup, quota, and
//! pagination.

use quotegrab::config::{Config, OutputFormat};
use quotegrab::crawler::Coordinator;
use std::path::Path;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a config pointing at the mock server with a JSONL sink in `dir`.
fn test_config(seed: &str, results_wanted: u32, max_pages: u32, dir: &Path) -> Config {
    let toml = format!(
        r#"
[source]
start-urls = ["{seed}"]

[crawler]
results-wanted = {results_wanted}
max-pages = {max_pages}
max-concurrent-pages = 2

[output]
path = "{}"
"#,
        dir.join("quotes.jsonl").to_string_lossy(),
    );
    toml::from_str(&toml).expect("test config must parse")
}

fn quote_container(text: &str, author: &str) -> String {
    format!(
        r#"<div class="quote">
             <div class="quoteText">
               &ldquo;{text}&rdquo;
               <span class="authorOrTitle">, {author}</span>
             </div>
             <div class="right"><a href="/quotes/1">12 likes</a></div>
           </div>"#
    )
}

fn read_records(dir: &Path) -> Vec<serde_json::Value> {
    let content = std::fs::read_to_string(dir.join("quotes.jsonl")).unwrap_or_default();
    content
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is one JSON record"))
        .collect()
}

/// Mounts a 404 for the structured endpoint so the crawler falls back to
/// markup parsing.
async fn mount_structured_unavailable(server: &MockServer) {
    Mock::given(method("GET"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_markup_fallback_extracts_quotes() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_structured_unavailable(&server).await;

    let page = format!(
        "<html><body>{}{}</body></html>",
        quote_container("The first quote of the page.", "Author One"),
        quote_container("The second quote of the page.", "Author Two"),
    );
    Mock::given(method("GET"))
        .and(path("/quotes/tag/life"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&server)
        .await;

    let seed = format!("{}/quotes/tag/life", server.uri());
    let config = test_config(&seed, 100, 1, dir.path());

    let summary = Coordinator::new(config).unwrap().run().await.unwrap();
    assert_eq!(summary.records_saved, 2);

    let records = read_records(dir.path());
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["quote"], "The first quote of the page.");
    assert_eq!(records[0]["author"], "Author One");
    assert_eq!(records[0]["likes"], 12);
}

#[tokio::test]
async fn test_structured_endpoint_preferred_over_markup() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    // Structured endpoint answers; its records must win over the markup ones.
    Mock::given(method("GET"))
        .and(path("/quotes/tag/life"))
        .and(query_param("format", "json"))
        .and(header("x-requested-with", "XMLHttpRequest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "quotes": [
                {
                    "quoteText": "A quote from the structured endpoint.",
                    "authorName": "Api Author",
                    "tags": ["life"],
                    "likesCount": 3
                }
            ]
        })))
        .mount(&server)
        .await;

    let page = format!(
        "<html><body>{}</body></html>",
        quote_container("A quote from the markup, ignored.", "Html Author"),
    );
    Mock::given(method("GET"))
        .and(path("/quotes/tag/life"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&server)
        .await;

    let seed = format!("{}/quotes/tag/life", server.uri());
    let config = test_config(&seed, 100, 1, dir.path());

    let summary = Coordinator::new(config).unwrap().run().await.unwrap();
    assert_eq!(summary.records_saved, 1);

    let records = read_records(dir.path());
    assert_eq!(records[0]["quote"], "A quote from the structured endpoint.");
    assert_eq!(records[0]["author"], "Api Author");
}

#[tokio::test]
async fn test_quota_truncates_mid_page_and_stops_pagination() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_structured_unavailable(&server).await;

    let mut page = String::from("<html><body>");
    for i in 0..10 {
        page.push_str(&quote_container(
            &format!("Quota test quote number {i} on page one."),
            "Same Author",
        ));
    }
    page.push_str(r#"<a class="next_page" href="/quotes/tag/life?page=2">next</a>"#);
    page.push_str("</body></html>");

    Mock::given(method("GET"))
        .and(path("/quotes/tag/life"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&server)
        .await;

    let seed = format!("{}/quotes/tag/life", server.uri());
    let config = test_config(&seed, 5, 20, dir.path());

    let summary = Coordinator::new(config).unwrap().run().await.unwrap();

    // Hard cap: exactly 5 records, and no second page was requested.
    assert_eq!(summary.records_saved, 5);
    assert_eq!(read_records(dir.path()).len(), 5);
    assert_eq!(summary.pages_processed, 1);
}

#[tokio::test]
async fn test_dedup_across_pages() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_structured_unavailable(&server).await;

    let duplicate = quote_container("A quote repeated on both pages.", "One Author");
    let page_one = format!(
        r##"<html><body>{duplicate}{}<div class="pagination"><a class="next_page" href="/quotes/tag/life?page=2">next</a></div></body></html>"##,
        quote_container("A quote only on page one.", "One Author"),
    );
    let page_two = format!(
        "<html><body>{duplicate}{}</body></html>",
        quote_container("A quote only on page two.", "Two Author"),
    );

    Mock::given(method("GET"))
        .and(path("/quotes/tag/life"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_two))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/quotes/tag/life"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_one))
        .mount(&server)
        .await;

    let seed = format!("{}/quotes/tag/life", server.uri());
    let config = test_config(&seed, 100, 2, dir.path());

    let summary = Coordinator::new(config).unwrap().run().await.unwrap();

    // Four containers across two pages, one duplicate pair.
    assert_eq!(summary.records_saved, 3);
    let records = read_records(dir.path());
    let quotes: Vec<&str> = records
        .iter()
        .map(|r| r["quote"].as_str().unwrap())
        .collect();
    assert_eq!(
        quotes
            .iter()
            .filter(|q| **q == "A quote repeated on both pages.")
            .count(),
        1
    );
}

#[tokio::test]
async fn test_page_cap_stops_constructed_pagination() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_structured_unavailable(&server).await;

    // Every page looks the same and has no pagination markup, so the crawler
    // would paginate forever via the constructed page parameter.
    Mock::given(method("GET"))
        .and(path("/quotes/tag/life"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<html><body>{}</body></html>",
            quote_container("An identical quote on every page.", "Author"),
        )))
        .mount(&server)
        .await;

    let seed = format!("{}/quotes/tag/life", server.uri());
    let config = test_config(&seed, 100, 3, dir.path());

    let summary = Coordinator::new(config).unwrap().run().await.unwrap();

    // max-pages bounds the run; dedup leaves a single record.
    assert_eq!(summary.pages_processed, 3);
    assert_eq!(summary.records_saved, 1);
}

#[tokio::test]
async fn test_malformed_proxy_does_not_block_markup_extraction() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_structured_unavailable(&server).await;

    Mock::given(method("GET"))
        .and(path("/quotes/tag/life"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<html><body>{}</body></html>",
            quote_container("A quote served despite the proxy.", "Author"),
        )))
        .mount(&server)
        .await;

    let seed = format!("{}/quotes/tag/life", server.uri());
    let mut config = test_config(&seed, 100, 1, dir.path());
    config.proxy.urls = vec!["definitely not a proxy url".to_string()];

    let summary = Coordinator::new(config).unwrap().run().await.unwrap();
    assert_eq!(summary.records_saved, 1);
}

#[tokio::test]
async fn test_sqlite_sink_end_to_end() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_structured_unavailable(&server).await;

    Mock::given(method("GET"))
        .and(path("/quotes/tag/life"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<html><body>{}</body></html>",
            quote_container("A quote that lands in sqlite.", "Author"),
        )))
        .mount(&server)
        .await;

    let seed = format!("{}/quotes/tag/life", server.uri());
    let mut config = test_config(&seed, 100, 1, dir.path());
    let db_path = dir.path().join("quotes.db");
    config.output.path = db_path.to_string_lossy().into_owned();
    config.output.format = OutputFormat::Sqlite;

    let summary = Coordinator::new(config).unwrap().run().await.unwrap();
    assert_eq!(summary.records_saved, 1);

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let count: u64 = conn
        .query_row("SELECT COUNT(*) FROM quotes", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}
