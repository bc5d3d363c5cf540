//! Integration tests for the crawl workers
//!
//! These tests use wiremock to create mock HTTP servers and run complete
//! harvests into a temporary output folder, checking the batch files the
//! host would read.

use hostcrawl::columns::Scalar;
use hostcrawl::config::{HostConfig, RowBudget};
use hostcrawl::crawler::{build_http_client, crawl};
use hostcrawl::exchange::{BatchFile, Document, ExchangeChannel, STOP_MARKER};
use hostcrawl::sources::{harvest_page, harvest_reference_rates, BlogExtractor, Source};
use hostcrawl::HarvestError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Creates a run configuration writing into `output`
fn create_test_config(url: &str, output: &Path, maximum_rows: Option<u64>) -> HostConfig {
    HostConfig {
        url: url.to_string(),
        maximum_rows,
        output_folder: output.to_path_buf(),
        log_folder: output.join("logs"),
        debug_mode: true,
        params: String::new(),
        bulk_size: 2,
        fetch_timeout_secs: 5,
    }
}

fn listing_page(base: &str, posts: &[(&str, &str)], next: Option<&str>) -> String {
    let mut html = String::from("<html><body>");
    for (slug, published) in posts {
        html.push_str(&format!(
            r#"<article><a rel="bookmark" href="{}/post/{}">{}</a><time datetime="{}"></time></article>"#,
            base, slug, slug, published
        ));
    }
    if let Some(next) = next {
        html.push_str(&format!(r#"<nav><a class="next" href="{}">Next</a></nav>"#, next));
    }
    html.push_str("</body></html>");
    html
}

fn post_page(title: &str, body: &str) -> String {
    format!(
        r#"<html><head><title>{}</title></head><body><main><section class="l-section">{}</section></main></body></html>"#,
        title, body
    )
}

async fn mount_html(server: &MockServer, at: &str, body: String, expected: u64) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(expected)
        .mount(server)
        .await;
}

/// All documents in the output folder, plus the names of any lock markers
fn read_output(dir: &Path) -> (Vec<Document>, Vec<PathBuf>) {
    let mut docs = Vec::new();
    let mut locks = Vec::new();
    for entry in std::fs::read_dir(dir).expect("Failed to list output folder") {
        let path = entry.expect("Failed to read entry").path();
        if path.is_dir() || path.file_name().map_or(false, |n| n == STOP_MARKER) {
            continue;
        }
        if path.extension().is_some() {
            locks.push(path);
            continue;
        }
        let batch: BatchFile =
            serde_json::from_slice(&std::fs::read(&path).expect("Failed to read batch"))
                .expect("Batch is not valid JSON");
        docs.extend(batch.docs);
    }
    docs.sort_by(|a, b| a.docurl.cmp(&b.docurl));
    (docs, locks)
}

fn batch_count(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file() && e.path().extension().is_none())
        .filter(|e| e.file_name() != STOP_MARKER)
        .count()
}

/// Serves a page and creates the host's stop marker while doing so
struct StopWhileServing {
    marker: PathBuf,
    body: String,
}

impl Respond for StopWhileServing {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        std::fs::write(&self.marker, b"").expect("Failed to create stop marker");
        ResponseTemplate::new(200).set_body_string(self.body.clone())
    }
}

#[tokio::test]
async fn test_full_blog_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();
    let output = TempDir::new().unwrap();

    mount_html(
        &server,
        "/blog",
        listing_page(
            &base,
            &[("a", "2020-12-10 12:00:54"), ("b", "2020-12-11 09:15:00")],
            Some(&format!("{}/blog/page/2", base)),
        ),
        1,
    )
    .await;
    mount_html(
        &server,
        "/blog/page/2",
        listing_page(&base, &[("c", "2020-12-12 18:30:00")], None),
        1,
    )
    .await;
    mount_html(&server, "/post/a", post_page("Post A", "alpha"), 1).await;
    mount_html(&server, "/post/b", post_page("Post B", "beta"), 1).await;
    mount_html(&server, "/post/c", post_page("Post C", "gamma"), 1).await;

    let config = create_test_config(&format!("{}/blog", base), output.path(), None);
    let mut channel = ExchangeChannel::from_config(&config);
    let stats = crawl(
        &config,
        BlogExtractor::new().unwrap(),
        &config.url,
        &mut channel,
    )
    .await
    .expect("Crawl failed");
    let batches = channel.close();

    assert_eq!(stats.pages_visited, 2);
    assert_eq!(stats.records_emitted, 3);
    assert_eq!(batches, 2);

    let (docs, locks) = read_output(output.path());
    assert!(locks.is_empty(), "lock markers left: {:?}", locks);
    assert_eq!(docs.len(), 3);
    assert_eq!(docs[0].title, "Post A");
    assert_eq!(docs[0].decode_content().unwrap(), b"alpha");
    assert_eq!(
        docs[2].columns["Published"],
        Scalar::from("12/12/2020 06:30:00 PM")
    );
}

#[tokio::test]
async fn test_row_limit_from_config() {
    let server = MockServer::start().await;
    let base = server.uri();
    let output = TempDir::new().unwrap();

    mount_html(
        &server,
        "/blog",
        listing_page(
            &base,
            &[
                ("a", "2020-12-10 12:00:54"),
                ("b", "2020-12-11 12:00:54"),
                ("c", "2020-12-12 12:00:54"),
            ],
            None,
        ),
        1,
    )
    .await;
    mount_html(&server, "/post/a", post_page("A", "a"), 1).await;
    mount_html(&server, "/post/b", post_page("B", "b"), 0).await;
    mount_html(&server, "/post/c", post_page("C", "c"), 0).await;

    let config = create_test_config(&format!("{}/blog", base), output.path(), Some(1));
    assert_eq!(config.row_budget(), RowBudget::Limited(1));

    let mut channel = ExchangeChannel::from_config(&config);
    let stats = crawl(&config, BlogExtractor::new().unwrap(), &config.url, &mut channel)
        .await
        .unwrap();
    channel.close();

    assert!(stats.budget_exhausted);
    let (docs, _) = read_output(output.path());
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].docurl, format!("{}/post/a", base));
}

#[tokio::test]
async fn test_stop_marker_halts_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();
    let output = TempDir::new().unwrap();

    mount_html(
        &server,
        "/blog",
        listing_page(
            &base,
            &[("a", "2020-12-10 12:00:54"), ("b", "2020-12-11 12:00:54")],
            None,
        ),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/post/a"))
        .respond_with(StopWhileServing {
            marker: output.path().join(STOP_MARKER),
            body: post_page("A", "a"),
        })
        .expect(1)
        .mount(&server)
        .await;
    mount_html(&server, "/post/b", post_page("B", "b"), 0).await;

    let mut config = create_test_config(&format!("{}/blog", base), output.path(), None);
    config.bulk_size = 1;

    let mut channel = ExchangeChannel::from_config(&config);
    let stats = crawl(&config, BlogExtractor::new().unwrap(), &config.url, &mut channel)
        .await
        .unwrap();
    channel.close();

    assert!(stats.cancelled);
    assert_eq!(stats.records_emitted, 1);
    let (docs, _) = read_output(output.path());
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].title, "A");
}

#[tokio::test]
async fn test_broken_post_does_not_abort_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();
    let output = TempDir::new().unwrap();

    mount_html(
        &server,
        "/blog",
        listing_page(
            &base,
            &[
                ("a", "2020-12-10 12:00:54"),
                ("b", "2020-12-11 12:00:54"),
                ("c", "2020-12-12 12:00:54"),
            ],
            None,
        ),
        1,
    )
    .await;
    mount_html(&server, "/post/a", post_page("A", "a"), 1).await;
    Mock::given(method("GET"))
        .and(path("/post/b"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_html(&server, "/post/c", post_page("C", "c"), 1).await;

    let config = create_test_config(&format!("{}/blog", base), output.path(), None);
    let mut channel = ExchangeChannel::from_config(&config);
    let stats = crawl(&config, BlogExtractor::new().unwrap(), &config.url, &mut channel)
        .await
        .unwrap();
    channel.close();

    assert_eq!(stats.items_failed, 1);
    let (docs, _) = read_output(output.path());
    let titles: Vec<&str> = docs.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "C"]);
}

#[tokio::test]
async fn test_broken_listing_aborts_before_downloads() {
    let server = MockServer::start().await;
    let base = server.uri();
    let output = TempDir::new().unwrap();

    mount_html(
        &server,
        "/blog",
        listing_page(
            &base,
            &[("a", "2020-12-10 12:00:54")],
            Some(&format!("{}/blog/page/2", base)),
        ),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/blog/page/2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_html(&server, "/post/a", post_page("A", "a"), 0).await;

    let config = create_test_config(&format!("{}/blog", base), output.path(), None);
    let mut channel = ExchangeChannel::from_config(&config);
    let result = crawl(&config, BlogExtractor::new().unwrap(), &config.url, &mut channel).await;
    channel.close();

    assert!(matches!(result, Err(HarvestError::Status { status: 500, .. })));
    assert_eq!(batch_count(output.path()), 0);
}

#[tokio::test]
async fn test_reference_rates_single_batch() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    let feed = r#"<Cube><Cube time='2024-03-01'>
        <Cube currency='USD' rate='1.0830'/>
        <Cube currency='JPY' rate='162.66'/>
        <Cube currency='GBP' rate='0.85420'/>
    </Cube></Cube>"#;
    Mock::given(method("GET"))
        .and(path("/eurofxref-daily.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed))
        .expect(1)
        .mount(&server)
        .await;

    let mut channel = ExchangeChannel::new(output.path(), 2);
    let client = build_http_client(Duration::from_secs(5)).unwrap();
    let rows = harvest_reference_rates(
        &client,
        &format!("{}/eurofxref-daily.xml", server.uri()),
        RowBudget::Unbounded,
        &mut channel,
    )
    .await
    .unwrap();
    let batches = channel.close();

    assert_eq!(rows, 3);
    assert_eq!(batches, 1);
    let (docs, _) = read_output(output.path());
    let usd = docs.iter().find(|d| d.docurl == "USD").unwrap();
    assert_eq!(usd.columns["Rate"], Scalar::from(1.083));
    assert_eq!(usd.decode_content().unwrap(), b" ");
}

#[tokio::test]
async fn test_single_page_snapshot() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    let html = "<html><head><title>Dashboard</title></head><body>42</body></html>";
    mount_html(&server, "/app", html.to_string(), 1).await;

    let mut channel = ExchangeChannel::new(output.path(), 10);
    let client = build_http_client(Duration::from_secs(5)).unwrap();
    let rows = harvest_page(&client, &format!("{}/app", server.uri()), &mut channel)
        .await
        .unwrap();

    // flushed immediately, before the channel is closed
    assert_eq!(rows, 1);
    assert_eq!(channel.batches_written(), 1);
    let (docs, _) = read_output(output.path());
    assert_eq!(docs[0].title, "Dashboard");
    assert_eq!(docs[0].decode_content().unwrap(), html.as_bytes());
}

#[tokio::test]
async fn test_page_source_requires_url() {
    let output = TempDir::new().unwrap();
    let config = create_test_config("", output.path(), None);

    let mut channel = ExchangeChannel::from_config(&config);
    let result = Source::Page.run(&config, &mut channel).await;

    assert!(matches!(result, Err(HarvestError::Config(_))));
}
