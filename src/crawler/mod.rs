//! Crawler module for listing traversal and page fetching
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with bounded timeouts
//! - The extractor contract each source implements
//! - The ordered link table built during discovery
//! - The two-phase crawl engine

mod engine;
mod extractor;
mod fetcher;
mod links;
mod stats;

pub use engine::CrawlEngine;
pub use extractor::{Detail, Extractor, Listing};
pub use fetcher::{build_http_client, fetch_page, Page, USER_AGENT};
pub use links::CrawlLinks;
pub use stats::CrawlStats;

use crate::config::HostConfig;
use crate::exchange::RecordSink;
use crate::Result;

/// Runs a complete crawl for `extractor` with the settings of a host run
///
/// This is the main entry point for listing-based sources. It will:
/// 1. Build the HTTP client with the configured fetch timeout
/// 2. Walk the listing starting at `seed`
/// 3. Download every discovered link within the row budget
/// 4. Hand each record to `sink`
pub async fn crawl<E, S>(
    config: &HostConfig,
    extractor: E,
    seed: &str,
    sink: &mut S,
) -> Result<CrawlStats>
where
    E: Extractor,
    S: RecordSink,
{
    let client = build_http_client(config.fetch_timeout())?;
    let engine = CrawlEngine::new(client, extractor, config.row_budget());
    engine.run(seed, sink).await
}
