//! Single-page source: snapshot one URL as one record
//!
//! The page is stored as served; no JavaScript is executed.

use crate::crawler::{fetch_page, Page};
use crate::exchange::{ExchangeChannel, Record};
use crate::{ConfigError, HarvestError, Result};
use reqwest::Client;
use scraper::Selector;

/// Title of an HTML page, if it has a non-empty one
pub fn page_title(page: &Page) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    page.document()
        .select(&selector)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Fetches `url` and delivers it to the host at once
///
/// The record is keyed by the final URL after redirects.
pub async fn harvest_page(
    client: &Client,
    url: &str,
    channel: &mut ExchangeChannel,
) -> Result<u64> {
    if url.is_empty() {
        return Err(HarvestError::Config(ConfigError::Validation(
            "Please provide at least one URL".to_string(),
        )));
    }

    if channel.is_cancelled() {
        tracing::info!("Node execution is cancelled");
        return Ok(0);
    }

    let page = fetch_page(client, url).await?;
    let mut record = Record::new(page.url.clone()).with_content(page.body.clone());
    record.title = page_title(&page);

    channel.insert(record);
    channel.flush();
    Ok(1)
}
