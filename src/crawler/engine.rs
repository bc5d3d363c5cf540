//! Two-phase crawl engine
//!
//! A run walks a paginated listing to collect links (discovery), then
//! downloads each link and turns it into a record (fetch). The phases have
//! different failure policies:
//! - discovery errors abort the run, since a broken listing is systemic
//! - fetch errors are logged per item and the run moves on
//!
//! Cancellation is polled before every page request in both phases.

use crate::columns::Attributes;
use crate::config::RowBudget;
use crate::crawler::{fetch_page, CrawlLinks, CrawlStats, Extractor};
use crate::exchange::{Record, RecordSink};
use crate::Result;
use reqwest::Client;
use std::collections::HashSet;

/// Discover-then-fetch crawler over a single extractor
pub struct CrawlEngine<E> {
    client: Client,
    extractor: E,
    budget: RowBudget,
}

impl<E: Extractor> CrawlEngine<E> {
    pub fn new(client: Client, extractor: E, budget: RowBudget) -> Self {
        Self {
            client,
            extractor,
            budget,
        }
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Runs both phases starting from the listing at `seed`
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlStats)` - The run finished, was cancelled, or hit its row budget
    /// * `Err(HarvestError)` - A listing page could not be fetched or parsed
    pub async fn run<S: RecordSink>(&self, seed: &str, sink: &mut S) -> Result<CrawlStats> {
        let mut stats = CrawlStats::default();

        let links = self.discover(seed, &*sink, &mut stats).await?;
        if stats.cancelled {
            tracing::info!("Node execution is cancelled, skipping downloads");
        } else {
            tracing::debug!("Found {} links to download", links.len());
            self.fetch_all(&links, sink, &mut stats).await;
        }

        stats.log_summary();
        Ok(stats)
    }

    /// Walks the listing chain from `seed` and collects links
    ///
    /// Stops when a page has no next link, when the next link points back to
    /// a page already visited, or when the host cancels the run. The row
    /// budget does not apply here.
    pub async fn discover<S: RecordSink + ?Sized>(
        &self,
        seed: &str,
        sink: &S,
        stats: &mut CrawlStats,
    ) -> Result<CrawlLinks> {
        let mut links = CrawlLinks::new();
        let mut visited = HashSet::new();
        let mut url = seed.to_string();

        loop {
            if sink.is_cancelled() {
                tracing::info!("Node execution is cancelled during discovery");
                stats.cancelled = true;
                break;
            }

            visited.insert(url.clone());
            let page = fetch_page(&self.client, &url).await?;
            stats.pages_visited += 1;

            let listing = self.extractor.discover(&page)?;
            tracing::debug!("{} entries on listing page {}", listing.entries.len(), url);
            for (locator, metadata) in listing.entries {
                links.upsert(locator, metadata);
            }

            match listing.next_page {
                None => {
                    tracing::info!("There are no more pages after {}", url);
                    break;
                }
                Some(next) if visited.contains(&next) => {
                    tracing::warn!("Listing page {} links back to {}, stopping", url, next);
                    break;
                }
                Some(next) => url = next,
            }
        }

        stats.links_discovered = links.len() as u64;
        Ok(links)
    }

    /// Downloads each link in discovery order and emits its record
    ///
    /// A failing item is logged and skipped. Iteration stops early on
    /// cancellation or once the row budget is used up.
    pub async fn fetch_all<S: RecordSink + ?Sized>(
        &self,
        links: &CrawlLinks,
        sink: &mut S,
        stats: &mut CrawlStats,
    ) {
        for (locator, metadata) in links.iter() {
            if sink.is_cancelled() {
                tracing::info!("Node execution is cancelled");
                stats.cancelled = true;
                break;
            }
            if self.budget.is_exhausted(stats.records_emitted) {
                tracing::info!("Row limit of {:?} reached", self.budget);
                stats.budget_exhausted = true;
                break;
            }

            stats.items_attempted += 1;
            match self.fetch_record(locator, metadata).await {
                Ok(record) => {
                    sink.insert(record);
                    stats.records_emitted += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to download \"{}\": {}", locator, e);
                    stats.items_failed += 1;
                }
            }
        }
    }

    async fn fetch_record(&self, locator: &str, metadata: &Attributes) -> Result<Record> {
        let page = fetch_page(&self.client, locator).await?;
        let detail = self.extractor.fetch_detail(&page)?;
        Ok(detail.into_record(locator, metadata))
    }
}
