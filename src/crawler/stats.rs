//! Counters describing one crawl run

/// Outcome of a crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Listing pages fetched during discovery
    pub pages_visited: u64,

    /// Distinct links discovered
    pub links_discovered: u64,

    /// Detail pages requested during the fetch phase
    pub items_attempted: u64,

    /// Records handed to the exchange channel
    pub records_emitted: u64,

    /// Detail pages skipped because fetching or extraction failed
    pub items_failed: u64,

    /// The host cancelled the run
    pub cancelled: bool,

    /// The row budget stopped the fetch phase
    pub budget_exhausted: bool,
}

impl CrawlStats {
    /// Links that were discovered but never requested
    pub fn items_skipped(&self) -> u64 {
        self.links_discovered.saturating_sub(self.items_attempted)
    }

    /// Logs a one-line summary of the run
    pub fn log_summary(&self) {
        tracing::info!(
            "Crawl finished: {} listing pages, {} links, {} rows emitted, {} failed, {} skipped{}{}",
            self.pages_visited,
            self.links_discovered,
            self.records_emitted,
            self.items_failed,
            self.items_skipped(),
            if self.cancelled { ", cancelled" } else { "" },
            if self.budget_exhausted {
                ", row limit reached"
            } else {
                ""
            },
        );
    }
}
