//! Sources a worker can harvest
//!
//! Each source is thin glue: it picks a seed, wires an extractor (or a
//! one-shot fetch) to the exchange channel, and declares its columns.

pub mod blog;
pub mod page;
pub mod rates;

pub use blog::BlogExtractor;
pub use page::harvest_page;
pub use rates::harvest_reference_rates;

use crate::columns::ColumnType;
use crate::config::HostConfig;
use crate::crawler::{build_http_client, crawl};
use crate::exchange::ExchangeChannel;
use crate::Result;
use clap::ValueEnum;

/// Worker flavours selectable on the command line
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum Source {
    /// Paginated blog listing, one record per post
    Blog,
    /// Daily reference-rate feed, one record per currency
    Rates,
    /// A single page, stored as served
    Page,
}

impl Source {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::Rates => "rates",
            Self::Page => "page",
        }
    }

    /// Extra columns the source attaches to its records
    pub fn columns(&self) -> &'static [(&'static str, ColumnType)] {
        match self {
            Self::Blog => blog::COLUMNS,
            Self::Rates => rates::COLUMNS,
            Self::Page => &[],
        }
    }

    /// Seed URL for the run: the host's URL, or the source default
    pub fn seed<'a>(&self, config: &'a HostConfig) -> &'a str {
        if !config.url.is_empty() {
            return &config.url;
        }
        match self {
            Self::Blog => blog::DEFAULT_SEED,
            Self::Rates => rates::DEFAULT_FEED,
            Self::Page => "",
        }
    }

    /// Harvests the source into `channel` and returns the number of records
    pub async fn run(&self, config: &HostConfig, channel: &mut ExchangeChannel) -> Result<u64> {
        for (name, kind) in self.columns() {
            tracing::debug!("Column {} ({})", name, kind.code());
        }
        for (key, value) in config.parameters()? {
            tracing::debug!("Parameter {} = {}", key, value);
        }

        let seed = self.seed(config);
        tracing::info!("Harvesting {} source from {}", self.name(), seed);

        match self {
            Self::Blog => {
                let stats = crawl(config, BlogExtractor::new()?, seed, channel).await?;
                Ok(stats.records_emitted)
            }
            Self::Rates => {
                let client = build_http_client(config.fetch_timeout())?;
                harvest_reference_rates(&client, seed, config.row_budget(), channel).await
            }
            Self::Page => {
                let client = build_http_client(config.fetch_timeout())?;
                harvest_page(&client, seed, channel).await
            }
        }
    }
}
