//! Reference-rate source: one XML feed, one record per currency
//!
//! The feed lists `<Cube currency="USD" rate="1.0857"/>` elements. There is
//! no pagination and no detail page, so the crawl engine is not involved.

use crate::columns::ColumnType;
use crate::config::RowBudget;
use crate::crawler::{fetch_page, Page};
use crate::exchange::{ExchangeChannel, Record};
use crate::{HarvestError, Result};
use reqwest::Client;
use scraper::Selector;

/// Daily euro foreign exchange reference rates
pub const DEFAULT_FEED: &str = "https://www.ecb.europa.eu/stats/eurofxref/eurofxref-daily.xml";

/// Column carrying the exchange rate
pub const RATE_COLUMN: &str = "Rate";

/// Columns this source adds to every record
pub const COLUMNS: &[(&str, ColumnType)] = &[(RATE_COLUMN, ColumnType::Numerical)];

/// The whole feed is delivered as a single batch
pub const RATES_BULK_SIZE: usize = 100;

// the HTML parser lowercases element and attribute names
const RATE_ELEMENT: &str = "cube[currency][rate]";

/// One currency quote
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceRate {
    pub currency: String,
    pub rate: f64,
}

/// Extracts every quote from a feed page
///
/// A quote whose rate is not a number is logged and skipped.
pub fn parse_rates(page: &Page) -> Result<Vec<ReferenceRate>> {
    let selector = Selector::parse(RATE_ELEMENT).map_err(|e| HarvestError::Selector {
        selector: RATE_ELEMENT.to_string(),
        message: e.to_string(),
    })?;

    let document = page.document();
    let mut rates = Vec::new();
    for element in document.select(&selector) {
        let (Some(currency), Some(raw)) = (
            element.value().attr("currency"),
            element.value().attr("rate"),
        ) else {
            continue;
        };
        match raw.trim().parse::<f64>() {
            Ok(rate) => rates.push(ReferenceRate {
                currency: currency.trim().to_string(),
                rate,
            }),
            Err(e) => tracing::warn!("Skipping {} with rate '{}': {}", currency, raw, e),
        }
    }
    Ok(rates)
}

/// Fetches the feed at `url` and inserts one record per currency
///
/// Returns the number of records inserted.
pub async fn harvest_reference_rates(
    client: &Client,
    url: &str,
    budget: RowBudget,
    channel: &mut ExchangeChannel,
) -> Result<u64> {
    channel.set_bulk_size(RATES_BULK_SIZE);

    if channel.is_cancelled() {
        tracing::info!("Node execution is cancelled");
        return Ok(0);
    }

    let page = fetch_page(client, url).await?;
    let rates = parse_rates(&page)?;
    tracing::info!("{} reference rates in {}", rates.len(), url);

    let mut emitted = 0;
    for quote in rates {
        if channel.is_cancelled() || budget.is_exhausted(emitted) {
            tracing::info!("Stopping after {} rates", emitted);
            break;
        }
        channel.insert(Record::new(quote.currency).with_attribute(RATE_COLUMN, quote.rate));
        emitted += 1;
    }
    Ok(emitted)
}
