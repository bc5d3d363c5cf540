//! Contract between the crawl engine and per-source extractors

use crate::columns::Attributes;
use crate::crawler::Page;
use crate::exchange::Record;
use crate::Result;

/// Entries found on one listing page
#[derive(Debug, Clone, Default)]
pub struct Listing {
    /// `(locator, metadata)` pairs in page order
    pub entries: Vec<(String, Attributes)>,

    /// Absolute URL of the next listing page, if any
    pub next_page: Option<String>,
}

/// Fields extracted from a detail page
#[derive(Debug, Clone, Default)]
pub struct Detail {
    pub title: Option<String>,
    pub content: Vec<u8>,
    pub attributes: Attributes,
}

impl Detail {
    /// Builds the record for `locator`, layering the metadata gathered at
    /// discovery over the detail attributes
    pub fn into_record(self, locator: &str, metadata: &Attributes) -> Record {
        let mut record = Record::new(locator)
            .with_content(self.content)
            .with_attributes(self.attributes)
            .with_attributes(metadata.clone());
        record.title = self.title;
        record
    }
}

/// Source-specific page extraction
///
/// Both methods may fail on malformed markup. A failure in [`discover`]
/// aborts the crawl; a failure in [`fetch_detail`] only skips that item.
///
/// [`discover`]: Extractor::discover
/// [`fetch_detail`]: Extractor::fetch_detail
pub trait Extractor {
    /// Extracts links and the next-page URL from a listing page
    fn discover(&self, page: &Page) -> Result<Listing>;

    /// Extracts the document fields from a detail page
    fn fetch_detail(&self, page: &Page) -> Result<Detail>;
}
