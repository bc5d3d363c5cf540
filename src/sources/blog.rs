//! Blog source: paginated article listing plus one detail page per post
//!
//! Targets WordPress-style themes:
//! - every post on a listing page is an `<article>` with a bookmark link
//!   and a `<time datetime>` element
//! - pagination is a `next` link inside `<nav>`
//! - the post body lives in `l-section` sections under `<main>`

use crate::columns::{format_host_datetime, Attributes, ColumnType, Scalar};
use crate::crawler::{Detail, Extractor, Listing, Page};
use crate::{HarvestError, Result};
use chrono::{DateTime, NaiveDateTime};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Listing used when the host does not supply a URL
pub const DEFAULT_SEED: &str = "https://megaputer.com/blog";

/// Column carrying the publication date of a post
pub const PUBLISHED_COLUMN: &str = "Published";

/// Columns this source adds to every record
pub const COLUMNS: &[(&str, ColumnType)] = &[(PUBLISHED_COLUMN, ColumnType::DateTime)];

const ARTICLE: &str = "article";
const BOOKMARK: &str = r#"a[rel="bookmark"][href]"#;
const PUBLISHED: &str = "time[datetime]";
const NEXT_PAGE: &str = r#"nav a[class*="next"][href]"#;
const BODY: &str = r#"main > section[class*="l-section"]:not([class*="for_sharing"]):not([class*="for_related"])"#;
const BODY_FALLBACK: &str = "main";
const TITLE: &str = "title";

/// Extractor for blog listings and posts
#[derive(Debug, Clone)]
pub struct BlogExtractor {
    article: Selector,
    bookmark: Selector,
    published: Selector,
    next_page: Selector,
    body: Selector,
    body_fallback: Selector,
    title: Selector,
}

impl BlogExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            article: selector(ARTICLE)?,
            bookmark: selector(BOOKMARK)?,
            published: selector(PUBLISHED)?,
            next_page: selector(NEXT_PAGE)?,
            body: selector(BODY)?,
            body_fallback: selector(BODY_FALLBACK)?,
            title: selector(TITLE)?,
        })
    }

    fn entry(&self, article: ElementRef<'_>, base: &Url) -> Result<(String, Attributes)> {
        let href = article
            .select(&self.bookmark)
            .next()
            .and_then(|a| a.value().attr("href"))
            .ok_or_else(|| HarvestError::extract(base.as_str(), "article without bookmark link"))?;
        let link = base.join(href.trim())?;

        let raw = article
            .select(&self.published)
            .next()
            .and_then(|t| t.value().attr("datetime"))
            .ok_or_else(|| {
                HarvestError::extract(base.as_str(), format!("no publication date for {}", link))
            })?;
        let published = parse_published(raw).ok_or_else(|| {
            HarvestError::extract(base.as_str(), format!("unparseable date '{}'", raw))
        })?;

        let mut metadata = Attributes::new();
        metadata.insert(
            PUBLISHED_COLUMN.to_string(),
            Scalar::from(format_host_datetime(&published)),
        );
        Ok((link.to_string(), metadata))
    }

    fn body_text(&self, document: &Html) -> String {
        let mut text: String = document
            .select(&self.body)
            .flat_map(|section| section.text())
            .collect();
        if text.trim().is_empty() {
            text = document
                .select(&self.body_fallback)
                .flat_map(|main| main.text())
                .collect();
        }
        text
    }
}

impl Extractor for BlogExtractor {
    fn discover(&self, page: &Page) -> Result<Listing> {
        let document = page.document();
        let base = Url::parse(&page.url)?;

        let entries = document
            .select(&self.article)
            .map(|article| self.entry(article, &base))
            .collect::<Result<Vec<_>>>()?;

        let next_page = document
            .select(&self.next_page)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|href| base.join(href.trim()))
            .transpose()?
            .map(String::from);

        Ok(Listing { entries, next_page })
    }

    fn fetch_detail(&self, page: &Page) -> Result<Detail> {
        let document = page.document();

        let title = document
            .select(&self.title)
            .next()
            .map(|t| t.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(Detail {
            title,
            content: self.body_text(&document).into_bytes(),
            attributes: Attributes::new(),
        })
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| HarvestError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// Accepts `2020-12-10 12:00:54` and RFC 3339 timestamps
///
/// RFC 3339 values keep their wall-clock time; the offset is dropped.
fn parse_published(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.naive_local()))
}
