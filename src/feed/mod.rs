//! Feed ingestion: RSS XML in, normalized blog entries out.
//!
//! - [`parser`] - event-driven extraction of `<item>` fields using `quick-xml`
//! - [`transform`] - per-item defaults, HTML stripping, slugs, categories and SEO fields
//!
//! Parsing is a pure function of the feed text, the entry defaults and the
//! processing date. [`parse_feed_now`] supplies today's local date.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rss2blog::config::EntryDefaults;
//! use rss2blog::feed::parse_feed;
//!
//! let xml = "<rss><channel><item><title>Hello</title></item></channel></rss>";
//! let today = NaiveDate::from_ymd_opt(2025, 1, 29).unwrap();
//! let entries = parse_feed(xml, &EntryDefaults::default(), today).unwrap();
//! assert_eq!(entries[0].slug, "hello");
//! ```

mod parser;
mod transform;

use chrono::{Local, NaiveDate};

use crate::blog::BlogEntry;
use crate::config::EntryDefaults;

pub use parser::{parse_items, FeedError, RawItem, DUBLIN_CORE_NAMESPACE};
pub use transform::{
    clean_description, parse_pub_date, to_entry, MAX_DESCRIPTION_CHARS, MAX_EXCERPT_CHARS,
    MAX_KEYWORDS, MAX_META_DESCRIPTION_CHARS, MAX_SLUG_CHARS, MAX_TAGS,
};

/// Parses feed text into blog entries, one per `<item>`, in document order.
///
/// Entries carry `id = 0`. Missing or unparsable item fields fall back to
/// `defaults` (and `today` for dates); only malformed XML is an error.
///
/// # Errors
///
/// Returns [`FeedError`] when `xml` is not well-formed.
pub fn parse_feed(
    xml: &str,
    defaults: &EntryDefaults,
    today: NaiveDate,
) -> Result<Vec<BlogEntry>, FeedError> {
    let entries: Vec<BlogEntry> = parse_items(xml)?
        .into_iter()
        .enumerate()
        .map(|(idx, item)| to_entry(item, idx + 1, defaults, today))
        .collect();

    tracing::debug!(entries = entries.len(), %today, "Parsed feed");
    Ok(entries)
}

/// [`parse_feed`] using the local date as the processing date.
pub fn parse_feed_now(xml: &str, defaults: &EntryDefaults) -> Result<Vec<BlogEntry>, FeedError> {
    parse_feed(xml, defaults, Local::now().date_naive())
}
