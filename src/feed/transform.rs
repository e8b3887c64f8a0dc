//! Turns raw feed items into portfolio blog entries.
//!
//! Every field has a lenient fallback: a missing or unparsable value is
//! replaced by a default rather than reported.

use chrono::{NaiveDate, NaiveDateTime, Weekday};

use super::parser::RawItem;
use crate::blog::{BlogEntry, Category, Seo};
use crate::config::EntryDefaults;
use crate::util::{slugify, strip_html, truncate_chars, truncate_with_ellipsis};

pub const MAX_DESCRIPTION_CHARS: usize = 500;
pub const MAX_EXCERPT_CHARS: usize = 200;
pub const MAX_META_DESCRIPTION_CHARS: usize = 160;
pub const MAX_SLUG_CHARS: usize = 100;
pub const MAX_TAGS: usize = 7;
pub const MAX_KEYWORDS: usize = 10;

/// Only this many leading characters of `pubDate` are parsed, which cuts off
/// the RFC 822 zone (`+0000`, `GMT`, ...).
const PUB_DATE_PREFIX_CHARS: usize = 25;
/// Layout after the leading `"<weekday>, "`.
const PUB_DATE_FORMAT: &str = "%d %b %Y %H:%M:%S";

/// Converts an RSS `pubDate` to a calendar date, or `today` when it can't.
///
/// The weekday name must be a real weekday but is not checked against the
/// date, so `"Thu, 29 Jan 2025 ..."` still yields 2025-01-29.
///
/// ```
/// use chrono::NaiveDate;
/// use rss2blog::feed::parse_pub_date;
///
/// let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
/// assert_eq!(
///     parse_pub_date(Some("Wed, 29 Jan 2025 09:00:00 +0000"), today),
///     NaiveDate::from_ymd_opt(2025, 1, 29).unwrap()
/// );
/// assert_eq!(parse_pub_date(Some("yesterday"), today), today);
/// ```
pub fn parse_pub_date(raw: Option<&str>, today: NaiveDate) -> NaiveDate {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return today;
    };
    let prefix = truncate_chars(raw, PUB_DATE_PREFIX_CHARS);
    let parsed = match prefix.split_once(", ") {
        Some((weekday, rest)) if weekday.parse::<Weekday>().is_ok() => {
            NaiveDateTime::parse_from_str(rest, PUB_DATE_FORMAT).map_err(|e| e.to_string())
        }
        _ => Err("expected a weekday name followed by \", \"".to_string()),
    };
    match parsed {
        Ok(dt) => dt.date(),
        Err(error) => {
            tracing::debug!(pub_date = %raw, %error, "Unparsable pubDate, using processing date");
            today
        }
    }
}

/// Strips tags from an item description, trims it and caps its length.
pub fn clean_description(raw: Option<&str>) -> String {
    let stripped = strip_html(raw.unwrap_or_default());
    truncate_chars(stripped.trim(), MAX_DESCRIPTION_CHARS).to_string()
}

fn capped_or_default(values: &[String], max: usize, fallback: &[String]) -> Vec<String> {
    if values.is_empty() {
        fallback.to_vec()
    } else {
        values.iter().take(max).cloned().collect()
    }
}

/// Builds the blog entry for the item at 1-based `position` in the feed.
///
/// The entry keeps `id` at `0`; identifiers are only meaningful once the
/// entry is merged into a collection.
pub fn to_entry(
    item: RawItem,
    position: usize,
    defaults: &EntryDefaults,
    today: NaiveDate,
) -> BlogEntry {
    let placeholder = || format!("article-{position}");

    let title = item
        .title
        .filter(|t| !t.is_empty())
        .unwrap_or_else(placeholder);
    let mut slug = slugify(&title, MAX_SLUG_CHARS);
    if slug.is_empty() {
        slug = placeholder();
    }

    let description = clean_description(item.description.as_deref());
    let excerpt = truncate_with_ellipsis(&description, MAX_EXCERPT_CHARS).into_owned();
    let meta_description = truncate_chars(&description, MAX_META_DESCRIPTION_CHARS).to_string();

    let publish_date = parse_pub_date(item.pub_date.as_deref(), today);
    let author = item
        .creator
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| defaults.author.clone());

    let category = Category::classify(&item.categories);
    let tags = capped_or_default(&item.categories, MAX_TAGS, &defaults.default_tags);
    let keywords = capped_or_default(&item.categories, MAX_KEYWORDS, &defaults.default_keywords);

    BlogEntry {
        id: 0,
        seo: Seo {
            meta_title: format!("{} | {}", title, defaults.source_name),
            meta_description,
            keywords,
            og_image: defaults.og_image_url.clone(),
            canonical_url: item.link.unwrap_or_default(),
        },
        slug,
        title,
        content: description.clone(),
        description,
        excerpt,
        author,
        publish_date,
        last_modified: publish_date,
        read_time: defaults.read_time.clone(),
        category,
        tags,
        image: defaults.image_url.clone(),
        featured: position <= defaults.featured_count,
        views: 0,
    }
}
