use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;

use super::merge::{assign_ids, combine, IdOverflow, DEFAULT_MAX_ENTRIES};
use super::store::{load_document, save_document, StoreError};
use super::BlogEntry;
use crate::config::EntryDefaults;
use crate::feed::{parse_feed, FeedError};

/// Key of the blog array inside the collection document.
pub const BLOGS_KEY: &str = "blogs";

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("'{0}' does not contain a JSON object at the top level")]
    NotAnObject(PathBuf),

    #[error("'{0}' has no \"blogs\" array")]
    MissingBlogs(PathBuf),

    #[error(transparent)]
    IdOverflow(#[from] IdOverflow),

    #[error("Failed to encode blog entry: {0}")]
    Encode(#[from] serde_json::Error),
}

/// How [`process_feed`] treats the collection file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Merge into and rewrite the collection file. `false` is a dry run that
    /// never touches the filesystem.
    pub update: bool,
    pub max_entries: usize,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            update: false,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

/// Parses `xml` and, in update mode, merges the result into the collection at `path`.
///
/// Returns the newly parsed entries. In update mode they carry the ids they
/// were given in the collection; in a dry run every id is `0`.
///
/// The update is a plain load, modify, save sequence with no lock held in
/// between. Take a [`backup`](super::store::backup) first if the previous
/// collection matters.
pub fn process_feed(
    xml: &str,
    path: &Path,
    options: ProcessOptions,
    defaults: &EntryDefaults,
    today: NaiveDate,
) -> Result<Vec<BlogEntry>, ProcessError> {
    let mut entries = parse_feed(xml, defaults, today)?;

    if !options.update {
        tracing::debug!(entries = entries.len(), "Dry run, collection left untouched");
        return Ok(entries);
    }

    let mut document = load_document(path)?;
    let root = document
        .as_object_mut()
        .ok_or_else(|| ProcessError::NotAnObject(path.to_path_buf()))?;
    let existing = match root.get_mut(BLOGS_KEY).map(Value::take) {
        Some(Value::Array(blogs)) => blogs,
        _ => return Err(ProcessError::MissingBlogs(path.to_path_buf())),
    };
    let existing_count = existing.len();

    assign_ids(&existing, &mut entries)?;
    let new_records = entries
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    let merged = combine(new_records, existing, options.max_entries);
    let merged_count = merged.len();

    root.insert(BLOGS_KEY.to_string(), Value::Array(merged));
    save_document(path, &document)?;

    tracing::info!(
        path = %path.display(),
        new = entries.len(),
        existing = existing_count,
        total = merged_count,
        "Merged feed entries into blog collection"
    );
    Ok(entries)
}
