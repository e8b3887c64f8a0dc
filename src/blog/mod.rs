//! The portfolio blog collection: entry model, merging and the JSON file.
//!
//! - `types` - [`BlogEntry`], [`Seo`] and the [`Category`] rule table
//! - `merge` - id assignment and size capping when new entries join a collection
//! - `store` - loading, saving and backing up the collection document
//! - `process` - the parse → merge → save sequence callers use

mod merge;
mod process;
mod store;
mod types;

pub use merge::{assign_ids, combine, merge, IdOverflow, Identified, DEFAULT_MAX_ENTRIES};
pub use process::{process_feed, ProcessError, ProcessOptions, BLOGS_KEY};
pub use store::{backup, load_document, save_document, StoreError};
pub use types::{BlogEntry, Category, Seo};
