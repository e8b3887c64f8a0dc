//! Converts RSS feed items into portfolio blog records and merges them into a
//! `blogs.json` collection.
//!
//! The pipeline runs in one direction: feed XML → [`blog::BlogEntry`] values
//! ([`feed`]) → merged collection ([`blog::merge()`]) → JSON file
//! ([`blog::save_document`]). [`blog::process_feed`] strings the steps together.

pub mod blog;
pub mod config;
pub mod feed;
pub mod util;
