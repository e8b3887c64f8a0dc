//! Utility functions for common operations.
//!
//! This module provides the text helpers the entry transformer is built on:
//!
//! - **HTML stripping**: pattern-based removal of `<...>` tag markers
//! - **Truncation**: character-count (not byte) truncation, with or without an ellipsis
//! - **Slugs**: URL-safe identifiers derived from titles
//!
//! # Examples
//!
//! ```
//! use rss2blog::util::{slugify, strip_html, truncate_chars};
//!
//! assert_eq!(strip_html("<em>Launch</em> day"), "Launch day");
//! assert_eq!(slugify("Launch Day!", 100), "launch-day");
//! assert_eq!(truncate_chars("Launch day", 6), "Launch");
//! ```

mod text;

pub use text::{slugify, strip_html, truncate_chars, truncate_with_ellipsis, ELLIPSIS};
