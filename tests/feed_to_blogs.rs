//! Integration tests for the feed-to-collection pipeline: parse, merge, save.
//!
//! Each test that touches the filesystem works in its own directory under the
//! system temp dir. The fixture feed mirrors a TechCrunch export: CDATA and
//! entity-escaped descriptions, `dc:creator`, several categories per item.

use std::path::PathBuf;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rss2blog::blog::{
    backup, load_document, merge, process_feed, save_document, Category, ProcessOptions,
};
use rss2blog::config::EntryDefaults;
use rss2blog::feed::parse_feed;
use serde_json::{json, Value};

const FEED: &str = include_str!("fixtures/techcrunch.xml");

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rss2blog_it_{name}"));
    std::fs::remove_dir_all(&dir).ok();
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn existing_collection() -> Value {
    json!({
        "meta": { "title": "Engineering Notes", "lang": "en" },
        "blogs": [
            { "id": 1, "title": "Existing Blog 1", "slug": "existing-1" },
            { "id": 2, "title": "Existing Blog 2", "slug": "existing-2" }
        ],
        "categories": ["Technology", "Startups"]
    })
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_fixture_entries() {
    let entries = parse_feed(FEED, &EntryDefaults::default(), today()).unwrap();
    assert_eq!(entries.len(), 4);

    let first = &entries[0];
    assert_eq!(first.slug, "ai-startup-raises-10m");
    assert_eq!(first.author, "Kyle Wiggers");
    assert_eq!(
        first.description,
        "An AI startup building agents for finance teams has raised a $10 million seed round."
    );
    assert_eq!(first.publish_date.to_string(), "2025-01-29");
    assert_eq!(first.category, Category::Startups);
    assert_eq!(first.tags, vec!["AI", "Startups", "Funding"]);
    assert_eq!(
        first.seo.canonical_url,
        "https://techcrunch.com/2025/01/29/ai-startup-raises-10m/"
    );

    let second = &entries[1];
    assert_eq!(
        second.description,
        "The company confirmed that customer vault data was accessed."
    );
    assert_eq!(second.category, Category::Security);

    let third = &entries[2];
    assert_eq!(third.category, Category::Technology);
    assert_eq!(third.author, "TechCrunch");
    assert_eq!(third.excerpt.chars().count(), 200);
    assert!(third.excerpt.ends_with("..."));

    let fourth = &entries[3];
    assert_eq!(fourth.category, Category::ArtificialIntelligence);
    assert_eq!(fourth.publish_date, today());
    assert_eq!(fourth.description, "");
    assert_eq!(fourth.seo.canonical_url, "");
}

#[test]
fn test_fixture_featured_and_ids() {
    let entries = parse_feed(FEED, &EntryDefaults::default(), today()).unwrap();
    let featured: Vec<bool> = entries.iter().map(|e| e.featured).collect();
    assert_eq!(featured, vec![true, true, false, false]);
    assert!(entries.iter().all(|e| e.id == 0 && e.views == 0));
}

#[test]
fn test_entry_json_shape() {
    let entries = parse_feed(FEED, &EntryDefaults::default(), today()).unwrap();
    let value = serde_json::to_value(&entries[0]).unwrap();

    for field in [
        "id",
        "slug",
        "title",
        "description",
        "content",
        "excerpt",
        "author",
        "publishDate",
        "lastModified",
        "readTime",
        "category",
        "tags",
        "image",
        "featured",
        "views",
        "seo",
    ] {
        assert!(value.get(field).is_some(), "entry should have '{field}'");
    }
    for field in [
        "metaTitle",
        "metaDescription",
        "keywords",
        "ogImage",
        "canonicalUrl",
    ] {
        assert!(value["seo"].get(field).is_some(), "seo should have '{field}'");
    }
    assert_eq!(value["category"], "Startups");
    assert_eq!(value["seo"]["metaTitle"], "AI Startup Raises $10M! | TechCrunch");
}

// ============================================================================
// Merging
// ============================================================================

#[test]
fn test_merge_parsed_entries_with_cap() {
    let existing: Vec<Value> = existing_collection()["blogs"]
        .as_array()
        .unwrap()
        .clone();
    let new: Vec<Value> = parse_feed(FEED, &EntryDefaults::default(), today())
        .unwrap()
        .iter()
        .take(3)
        .map(|e| serde_json::to_value(e).unwrap())
        .collect();

    let merged = merge(existing, new, 5).unwrap();
    assert_eq!(merged.len(), 5);
    let ids: Vec<u64> = merged.iter().map(|b| b["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![3, 4, 5, 1, 2]);
    assert_eq!(merged[3]["title"], "Existing Blog 1");
}

// ============================================================================
// Full pipeline
// ============================================================================

#[test]
fn test_update_rewrites_blogs_and_keeps_other_keys() {
    let dir = test_dir("update");
    let path = dir.join("blogs.json");
    save_document(&path, &existing_collection()).unwrap();

    let options = ProcessOptions {
        update: true,
        max_entries: 10,
    };
    let entries = process_feed(FEED, &path, options, &EntryDefaults::default(), today()).unwrap();
    assert_eq!(entries.len(), 4);

    let updated = load_document(&path).unwrap();
    let original = existing_collection();
    assert_eq!(updated["meta"], original["meta"]);
    assert_eq!(updated["categories"], original["categories"]);

    let blogs = updated["blogs"].as_array().unwrap();
    assert_eq!(blogs.len(), 6);
    assert_eq!(blogs[0]["title"], "AI Startup Raises $10M!");
    assert_eq!(blogs[0]["id"], 3);
    assert_eq!(blogs[3]["id"], 6);
    assert_eq!(blogs[4], original["blogs"][0]);
    assert_eq!(blogs[5], original["blogs"][1]);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_repeated_update_duplicates_entries() {
    let dir = test_dir("repeat");
    let path = dir.join("blogs.json");
    save_document(&path, &existing_collection()).unwrap();

    let options = ProcessOptions {
        update: true,
        max_entries: 20,
    };
    process_feed(FEED, &path, options, &EntryDefaults::default(), today()).unwrap();
    let second = process_feed(FEED, &path, options, &EntryDefaults::default(), today()).unwrap();

    let ids: Vec<u64> = second.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![7, 8, 9, 10]);
    let blogs = load_document(&path).unwrap()["blogs"].as_array().unwrap().len();
    assert_eq!(blogs, 10);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_dry_run_leaves_file_untouched() {
    let dir = test_dir("dry_run");
    let path = dir.join("blogs.json");
    save_document(&path, &existing_collection()).unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    let entries = process_feed(
        FEED,
        &path,
        ProcessOptions::default(),
        &EntryDefaults::default(),
        today(),
    )
    .unwrap();
    assert_eq!(entries.len(), 4);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_backup_then_restore_around_update() {
    let dir = test_dir("backup_restore");
    let path = dir.join("blogs.json");
    save_document(&path, &existing_collection()).unwrap();

    let backup_path = backup(&path).unwrap();
    let options = ProcessOptions {
        update: true,
        max_entries: 10,
    };
    process_feed(FEED, &path, options, &EntryDefaults::default(), today()).unwrap();
    assert_ne!(load_document(&path).unwrap(), existing_collection());

    std::fs::rename(&backup_path, &path).unwrap();
    assert_eq!(load_document(&path).unwrap(), existing_collection());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_malformed_feed_reports_parse_error() {
    let err = parse_feed(
        "<rss><channel><item></channel></rss>",
        &EntryDefaults::default(),
        today(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("Failed to parse RSS feed"));
}
