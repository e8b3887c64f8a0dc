use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Category
// ============================================================================

/// Closed set of listing categories an entry can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Startups,
    #[serde(rename = "Artificial Intelligence")]
    ArtificialIntelligence,
    Security,
    Technology,
}

impl Category {
    /// Ordered keyword table. Earlier rows win when tags match several groups.
    const RULES: [(Category, &'static [&'static str]); 3] = [
        (Category::Startups, &["startup", "startups"]),
        (
            Category::ArtificialIntelligence,
            &["ai", "artificial intelligence", "machine learning"],
        ),
        (Category::Security, &["security", "cybersecurity"]),
    ];

    /// Classifies a tag list against the keyword table.
    ///
    /// Matching is case-insensitive and exact per tag: `"AI"` matches the AI
    /// group, `"AI tools"` does not. No match falls back to `Technology`.
    pub fn classify<S: AsRef<str>>(tags: &[S]) -> Self {
        let lowered: Vec<String> = tags.iter().map(|t| t.as_ref().to_lowercase()).collect();
        Self::RULES
            .iter()
            .find(|(_, keywords)| lowered.iter().any(|t| keywords.contains(&t.as_str())))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Technology)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Startups => "Startups",
            Category::ArtificialIntelligence => "Artificial Intelligence",
            Category::Security => "Security",
            Category::Technology => "Technology",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Blog Entry
// ============================================================================

/// A feed item normalized into the portfolio blog-record format.
///
/// Serializes with the camelCase keys the site expects. Field order here is
/// the key order written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogEntry {
    /// `0` until the merger assigns a collection-unique value.
    pub id: u64,
    pub slug: String,
    pub title: String,
    /// HTML-stripped item description, at most 500 characters.
    pub description: String,
    /// Same text as `description`; the site renders this on the post page.
    pub content: String,
    pub excerpt: String,
    pub author: String,
    pub publish_date: NaiveDate,
    pub last_modified: NaiveDate,
    pub read_time: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub image: String,
    pub featured: bool,
    pub views: u64,
    pub seo: Seo,
}

/// Search-engine and social-preview metadata for an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seo {
    pub meta_title: String,
    pub meta_description: String,
    pub keywords: Vec<String>,
    pub og_image: String,
    /// Item `<link>`, or empty when the feed omits it.
    pub canonical_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_priority_order() {
        assert_eq!(Category::classify(&["Startups", "Funding"]), Category::Startups);
        assert_eq!(Category::classify(&["Cybersecurity"]), Category::Security);
        assert_eq!(Category::classify(&["Gadgets"]), Category::Technology);
        // Startup terms outrank AI terms regardless of tag order
        assert_eq!(Category::classify(&["AI", "startup"]), Category::Startups);
        assert_eq!(
            Category::classify(&["Security", "Machine Learning"]),
            Category::ArtificialIntelligence
        );
    }

    #[test]
    fn test_classify_is_exact_match() {
        assert_eq!(Category::classify(&["AI tools"]), Category::Technology);
        assert_eq!(Category::classify(&["startup-life"]), Category::Technology);
        assert_eq!(
            Category::classify(&["ARTIFICIAL INTELLIGENCE"]),
            Category::ArtificialIntelligence
        );
    }

    #[test]
    fn test_classify_empty_tags() {
        let none: [&str; 0] = [];
        assert_eq!(Category::classify(&none), Category::Technology);
    }

    #[test]
    fn test_category_serializes_display_name() {
        let json = serde_json::to_string(&Category::ArtificialIntelligence).unwrap();
        assert_eq!(json, "\"Artificial Intelligence\"");
        let back: Category = serde_json::from_str("\"Security\"").unwrap();
        assert_eq!(back, Category::Security);
    }

    #[test]
    fn test_entry_serializes_camel_case_keys_in_order() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 29).unwrap();
        let entry = BlogEntry {
            id: 0,
            slug: "hello".to_string(),
            title: "Hello".to_string(),
            description: "d".to_string(),
            content: "d".to_string(),
            excerpt: "d".to_string(),
            author: "A".to_string(),
            publish_date: date,
            last_modified: date,
            read_time: "5 min read".to_string(),
            category: Category::Technology,
            tags: vec!["Technology".to_string()],
            image: "img".to_string(),
            featured: true,
            views: 0,
            seo: Seo {
                meta_title: "Hello | TechCrunch".to_string(),
                meta_description: "d".to_string(),
                keywords: vec!["technology".to_string()],
                og_image: "og".to_string(),
                canonical_url: String::new(),
            },
        };

        let value = serde_json::to_value(&entry).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            keys,
            vec![
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
                "seo"
            ]
        );
        assert_eq!(value["publishDate"], "2025-01-29");
        assert_eq!(value["seo"]["metaTitle"], "Hello | TechCrunch");
        assert_eq!(value["seo"]["canonicalUrl"], "");
    }
}
