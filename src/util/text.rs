use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Matches a single `<...>` tag marker. Not an HTML parser: a stray `>` inside
/// an attribute value ends the match early and the remainder leaks through.
static HTML_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static NON_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));
static SLUG_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("valid regex"));

/// Ellipsis appended to truncated excerpts
pub const ELLIPSIS: &str = "...";

/// Removes every `<...>` tag marker from `html`.
///
/// Text between tags is kept verbatim, including whitespace; callers trim.
/// Returns `Cow::Borrowed` when the input contains no tags.
///
/// # Examples
///
/// ```
/// use rss2blog::util::strip_html;
///
/// assert_eq!(strip_html("<p>Hello <b>world</b></p>"), "Hello world");
/// ```
pub fn strip_html(html: &str) -> Cow<'_, str> {
    HTML_TAG_RE.replace_all(html, "")
}

/// Returns the first `max_chars` characters of `s`.
///
/// Counts Unicode scalar values, not bytes, so the cut never lands inside a
/// multi-byte character.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncates `s` to `max_chars` characters in total, ellipsis included.
///
/// Strings that already fit are returned borrowed. Otherwise the first
/// `max_chars - 3` characters are kept and [`ELLIPSIS`] is appended.
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> Cow<'_, str> {
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    if s.chars().nth(keep).is_none() {
        return Cow::Borrowed(s);
    }
    Cow::Owned(format!("{}{}", truncate_chars(s, keep), ELLIPSIS))
}

/// Derives a URL slug from a title.
///
/// Lowercases, drops anything that is not a word character, whitespace or
/// hyphen, then collapses runs of whitespace and hyphens into a single `-`.
/// The result is capped at `max_chars` characters. Leading or trailing
/// separators are kept as a single hyphen, so `"Hello "` becomes `"hello-"`.
///
/// # Examples
///
/// ```
/// use rss2blog::util::slugify;
///
/// assert_eq!(slugify("AI Startup Raises $10M!", 100), "ai-startup-raises-10m");
/// ```
pub fn slugify(title: &str, max_chars: usize) -> String {
    let lowered = title.to_lowercase();
    let cleaned = NON_SLUG_RE.replace_all(&lowered, "");
    let joined = SLUG_SEPARATOR_RE.replace_all(&cleaned, "-");
    truncate_chars(&joined, max_chars).to_string()
}
