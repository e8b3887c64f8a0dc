use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use thiserror::Error;

/// Dublin Core element namespace carrying `<dc:creator>`.
pub const DUBLIN_CORE_NAMESPACE: &[u8] = b"http://purl.org/dc/elements/1.1/";

/// Errors that can occur during feed parsing.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The input is not well-formed XML.
    #[error("Failed to parse RSS feed: {message} (near byte {position})")]
    XmlParse { position: u64, message: String },
}

impl FeedError {
    fn xml(position: u64, message: impl std::fmt::Display) -> Self {
        FeedError::XmlParse {
            position,
            message: message.to_string(),
        }
    }
}

/// Item fields exactly as they appear in the feed, before any defaults.
///
/// `Some("")` means the element was present but empty; the transformer treats
/// that the same as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub pub_date: Option<String>,
    pub creator: Option<String>,
    /// Non-empty `<category>` texts in document order.
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Description,
    PubDate,
    Creator,
    Category,
}

impl Field {
    /// Maps a direct child of `<item>` to the field it populates.
    ///
    /// RSS core elements only match without a namespace; `creator` only
    /// matches inside the Dublin Core namespace, whatever prefix it is bound to.
    fn from_element(local_name: &[u8], dublin_core: bool, unbound: bool) -> Option<Self> {
        match local_name {
            b"creator" if dublin_core => Some(Field::Creator),
            _ if !unbound => None,
            b"title" => Some(Field::Title),
            b"link" => Some(Field::Link),
            b"description" => Some(Field::Description),
            b"pubDate" => Some(Field::PubDate),
            b"category" => Some(Field::Category),
            _ => None,
        }
    }
}

struct OpenItem {
    depth: usize,
    raw: RawItem,
}

struct OpenField {
    field: Field,
    depth: usize,
    text: String,
}

impl RawItem {
    /// Stores a completed field, trimmed. The first occurrence of a scalar
    /// field wins; categories accumulate.
    fn set(&mut self, field: Field, text: &str) {
        let text = text.trim().to_string();
        let slot = match field {
            Field::Category => {
                if !text.is_empty() {
                    self.categories.push(text);
                }
                return;
            }
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::Description => &mut self.description,
            Field::PubDate => &mut self.pub_date,
            Field::Creator => &mut self.creator,
        };
        if slot.is_none() {
            *slot = Some(text);
        }
    }
}

/// Namespace binding of an element, resolved before the reader is borrowed again.
fn classify_namespace(ns: &ResolveResult<'_>) -> (bool, bool) {
    match ns {
        ResolveResult::Unbound => (false, true),
        ResolveResult::Bound(Namespace(uri)) => (*uri == DUBLIN_CORE_NAMESPACE, false),
        ResolveResult::Unknown(_) => (false, false),
    }
}

/// Extracts every `<item>` element in the document, at any depth, in order.
///
/// Items nested inside another item are not treated as separate items.
/// Text inside a field is concatenated across nested markup and CDATA
/// sections, so both escaped and CDATA-wrapped HTML descriptions come through
/// as raw HTML for the transformer to strip. Whitespace inside the field is
/// kept; only the finished value is trimmed.
///
/// # Errors
///
/// Returns [`FeedError::XmlParse`] for syntax errors, mismatched or unclosed
/// tags, undefined entities, and documents with no root element.
///
/// # Security
///
/// SEC-002: the pinned `quick-xml` never expands `<!ENTITY>` declarations.
/// Custom entities such as `&xxe;` fail unescaping and surface as
/// [`FeedError::XmlParse`].
pub fn parse_items(xml: &str) -> Result<Vec<RawItem>, FeedError> {
    let mut reader = NsReader::from_str(xml);

    let mut items = Vec::new();
    let mut buf = Vec::new();
    let mut depth: usize = 0;
    let mut saw_root = false;
    let mut item: Option<OpenItem> = None;
    let mut field: Option<OpenField> = None;

    loop {
        let position = reader.buffer_position();
        let (dublin_core, unbound, event) = match reader.read_resolved_event_into(&mut buf) {
            Ok((ns, event)) => {
                let (dublin_core, unbound) = classify_namespace(&ns);
                (dublin_core, unbound, event)
            }
            Err(e) => return Err(FeedError::xml(position, e)),
        };

        match event {
            Event::Start(e) => {
                saw_root = true;
                open_element(&e, depth, dublin_core, unbound, &mut item, &mut field);
                depth += 1;
            }
            Event::Empty(e) => {
                saw_root = true;
                open_element(&e, depth, dublin_core, unbound, &mut item, &mut field);
                // A self-closing element opens and closes in one event
                close_element(depth + 1, &mut item, &mut field, &mut items);
            }
            Event::End(_) => {
                close_element(depth, &mut item, &mut field, &mut items);
                depth = depth.saturating_sub(1);
            }
            Event::Text(e) => {
                if let Some(open) = field.as_mut() {
                    let text = e.unescape().map_err(|err| FeedError::xml(position, err))?;
                    open.text.push_str(&text);
                }
            }
            Event::CData(e) => {
                if let Some(open) = field.as_mut() {
                    open.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(FeedError::xml(0, "no element found"));
    }
    if depth != 0 {
        return Err(FeedError::xml(
            reader.buffer_position(),
            format!("unexpected end of document with {depth} unclosed element(s)"),
        ));
    }

    tracing::debug!(items = items.len(), "Extracted feed items");
    Ok(items)
}

/// `depth` is the number of elements already open around `e`.
fn open_element(
    e: &BytesStart<'_>,
    depth: usize,
    dublin_core: bool,
    unbound: bool,
    item: &mut Option<OpenItem>,
    field: &mut Option<OpenField>,
) {
    let local_name = e.local_name();
    let Some(item_depth) = item.as_ref().map(|open| open.depth) else {
        if unbound && local_name.as_ref() == b"item" {
            *item = Some(OpenItem {
                depth: depth + 1,
                raw: RawItem::default(),
            });
        }
        return;
    };

    // Only direct children of the item populate fields
    if field.is_some() || depth != item_depth {
        return;
    }
    if let Some(kind) = Field::from_element(local_name.as_ref(), dublin_core, unbound) {
        *field = Some(OpenField {
            field: kind,
            depth: depth + 1,
            text: String::new(),
        });
    }
}

/// `depth` is the depth of the element being closed (1 for the root).
fn close_element(
    depth: usize,
    item: &mut Option<OpenItem>,
    field: &mut Option<OpenField>,
    items: &mut Vec<RawItem>,
) {
    if field.as_ref().is_some_and(|f| f.depth == depth) {
        if let (Some(done), Some(open)) = (field.take(), item.as_mut()) {
            open.raw.set(done.field, &done.text);
        }
    }
    if item.as_ref().is_some_and(|i| i.depth == depth) {
        if let Some(done) = item.take() {
            items.push(done.raw);
        }
    }
}
