pub mod xml;

use std::sync::LazyLock;

use regex::Regex;

use crate::error::IdentifiableError;
use crate::ids::IncrementalIdGenerator;
use xml::XmlElement;

/// Sentinel marking the authoritative end of the stream; everything after it
/// in the buffer is ignored and everything before it is final.
pub const EOM: &str = "<eom>";

static TAG_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<(\w+)").expect("tag pattern"));

/// A contiguous slice of the buffer, tagged by what it holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    /// True when this span will not be extended by a later chunk.
    pub finished: bool,
    pub value: SpanValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpanValue {
    Markdown(String),
    Xml(Vec<XmlElement>),
    Error(IdentifiableError),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawContent {
    pub spans: Vec<Span>,
    pub eom: bool,
}

impl RawContent {
    fn push(&mut self, value: SpanValue, finished: bool) {
        self.spans.push(Span {
            finished: finished || self.eom,
            value,
        });
    }
}

/// Splits the buffer into alternating markdown and single-element XML spans.
///
/// Markdown runs until the next `<tagname` occurrence; an XML region runs
/// from its opening tag through the matching compact (`<Tag .../>`) or
/// explicit (`</Tag>`) close, or to the end of the buffer when the close has
/// not arrived yet. A parse error inside a region appends an error span and
/// stops the walk; the next build re-parses the whole buffer, so nothing is
/// permanently lost.
pub fn split(buffer: &str) -> RawContent {
    let mut ids = IncrementalIdGenerator::new();
    let mut content = RawContent::default();
    let mut rest = buffer;
    if let Some(position) = rest.find(EOM) {
        rest = &rest[..position];
        content.eom = true;
    }
    while !rest.is_empty() {
        let tag = TAG_START.captures(rest);
        let markdown_end = match &tag {
            Some(captures) => captures.get(0).map_or(rest.len(), |m| m.start()),
            // a trailing `<` may be the start of a tag in the next chunk;
            // hold it back from this span
            None if !content.eom && rest.ends_with('<') => rest.len() - 1,
            None => rest.len(),
        };
        if markdown_end > 0 {
            content.push(
                SpanValue::Markdown(rest[..markdown_end].to_string()),
                tag.is_some(),
            );
            rest = &rest[markdown_end..];
        }
        let Some(captures) = tag else { break };
        let name = &captures[1];
        let (consumed, finished) = match find_close(rest, name) {
            Some(end) => (&rest[..end], true),
            None => (rest, false),
        };
        let (elements, error) = xml::parse_fragment(consumed);
        rest = &rest[consumed.len()..];
        content.push(SpanValue::Xml(elements), finished);
        if let Some(error) = error {
            let finished = !rest.is_empty();
            content.push(
                SpanValue::Error(IdentifiableError::new(&mut ids, error)),
                finished,
            );
            break;
        }
    }
    content
}

/// End of the region opened by `<name`: whichever of the compact
/// (`<name .../>`) or explicit (`</name>`) close occurs first.
fn find_close(rest: &str, name: &str) -> Option<usize> {
    let compact = Regex::new(&format!(r"<{name}\b[^>]*/>"))
        .ok()
        .and_then(|pattern| pattern.find(rest).map(|m| (m.start(), m.end())));
    let close = format!("</{name}>");
    let explicit = rest
        .find(&close)
        .map(|position| (position, position + close.len()));
    match (compact, explicit) {
        (Some(a), Some(b)) if a.0 <= b.0 => Some(a.1),
        (Some(_), Some(b)) => Some(b.1),
        (Some(a), None) => Some(a.1),
        (None, Some(b)) => Some(b.1),
        (None, None) => None,
    }
}
