use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::EngineError;

/// A parsed XML element.
///
/// `completed` is false when the closing tag was not seen before the input
/// ended; such elements still carry whatever text and children were parsed,
/// since later chunks may finish them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: Option<String>,
    pub text: String,
    pub attributes: HashMap<String, String>,
    pub children: Vec<XmlElement>,
    pub completed: bool,
}

impl XmlElement {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children
            .iter()
            .find(|child| child.name.as_deref() == Some(name))
    }
}

/// Arena node; children and parents are indices so a partially-built tree can
/// be exported at any point of the walk.
#[derive(Debug, Default)]
struct Node {
    name: Option<String>,
    text: String,
    attributes: HashMap<String, String>,
    children: Vec<usize>,
    completed: bool,
    parent: Option<usize>,
}

/// Parses a fragment believed to contain zero or more XML elements.
///
/// Truncated input is not an error: the partial tree is returned with
/// `completed = false` nodes. Genuinely malformed markup (mismatched end
/// tags, bad attributes, invalid entities) returns the partial tree built so
/// far together with a typed error. External entities are never resolved.
pub fn parse_fragment(input: &str) -> (Vec<XmlElement>, Option<EngineError>) {
    let mut reader = Reader::from_str(input);
    let mut arena: Vec<Node> = vec![Node::default()];
    let mut current = 0usize;
    let mut error = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => match read_open(&start) {
                Ok((name, attributes)) => {
                    current = push_node(&mut arena, current, name, attributes);
                }
                Err(e) => {
                    error = Some(e);
                    break;
                }
            },
            Ok(Event::Empty(start)) => match read_open(&start) {
                Ok((name, attributes)) => {
                    let index = push_node(&mut arena, current, name, attributes);
                    arena[index].completed = true;
                }
                Err(e) => {
                    error = Some(e);
                    break;
                }
            },
            Ok(Event::End(_)) => {
                // end-name matching is enforced by the reader before we get here
                if current != 0 {
                    arena[current].completed = true;
                    current = arena[current].parent.unwrap_or(0);
                }
            }
            Ok(Event::Text(text)) => match text.unescape() {
                Ok(unescaped) => arena[current].text.push_str(&unescaped),
                Err(e) => {
                    error = Some(EngineError::Markup(e.to_string()));
                    break;
                }
            },
            Ok(Event::CData(data)) => {
                arena[current]
                    .text
                    .push_str(&String::from_utf8_lossy(&data.into_inner()));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                // a tag cut off by the end of input means more chunks may
                // still arrive; anything else is bad markup
                if !matches!(e, quick_xml::Error::UnexpectedEof(_)) {
                    error = Some(EngineError::Markup(e.to_string()));
                }
                break;
            }
        }
    }

    (export_children(&arena, 0), error)
}

fn push_node(
    arena: &mut Vec<Node>,
    parent: usize,
    name: String,
    attributes: HashMap<String, String>,
) -> usize {
    let index = arena.len();
    arena.push(Node {
        name: Some(name),
        attributes,
        parent: Some(parent),
        ..Node::default()
    });
    arena[parent].children.push(index);
    index
}

fn read_open(start: &BytesStart<'_>) -> Result<(String, HashMap<String, String>), EngineError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = HashMap::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| EngineError::Markup(e.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| EngineError::Markup(e.to_string()))?
            .into_owned();
        attributes.insert(key, value);
    }
    Ok((name, attributes))
}

fn export_children(arena: &[Node], index: usize) -> Vec<XmlElement> {
    arena[index]
        .children
        .iter()
        .map(|&child| export(arena, child))
        .collect()
}

fn export(arena: &[Node], index: usize) -> XmlElement {
    let node = &arena[index];
    XmlElement {
        name: node.name.clone(),
        text: node.text.clone(),
        attributes: node.attributes.clone(),
        children: export_children(arena, index),
        completed: node.completed,
    }
}
