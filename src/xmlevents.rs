//! XML tokenizer: raw response bytes to flat parse events.
//!
//! Tag names keep their namespace prefix exactly as written (`d:href`),
//! with no case folding. Whitespace-only text is dropped.

use ::xml::name::OwnedName;
use ::xml::reader::{EventReader, ParserConfig, XmlEvent};

use crate::tree::{self, Node, ParseEvent};
use crate::DavResult;

fn qname(name: &OwnedName) -> String {
    match name.prefix {
        Some(ref p) => format!("{}:{}", p, name.local_name),
        None => name.local_name.clone(),
    }
}

/// Tokenize an XML document into parse events, in document order.
pub fn tokenize(body: &[u8]) -> DavResult<Vec<ParseEvent>> {
    // whitespace-only runs come out as XmlEvent::Whitespace and are
    // skipped; text with content is kept verbatim.
    let config = ParserConfig::new()
        .cdata_to_characters(true)
        .ignore_comments(true);
    let reader = EventReader::new_with_config(body, config);

    let mut events = Vec::new();
    // names of the currently open elements.
    let mut open: Vec<String> = Vec::new();

    for ev in reader {
        match ev? {
            XmlEvent::StartElement {
                name, attributes, ..
            } => {
                let tag = qname(&name);
                open.push(tag.clone());
                let mut pe = ParseEvent::open(tag, open.len());
                for a in attributes {
                    pe.attributes.insert(qname(&a.name), a.value);
                }
                events.push(pe);
            }
            XmlEvent::EndElement { name } => {
                events.push(ParseEvent::close(qname(&name), open.len()));
                open.pop();
            }
            XmlEvent::Characters(text) => {
                if let Some(tag) = open.last() {
                    events.push(ParseEvent::text(tag.clone(), open.len(), text));
                }
            }
            _ => {}
        }
    }
    trace!("tokenize: {} events", events.len());
    Ok(events)
}

/// Tokenize an XML document and rebuild it as a [`Node`] tree.
pub fn parse_tree(body: &[u8]) -> DavResult<Node> {
    let events = tokenize(body)?;
    tree::build(&events)
}
