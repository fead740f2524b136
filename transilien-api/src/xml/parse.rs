//! Event-based XML parsing into the generic tree.

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::node::{XmlDocument, XmlElement, XmlNode};

/// Error returned when a body is not well-formed XML.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed XML: {message}")]
pub struct XmlError {
    message: String,
}

impl XmlError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An element whose end tag has not been seen yet.
struct OpenElement {
    name: String,
    attributes: BTreeMap<String, String>,
    text: String,
    children: BTreeMap<String, Vec<XmlNode>>,
}

impl OpenElement {
    fn start(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

        let mut attributes = BTreeMap::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| XmlError::new(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| XmlError::new(e.to_string()))?;
            attributes.insert(key, value.into_owned());
        }

        Ok(Self {
            name,
            attributes,
            text: String::new(),
            children: BTreeMap::new(),
        })
    }

    fn finish(mut self) -> (String, XmlNode) {
        // Whitespace-only text is layout, not content; anything else is kept verbatim.
        if self.text.trim().is_empty() {
            self.text.clear();
        }

        if self.attributes.is_empty() && self.children.is_empty() {
            return (self.name, XmlNode::Text(self.text));
        }

        let text = (!self.text.is_empty()).then_some(self.text);
        let element = XmlElement {
            attributes: self.attributes,
            text,
            children: self.children,
        };
        (self.name, XmlNode::Element(element))
    }
}

/// Parse a complete XML document.
///
/// Text is kept as written; an element whose text is only whitespace
/// has no text. Text outside the root element,
/// a missing root, a second root, and unbalanced tags are errors.
pub fn parse_document(input: &str) -> Result<XmlDocument, XmlError> {
    let mut reader = Reader::from_str(input);

    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<(String, XmlNode)> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            XmlError::new(format!("{} at position {}", e, reader.buffer_position()))
        })?;

        match event {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(XmlError::new("more than one root element"));
                }
                stack.push(OpenElement::start(&start)?);
            }
            Event::Empty(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(XmlError::new("more than one root element"));
                }
                let finished = OpenElement::start(&start)?.finish();
                close(&mut stack, &mut root, finished);
            }
            Event::End(_) => {
                let open = stack
                    .pop()
                    .ok_or_else(|| XmlError::new("unexpected closing tag"))?;
                close(&mut stack, &mut root, open.finish());
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| XmlError::new(e.to_string()))?;
                append_text(&mut stack, &text)?;
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data).into_owned();
                append_text(&mut stack, &text)?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes
            // carry nothing the tree keeps.
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::new(format!("unclosed element <{}>", open.name)));
    }

    match root {
        Some((name, node)) => Ok(XmlDocument::new(name, node)),
        None => Err(XmlError::new("no root element")),
    }
}

/// Attach a finished element to its parent, or make it the root.
fn close(
    stack: &mut [OpenElement],
    root: &mut Option<(String, XmlNode)>,
    (name, node): (String, XmlNode),
) {
    match stack.last_mut() {
        Some(parent) => parent.children.entry(name).or_default().push(node),
        None => *root = Some((name, node)),
    }
}

fn append_text(stack: &mut [OpenElement], text: &str) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(open) => {
            open.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(XmlError::new("text outside of the root element")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn attributes_only_root() {
        let doc = parse_document(
            r#"<?xml version="1.0" encoding="UTF-8"?><passages gare="87758011"></passages>"#,
        )
        .unwrap();
        assert_eq!(doc.root_name(), Some("passages"));
        assert_eq!(
            doc.to_json(),
            json!({ "passages": { "$": { "gare": "87758011" } } })
        );
    }

    #[test]
    fn departure_board() {
        let doc = parse_document(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <passages gare="87384008">
              <train>
                <date mode="R">27/03/2024 14:35</date>
                <num>135140</num>
                <miss>POPI</miss>
                <term>87384008</term>
              </train>
              <train>
                <date mode="R">27/03/2024 14:50</date>
                <num>135142</num>
                <miss>POPI</miss>
                <term>87384008</term>
                <etat>Supprimé</etat>
              </train>
            </passages>"#,
        )
        .unwrap();

        assert_eq!(
            doc.to_json(),
            json!({
                "passages": {
                    "$": { "gare": "87384008" },
                    "train": [
                        {
                            "date": [{ "$": { "mode": "R" }, "_": "27/03/2024 14:35" }],
                            "num": ["135140"],
                            "miss": ["POPI"],
                            "term": ["87384008"]
                        },
                        {
                            "date": [{ "$": { "mode": "R" }, "_": "27/03/2024 14:50" }],
                            "num": ["135142"],
                            "miss": ["POPI"],
                            "term": ["87384008"],
                            "etat": ["Supprimé"]
                        }
                    ]
                }
            })
        );
    }

    #[test]
    fn self_closing_and_empty_elements_are_empty_text() {
        let doc = parse_document("<a><b/><c></c></a>").unwrap();
        assert_eq!(doc.to_json(), json!({ "a": { "b": [""], "c": [""] } }));
    }

    #[test]
    fn entities_and_cdata_are_text() {
        let doc = parse_document("<a><b>R&amp;D</b><c><![CDATA[<x>]]></c></a>").unwrap();
        let root = doc.root().unwrap();
        assert_eq!(root.first_child("b").and_then(XmlNode::text), Some("R&D"));
        assert_eq!(root.first_child("c").and_then(XmlNode::text), Some("<x>"));
    }

    #[test]
    fn text_is_not_trimmed() {
        let doc = parse_document("<train><num> 1 </num></train>").unwrap();
        assert_eq!(doc.to_json(), json!({ "train": { "num": [" 1 "] } }));
    }

    #[test]
    fn whitespace_only_text_is_dropped() {
        let doc = parse_document("<a>\n  <b>  </b>\n</a>").unwrap();
        assert_eq!(doc.to_json(), json!({ "a": { "b": [""] } }));
    }

    #[test]
    fn mixed_content_keeps_spaces_next_to_children() {
        let doc = parse_document(r#"<a x="1">on <b>time</b> now</a>"#).unwrap();
        assert_eq!(doc.root().unwrap().text(), Some("on  now"));
    }

    #[test]
    fn plain_text_is_rejected() {
        assert!(parse_document("fail whale").is_err());
    }

    #[test]
    fn missing_root_is_rejected() {
        let err = parse_document(r#"<?xml version="1.0"?>"#).unwrap_err();
        assert_eq!(err.to_string(), "malformed XML: no root element");
    }

    #[test]
    fn second_root_is_rejected() {
        assert!(parse_document("<a></a><b></b>").is_err());
        assert!(parse_document("<a/><b/>").is_err());
    }

    #[test]
    fn unbalanced_tags_are_rejected() {
        assert!(parse_document("<a><b></a>").is_err());
        assert!(parse_document("<a><b></b>").is_err());
    }

    #[test]
    fn trailing_text_is_rejected() {
        assert!(parse_document("<a></a>whale").is_err());
    }
}
