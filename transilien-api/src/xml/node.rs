//! Generic XML document tree.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Key under which attributes appear in the JSON rendering.
pub const ATTRIBUTES_KEY: &str = "$";

/// Key under which text appears in the JSON rendering of an element that
/// also has attributes or children.
pub const TEXT_KEY: &str = "_";

/// A parsed XML response body.
///
/// Either empty (the API answered with no body) or a single named root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlDocument {
    root: Option<(String, XmlNode)>,
}

impl XmlDocument {
    /// A document with no root element.
    pub fn empty() -> Self {
        Self { root: None }
    }

    /// A document with the given root element.
    pub fn new(root_name: impl Into<String>, root: XmlNode) -> Self {
        Self {
            root: Some((root_name.into(), root)),
        }
    }

    /// Whether the document has no root element.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Tag name of the root element.
    pub fn root_name(&self) -> Option<&str> {
        self.root.as_ref().map(|(name, _)| name.as_str())
    }

    /// The root element.
    pub fn root(&self) -> Option<&XmlNode> {
        self.root.as_ref().map(|(_, node)| node)
    }

    /// Render the document as JSON.
    ///
    /// An empty document is `{}`; otherwise an object with a single key,
    /// the root tag name.
    ///
    /// ```
    /// use serde_json::json;
    /// use transilien_api::xml::parse_document;
    ///
    /// let doc = parse_document(r#"<passages gare="87758011"></passages>"#).unwrap();
    /// assert_eq!(doc.to_json(), json!({ "passages": { "$": { "gare": "87758011" } } }));
    /// ```
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        if let Some((name, node)) = &self.root {
            map.insert(name.clone(), node.to_json());
        }
        Value::Object(map)
    }
}

/// One node of the tree.
///
/// Elements carrying neither attributes nor child elements collapse to
/// their text content; everything else is kept as a full [`XmlElement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Text(String),
    Element(XmlElement),
}

/// An element with attributes and/or child elements.
///
/// Children are grouped by tag name, in document order within a group.
/// A child that occurs once is still a one-element sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub attributes: BTreeMap<String, String>,
    pub text: Option<String>,
    pub children: BTreeMap<String, Vec<XmlNode>>,
}

impl XmlNode {
    /// Text content of this node.
    ///
    /// For a collapsed element this is the string itself; for a full
    /// element it is the text found alongside attributes or children.
    pub fn text(&self) -> Option<&str> {
        match self {
            XmlNode::Text(text) => Some(text),
            XmlNode::Element(element) => element.text.as_deref(),
        }
    }

    /// All children with the given tag name.
    pub fn children(&self, name: &str) -> &[XmlNode] {
        match self {
            XmlNode::Text(_) => &[],
            XmlNode::Element(element) => element
                .children
                .get(name)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        }
    }

    /// First child with the given tag name.
    pub fn first_child(&self, name: &str) -> Option<&XmlNode> {
        self.children(name).first()
    }

    /// Value of an attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            XmlNode::Text(_) => None,
            XmlNode::Element(element) => element.attributes.get(name).map(String::as_str),
        }
    }

    /// Render this node as JSON, with attributes under `$`, text under `_`
    /// and each child group as an array.
    pub fn to_json(&self) -> Value {
        match self {
            XmlNode::Text(text) => Value::String(text.clone()),
            XmlNode::Element(element) => {
                let mut map = Map::new();
                if !element.attributes.is_empty() {
                    let attributes = element
                        .attributes
                        .iter()
                        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                        .collect();
                    map.insert(ATTRIBUTES_KEY.to_string(), Value::Object(attributes));
                }
                if let Some(text) = &element.text {
                    map.insert(TEXT_KEY.to_string(), Value::String(text.clone()));
                }
                for (name, nodes) in &element.children {
                    let values = nodes.iter().map(XmlNode::to_json).collect();
                    map.insert(name.clone(), Value::Array(values));
                }
                Value::Object(map)
            }
        }
    }
}
