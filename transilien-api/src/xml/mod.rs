//! Generic XML tree for API response bodies.
//!
//! Responses are not validated against a schema. They are parsed into a
//! loose tree that keeps attributes, text and repeated children, and can
//! be rendered as JSON in the familiar `$` / `_` layout:
//!
//! - attributes are collected under `$`
//! - text sits under `_` when the element also has attributes or children
//! - every child element is wrapped in an array, even when it occurs once
//! - an element with only text collapses to that string

mod node;
mod parse;

pub use node::{ATTRIBUTES_KEY, TEXT_KEY, XmlDocument, XmlElement, XmlNode};
pub use parse::{XmlError, parse_document};
