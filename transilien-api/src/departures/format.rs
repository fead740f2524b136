//! Conversion from departure board XML nodes to departure records.
//!
//! Each `<train>` entry carries single-occurrence children (`date`, `num`,
//! `miss`, `term`, optional `etat`). The parsed tree wraps each of them in
//! a one-element sequence, so every field is read from its first element.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use tracing::warn;

use crate::xml::{XmlDocument, XmlNode};

use super::record::{DepartureRecord, DepartureStatus};

/// Format of the `date` field, e.g. `27/03/2024 14:35`.
pub const DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// `etat` value reported for cancelled trains.
pub const DELETED_STATE: &str = "Supprimé";

/// Tag name of a departure entry under the board root.
const TRAIN_TAG: &str = "train";

/// Error while turning a departure node into a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// A mandatory child is absent or has no text
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The date text does not match `DD/MM/YYYY HH:mm`, or does not exist
    /// in the local time zone
    #[error("invalid date: {0:?}")]
    InvalidDate(String),
}

/// Convert one departure node.
pub fn format_departure(node: &XmlNode) -> Result<DepartureRecord, FormatError> {
    let date = parse_departure_date(field_text(node, "date")?)?;

    Ok(DepartureRecord {
        date,
        id: field_text(node, "num")?.to_string(),
        kind: field_text(node, "miss")?.to_string(),
        terminus: field_text(node, "term")?.to_string(),
        status: classify_status(node.first_child("etat")),
    })
}

/// Convert a sequence of departure nodes.
///
/// Nodes that cannot be converted are logged and skipped rather than
/// failing the whole board.
pub fn format_departures(nodes: &[XmlNode]) -> Vec<DepartureRecord> {
    nodes
        .iter()
        .filter_map(|node| match format_departure(node) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "skipping departure");
                None
            }
        })
        .collect()
}

/// Departure records of a whole board (`<passages>` with `<train>` entries).
///
/// An empty document yields no records.
pub fn departures_from_document(document: &XmlDocument) -> Vec<DepartureRecord> {
    document
        .root()
        .map(|root| format_departures(root.children(TRAIN_TAG)))
        .unwrap_or_default()
}

/// Parse a `DD/MM/YYYY HH:mm` date in the local time zone.
///
/// Times repeated by a DST change resolve to the earlier instant.
pub fn parse_departure_date(s: &str) -> Result<DateTime<Local>, FormatError> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| FormatError::InvalidDate(s.to_string()))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| FormatError::InvalidDate(s.to_string()))
}

/// Three-way status: absent is on time, "Supprimé" is deleted, anything
/// else is late.
fn classify_status(etat: Option<&XmlNode>) -> DepartureStatus {
    match etat {
        None => DepartureStatus::OnTime,
        Some(node) if node.text() == Some(DELETED_STATE) => DepartureStatus::Deleted,
        Some(_) => DepartureStatus::Late,
    }
}

fn field_text<'a>(node: &'a XmlNode, name: &'static str) -> Result<&'a str, FormatError> {
    node.first_child(name)
        .and_then(XmlNode::text)
        .ok_or(FormatError::MissingField(name))
}
