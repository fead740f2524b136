//! Simplified departure records.

use std::fmt;

use chrono::{DateTime, Local};
use serde::Serialize;

/// Coarse status of a departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DepartureStatus {
    /// No status reported
    OnTime,
    /// Any reported status other than a cancellation
    Late,
    /// Cancelled ("Supprimé")
    Deleted,
}

impl DepartureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepartureStatus::OnTime => "on-time",
            DepartureStatus::Late => "late",
            DepartureStatus::Deleted => "deleted",
        }
    }
}

impl fmt::Display for DepartureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One train's departure, as shown on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartureRecord {
    /// Departure time
    pub date: DateTime<Local>,
    /// Train number
    pub id: String,
    /// Mission code (e.g. "POPI")
    #[serde(rename = "type")]
    pub kind: String,
    /// Terminus station code
    pub terminus: String,
    /// On time, late or deleted
    pub status: DepartureStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn status_strings() {
        assert_eq!(DepartureStatus::OnTime.to_string(), "on-time");
        assert_eq!(DepartureStatus::Late.to_string(), "late");
        assert_eq!(DepartureStatus::Deleted.to_string(), "deleted");
    }

    #[test]
    fn status_serializes_like_display() {
        for status in [
            DepartureStatus::OnTime,
            DepartureStatus::Late,
            DepartureStatus::Deleted,
        ] {
            assert_eq!(serde_json::to_value(status).unwrap(), json!(status.as_str()));
        }
    }

    #[test]
    fn record_serializes_type_field() {
        let record = DepartureRecord {
            date: Local.with_ymd_and_hms(2024, 3, 27, 14, 35, 0).unwrap(),
            id: "135140".into(),
            kind: "POPI".into(),
            terminus: "87384008".into(),
            status: DepartureStatus::OnTime,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "POPI");
        assert_eq!(value["status"], "on-time");
        assert_eq!(value["id"], "135140");
        assert!(value.get("kind").is_none());
    }
}
