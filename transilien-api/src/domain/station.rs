//! Station code types.

use std::fmt;

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// A numeric station code, as used in the departure URLs.
///
/// Transilien identifies stations by their UIC code (e.g. `87758011`).
/// Only non-empty runs of ASCII digits are accepted, so a `StationId`
/// can always be spliced into a URL path without escaping.
///
/// # Examples
///
/// ```
/// use transilien_api::domain::StationId;
///
/// let station = StationId::parse("87758011").unwrap();
/// assert_eq!(station.as_str(), "87758011");
///
/// // Path separators and letters are rejected
/// assert!(StationId::parse("8775/8011").is_err());
/// assert!(StationId::parse("PAR").is_err());
/// assert!(StationId::parse("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StationId(String);

impl StationId {
    /// Parse a station code from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        if s.is_empty() {
            return Err(InvalidStationId {
                reason: "must not be empty",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidStationId {
                reason: "must contain only ASCII digits",
            });
        }

        Ok(StationId(s.to_string()))
    }

    /// Returns the station code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u32> for StationId {
    fn from(code: u32) -> Self {
        StationId(code.to_string())
    }
}

impl std::str::FromStr for StationId {
    type Err = InvalidStationId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.as_str())
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
