//! Departure records.
//!
//! Reshapes the generic XML tree of a departure board into simplified
//! records: date, train number, mission code, terminus and a coarse
//! status. Times are read in the local time zone.

mod format;
mod record;

pub use format::{
    DATE_FORMAT, DELETED_STATE, FormatError, departures_from_document, format_departure,
    format_departures, parse_departure_date,
};
pub use record::{DepartureRecord, DepartureStatus};
