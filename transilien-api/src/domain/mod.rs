//! Domain types for the departures client.

mod station;

pub use station::{InvalidStationId, StationId};
