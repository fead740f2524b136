//! Client for the Transilien real-time departures API.
//!
//! Answers: "which trains leave this station next?"
//!
//! ```no_run
//! use transilien_api::{ClientOptions, TransilienClient};
//! use transilien_api::domain::StationId;
//!
//! # async fn run() -> Result<(), transilien_api::TransilienError> {
//! let client = TransilienClient::new(ClientOptions::from_env())?;
//! let station = StationId::from(87758011);
//! for departure in client.next_departure_records(&station).await? {
//!     println!("{} {} -> {} ({})", departure.date, departure.id, departure.terminus, departure.status);
//! }
//! # Ok(())
//! # }
//! ```

pub mod departures;
pub mod domain;
pub mod transilien;
pub mod xml;

pub use departures::{DepartureRecord, DepartureStatus};
pub use transilien::{ClientConfig, ClientOptions, TransilienClient, TransilienError};
pub use xml::{XmlDocument, XmlNode};

/// Crate version, embedded in the default user agent.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
