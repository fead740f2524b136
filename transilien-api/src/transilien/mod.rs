//! Transilien real-time departures client.
//!
//! This module provides an HTTP client for the SNCF Transilien API, which
//! serves the next departures from Île-de-France stations as XML.
//!
//! Key characteristics of the API:
//! - Stations are identified by numeric UIC codes (e.g. `87758011`)
//! - Authentication is HTTP Basic
//! - Responses use the vendor media type
//!   `application/vnd.sncf.transilien.od.depart+xml;vers=1`
//! - An empty 2xx body is a valid, empty answer

mod client;
mod config;
mod error;

pub use client::{TransilienClient, build_endpoint};
pub use config::{
    ClientConfig, ClientOptions, DEFAULT_BASE_URL, DEPARTURE_CONTENT_TYPE, ENV_BASE_URL,
    ENV_CREDENTIAL, ENV_PASSWORD, ENV_USERNAME, RequestDefaults, default_user_agent,
};
pub use error::TransilienError;
