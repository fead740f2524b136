//! Transilien HTTP client.
//!
//! Provides async methods for querying the real-time departure boards.
//! Handles configuration, authentication and conversion of every failure
//! into a [`TransilienError`].

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde_json::{Map, Value};
use tracing::debug;

use crate::departures::{DepartureRecord, departures_from_document};
use crate::domain::StationId;
use crate::xml::{XmlDocument, parse_document};

use super::config::{ClientConfig, ClientOptions};
use super::error::TransilienError;

/// Join a base URL and a path with exactly one `/`.
///
/// A path that already starts with `/` is appended unchanged.
pub fn build_endpoint(base_url: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{base_url}{path}")
    } else {
        format!("{base_url}/{path}")
    }
}

/// Transilien API client.
///
/// Cheap to clone; clones share the HTTP connection pool and the
/// immutable configuration, so calls can run concurrently.
#[derive(Debug, Clone)]
pub struct TransilienClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
}

impl TransilienClient {
    /// Create a new client with the given options merged over the defaults.
    pub fn new(options: ClientOptions) -> Result<Self, TransilienError> {
        Self::from_config(ClientConfig::from_options(options))
    }

    /// Create a client with every default.
    pub fn with_defaults() -> Result<Self, TransilienError> {
        Self::new(ClientOptions::default())
    }

    /// Create a client from an already merged configuration.
    pub fn from_config(config: ClientConfig) -> Result<Self, TransilienError> {
        reqwest::Url::parse(&config.base_url).map_err(|e| {
            TransilienError::InvalidConfig(format!("base URL {:?}: {e}", config.base_url))
        })?;

        let mut headers = HeaderMap::new();
        for (name, value) in config.effective_headers() {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                TransilienError::InvalidConfig(format!("invalid header name {name:?}"))
            })?;
            let mut header_value = HeaderValue::from_str(&value).map_err(|_| {
                TransilienError::InvalidConfig(format!("invalid value for header {name:?}"))
            })?;
            if header_name == reqwest::header::AUTHORIZATION {
                header_value.set_sensitive(true);
            }
            headers.insert(header_name, header_value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_defaults.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// The merged configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Absolute URL for a path on the configured base URL.
    pub fn build_endpoint(&self, path: &str) -> String {
        build_endpoint(&self.config.base_url, path)
    }

    /// GET `path` with `params` as query parameters and parse the XML body.
    pub async fn get(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<XmlDocument, TransilienError> {
        self.request(Method::GET, path, params).await
    }

    /// Next departures from a station.
    pub async fn next_departures(
        &self,
        station: &StationId,
    ) -> Result<XmlDocument, TransilienError> {
        self.get(&format!("/gare/{station}/depart/"), &[]).await
    }

    /// Next departures from a station calling at a destination.
    pub async fn next_departures_to_destination(
        &self,
        station: &StationId,
        destination: &StationId,
    ) -> Result<XmlDocument, TransilienError> {
        self.get(&format!("/gare/{station}/depart/{destination}/"), &[])
            .await
    }

    /// Next departures from a station, as departure records.
    ///
    /// Malformed entries are skipped (see [`crate::departures::format_departures`]).
    pub async fn next_departure_records(
        &self,
        station: &StationId,
    ) -> Result<Vec<DepartureRecord>, TransilienError> {
        let document = self.next_departures(station).await?;
        Ok(departures_from_document(&document))
    }

    /// Next departures from a station calling at a destination, as
    /// departure records.
    pub async fn next_departure_records_to_destination(
        &self,
        station: &StationId,
        destination: &StationId,
    ) -> Result<Vec<DepartureRecord>, TransilienError> {
        let document = self
            .next_departures_to_destination(station, destination)
            .await?;
        Ok(departures_from_document(&document))
    }

    /// Issue one request and interpret the response.
    ///
    /// GET sends `params` as a query string; any other method sends them
    /// as a JSON object body.
    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<XmlDocument, TransilienError> {
        let url = self.build_endpoint(path);
        debug!(%method, %url, "sending request");

        let mut request = self.http.request(method.clone(), &url);
        if method == Method::GET {
            if !params.is_empty() {
                request = request.query(params);
            }
        } else {
            let body: Map<String, Value> = params
                .iter()
                .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                .collect();
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), %url, "received response");

        if !status.is_success() {
            return Err(TransilienError::HttpStatus {
                status: status.as_u16(),
                status_text: status_text(status),
            });
        }

        let body = response.text().await?;
        parse_body(status, &body)
    }
}

/// Parse a successful response body. An empty or whitespace-only body is
/// an empty document.
fn parse_body(status: StatusCode, body: &str) -> Result<XmlDocument, TransilienError> {
    if body.trim().is_empty() {
        return Ok(XmlDocument::empty());
    }

    parse_document(body).map_err(|e| {
        debug!(error = %e, "response body is not XML");
        TransilienError::XmlParse {
            status: status.as_u16(),
            status_text: status_text(status),
        }
    })
}

fn status_text(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn endpoint_without_leading_slash() {
        assert_eq!(
            build_endpoint("http://api.transilien.com", "gare/87758011/depart"),
            "http://api.transilien.com/gare/87758011/depart"
        );
    }

    #[test]
    fn endpoint_with_leading_slash() {
        assert_eq!(
            build_endpoint("http://api.transilien.com", "/gare/87758011/depart"),
            "http://api.transilien.com/gare/87758011/depart"
        );
    }

    #[test]
    fn endpoint_keeps_trailing_slash() {
        assert_eq!(
            build_endpoint("http://api.transilien.com", "gare/87758011/depart/"),
            "http://api.transilien.com/gare/87758011/depart/"
        );
    }

    #[test]
    fn client_endpoint_uses_configured_base() {
        let client =
            TransilienClient::new(ClientOptions::new().with_base_url("http://127.0.0.1:8080"))
                .unwrap();
        assert_eq!(
            client.build_endpoint("gare/1/depart/"),
            "http://127.0.0.1:8080/gare/1/depart/"
        );
    }

    #[test]
    fn client_creation() {
        let client = TransilienClient::with_defaults().unwrap();
        assert_eq!(client.config(), &ClientConfig::default());
    }

    #[test]
    fn invalid_base_url_rejected() {
        let result = TransilienClient::new(ClientOptions::new().with_base_url("not a url"));
        assert!(matches!(result, Err(TransilienError::InvalidConfig(_))));
    }

    #[test]
    fn invalid_header_rejected() {
        let result = TransilienClient::new(ClientOptions::new().with_header("bad header", "x"));
        assert!(matches!(result, Err(TransilienError::InvalidConfig(_))));

        let result = TransilienClient::new(ClientOptions::new().with_header("X-Test", "a\nb"));
        assert!(matches!(result, Err(TransilienError::InvalidConfig(_))));
    }

    #[test]
    fn empty_body_is_empty_document() {
        let doc = parse_body(StatusCode::CREATED, "").unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.to_json(), json!({}));
    }

    #[test]
    fn whitespace_body_is_empty_document() {
        let doc = parse_body(StatusCode::OK, "\n  \r\n").unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn malformed_body_carries_status() {
        let err = parse_body(StatusCode::OK, "fail whale").unwrap_err();
        assert!(matches!(
            err,
            TransilienError::XmlParse { status: 200, ref status_text } if status_text == "OK"
        ));
    }

    #[tokio::test]
    async fn post_sends_params_as_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/gare/87758011/depart"))
            .and(body_json(json!({ "foo": "bar" })))
            .respond_with(ResponseTemplate::new(200).set_body_string("<ok/>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = TransilienClient::new(ClientOptions::new().with_base_url(server.uri())).unwrap();
        let doc = client
            .request(Method::POST, "gare/87758011/depart", &[("foo", "bar")])
            .await
            .unwrap();

        assert_eq!(doc.to_json(), json!({ "ok": "" }));
    }
}
