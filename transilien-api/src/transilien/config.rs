//! Client configuration and option merging.
//!
//! A [`ClientConfig`] starts from fixed defaults and has caller-supplied
//! [`ClientOptions`] merged on top. The merge is deep: the header map is
//! merged key by key, so overriding one header keeps all the others.

use std::collections::BTreeMap;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

/// Production base URL of the Transilien API.
pub const DEFAULT_BASE_URL: &str = "http://api.transilien.com";

/// Vendor media type of departure boards.
pub const DEPARTURE_CONTENT_TYPE: &str = "application/vnd.sncf.transilien.od.depart+xml;vers=1";

/// Environment variables read by [`ClientOptions::from_env`].
pub const ENV_BASE_URL: &str = "TRANSILIEN_BASE_URL";
pub const ENV_CREDENTIAL: &str = "TRANSILIEN_CREDENTIAL";
pub const ENV_USERNAME: &str = "TRANSILIEN_USERNAME";
pub const ENV_PASSWORD: &str = "TRANSILIEN_PASSWORD";

/// Default user agent, `transilien-api/<version>`.
pub fn default_user_agent() -> String {
    format!("transilien-api/{}", crate::VERSION)
}

/// Settings applied to every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDefaults {
    /// Headers sent with every request
    pub headers: BTreeMap<String, String>,
    /// Request timeout (none: whatever the HTTP client does)
    pub timeout: Option<Duration>,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Cache-Control".to_string(), "no-cache".to_string());
        headers.insert(
            "Content-Type".to_string(),
            DEPARTURE_CONTENT_TYPE.to_string(),
        );
        headers.insert("User-Agent".to_string(), default_user_agent());

        Self {
            headers,
            timeout: None,
        }
    }
}

/// Fully merged client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Pre-encoded Basic credential
    pub credential: Option<String>,
    /// Headers and timeout for every request
    pub request_defaults: RequestDefaults,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credential: None,
            request_defaults: RequestDefaults::default(),
        }
    }
}

impl ClientConfig {
    /// Merge options over the defaults.
    pub fn from_options(options: ClientOptions) -> Self {
        Self::default().merge(options)
    }

    /// Merge options over this configuration.
    ///
    /// Scalar options replace the current value when set. Headers are
    /// merged one by one; an override replaces any existing header of the
    /// same name, compared case-insensitively.
    pub fn merge(mut self, options: ClientOptions) -> Self {
        if let Some(base_url) = options.base_url {
            self.base_url = base_url;
        }
        if let Some(credential) = options.credential {
            self.credential = Some(credential);
        }
        if let Some(secs) = options.timeout_secs {
            self.request_defaults.timeout = Some(Duration::from_secs(secs));
        }
        for (name, value) in options.headers {
            insert_header(&mut self.request_defaults.headers, name, value);
        }
        self
    }

    /// Headers actually sent: the request defaults plus `Authorization`
    /// when a credential is configured.
    pub fn effective_headers(&self) -> BTreeMap<String, String> {
        let mut headers = self.request_defaults.headers.clone();
        if let Some(credential) = self.credential.as_deref().filter(|c| !c.is_empty()) {
            insert_header(
                &mut headers,
                "Authorization".to_string(),
                format!("Basic {credential}"),
            );
        }
        headers
    }
}

/// Insert a header, dropping any existing entry whose name differs only
/// in case.
fn insert_header(headers: &mut BTreeMap<String, String>, name: String, value: String) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
    headers.insert(name, value);
}

/// Caller-supplied overrides. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    /// Base URL (defaults to the production API)
    pub base_url: Option<String>,
    /// Pre-encoded Basic credential, sent as `Authorization: Basic <credential>`
    pub credential: Option<String>,
    /// Headers merged over the defaults
    pub headers: BTreeMap<String, String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl ClientOptions {
    /// Empty options: every default applies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read options from `TRANSILIEN_*` environment variables.
    ///
    /// `TRANSILIEN_CREDENTIAL` wins over a `TRANSILIEN_USERNAME` /
    /// `TRANSILIEN_PASSWORD` pair.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Self::new();

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            options = options.with_base_url(base_url);
        }

        if let Some(credential) = lookup(ENV_CREDENTIAL) {
            options = options.with_credential(credential);
        } else if let (Some(username), Some(password)) =
            (lookup(ENV_USERNAME), lookup(ENV_PASSWORD))
        {
            options = options.with_login(&username, &password);
        }

        options
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set a pre-encoded Basic credential.
    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    /// Set the Basic credential from a username and password.
    pub fn with_login(self, username: &str, password: &str) -> Self {
        self.with_credential(STANDARD.encode(format!("{username}:{password}")))
    }

    /// Add or override one header. A header set earlier under the same
    /// name in a different case is replaced.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        insert_header(&mut self.headers, name.into(), value.into());
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}
