//! Transilien client error types.

/// Errors from the Transilien HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum TransilienError {
    /// HTTP request failed (DNS, connection refused, body read, etc.)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// API returned a status outside 2xx
    #[error("HTTP Error: {status} {status_text}")]
    HttpStatus { status: u16, status_text: String },

    /// Body was present but not well-formed XML
    #[error("XML parseError with HTTP Status: {status} {status_text}")]
    XmlParse { status: u16, status_text: String },

    /// Options could not be turned into a working client
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TransilienError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransilienError::Transport(e) => e.status().map(|s| s.as_u16()),
            TransilienError::HttpStatus { status, .. } | TransilienError::XmlParse { status, .. } => {
                Some(*status)
            }
            TransilienError::InvalidConfig(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TransilienError::HttpStatus {
            status: 500,
            status_text: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "HTTP Error: 500 Internal Server Error");
        assert_eq!(err.status(), Some(500));

        let err = TransilienError::XmlParse {
            status: 200,
            status_text: "OK".into(),
        };
        assert_eq!(err.to_string(), "XML parseError with HTTP Status: 200 OK");
        assert_eq!(err.status(), Some(200));

        let err = TransilienError::InvalidConfig("bad header".into());
        assert_eq!(err.to_string(), "invalid configuration: bad header");
        assert_eq!(err.status(), None);
    }
}
