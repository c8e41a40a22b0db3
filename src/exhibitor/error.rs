use thiserror::Error;

/// Statuses worth another attempt after a backoff pause.
pub const TRANSIENT_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Errors returned while fetching a search page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, TLS or timeout failure from the HTTP client.
    #[error("request failed: {0}")]
    Transport(#[from] wreq::Error),

    /// The API answered with an error status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// A success response whose body is not JSON.
    #[error("invalid JSON on page {page}: {source}")]
    Decode {
        page: u32,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// `true` only for error statuses in [`TRANSIENT_STATUSES`].
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Status { status, .. } if TRANSIENT_STATUSES.contains(status))
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> FetchError {
        FetchError::Status { status: code, body: String::new() }
    }

    #[test]
    fn test_transient_statuses() {
        for code in TRANSIENT_STATUSES {
            assert!(status(code).is_transient(), "{} should be transient", code);
        }
    }

    #[test]
    fn test_permanent_statuses() {
        for code in [400, 401, 403, 404, 501] {
            assert!(!status(code).is_transient(), "{} should not be transient", code);
        }
    }

    #[test]
    fn test_decode_is_not_transient() {
        let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = FetchError::Decode { page: 2, source };
        assert!(!err.is_transient());
        assert!(err.status().is_none());
        assert!(err.to_string().contains("page 2"));
    }

    #[test]
    fn test_status_message_carries_body() {
        let err = FetchError::Status { status: 401, body: "invalid apikey".to_string() };
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "HTTP 401: invalid apikey");
    }
}
