//! Typed errors for the places where callers branch on the failure kind.
//!
//! Everything else flows through `anyhow` with context, the same way the
//! command handlers report errors.

use thiserror::Error;

/// HTTP statuses worth retrying: throttling and transient server errors.
pub const RETRYABLE_STATUSES: &[u16] = &[429, 500, 502, 503, 504];

/// A failed call to one of the upstream services.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with a non-success status.
    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// Throttling, 5xx gateway errors and transport failures are retried;
    /// any other status is final.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Status { status, .. } => RETRYABLE_STATUSES.contains(status),
            ApiError::Transport { .. } => true,
        }
    }

    /// Build a `Status` error, keeping at most 500 characters of the body.
    pub fn status(service: &'static str, status: u16, body: &str) -> Self {
        ApiError::Status {
            service,
            status,
            body: body.chars().take(500).collect(),
        }
    }
}

/// Lookup of a country code the catalog doesn't know.
#[derive(Debug, Error)]
#[error("Unknown country code: {code}. Supported: {supported}")]
pub struct UnknownCountry {
    pub code: String,
    pub supported: String,
}

/// Required API keys that no source provided. The CLI exits with status 2.
#[derive(Debug, Error)]
#[error(
    "Missing keys: {}. Pass them as flags, export them \
     (KEYWORDTOOL_KEY, KEYAPP_KEY, APPSTORESPY_KEY) or save them once with \
     `keyword-pipeline save-keys --keywordtool-key ... --keyapp-key ...`",
    .missing.join(", ")
)]
pub struct MissingKeys {
    pub missing: Vec<&'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttling_and_gateway_errors_are_retryable() {
        for status in [429, 500, 502, 503, 504] {
            assert!(ApiError::status("KeywordTool", status, "").is_retryable());
        }
    }

    #[test]
    fn client_errors_are_final() {
        for status in [400, 401, 403, 404, 422, 501] {
            assert!(!ApiError::status("KeywordTool", status, "").is_retryable());
        }
    }

    #[test]
    fn status_body_is_truncated() {
        let long = "x".repeat(2000);
        match ApiError::status("Keyapp", 500, &long) {
            ApiError::Status { body, .. } => assert_eq!(body.chars().count(), 500),
            other => panic!("unexpected {other:?}"),
        }
    }
}
