//! Failures surfaced by the fish API client.
//!
//! A response body that is not valid JSON is never an error on its own:
//! it is read as `null` and the status code decides the outcome.

use serde_json::Value;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The service answered with a non-success status.
    #[error("{message}")]
    Request {
        message: String,
        status: u16,
        body: Value,
    },

    /// No response was received at all.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The MIME type given for an upload does not parse. Nothing was sent.
    #[error("Invalid MIME type {mime:?}: {source}")]
    MimeType {
        mime: String,
        #[source]
        source: reqwest::Error,
    },

    /// An upload file could not be read from disk.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn request(message: impl Into<String>, status: u16, body: Value) -> Self {
        Self::Request {
            message: message.into(),
            status,
            body,
        }
    }

    /// HTTP status of a failed request, if the service answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::MimeType { .. } | Self::Io { .. } => None,
        }
    }

    /// Parsed body of a failed request (`Value::Null` when it was not JSON).
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Request { body, .. } => Some(body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_failure_displays_message() {
        let err = FetchError::request("not found", 404, json!({"message": "not found"}));
        assert_eq!(err.to_string(), "not found");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body(), Some(&json!({"message": "not found"})));
    }

    #[test]
    fn test_io_failure_has_no_status() {
        let err = FetchError::Io {
            path: PathBuf::from("missing.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.status(), None);
        assert!(err.body().is_none());
        assert!(err.to_string().starts_with("Failed to read missing.jpg"));
    }
}
