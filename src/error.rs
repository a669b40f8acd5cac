use std::fmt;

use crate::response::Response;

/// Errors that can occur while submitting events to a collector endpoint.
#[derive(Debug)]
pub enum HecError {
    /// One or more events (or raw lines) individually exceed the maximum
    /// content length and were never transmitted. The payload holds batch
    /// indices (0-based) or raw line numbers (1-based); it is empty for the
    /// single-event submission path.
    TooLong(Vec<usize>),

    /// The collector answered with a non-success status; carries the
    /// remote's text and code.
    Server(Response),

    /// The request failed below the HTTP-response level (DNS, TCP, TLS,
    /// timeout). Never retried by this layer.
    Network(reqwest::Error),

    /// The event payload could not be serialized.
    Encoding(serde_json::Error),

    /// Reading the raw input stream failed.
    Io(std::io::Error),
}

impl fmt::Display for HecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HecError::TooLong(indices) if indices.is_empty() => {
                write!(f, "event length is too long")
            }
            HecError::TooLong(indices) => {
                let numbers = indices
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "events ({}) length are too long", numbers)
            }
            HecError::Server(response) => {
                write!(f, "collector returned code {}: {}", response.code, response.text)
            }
            HecError::Network(e) => write!(f, "request failed: {}", e),
            HecError::Encoding(e) => write!(f, "failed to serialize event: {}", e),
            HecError::Io(e) => write!(f, "failed to read raw input: {}", e),
        }
    }
}

impl std::error::Error for HecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HecError::TooLong(_) | HecError::Server(_) => None,
            HecError::Network(e) => Some(e),
            HecError::Encoding(e) => Some(e),
            HecError::Io(e) => Some(e),
        }
    }
}

impl From<reqwest::Error> for HecError {
    fn from(err: reqwest::Error) -> Self {
        HecError::Network(err)
    }
}

impl From<serde_json::Error> for HecError {
    fn from(err: serde_json::Error) -> Self {
        HecError::Encoding(err)
    }
}

impl From<std::io::Error> for HecError {
    fn from(err: std::io::Error) -> Self {
        HecError::Io(err)
    }
}

impl HecError {
    /// Batch indices or raw line numbers of the oversize items, if any.
    pub fn oversize_indices(&self) -> Option<&[usize]> {
        match self {
            HecError::TooLong(indices) => Some(indices),
            _ => None,
        }
    }
}

/// Result type for collector submission operations.
pub type HecResult<T> = Result<T, HecError>;
