//! Error types for Atelier

use thiserror::Error;

/// The main error type for Atelier operations
#[derive(Debug, Error)]
pub enum AtelierError {
    /// Bad input; no network call was made
    #[error("Validation error: {0}")]
    Validation(String),

    /// Connection failure, timeout or broken stream
    #[error("Transport error: {0}")]
    Transport(String),

    /// Upstream answered with a non-2xx status
    #[error("Upstream rejected request ({status}): {body}")]
    UpstreamRejected { status: u16, body: String },

    /// Upstream answered 2xx but the body lacks expected fields
    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    /// A preview binary could not be fetched
    #[error("Upstream unavailable{}: {detail}", status_suffix(.status))]
    UpstreamUnavailable { status: Option<u16>, detail: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AtelierError {
    /// Upstream HTTP status carried by this error, if any
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AtelierError::UpstreamRejected { status, .. } => Some(*status),
            AtelierError::UpstreamUnavailable { status, .. } => *status,
            _ => None,
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

/// Result type alias for Atelier operations
pub type Result<T> = std::result::Result<T, AtelierError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_display_with_status() {
        let err = AtelierError::UpstreamUnavailable {
            status: Some(404),
            detail: "preview not found".to_string(),
        };
        assert_eq!(err.to_string(), "Upstream unavailable (404): preview not found");
    }

    #[test]
    fn test_unavailable_display_without_status() {
        let err = AtelierError::UpstreamUnavailable {
            status: None,
            detail: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "Upstream unavailable: connection refused");
    }

    #[test]
    fn test_upstream_status() {
        let rejected = AtelierError::UpstreamRejected {
            status: 401,
            body: "unauthorized".to_string(),
        };
        assert_eq!(rejected.upstream_status(), Some(401));
        assert_eq!(AtelierError::Transport("timeout".into()).upstream_status(), None);
    }
}
