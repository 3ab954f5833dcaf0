//! Classification of GitHub API failures into user-facing messages.

use thiserror::Error;

/// Category of an upstream failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    /// 401: token invalid or expired.
    Auth,
    /// 403: access denied or rate limited.
    Permission,
    /// 404: organization or enterprise not found.
    NotFound,
    /// 500 from GitHub.
    UpstreamServer,
    /// 503 from GitHub.
    UpstreamUnavailable,
    /// Any other 4xx.
    ClientError,
    /// Any other 5xx.
    ServerError,
    /// No status, but the failure carried a message (transport, decoding).
    UnknownWithMessage,
    Unknown,
}

impl UpstreamErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamErrorKind::Auth => "auth",
            UpstreamErrorKind::Permission => "permission",
            UpstreamErrorKind::NotFound => "not_found",
            UpstreamErrorKind::UpstreamServer => "upstream_server",
            UpstreamErrorKind::UpstreamUnavailable => "upstream_unavailable",
            UpstreamErrorKind::ClientError => "client_error",
            UpstreamErrorKind::ServerError => "server_error",
            UpstreamErrorKind::UnknownWithMessage => "unknown_with_message",
            UpstreamErrorKind::Unknown => "unknown",
        }
    }
}

/// An upstream failure with its category and the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ClassifiedError {
    pub kind: UpstreamErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

/// Map an upstream failure to exactly one category and message.
///
/// Statuses below 400 are not failures and are treated as absent.
pub fn classify(status: Option<u16>, message: Option<&str>) -> ClassifiedError {
    let status = status.filter(|s| *s >= 400);
    let message = message.map(str::trim).filter(|m| !m.is_empty());

    let (kind, text) = match status {
        Some(401) => (
            UpstreamErrorKind::Auth,
            "Authentication failed: Your GitHub token is invalid or expired. Please provide a valid Personal Access Token.".to_string(),
        ),
        Some(403) => (
            UpstreamErrorKind::Permission,
            "Permission denied: You do not have permission to access this resource or API rate limit has been exceeded.".to_string(),
        ),
        Some(404) => (
            UpstreamErrorKind::NotFound,
            "Resource not found: The organization or enterprise does not exist or is not accessible.".to_string(),
        ),
        Some(500) => (
            UpstreamErrorKind::UpstreamServer,
            "GitHub server error: The GitHub API encountered an internal server error. Please try again later.".to_string(),
        ),
        Some(503) => (
            UpstreamErrorKind::UpstreamUnavailable,
            "GitHub service unavailable: The GitHub API is temporarily unavailable. Please try again later.".to_string(),
        ),
        Some(code) if code < 500 => (
            UpstreamErrorKind::ClientError,
            format!(
                "Client error ({}): {}",
                code,
                message.unwrap_or("An error occurred while processing your request.")
            ),
        ),
        Some(code) => (
            UpstreamErrorKind::ServerError,
            format!(
                "Server error ({}): {}",
                code,
                message.unwrap_or("GitHub API server encountered an error.")
            ),
        ),
        None => match message {
            Some(msg) => (UpstreamErrorKind::UnknownWithMessage, format!("API error: {}", msg)),
            None => (
                UpstreamErrorKind::Unknown,
                "An unknown error occurred while communicating with the GitHub API.".to_string(),
            ),
        },
    };

    ClassifiedError {
        kind,
        status,
        message: text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_statuses() {
        let cases = [
            (401, UpstreamErrorKind::Auth, "Authentication failed"),
            (403, UpstreamErrorKind::Permission, "Permission denied"),
            (404, UpstreamErrorKind::NotFound, "Resource not found"),
            (500, UpstreamErrorKind::UpstreamServer, "GitHub server error"),
            (503, UpstreamErrorKind::UpstreamUnavailable, "GitHub service unavailable"),
        ];

        for (status, kind, prefix) in cases {
            let err = classify(Some(status), Some("Bad credentials"));
            assert_eq!(err.kind, kind, "status {status}");
            assert_eq!(err.status, Some(status));
            assert!(err.message.starts_with(prefix), "{}", err.message);
            // The fixed messages never echo the upstream text.
            assert!(!err.message.contains("Bad credentials"));
        }
    }

    #[test]
    fn test_other_client_errors() {
        let err = classify(Some(422), Some("Validation Failed"));
        assert_eq!(err.kind, UpstreamErrorKind::ClientError);
        assert_eq!(err.message, "Client error (422): Validation Failed");

        let err = classify(Some(429), None);
        assert_eq!(
            err.message,
            "Client error (429): An error occurred while processing your request."
        );
    }

    #[test]
    fn test_other_server_errors() {
        let err = classify(Some(502), Some("Bad Gateway"));
        assert_eq!(err.kind, UpstreamErrorKind::ServerError);
        assert_eq!(err.message, "Server error (502): Bad Gateway");

        let err = classify(Some(504), Some("   "));
        assert_eq!(
            err.message,
            "Server error (504): GitHub API server encountered an error."
        );
    }

    #[test]
    fn test_no_status() {
        let err = classify(None, Some("connection refused"));
        assert_eq!(err.kind, UpstreamErrorKind::UnknownWithMessage);
        assert_eq!(err.status, None);
        assert_eq!(err.message, "API error: connection refused");

        let err = classify(None, None);
        assert_eq!(err.kind, UpstreamErrorKind::Unknown);
        assert_eq!(
            err.message,
            "An unknown error occurred while communicating with the GitHub API."
        );
    }

    #[test]
    fn test_success_status_is_ignored() {
        let err = classify(Some(200), Some("unexpected body"));
        assert_eq!(err.kind, UpstreamErrorKind::UnknownWithMessage);
        assert_eq!(err.status, None);
    }

    #[test]
    fn test_display_is_message() {
        let err = classify(Some(404), None);
        assert_eq!(err.to_string(), err.message);
    }
}
