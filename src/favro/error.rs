use crate::config::ConfigError;

/// Error types for Favro API operations
#[derive(Debug, thiserror::Error)]
pub enum FavroError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Authentication failed ({status}): {message}")]
    Authentication { status: u16, message: String },

    #[error("Rate limit still exceeded after {attempts} attempts{}", reset_hint(.reset))]
    RateLimitExhausted {
        attempts: u32,
        reset: Option<String>,
    },

    #[error("Favro server error {status} after retries: {message}")]
    UpstreamServer { status: u16, message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Inconsistent paginated response: {0}")]
    ProtocolAnomaly(String),

    #[error("No {kind} specified, none selected in the session and no default configured")]
    MissingIdentifier { kind: &'static str },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Multiple {kind}s match '{identifier}':\n{}\nUse one of the IDs above instead.", format_matches(.matches))]
    AmbiguousMatch {
        kind: &'static str,
        identifier: String,
        matches: Vec<(String, String)>,
    },

    #[error("{kind} not found: {identifier}")]
    NoMatch {
        kind: &'static str,
        identifier: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

fn reset_hint(reset: &Option<String>) -> String {
    reset
        .as_ref()
        .map(|r| format!(" (limit resets at {})", r))
        .unwrap_or_default()
}

fn format_matches(matches: &[(String, String)]) -> String {
    matches
        .iter()
        .map(|(id, name)| format!("  - {}: {}", id, name))
        .collect::<Vec<_>>()
        .join("\n")
}

impl FavroError {
    /// Stable machine-readable kind, surfaced to MCP clients alongside the message
    pub fn kind(&self) -> &'static str {
        match self {
            FavroError::Configuration(_) => "configuration_error",
            FavroError::Authentication { .. } => "authentication_error",
            FavroError::RateLimitExhausted { .. } => "rate_limit_exhausted",
            FavroError::UpstreamServer { .. } => "upstream_server_error",
            FavroError::NotFound { .. } => "not_found",
            FavroError::ProtocolAnomaly(_) => "protocol_anomaly",
            FavroError::MissingIdentifier { .. } => "missing_identifier",
            FavroError::Http(_) => "http_error",
            FavroError::Json(_) => "json_error",
            FavroError::Api { .. } => "api_error",
            FavroError::AmbiguousMatch { .. } => "ambiguous_match",
            FavroError::NoMatch { .. } => "no_match",
            FavroError::InvalidArgument(_) => "invalid_argument",
        }
    }

    /// True for errors caused by the caller's arguments rather than the upstream service
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            FavroError::MissingIdentifier { .. }
                | FavroError::AmbiguousMatch { .. }
                | FavroError::NoMatch { .. }
                | FavroError::InvalidArgument(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_message_includes_reset_hint() {
        let err = FavroError::RateLimitExhausted {
            attempts: 5,
            reset: Some("2026-01-01T00:00:00Z".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("5 attempts"));
        assert!(msg.contains("2026-01-01T00:00:00Z"));
        assert_eq!(err.kind(), "rate_limit_exhausted");
    }

    #[test]
    fn test_ambiguous_match_lists_candidates() {
        let err = FavroError::AmbiguousMatch {
            kind: "board",
            identifier: "Sprint".to_string(),
            matches: vec![
                ("w1".to_string(), "Sprint".to_string()),
                ("w2".to_string(), "sprint".to_string()),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("Multiple boards match 'Sprint'"));
        assert!(msg.contains("  - w1: Sprint"));
        assert!(msg.contains("  - w2: sprint"));
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_missing_identifier_is_caller_error() {
        let err = FavroError::MissingIdentifier {
            kind: "organization",
        };
        assert_eq!(err.kind(), "missing_identifier");
        assert!(err.is_caller_error());
        assert!(!FavroError::ProtocolAnomaly("x".into()).is_caller_error());
    }
}
