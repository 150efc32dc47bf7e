use crate::config::{Config, ConfigError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;

/// Fixed Favro credentials for the lifetime of the process
#[derive(Clone)]
pub struct Credentials {
    email: String,
    auth_header: String,
    default_organization_id: Option<String>,
}

impl Credentials {
    /// Build credentials, rejecting an empty email or token
    pub fn new(
        email: impl Into<String>,
        token: impl Into<String>,
        default_organization_id: Option<String>,
    ) -> Result<Self, ConfigError> {
        let email = email.into();
        let token = token.into();

        if email.trim().is_empty() || token.trim().is_empty() {
            return Err(ConfigError::MissingCredentials);
        }

        let auth_header = format!("Basic {}", STANDARD.encode(format!("{}:{}", email, token)));

        Ok(Self {
            email,
            auth_header,
            default_organization_id: default_organization_id.filter(|id| !id.is_empty()),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Self::new(
            config.email.clone(),
            config.api_token.clone(),
            config.organization_id.clone(),
        )
    }

    /// Value for the `Authorization` header
    pub fn auth_header_value(&self) -> &str {
        &self.auth_header
    }

    pub fn default_organization_id(&self) -> Option<&str> {
        self.default_organization_id.as_deref()
    }
}

// Keep the token out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("auth_header", &"<redacted>")
            .field("default_organization_id", &self.default_organization_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_header_is_basic_email_token() {
        let creds = Credentials::new("user@example.com", "secret", None).unwrap();
        // base64("user@example.com:secret")
        assert_eq!(
            creds.auth_header_value(),
            "Basic dXNlckBleGFtcGxlLmNvbTpzZWNyZXQ="
        );
    }

    #[test]
    fn test_missing_email_or_token_rejected() {
        assert!(matches!(
            Credentials::new("", "secret", None),
            Err(ConfigError::MissingCredentials)
        ));
        assert!(matches!(
            Credentials::new("user@example.com", "  ", None),
            Err(ConfigError::MissingCredentials)
        ));
    }

    #[test]
    fn test_empty_default_organization_is_none() {
        let creds = Credentials::new("a@b.c", "t", Some(String::new())).unwrap();
        assert!(creds.default_organization_id().is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let creds = Credentials::new("a@b.c", "super-secret", None).unwrap();
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains(creds.auth_header_value()));
    }
}
