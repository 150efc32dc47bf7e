use crate::favro::client::DEFAULT_API_URL;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_EMAIL: &str = "FAVRO_EMAIL";
pub const ENV_API_TOKEN: &str = "FAVRO_API_TOKEN";
pub const ENV_ORGANIZATION_ID: &str = "FAVRO_ORGANIZATION_ID";
pub const ENV_BOARD_ID: &str = "FAVRO_BOARD_ID";
pub const ENV_API_URL: &str = "FAVRO_API_URL";
pub const ENV_PORT: &str = "FAVRO_MCP_PORT";

const DEFAULT_PORT: u16 = 3000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Favro credentials missing: set {} and {} (or email/api_token in the config file)",
        ENV_EMAIL,
        ENV_API_TOKEN
    )]
    MissingCredentials,

    #[error("Failed to parse configuration file {path}: {reason}")]
    ParseError { path: String, reason: String },

    #[error("Invalid port: {0}")]
    InvalidPort(String),

    #[error("Invalid Favro API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),
}

/// Configuration file format (for deserialization); every field is optional
/// because environment variables may supply it instead
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    email: Option<String>,
    api_token: Option<String>,
    organization_id: Option<String>,
    board_id: Option<String>,
    api_url: Option<String>,
    port: Option<u16>,
}

/// Configuration for Favro MCP Server
#[derive(Clone)]
pub struct Config {
    /// Favro account email (Basic auth user)
    pub email: String,

    /// Favro API token (Basic auth password)
    pub api_token: String,

    /// Organization used when neither the caller nor the session names one
    pub organization_id: Option<String>,

    /// Board used when neither the caller nor the session names one
    pub board_id: Option<String>,

    /// Favro REST API root
    pub api_url: String,

    /// Listen port for the HTTP transport
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables, falling back per field to
    /// ~/.config/mcp/favro-mcp-server/config.json
    pub fn from_env_or_file() -> Result<Self, ConfigError> {
        let file = match Self::get_config_path() {
            Some(path) if path.exists() => Self::read_file(&path)?,
            _ => ConfigFile::default(),
        };

        Self::resolve(|key| std::env::var(key).ok(), file)
    }

    /// Get the configuration file path: ~/.config/mcp/favro-mcp-server/config.json
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config/mcp/favro-mcp-server/config.json"))
    }

    fn read_file(path: &Path) -> Result<ConfigFile, ConfigError> {
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn resolve(
        env: impl Fn(&str) -> Option<String>,
        file: ConfigFile,
    ) -> Result<Self, ConfigError> {
        let pick = |key: &str, fallback: Option<String>| {
            env(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .or(fallback.filter(|v| !v.trim().is_empty()))
        };

        let email = pick(ENV_EMAIL, file.email).ok_or(ConfigError::MissingCredentials)?;
        let api_token = pick(ENV_API_TOKEN, file.api_token).ok_or(ConfigError::MissingCredentials)?;

        let api_url =
            pick(ENV_API_URL, file.api_url).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        // Validate API URL
        let _ = url::Url::parse(&api_url)?;

        let port = match pick(ENV_PORT, None).or_else(|| pick("PORT", None)) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => file.port.unwrap_or(DEFAULT_PORT),
        };

        Ok(Config {
            email,
            api_token,
            organization_id: pick(ENV_ORGANIZATION_ID, file.organization_id),
            board_id: pick(ENV_BOARD_ID, file.board_id),
            api_url,
            port,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .field("organization_id", &self.organization_id)
            .field("board_id", &self.board_id)
            .field("api_url", &self.api_url)
            .field("port", &self.port)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_resolve_from_env() {
        let env = env_of(&[
            (ENV_EMAIL, "me@example.com"),
            (ENV_API_TOKEN, "tok"),
            (ENV_ORGANIZATION_ID, "org-1"),
        ]);
        let config = Config::resolve(env, ConfigFile::default()).unwrap();
        assert_eq!(config.email, "me@example.com");
        assert_eq!(config.api_token, "tok");
        assert_eq!(config.organization_id.as_deref(), Some("org-1"));
        assert_eq!(config.board_id, None);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_missing_token_is_error() {
        let env = env_of(&[(ENV_EMAIL, "me@example.com")]);
        let result = Config::resolve(env, ConfigFile::default());
        assert!(matches!(result, Err(ConfigError::MissingCredentials)));
    }

    #[test]
    fn test_blank_env_value_treated_as_missing() {
        let env = env_of(&[(ENV_EMAIL, "me@example.com"), (ENV_API_TOKEN, "   ")]);
        let result = Config::resolve(env, ConfigFile::default());
        assert!(matches!(result, Err(ConfigError::MissingCredentials)));
    }

    #[test]
    fn test_env_overrides_file_per_field() {
        let file: ConfigFile = serde_json::from_str(
            r#"{"email":"file@example.com","api_token":"file-tok","board_id":"w-9","port":4000}"#,
        )
        .unwrap();
        let env = env_of(&[(ENV_EMAIL, "env@example.com")]);

        let config = Config::resolve(env, file).unwrap();
        assert_eq!(config.email, "env@example.com");
        assert_eq!(config.api_token, "file-tok");
        assert_eq!(config.board_id.as_deref(), Some("w-9"));
        assert_eq!(config.port, 4000);
    }

    #[test]
    fn test_invalid_api_url_rejected() {
        let env = env_of(&[
            (ENV_EMAIL, "me@example.com"),
            (ENV_API_TOKEN, "tok"),
            (ENV_API_URL, "not a url"),
        ]);
        let result = Config::resolve(env, ConfigFile::default());
        assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let env = env_of(&[
            (ENV_EMAIL, "me@example.com"),
            (ENV_API_TOKEN, "tok"),
            (ENV_PORT, "eighty"),
        ]);
        let result = Config::resolve(env, ConfigFile::default());
        assert!(matches!(result, Err(ConfigError::InvalidPort(_))));
    }

    #[test]
    fn test_debug_redacts_token() {
        let env = env_of(&[(ENV_EMAIL, "me@example.com"), (ENV_API_TOKEN, "s3cret")]);
        let config = Config::resolve(env, ConfigFile::default()).unwrap();
        assert!(!format!("{:?}", config).contains("s3cret"));
    }
}
