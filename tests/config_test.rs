use favro_mcp_server::config::{
    ConfigError, ENV_API_TOKEN, ENV_API_URL, ENV_BOARD_ID, ENV_EMAIL, ENV_ORGANIZATION_ID,
    ENV_PORT,
};
use favro_mcp_server::{Config, FavroMcpServer};
use serial_test::serial;

const ALL_VARS: &[&str] = &[
    ENV_EMAIL,
    ENV_API_TOKEN,
    ENV_ORGANIZATION_ID,
    ENV_BOARD_ID,
    ENV_API_URL,
    ENV_PORT,
    "PORT",
];

fn clear_env() {
    for var in ALL_VARS {
        std::env::remove_var(var);
    }
}

/// Load from the environment with HOME pointed somewhere without a config file
fn load() -> Result<Config, ConfigError> {
    let home = std::env::var_os("HOME");
    std::env::set_var("HOME", std::env::temp_dir().join("favro-mcp-server-no-home"));

    let result = Config::from_env_or_file();

    match home {
        Some(home) => std::env::set_var("HOME", home),
        None => std::env::remove_var("HOME"),
    }
    result
}

#[test]
#[serial]
fn test_config_from_env() {
    clear_env();
    std::env::set_var(ENV_EMAIL, "me@example.com");
    std::env::set_var(ENV_API_TOKEN, "secret-token");
    std::env::set_var(ENV_ORGANIZATION_ID, "org-1");
    std::env::set_var(ENV_BOARD_ID, "w-1");
    std::env::set_var("PORT", "8080");

    let config = load().unwrap();
    clear_env();

    assert_eq!(config.email, "me@example.com");
    assert_eq!(config.organization_id.as_deref(), Some("org-1"));
    assert_eq!(config.board_id.as_deref(), Some("w-1"));
    assert_eq!(config.api_url, "https://favro.com/api/v1");
    assert_eq!(config.port, 8080);
}

#[test]
#[serial]
fn test_favro_port_wins_over_generic_port() {
    clear_env();
    std::env::set_var(ENV_EMAIL, "me@example.com");
    std::env::set_var(ENV_API_TOKEN, "secret-token");
    std::env::set_var(ENV_PORT, "4100");
    std::env::set_var("PORT", "8080");

    let config = load().unwrap();
    clear_env();

    assert_eq!(config.port, 4100);
}

#[test]
#[serial]
fn test_missing_credentials_prevent_startup() {
    clear_env();
    std::env::set_var(ENV_EMAIL, "me@example.com");

    let result = load();
    clear_env();

    assert!(matches!(result, Err(ConfigError::MissingCredentials)));
}

#[tokio::test]
#[serial]
async fn test_configured_defaults_seed_session() {
    clear_env();
    std::env::set_var(ENV_EMAIL, "me@example.com");
    std::env::set_var(ENV_API_TOKEN, "secret-token");
    std::env::set_var(ENV_ORGANIZATION_ID, "org-default");
    std::env::set_var(ENV_BOARD_ID, "w-default");
    std::env::set_var(ENV_API_URL, "http://127.0.0.1:9/api/v1");

    let config = load().unwrap();
    clear_env();

    let server = FavroMcpServer::from_config(&config).unwrap();
    let session = server.session();
    assert_eq!(session.resolve_organization(None).await.unwrap(), "org-default");
    assert_eq!(session.resolve_board(None).await.unwrap(), "w-default");
    assert!(session.current_organization().await.is_none());
}
