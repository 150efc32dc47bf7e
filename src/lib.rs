pub mod config;
pub mod favro;
pub mod mcp;
pub mod session;

pub use config::Config;
pub use favro::{FavroClient, FavroError};
pub use mcp::FavroMcpServer;
pub use session::SessionContext;
