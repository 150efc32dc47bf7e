pub mod resources;
pub mod server;
pub mod tools;

pub use resources::FavroResource;
pub use server::FavroMcpServer;
