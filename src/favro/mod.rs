pub mod client;
pub mod credentials;
pub mod error;
pub mod pagination;
pub mod resolvers;
pub mod retry;
pub mod types;

pub use client::{ApiRequest, BackendRouting, FavroClient};
pub use credentials::Credentials;
pub use error::FavroError;
pub use pagination::{Page, PageCursor};
pub use resolvers::Resolver;
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
