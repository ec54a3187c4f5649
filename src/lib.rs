//! Documentation version router library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod menu;
pub mod observability;
pub mod releases;
pub mod resilience;
pub mod routing;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use releases::{ManifestStore, Resolver};
