//! Geo redirect library.

pub mod config;
pub mod geo;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::RedirectConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
