//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, client address)
//!     → redirect.rs (lookup, nearest region)
//!     → response.rs (302 or error status)
//!     → Send to client
//! ```

pub mod redirect;
pub mod request;
pub mod response;
pub mod server;

pub use redirect::AppState;
pub use request::{UuidRequestId, X_FORWARDED_FOR, X_REQUEST_ID};
pub use response::RedirectError;
pub use server::HttpServer;
