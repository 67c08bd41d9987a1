//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Download missing databases → Open readers → Bind → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain connections → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: databases ready before the listener is bound
//! - Any startup error is fatal; nothing after startup is

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
