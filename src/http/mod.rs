//! Preview server subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request id, timeout, trace layers)
//!     → handlers.rs
//!         /_assets/status     (version, entry count)
//!         /_assets/masks      (masks and their kinds)
//!         /_assets/resources  (markup for ?path=)
//!         /_assets/templates  (inline template blocks)
//!         /{*path}            (page shell embedding both)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Template scans run on the blocking pool under their own timeout
//! - "Nothing to render" is `204 No Content`, not an error

pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer};
