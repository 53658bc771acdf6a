//! Process lifecycle for the preview server.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     Ctrl-C / SIGTERM → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → every subscriber (HTTP server) stops accepting → drain → exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::{shutdown_on_signal, wait_for_signal};
