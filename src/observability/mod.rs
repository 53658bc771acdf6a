//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! selector, aggregator, server produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters and histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level
//! - Metrics are recorded unconditionally; nothing is exported until
//!   `init_metrics` installs a recorder

pub mod logging;
pub mod metrics;
