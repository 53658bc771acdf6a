//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, mask compilation)
//!     → AppConfig (validated, immutable)
//!     → ResourceMap compiled once, published through the registry
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a new registration
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - `[resources]` keeps document order; it decides accumulation order

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::AppConfig;
pub use schema::ModuleConfig;
pub use schema::ObservabilityConfig;
pub use schema::ResourcesConfig;
pub use schema::ServerConfig;
pub use schema::TemplatesConfig;
pub use validation::ValidationError;
