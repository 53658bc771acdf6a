//! Resource selection subsystem.
//!
//! # Data Flow
//! ```text
//! Map compilation (at configuration time):
//!     ResourcesConfig (mask → bundle, document order)
//!     → mask.rs (classify each mask once: exact, regex, wildcard, segment)
//!     → map.rs (ResourceMap of compound bundles and bare references)
//!     → registry.rs (published atomically, read-only afterwards)
//!
//! Per request:
//!     RequestPath (normalized, leading `/`)
//!     → selector.rs (accumulate every matching compound bundle)
//!     → fallback to the whole map when nothing matched
//!     → render (script / link tags joined by newline)
//! ```
//!
//! # Design Decisions
//! - All matching bundles accumulate; there is no first-match short circuit
//! - Only compound bundles take part in mask matching, bare references are
//!   reachable through the fallback alone
//! - Masks are compiled at registration, never re-parsed per request

pub mod map;
pub mod mask;
pub mod registry;
pub mod request;
pub mod selector;

pub use map::{MapEntry, ResourceMap, ResourceMapBuilder, ResourceReference};
pub use mask::{Mask, MaskError, MaskKind, Matcher};
pub use registry::ResourceRegistry;
pub use request::{RequestPath, RequestPathProvider};
pub use selector::{resolve, resolve_resources, Outcome, Resolution};
