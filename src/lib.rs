//! Per-request asset selection and inline template aggregation.
//!
//! Two page-facing operations sit behind [`AssetPipeline`]:
//! - `resolve_resources`: script and stylesheet tags for the request path,
//!   chosen from a mask-keyed resource map
//! - `collect_templates`: every `.tpl` / `.ejs` fragment under the configured
//!   roots, wrapped in inline `<script type="text/template">` blocks

// Core subsystems
pub mod config;
pub mod render;
pub mod resources;
pub mod templates;

pub mod pipeline;

// Serving
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use pipeline::AssetPipeline;
pub use resources::{RequestPath, ResourceMap, ResourceRegistry};
pub use templates::TemplateAggregator;
