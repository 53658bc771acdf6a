//! Template aggregation subsystem.
//!
//! # Data Flow
//! ```text
//! RootProvider (configured paths, then module template dirs)
//!     → scanner.rs (canonicalize root, depth-first walk, lazy)
//!     → fragment.rs (classify .tpl / .ejs, derive identifier from anchor)
//!     → providers.rs (.tpl rendered, .ejs read verbatim)
//!     → aggregator.rs (inline <script type="text/template"> blocks)
//! ```
//!
//! # Design Decisions
//! - A missing root is fatal for the whole call
//! - The anchor is the root where the walk began, fixed for its whole subtree
//! - Identifier collisions across roots are not detected
//! - Nothing is cached; every call walks the trees again

use std::path::PathBuf;

use thiserror::Error;

pub mod aggregator;
pub mod fragment;
pub mod providers;
pub mod scanner;

pub use aggregator::{TemplateAggregator, TemplateBlock};
pub use fragment::{FragmentFile, FragmentKind};
pub use providers::{FileSystemReader, RawFileReader, RootProvider, TemplateRenderer, VerbatimRenderer};
pub use scanner::FragmentScanner;

/// Template aggregation errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A scan root does not resolve to an existing path.
    #[error("template root not found: {path}")]
    RootNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A scan root exists but is not a directory.
    #[error("template root is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// IO error while walking or reading.
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A fragment does not live under the anchor it was derived against.
    #[error("{path} is outside of template root {anchor}")]
    OutsideAnchor { path: PathBuf, anchor: PathBuf },

    /// The template renderer refused a file.
    #[error("failed to render {path}: {message}")]
    Render { path: PathBuf, message: String },
}

impl TemplateError {
    /// IO failure at `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Renderer failure for `path`.
    pub fn render(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Render {
            path: path.into(),
            message: message.into(),
        }
    }
}
