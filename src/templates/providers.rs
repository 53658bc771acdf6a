//! Collaborators the aggregator depends on.
//!
//! Template rendering semantics and module registries belong to the host
//! application; the defaults here cover the plain filesystem case.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::TemplatesConfig;
use crate::templates::TemplateError;

/// Produces the rendered text of a `.tpl` fragment.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, path: &Path) -> Result<String, TemplateError>;
}

/// Produces the raw text of an `.ejs` fragment.
pub trait RawFileReader: Send + Sync {
    fn read_raw(&self, path: &Path) -> Result<String, TemplateError>;
}

/// Lists the directories to scan, in scan order.
pub trait RootProvider: Send + Sync {
    fn template_roots(&self) -> Vec<PathBuf>;
}

/// Renders a `.tpl` file as its own text.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbatimRenderer;

impl TemplateRenderer for VerbatimRenderer {
    fn render(&self, path: &Path) -> Result<String, TemplateError> {
        fs::read_to_string(path).map_err(|e| TemplateError::io(path, e))
    }
}

/// Reads file bytes, replacing invalid UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemReader;

impl RawFileReader for FileSystemReader {
    fn read_raw(&self, path: &Path) -> Result<String, TemplateError> {
        let bytes = fs::read(path).map_err(|e| TemplateError::io(path, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Configured paths first, then each module's template directory.
impl RootProvider for TemplatesConfig {
    fn template_roots(&self) -> Vec<PathBuf> {
        self.paths
            .iter()
            .cloned()
            .chain(self.modules.iter().filter_map(|m| m.template_dir.clone()))
            .collect()
    }
}

impl RootProvider for Vec<PathBuf> {
    fn template_roots(&self) -> Vec<PathBuf> {
        self.clone()
    }
}

impl<F> TemplateRenderer for F
where
    F: Fn(&Path) -> Result<String, TemplateError> + Send + Sync,
{
    fn render(&self, path: &Path) -> Result<String, TemplateError> {
        self(path)
    }
}
