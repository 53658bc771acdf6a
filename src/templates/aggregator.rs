//! Inline template block aggregation.

use std::path::{Path, PathBuf};

use crate::observability::metrics;
use crate::render::{join_lines, render_template_block};
use crate::templates::fragment::{FragmentFile, FragmentKind};
use crate::templates::providers::{
    FileSystemReader, RawFileReader, RootProvider, TemplateRenderer, VerbatimRenderer,
};
use crate::templates::scanner::FragmentScanner;
use crate::templates::TemplateError;

/// One rendered fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateBlock {
    /// Path-derived identifier, e.g. `-user-card`.
    pub identifier: String,
    pub contents: String,
    pub source: PathBuf,
}

impl TemplateBlock {
    /// The inline `<script type="text/template">` block.
    pub fn render(&self) -> String {
        render_template_block(&self.identifier, &self.contents)
    }
}

/// Walks template roots and wraps each fragment in an inline block.
pub struct TemplateAggregator {
    renderer: Box<dyn TemplateRenderer>,
    reader: Box<dyn RawFileReader>,
}

impl TemplateAggregator {
    /// Create an aggregator from a renderer and a raw reader.
    pub fn new(
        renderer: impl TemplateRenderer + 'static,
        reader: impl RawFileReader + 'static,
    ) -> Self {
        Self {
            renderer: Box::new(renderer),
            reader: Box::new(reader),
        }
    }

    /// Blocks for every root, in root order then discovery order.
    ///
    /// Stops at the first missing root or unreadable file.
    pub fn collect<I, P>(&self, roots: I) -> Result<Vec<TemplateBlock>, TemplateError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut blocks = Vec::new();

        for root in roots {
            let root = root.as_ref();
            let scanner = FragmentScanner::new(root)?;
            let before = blocks.len();

            for fragment in scanner {
                blocks.push(self.block(&fragment?)?);
            }

            tracing::debug!(
                root = %root.display(),
                blocks = blocks.len() - before,
                "template root scanned"
            );
        }

        metrics::record_template_blocks(blocks.len());
        Ok(blocks)
    }

    /// Markup for every root the provider lists, or `None` when none found.
    pub fn collect_templates<R>(&self, roots: &R) -> Result<Option<String>, TemplateError>
    where
        R: RootProvider + ?Sized,
    {
        let roots = roots.template_roots();
        let blocks = self.collect(&roots)?;

        tracing::info!(roots = roots.len(), blocks = blocks.len(), "templates collected");
        Ok(join_lines(blocks.iter().map(TemplateBlock::render)))
    }

    fn block(&self, fragment: &FragmentFile) -> Result<TemplateBlock, TemplateError> {
        let contents = match fragment.kind {
            FragmentKind::Template => self.renderer.render(&fragment.path)?,
            FragmentKind::Embedded => self.reader.read_raw(&fragment.path)?,
        };

        Ok(TemplateBlock {
            identifier: fragment.identifier()?,
            contents,
            source: fragment.path.clone(),
        })
    }
}

impl Default for TemplateAggregator {
    fn default() -> Self {
        Self::new(VerbatimRenderer, FileSystemReader)
    }
}

impl std::fmt::Debug for TemplateAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateAggregator").finish_non_exhaustive()
    }
}
