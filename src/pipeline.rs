//! The page-facing facade: one registry, one set of template roots.

use crate::config::AppConfig;
use crate::resources::{MaskError, RequestPathProvider, ResourceMap, ResourceRegistry};
use crate::templates::{RootProvider, TemplateAggregator, TemplateBlock, TemplateError};

/// Everything a page renderer needs to embed resources and templates.
pub struct AssetPipeline {
    registry: ResourceRegistry,
    roots: Box<dyn RootProvider>,
    aggregator: TemplateAggregator,
}

impl AssetPipeline {
    /// Create a pipeline with the default aggregator.
    pub fn new(map: ResourceMap, roots: impl RootProvider + 'static) -> Self {
        Self {
            registry: ResourceRegistry::new(map),
            roots: Box::new(roots),
            aggregator: TemplateAggregator::default(),
        }
    }

    /// Compile the configured map and take the configured template roots.
    pub fn from_config(config: &AppConfig) -> Result<Self, Vec<MaskError>> {
        let map = ResourceMap::compile(&config.resources)?;
        Ok(Self::new(map, config.templates.clone()))
    }

    /// Swap in a custom renderer / reader pair.
    #[must_use]
    pub fn with_aggregator(mut self, aggregator: TemplateAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    /// The registry holding the active map.
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Script and link tags for the in-flight request.
    pub fn resolve_resources<P>(&self, request: &P) -> Option<String>
    where
        P: RequestPathProvider + ?Sized,
    {
        self.registry.resolve_resources(request)
    }

    /// Inline template blocks for every root.
    pub fn collect_templates(&self) -> Result<Option<String>, TemplateError> {
        self.aggregator.collect_templates(self.roots.as_ref())
    }

    /// The blocks behind [`collect_templates`](Self::collect_templates).
    pub fn collect_blocks(&self) -> Result<Vec<TemplateBlock>, TemplateError> {
        self.aggregator.collect(self.roots.template_roots())
    }
}

impl std::fmt::Debug for AssetPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetPipeline")
            .field("registry", &self.registry)
            .field("roots", &self.roots.template_roots())
            .field("aggregator", &self.aggregator)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use tempfile::TempDir;

    use super::*;
    use crate::config::parse_config;

    #[test]
    fn test_from_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("card.tpl"), "card").unwrap();

        let config = parse_config(&format!(
            r#"
            [templates]
            paths = [{:?}]

            [resources]
            "/user/:id" = ["user.js"]
            "base" = "base.css"
            "#,
            dir.path().display().to_string()
        ))
        .unwrap();

        let pipeline = AssetPipeline::from_config(&config).unwrap();
        assert_eq!(
            pipeline.resolve_resources("/user/7").unwrap(),
            r#"<script type="text/javascript" src="user.js"></script>"#
        );
        assert_eq!(
            pipeline.collect_templates().unwrap().unwrap(),
            r#"<script id="tpl-card" type="text/template">card</script>"#
        );
        assert_eq!(pipeline.collect_blocks().unwrap().len(), 1);
    }

    #[test]
    fn test_no_roots() {
        let pipeline = AssetPipeline::new(ResourceMap::new(), Vec::<PathBuf>::new());
        assert!(pipeline.collect_templates().unwrap().is_none());
        assert!(pipeline.resolve_resources("/").is_none());
    }
}
