//! Process-wide resource map.
//!
//! # Responsibilities
//! - Publish the compiled map to request handlers
//! - Replace the map as a whole on registration
//!
//! # Design Decisions
//! - Readers take a snapshot (`Arc`) and never see a half-built map
//! - Registration swaps atomically; there is no per-entry mutation

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::resources::map::ResourceMap;
use crate::resources::request::RequestPathProvider;
use crate::resources::selector::resolve_resources;

/// Holds the active [`ResourceMap`].
#[derive(Debug)]
pub struct ResourceRegistry {
    map: ArcSwap<ResourceMap>,
}

impl ResourceRegistry {
    /// Create a registry serving `map`.
    pub fn new(map: ResourceMap) -> Self {
        Self {
            map: ArcSwap::from_pointee(map),
        }
    }

    /// Register a new map, replacing the current one.
    pub fn register(&self, map: ResourceMap) {
        tracing::info!(entries = map.len(), "resource map registered");
        self.map.store(Arc::new(map));
    }

    /// The map as of now.
    pub fn snapshot(&self) -> Arc<ResourceMap> {
        self.map.load_full()
    }

    /// Markup for the current request, or `None` when nothing renders.
    pub fn resolve_resources<P>(&self, request: &P) -> Option<String>
    where
        P: RequestPathProvider + ?Sized,
    {
        let path = request.request_path();
        resolve_resources(&self.map.load(), &path)
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new(ResourceMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_replaces_map() {
        let registry = ResourceRegistry::default();
        assert!(registry.resolve_resources("/").is_none());

        let map = ResourceMap::builder().bundle("/", ["home.js"]).build().unwrap();
        registry.register(map);

        assert_eq!(
            registry.resolve_resources("/").unwrap(),
            r#"<script type="text/javascript" src="home.js"></script>"#
        );
    }

    #[test]
    fn test_snapshot_survives_registration() {
        let registry = ResourceRegistry::new(
            ResourceMap::builder().reference("a", "a.js").build().unwrap(),
        );
        let before = registry.snapshot();

        registry.register(ResourceMap::new());

        assert_eq!(before.len(), 1);
        assert!(registry.snapshot().is_empty());
    }
}
