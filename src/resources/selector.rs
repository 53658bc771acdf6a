//! Resource resolution for a request path.
//!
//! # Responsibilities
//! - Test every compound bundle's mask against the path
//! - Accumulate the references of every match, in registration order
//! - Fall back to the whole map when nothing matched
//!
//! # Design Decisions
//! - Include everything applicable: no first-match policy
//! - Unrenderable references are dropped during selection, so a match that
//!   renders nothing still falls back
//! - The fallback always covers the entire map, bare references included
//! - Resolution is pure; rendering and metrics happen in `resolve_resources`

use crate::observability::metrics;
use crate::render::{join_lines, render_reference, RenderKind};
use crate::resources::map::{MapEntry, ResourceMap, ResourceReference};
use crate::resources::mask::Matcher;
use crate::resources::request::RequestPath;

/// How a resolution was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// At least one compound bundle matched.
    Matched,
    /// Nothing matched; the whole map applies.
    Fallback,
    /// The map is empty.
    Empty,
}

impl Outcome {
    /// Lowercase name, used as a metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Matched => "matched",
            Outcome::Fallback => "fallback",
            Outcome::Empty => "empty",
        }
    }
}

/// The references selected for one request path.
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    pub outcome: Outcome,
    /// Keys of the bundles that matched; empty unless `outcome` is `Matched`.
    pub matched: Vec<&'a str>,
    /// Renderable references, in output order.
    pub references: Vec<&'a ResourceReference>,
}

impl Resolution<'_> {
    /// Render every renderable reference, one tag per line.
    pub fn render(&self) -> Option<String> {
        join_lines(self.references.iter().filter_map(|r| render_reference(r)))
    }
}

/// Select the references applicable to `path`.
pub fn resolve<'a>(map: &'a ResourceMap, path: &RequestPath) -> Resolution<'a> {
    if map.is_empty() {
        return Resolution {
            outcome: Outcome::Empty,
            matched: Vec::new(),
            references: Vec::new(),
        };
    }

    let mut matched = Vec::new();
    let mut references = Vec::new();

    for entry in map.entries() {
        // Bare references never take part in matching, even when their key
        // equals the path.
        if let MapEntry::Bundle { mask, references: bundle } = entry {
            if mask.matches(path) {
                matched.push(mask.source());
                references.extend(bundle.iter().filter(|r| is_renderable(r)));
            }
        }
    }

    if !references.is_empty() {
        tracing::debug!(path = %path, masks = ?matched, count = references.len(), "resource masks matched");
        return Resolution {
            outcome: Outcome::Matched,
            matched,
            references,
        };
    }

    tracing::debug!(path = %path, entries = map.len(), "no mask matched, using the whole map");
    Resolution {
        outcome: Outcome::Fallback,
        matched: Vec::new(),
        references: map
            .entries()
            .iter()
            .flat_map(MapEntry::references)
            .filter(|r| is_renderable(r))
            .collect(),
    }
}

fn is_renderable(reference: &ResourceReference) -> bool {
    RenderKind::from_extension(reference.effective_extension()).is_some()
}

/// Resolve and render the markup for `path`; `None` when nothing renders.
pub fn resolve_resources(map: &ResourceMap, path: &RequestPath) -> Option<String> {
    let resolution = resolve(map, path);
    metrics::record_resolution(resolution.outcome.as_str());
    resolution.render()
}
