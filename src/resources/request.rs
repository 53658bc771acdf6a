//! Request path normalization.
//!
//! The request abstraction itself lives outside this crate; anything that can
//! report the path of the in-flight request implements [`RequestPathProvider`].

use std::fmt;

use axum::http::{Request, Uri};

/// A request path normalized to begin with exactly one `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestPath {
    normalized: String,
}

impl RequestPath {
    /// Normalize a raw path. Leading slashes collapse into one.
    pub fn new(raw: &str) -> Self {
        Self {
            normalized: format!("/{}", raw.trim_start_matches('/')),
        }
    }

    /// Build a path from a request target, dropping any query or fragment.
    pub fn from_target(target: &str) -> Self {
        let end = target.find(['?', '#']).unwrap_or(target.len());
        Self::new(&target[..end])
    }

    /// The normalized path.
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Segments after the leading slash; `/` yields a single empty segment.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.normalized[1..].split('/')
    }

    /// Number of segments after the leading slash.
    pub fn segment_count(&self) -> usize {
        self.segments().count()
    }
}

impl fmt::Display for RequestPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

impl From<&str> for RequestPath {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<&Uri> for RequestPath {
    fn from(uri: &Uri) -> Self {
        Self::new(uri.path())
    }
}

/// Supplies the normalized path of the in-flight request.
pub trait RequestPathProvider {
    fn request_path(&self) -> RequestPath;
}

impl RequestPathProvider for RequestPath {
    fn request_path(&self) -> RequestPath {
        self.clone()
    }
}

impl RequestPathProvider for str {
    fn request_path(&self) -> RequestPath {
        RequestPath::new(self)
    }
}

impl RequestPathProvider for Uri {
    fn request_path(&self) -> RequestPath {
        RequestPath::from(self)
    }
}

impl<B> RequestPathProvider for Request<B> {
    fn request_path(&self) -> RequestPath {
        RequestPath::from(self.uri())
    }
}
