//! The compiled resource map.
//!
//! # Responsibilities
//! - Hold mask → bundle entries in registration order
//! - Distinguish compound bundles from bare references
//! - Compile configuration entries, reporting every bad mask
//!
//! # Design Decisions
//! - Immutable once built; replacing the map means building a new one
//! - Bare references keep their key for diagnostics but never become masks

use std::path::Path;

use crate::config::schema::{EntryConfig, ReferenceConfig, ReferenceOptions, ResourcesConfig};
use crate::resources::mask::{Mask, MaskError};

/// One script or stylesheet reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReference {
    path: String,
    extension: Option<String>,
    version: Option<String>,
    script_type: Option<String>,
}

impl ResourceReference {
    /// A reference with no options.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            extension: None,
            version: None,
            script_type: None,
        }
    }

    /// Override the file type used for rendering.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Append `?ver=` to the rendered URL.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Script `type` attribute, e.g. `module`.
    #[must_use]
    pub fn with_script_type(mut self, script_type: impl Into<String>) -> Self {
        self.script_type = Some(script_type.into());
        self
    }

    /// The path as configured, without the version suffix.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The cache-busting version, if any.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The explicit script type, if any.
    pub fn script_type(&self) -> Option<&str> {
        self.script_type.as_deref()
    }

    /// The configured extension, else the path's file suffix, else empty.
    pub fn effective_extension(&self) -> &str {
        match &self.extension {
            Some(ext) => ext,
            None => Path::new(&self.path)
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or(""),
        }
    }

    /// The URL to emit, including the cache-busting suffix.
    pub fn src(&self) -> String {
        match &self.version {
            Some(version) => format!("{}?ver={}", self.path, version),
            None => self.path.clone(),
        }
    }
}

impl From<&str> for ResourceReference {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<&ReferenceConfig> for ResourceReference {
    fn from(config: &ReferenceConfig) -> Self {
        match config {
            ReferenceConfig::Path(path) => Self::new(path.as_str()),
            ReferenceConfig::Detailed(detail) => {
                Self::from_options(detail.path.as_str(), &detail.options())
            }
        }
    }
}

impl ResourceReference {
    fn from_options(path: &str, options: &ReferenceOptions) -> Self {
        Self {
            path: path.to_string(),
            extension: options.extension.clone(),
            version: options.version.as_ref().map(ToString::to_string),
            script_type: options.script_type.clone(),
        }
    }
}

/// A registered map entry.
#[derive(Debug, Clone)]
pub enum MapEntry {
    /// A mask with an ordered list of references; takes part in matching.
    Bundle {
        mask: Mask,
        references: Vec<ResourceReference>,
    },
    /// A single reference; only reachable through the fallback.
    Reference {
        key: String,
        reference: ResourceReference,
    },
}

impl MapEntry {
    /// The configured key: the mask source or the bare entry's key.
    pub fn key(&self) -> &str {
        match self {
            MapEntry::Bundle { mask, .. } => mask.source(),
            MapEntry::Reference { key, .. } => key,
        }
    }

    /// Every reference this entry contributes.
    pub fn references(&self) -> &[ResourceReference] {
        match self {
            MapEntry::Bundle { references, .. } => references,
            MapEntry::Reference { reference, .. } => std::slice::from_ref(reference),
        }
    }
}

/// Ordered mask → bundle map.
#[derive(Debug, Clone, Default)]
pub struct ResourceMap {
    entries: Vec<MapEntry>,
}

impl ResourceMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a map.
    pub fn builder() -> ResourceMapBuilder {
        ResourceMapBuilder::default()
    }

    /// Compile configuration entries in document order.
    ///
    /// Every invalid mask is reported, not just the first.
    pub fn compile(config: &ResourcesConfig) -> Result<Self, Vec<MaskError>> {
        let mut builder = Self::builder();
        for (key, entry) in config.entries() {
            builder = match entry {
                EntryConfig::Bundle(references) => {
                    builder.bundle(key, references.iter().map(ResourceReference::from))
                }
                EntryConfig::Path(path) => builder.reference(key, ResourceReference::new(path.as_str())),
                EntryConfig::Options(options) => {
                    builder.reference(key, ResourceReference::from_options(key, options))
                }
            };
        }
        builder.build_all()
    }

    /// Entries in registration order.
    pub fn entries(&self) -> &[MapEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

enum PendingEntry {
    Bundle {
        mask: String,
        references: Vec<ResourceReference>,
    },
    Reference {
        key: String,
        reference: ResourceReference,
    },
}

/// Collects entries and compiles their masks on [`build`](Self::build).
#[derive(Default)]
pub struct ResourceMapBuilder {
    pending: Vec<PendingEntry>,
}

impl ResourceMapBuilder {
    /// Add a compound bundle under a mask.
    #[must_use]
    pub fn bundle<I, R>(mut self, mask: &str, references: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<ResourceReference>,
    {
        self.pending.push(PendingEntry::Bundle {
            mask: mask.to_string(),
            references: references.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Add a bare reference.
    #[must_use]
    pub fn reference(mut self, key: &str, reference: impl Into<ResourceReference>) -> Self {
        self.pending.push(PendingEntry::Reference {
            key: key.to_string(),
            reference: reference.into(),
        });
        self
    }

    /// Compile all masks, failing on the first invalid one.
    pub fn build(self) -> Result<ResourceMap, MaskError> {
        self.build_all()
            .map_err(|mut errors| errors.swap_remove(0))
    }

    /// Compile all masks, collecting every invalid one.
    pub fn build_all(self) -> Result<ResourceMap, Vec<MaskError>> {
        let mut entries = Vec::with_capacity(self.pending.len());
        let mut errors = Vec::new();

        for pending in self.pending {
            match pending {
                PendingEntry::Bundle { mask, references } => match Mask::parse(&mask) {
                    Ok(mask) => entries.push(MapEntry::Bundle { mask, references }),
                    Err(e) => errors.push(e),
                },
                PendingEntry::Reference { key, reference } => {
                    entries.push(MapEntry::Reference { key, reference })
                }
            }
        }

        if errors.is_empty() {
            Ok(ResourceMap { entries })
        } else {
            Err(errors)
        }
    }
}
