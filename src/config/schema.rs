//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the asset
//! pipeline. All types derive Serde traits for deserialization from config files.

use std::fmt;
use std::path::PathBuf;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Preview server settings.
    pub server: ServerConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,

    /// Template roots to aggregate.
    pub templates: TemplatesConfig,

    /// Mask → bundle map, in document order.
    pub resources: ResourcesConfig,
}

/// Preview server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Upper bound for one template scan in seconds.
    pub scan_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 10,
            scan_timeout_secs: 5,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or filter directive (`info`, `asset_mask=debug`, ...).
    pub log_level: String,

    /// Human readable or JSON lines.
    pub log_format: LogFormat,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Prometheus endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Template roots: explicit paths first, then module template directories.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Explicitly configured template directories.
    pub paths: Vec<PathBuf>,

    /// Loaded modules, in load order.
    pub modules: Vec<ModuleConfig>,
}

/// A loaded module that may contribute a template directory.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModuleConfig {
    /// Module name, for logging.
    pub name: String,

    /// The module's template directory, if it has one.
    #[serde(default)]
    pub template_dir: Option<PathBuf>,
}

/// A scalar option value; numbers are kept in their written form.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Text(s) => f.write_str(s),
            ScalarValue::Integer(i) => write!(f, "{i}"),
            ScalarValue::Float(x) => write!(f, "{x}"),
        }
    }
}

/// Options recognized on a resource reference.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceOptions {
    /// Overrides the file type derived from the path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,

    /// Cache-busting `?ver=` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<ScalarValue>,

    /// Script `type` attribute.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub script_type: Option<String>,
}

/// A reference written as a table with an explicit path.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DetailedReference {
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<ScalarValue>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub script_type: Option<String>,
}

impl DetailedReference {
    /// The options part, without the path.
    pub fn options(&self) -> ReferenceOptions {
        ReferenceOptions {
            extension: self.extension.clone(),
            version: self.version.clone(),
            script_type: self.script_type.clone(),
        }
    }
}

/// One element of a bundle: `"app.js"` or `{ path = "app.js", version = 2 }`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ReferenceConfig {
    Path(String),
    Detailed(DetailedReference),
}

/// The value side of a `[resources]` entry.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum EntryConfig {
    /// `"/mask" = [...]`: a compound bundle matched against request paths.
    Bundle(Vec<ReferenceConfig>),
    /// `"label" = "base.css"`: a bare reference, the key is only a label.
    Path(String),
    /// `"vendor.js" = { version = 2 }`: a bare reference keyed by its path.
    Options(ReferenceOptions),
}

/// The `[resources]` table, kept in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourcesConfig {
    entries: Vec<(String, EntryConfig)>,
}

impl ResourcesConfig {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, replacing an existing one with the same key in place.
    pub fn insert(&mut self, key: impl Into<String>, entry: EntryConfig) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = entry,
            None => self.entries.push((key, entry)),
        }
    }

    /// Entries in document order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &EntryConfig)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for ResourcesConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ResourcesVisitor;

        impl<'de> Visitor<'de> for ResourcesVisitor {
            type Value = ResourcesConfig;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of masks to bundles")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut config = ResourcesConfig::new();
                while let Some((key, entry)) = access.next_entry::<String, EntryConfig>()? {
                    config.insert(key, entry);
                }
                Ok(config)
            }
        }

        deserializer.deserialize_map(ResourcesVisitor)
    }
}

impl Serialize for ResourcesConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entry) in &self.entries {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
        assert!(!config.observability.metrics_enabled);
        assert!(config.resources.is_empty());
    }

    #[test]
    fn test_resources_keep_document_order() {
        let config: AppConfig = toml::from_str(
            r##"
            [resources]
            "/z" = ["z.js"]
            "/a" = ["a.js"]
            "#\\.html$#" = ["page.css"]
            "/m/:id" = ["m.js"]
            "##,
        )
        .unwrap();

        let keys: Vec<_> = config.resources.entries().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["/z", "/a", r"#\.html$#", "/m/:id"]);
    }

    #[test]
    fn test_entry_shapes() {
        let config: ResourcesConfig = toml::from_str(
            r#"
            "/x" = ["a.js", { path = "b.js", type = "module", version = 7 }]
            "label" = "c.css"
            "d.less" = { version = "1" }
            "#,
        )
        .unwrap();

        let entries: Vec<_> = config.entries().collect();
        match entries[0].1 {
            EntryConfig::Bundle(refs) => {
                assert_eq!(refs[0], ReferenceConfig::Path("a.js".into()));
                match &refs[1] {
                    ReferenceConfig::Detailed(d) => {
                        assert_eq!(d.script_type.as_deref(), Some("module"));
                        assert_eq!(d.version, Some(ScalarValue::Integer(7)));
                    }
                    other => panic!("expected detailed reference, got {other:?}"),
                }
            }
            other => panic!("expected bundle, got {other:?}"),
        }
        assert_eq!(entries[1].1, &EntryConfig::Path("c.css".into()));
        assert!(matches!(entries[2].1, EntryConfig::Options(_)));
    }

    #[test]
    fn test_unknown_reference_option_rejected() {
        let result: Result<ResourcesConfig, _> = toml::from_str(r#""/x" = [{ path = "a.js", colour = "red" }]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_module_without_template_dir() {
        let config: TemplatesConfig = toml::from_str(
            r#"
            paths = ["templates"]
            [[modules]]
            name = "core"
            [[modules]]
            name = "blog"
            template_dir = "modules/blog/tpl"
            "#,
        )
        .unwrap();
        assert!(config.modules[0].template_dir.is_none());
        assert_eq!(config.modules[1].template_dir, Some(PathBuf::from("modules/blog/tpl")));
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(ScalarValue::Integer(3).to_string(), "3");
        assert_eq!(ScalarValue::Text("1.2".into()).to_string(), "1.2");
        assert_eq!(ScalarValue::Float(1.5).to_string(), "1.5");
    }
}
