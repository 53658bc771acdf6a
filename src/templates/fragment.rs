//! Template fragment files and their identifiers.

use std::path::{Component, Path, PathBuf};

use crate::templates::TemplateError;

/// The two fragment flavours, which resolve their contents differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// `.tpl`: passed through the template renderer.
    Template,
    /// `.ejs`: embedded verbatim.
    Embedded,
}

impl FragmentKind {
    /// Classify by extension; `None` for anything else.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "tpl" => Some(FragmentKind::Template),
            "ejs" => Some(FragmentKind::Embedded),
            _ => None,
        }
    }

    /// The extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            FragmentKind::Template => "tpl",
            FragmentKind::Embedded => "ejs",
        }
    }
}

/// A discovered fragment together with the root its walk began at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentFile {
    pub path: PathBuf,
    pub anchor: PathBuf,
    pub kind: FragmentKind,
}

impl FragmentFile {
    /// Identifier relative to the anchor: `sub/card.tpl` becomes `-sub-card`.
    ///
    /// Computed component-wise, so an anchor that reappears deeper in the
    /// path does not confuse it.
    pub fn identifier(&self) -> Result<String, TemplateError> {
        let relative = self
            .path
            .strip_prefix(&self.anchor)
            .map_err(|_| TemplateError::OutsideAnchor {
                path: self.path.clone(),
                anchor: self.anchor.clone(),
            })?;

        let mut parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        let suffix = format!(".{}", self.kind.extension());
        if let Some(last) = parts.last_mut() {
            if let Some(stem) = last.strip_suffix(&suffix) {
                *last = stem.to_string();
            }
        }

        Ok(parts.iter().map(|part| format!("-{part}")).collect())
    }
}
