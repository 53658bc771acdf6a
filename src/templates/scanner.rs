//! Depth-first fragment discovery.
//!
//! # Responsibilities
//! - Resolve a root to its canonical path, failing when it does not exist
//! - Walk the tree lazily, one directory read at a time
//! - Yield `.tpl` / `.ejs` files anchored at the root
//!
//! # Design Decisions
//! - Entries of a directory are visited in file-name order; subdirectories
//!   are descended as they are encountered
//! - Symlinks are followed; only a link back to one of its own ancestors is
//!   skipped, so aliases of sibling directories still yield their fragments
//! - Dangling entries (broken links) are skipped, not reported

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::templates::fragment::{FragmentFile, FragmentKind};
use crate::templates::TemplateError;

/// Lazy iterator over the fragment files below one root.
pub struct FragmentScanner {
    anchor: PathBuf,
    walker: walkdir::IntoIter,
}

impl FragmentScanner {
    /// Start a walk at `root`.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let root = root.as_ref();
        let anchor = fs::canonicalize(root).map_err(|source| TemplateError::RootNotFound {
            path: root.to_path_buf(),
            source,
        })?;

        if !anchor.is_dir() {
            return Err(TemplateError::NotADirectory(root.to_path_buf()));
        }

        let walker = WalkDir::new(&anchor)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();

        Ok(Self { anchor, walker })
    }

    /// Canonical root every yielded fragment is anchored at.
    pub fn anchor(&self) -> &Path {
        &self.anchor
    }

    /// `None` when the failed entry should be skipped.
    fn failure(&self, err: walkdir::Error) -> Option<TemplateError> {
        let path = err
            .path()
            .map_or_else(|| self.anchor.clone(), Path::to_path_buf);

        if let Some(ancestor) = err.loop_ancestor() {
            tracing::debug!(
                path = %path.display(),
                ancestor = %ancestor.display(),
                "symlink loop, skipping"
            );
            return None;
        }

        let source = io::Error::from(err);
        if source.kind() == io::ErrorKind::NotFound {
            tracing::debug!(path = %path.display(), "dangling entry, skipping");
            return None;
        }

        Some(TemplateError::io(path, source))
    }
}

impl std::fmt::Debug for FragmentScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FragmentScanner")
            .field("anchor", &self.anchor)
            .finish_non_exhaustive()
    }
}

impl Iterator for FragmentScanner {
    type Item = Result<FragmentFile, TemplateError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => match self.failure(err) {
                    Some(failure) => return Some(Err(failure)),
                    None => continue,
                },
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if let Some(kind) = FragmentKind::from_path(entry.path()) {
                return Some(Ok(FragmentFile {
                    path: entry.into_path(),
                    anchor: self.anchor.clone(),
                    kind,
                }));
            }
        }
    }
}
