//! Filesystem catalog source

use super::leaves::FileLeaf;
use crate::objects::{Leaves, ObjectRef, Source};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Indexes the entries of a set of directories.
///
/// Nothing is read until [`DirectorySource::scan`] or
/// [`DirectorySource::rescan`]; enumerating leaves never touches the disk.
#[derive(Debug)]
pub struct DirectorySource {
    id: String,
    roots: Vec<PathBuf>,
    include_hidden: bool,
    max_depth: usize,
    alias_base: Option<PathBuf>,
    items: Vec<ObjectRef>,
}

impl DirectorySource {
    /// Unscanned source over `roots`
    pub fn new(id: impl Into<String>, roots: Vec<PathBuf>) -> Self {
        Self {
            id: id.into(),
            roots,
            include_hidden: false,
            max_depth: 1,
            alias_base: dirs::home_dir(),
            items: Vec::new(),
        }
    }

    /// Finish building: read every root once
    pub fn scan(mut self) -> Self {
        self.rescan();
        self
    }

    /// Also index dotfiles
    pub fn with_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    /// How many levels to descend; 1 indexes direct children only
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Aliases are built relative to `base` (the home directory by default)
    pub fn with_alias_base(mut self, base: Option<PathBuf>) -> Self {
        self.alias_base = base;
        self
    }

    /// Re-read every root; returns the number of indexed entries
    pub fn rescan(&mut self) -> usize {
        let mut items = Vec::new();
        for root in &self.roots {
            self.walk(root, 1, &mut items);
        }
        debug!("Indexed {} entries for source {}", items.len(), self.id);
        self.items = items;
        self.items.len()
    }

    fn walk(&self, dir: &Path, depth: usize, out: &mut Vec<ObjectRef>) {
        if depth > self.max_depth {
            return;
        }

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot read directory {}: {}", dir.display(), e);
                return;
            }
        };

        let mut paths: Vec<(PathBuf, bool)> = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping entry in {}: {}", dir.display(), e);
                    continue;
                }
            };
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            if hidden && !self.include_hidden {
                continue;
            }
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            paths.push((entry.path(), is_dir));
        }
        // read_dir order is unspecified
        paths.sort();

        for (path, is_dir) in paths {
            out.push(Arc::new(FileLeaf::new(
                path.clone(),
                is_dir,
                self.alias_base.as_deref(),
            )));
            if is_dir {
                self.walk(&path, depth + 1, out);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Source for DirectorySource {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "Files"
    }

    fn leaves(&self) -> Leaves {
        Box::new(self.items.clone().into_iter())
    }
}
