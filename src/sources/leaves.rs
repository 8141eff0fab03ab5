//! Leaf objects produced by the built-in sources

use crate::objects::{Object, ObjectKind};
use std::path::{Path, PathBuf};
use url::Url;

/// A file or directory on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLeaf {
    path: PathBuf,
    name: String,
    relative: Option<String>,
    is_dir: bool,
}

impl FileLeaf {
    /// Leaf for `path`; `base` is used to build a shorter alias
    pub fn new(path: PathBuf, is_dir: bool, base: Option<&Path>) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let relative = base
            .and_then(|b| path.strip_prefix(b).ok())
            .map(|p| p.display().to_string())
            .filter(|r| !r.is_empty() && *r != name);

        Self {
            path,
            name,
            relative,
            is_dir,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Object for FileLeaf {
    fn key(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn display(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> ObjectKind {
        if self.is_dir {
            ObjectKind::Directory
        } else {
            ObjectKind::File
        }
    }

    fn aliases(&self) -> Vec<String> {
        self.relative.iter().cloned().collect()
    }

    fn is_valid(&self) -> bool {
        self.path.exists()
    }

    fn description(&self) -> Option<String> {
        Some(self.path.display().to_string())
    }
}

/// Free text, e.g. an evaluated expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLeaf {
    text: String,
    description: Option<String>,
}

impl TextLeaf {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Object for TextLeaf {
    fn key(&self) -> String {
        format!("text:{}", self.text)
    }

    fn display(&self) -> String {
        self.text.clone()
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Text
    }

    fn description(&self) -> Option<String> {
        self.description.clone()
    }
}

/// A web address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlLeaf {
    url: Url,
}

impl UrlLeaf {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Object for UrlLeaf {
    fn key(&self) -> String {
        format!("url:{}", self.url)
    }

    fn display(&self) -> String {
        self.url.to_string()
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Url
    }

    fn aliases(&self) -> Vec<String> {
        self.url.host_str().map(|h| h.to_string()).into_iter().collect()
    }

    fn description(&self) -> Option<String> {
        Some("Open URL".to_string())
    }
}
