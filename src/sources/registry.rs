//! Source registry for managing the sources a session searches

use super::{CalculatorSource, DirectorySource, UrlSource};
use crate::config::CatalogSettings;
use crate::objects::{Source, SourceRef, TextSource};
use tracing::{info, warn};

/// Registry of all configured sources
#[derive(Default)]
pub struct SourceRegistry {
    /// Filesystem sources, kept concrete so they can be rescanned
    directories: Vec<DirectorySource>,
    /// Other catalog sources
    catalogs: Vec<Box<dyn Source>>,
    /// Query-dependent sources
    texts: Vec<Box<dyn TextSource>>,
}

impl SourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every source enabled in the catalog settings
    pub fn from_settings(settings: &CatalogSettings) -> Self {
        let mut registry = Self::new();

        if !settings.directories.is_empty() {
            let files = DirectorySource::new("files", settings.directories.clone())
                .with_hidden(settings.include_hidden)
                .with_max_depth(settings.max_depth)
                .scan();
            info!(
                "Loaded source: files ({} entries from {} directories)",
                files.len(),
                settings.directories.len()
            );
            registry.directories.push(files);
        }

        if settings.calculator {
            registry.register_text(Box::new(CalculatorSource::new()));
        } else {
            info!("Skipping disabled source: calculator");
        }
        if settings.urls {
            registry.register_text(Box::new(UrlSource::new()));
        } else {
            info!("Skipping disabled source: urls");
        }

        info!("Loaded {} sources", registry.len());
        registry
    }

    /// Register a catalog source
    pub fn register(&mut self, source: Box<dyn Source>) {
        self.warn_if_taken(source.id());
        info!("Loaded source: {}", source.id());
        self.catalogs.push(source);
    }

    /// Register a text source
    pub fn register_text(&mut self, source: Box<dyn TextSource>) {
        self.warn_if_taken(source.id());
        info!("Loaded text source: {}", source.id());
        self.texts.push(source);
    }

    fn warn_if_taken(&self, id: &str) {
        if self.ids().contains(&id) {
            warn!("Source id {} is registered more than once", id);
        }
    }

    /// All sources, catalog sources first, in registration order
    pub fn sources(&self) -> Vec<SourceRef<'_>> {
        let directories = self
            .directories
            .iter()
            .map(|d| SourceRef::Catalog(d as &dyn Source));
        let catalogs = self.catalogs.iter().map(|c| SourceRef::Catalog(c.as_ref()));
        let texts = self.texts.iter().map(|t| SourceRef::Text(t.as_ref()));
        directories.chain(catalogs).chain(texts).collect()
    }

    /// Source ids, in the order of [`SourceRegistry::sources`]
    pub fn ids(&self) -> Vec<&str> {
        self.sources().into_iter().map(|s| s.id()).collect()
    }

    /// Re-read every filesystem source; returns the total entry count
    pub fn rescan(&mut self) -> usize {
        let total = self.directories.iter_mut().map(|d| d.rescan()).sum();
        info!("Rescanned catalog: {} entries", total);
        total
    }

    pub fn len(&self) -> usize {
        self.directories.len() + self.catalogs.len() + self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
