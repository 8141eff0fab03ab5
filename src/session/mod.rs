//! Session: the explicit owner of one learning register, one searcher and
//! the configured sources for an application run.
//!
//! Everything here is synchronous. Callers that want to observe what the
//! session does attach an event channel with [`Session::with_events`].

use crate::actions;
use crate::config::Settings;
use crate::learn::{LearningRegister, RegisterError};
use crate::objects::{Object, ObjectRef};
use crate::results::Rankable;
use crate::search::{SearchOptions, SearchResults, Searcher};
use crate::sources::SourceRegistry;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error};

/// Something observable that happened in a session
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A search finished; `first` is its best result
    Results { key: String, first: Option<Rankable> },
    /// An object was chosen for `key`
    Activated { object: String, key: String },
    /// An action was carried out on a leaf
    Performed { action: String, leaf: String },
    /// The register was written
    Saved { path: PathBuf, entries: usize },
    /// Writing the register failed; the previous file is intact
    SaveFailed { path: PathBuf, error: String },
}

pub struct Session {
    register: LearningRegister,
    searcher: Searcher,
    sources: SourceRegistry,
    register_path: PathBuf,
    events: Option<UnboundedSender<SessionEvent>>,
}

impl Session {
    pub fn new(register: LearningRegister, sources: SourceRegistry, register_path: PathBuf) -> Self {
        Self {
            register,
            searcher: Searcher::new(),
            sources,
            register_path,
            events: None,
        }
    }

    /// Load the register and build the sources described by `settings`
    pub fn open(settings: &Settings) -> Self {
        let register_path = settings.register_path();
        let register = LearningRegister::load(&register_path)
            .with_prune_threshold(settings.register.prune_threshold);
        let sources = SourceRegistry::from_settings(&settings.catalog);
        Self::new(register, sources, register_path)
    }

    /// Send session events to `tx`
    pub fn with_events(mut self, tx: UnboundedSender<SessionEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(tx) = &self.events {
            if tx.send(event).is_err() {
                debug!("Session event dropped, receiver closed");
            }
        }
    }

    /// Rank every source for `key`
    pub fn search(&mut self, key: &str) -> SearchResults<'static> {
        self.search_with(key, SearchOptions::new())
    }

    pub fn search_with<'s>(&mut self, key: &str, options: SearchOptions<'s>) -> SearchResults<'s> {
        let sources = self.sources.sources();
        let results = self.searcher.search(&self.register, &sources, key, options);
        self.emit(SessionEvent::Results {
            key: key.to_string(),
            first: results.first().cloned(),
        });
        results
    }

    /// Rank the built-in actions applicable to `leaf`
    pub fn rank_actions(&self, leaf: &dyn Object, key: &str) -> SearchResults<'static> {
        let applicable = actions::applies_to(leaf.kind());
        let candidates: Vec<ObjectRef> = actions::builtin_actions()
            .into_iter()
            .filter(|a| applicable(a))
            .collect();
        self.searcher
            .rank_actions(&self.register, &candidates, key, leaf, None)
    }

    /// The user chose `object` after typing `key`
    pub fn activate(&mut self, object: &dyn Object, key: &str) {
        self.register.record_hit(object, key);
        self.emit(SessionEvent::Activated {
            object: object.key(),
            key: key.to_string(),
        });
    }

    /// The user ran `action` on `leaf`, having typed `key` in the action pane
    pub fn perform(&mut self, action: &dyn Object, leaf: &dyn Object, key: &str) {
        self.register.record_hit(action, key);
        self.register.set_correlation(action, leaf);
        self.emit(SessionEvent::Performed {
            action: action.key(),
            leaf: leaf.key(),
        });
    }

    /// Flip favorite status; returns whether `object` is now a favorite
    pub fn toggle_favorite(&mut self, object: &dyn Object) -> bool {
        if self.register.is_favorite(object) {
            self.register.remove_favorite(object);
            false
        } else {
            self.register.add_favorite(object);
            true
        }
    }

    /// Write the register now
    pub fn save(&mut self) -> Result<(), RegisterError> {
        match self.register.save(&self.register_path) {
            Ok(()) => {
                self.emit(SessionEvent::Saved {
                    path: self.register_path.clone(),
                    entries: self.register.len(),
                });
                Ok(())
            }
            Err(e) => {
                error!("Failed to save register: {}", e);
                self.emit(SessionEvent::SaveFailed {
                    path: self.register_path.clone(),
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Save only when something changed since the last save; returns
    /// whether a save happened
    pub fn save_if_dirty(&mut self) -> Result<bool, RegisterError> {
        if !self.register.is_dirty() {
            return Ok(false);
        }
        self.save().map(|()| true)
    }

    /// Re-read the catalog and forget cached pools
    pub fn rescan(&mut self) -> usize {
        let total = self.sources.rescan();
        self.searcher.reset();
        total
    }

    pub fn register(&self) -> &LearningRegister {
        &self.register
    }

    pub fn register_mut(&mut self) -> &mut LearningRegister {
        &mut self.register
    }

    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }

    pub fn register_path(&self) -> &Path {
        &self.register_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Action;
    use crate::sources::{FileLeaf, ListSource, TextLeaf};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn session_with(items: &[&str], path: PathBuf) -> Session {
        let objects: Vec<ObjectRef> = items
            .iter()
            .map(|name| Arc::new(TextLeaf::new(*name)) as ObjectRef)
            .collect();
        let mut sources = SourceRegistry::new();
        sources.register(Box::new(ListSource::new("apps", objects)));
        Session::new(LearningRegister::new(), sources, path)
    }

    fn top_display(results: &SearchResults<'_>) -> String {
        results.first().map(|rb| rb.display.clone()).unwrap_or_default()
    }

    #[test]
    fn test_activation_changes_ranking() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with(&["gnome-terminal", "terminal"], dir.path().join("r.json"));

        let results = session.search("term");
        assert_eq!(top_display(&results), "terminal");
        let gnome = results
            .matches()
            .find(|rb| rb.display == "gnome-terminal")
            .unwrap();

        session.activate(gnome.object(), "term");
        assert!(session.register().is_dirty());
        assert_eq!(top_display(&session.search("term")), "gnome-terminal");
    }

    #[test]
    fn test_perform_prefers_remembered_action() {
        let dir = tempfile::tempdir().unwrap();
        let session_path = dir.path().join("r.json");
        let mut session = session_with(&[], session_path);
        let leaf = FileLeaf::new(dir.path().join("report.pdf"), false, None);

        let before = session.rank_actions(&leaf, "");
        assert_eq!(before.first().unwrap().key(), "action:open");
        // Text-only actions never reach a file's pane and vice versa
        assert!(before.matches().all(|rb| rb.key() != "action:launch-again"));

        session.perform(&Action::RevealInFolder, &leaf, "");
        let after = session.rank_actions(&leaf, "");
        assert_eq!(after.first().unwrap().key(), "action:reveal");
    }

    #[test]
    fn test_toggle_favorite() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with(&[], dir.path().join("r.json"));
        let leaf = TextLeaf::new("notes");
        assert!(session.toggle_favorite(&leaf));
        assert!(session.register().is_favorite(&leaf));
        assert!(!session.toggle_favorite(&leaf));
        assert!(!session.register().is_favorite(&leaf));
    }

    #[test]
    fn test_save_if_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.json");
        let mut session = session_with(&["terminal"], path.clone());

        assert!(!session.save_if_dirty().unwrap());
        assert!(!path.exists());

        session.activate(&TextLeaf::new("terminal"), "t");
        assert!(session.save_if_dirty().unwrap());
        assert!(path.exists());
        assert!(!session.save_if_dirty().unwrap());

        let reloaded = LearningRegister::load(&path);
        assert!(reloaded.get_score(&TextLeaf::new("terminal"), "t") > 0.0);
    }

    #[tokio::test]
    async fn test_events() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut session =
            session_with(&["terminal"], dir.path().join("r.json")).with_events(tx);

        session.search("ter");
        session.activate(&TextLeaf::new("terminal"), "ter");
        session.save().unwrap();

        match rx.recv().await.unwrap() {
            SessionEvent::Results { key, first } => {
                assert_eq!(key, "ter");
                assert_eq!(first.unwrap().display, "terminal");
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(matches!(
            rx.recv().await.unwrap(),
            SessionEvent::Activated { ref object, .. } if object == "text:terminal"
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            SessionEvent::Saved { entries: 1, .. }
        ));
    }

    #[tokio::test]
    async fn test_save_failure_event() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the register file should go makes the rename fail
        let path = dir.path().join("r.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut session = session_with(&[], path).with_events(tx);
        assert!(session.save().is_err());
        assert!(matches!(
            rx.recv().await.unwrap(),
            SessionEvent::SaveFailed { .. }
        ));
    }

    #[test]
    fn test_rescan_resets_cache() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with(&["terminal"], dir.path().join("r.json"));
        session.search("t");
        assert_eq!(session.rescan(), 0);
        assert_eq!(session.search("te").matches().count(), 1);
    }
}
