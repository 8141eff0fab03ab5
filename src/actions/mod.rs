//! Built-in actions
//!
//! Actions are objects too: they are ranked against the query, learn from
//! use, and pick up the correlation bonus when they are the remembered
//! choice for a leaf.

use crate::objects::{Object, ObjectKind, ObjectRef};
use std::fmt;
use std::sync::Arc;

/// Key prefix shared by every action
pub const ACTION_KEY_PREFIX: &str = "action:";

/// Something that can be done to a leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Open,
    RevealInFolder,
    CopyPath,
    LaunchAgain,
    MoveToTrash,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Open,
        Action::RevealInFolder,
        Action::CopyPath,
        Action::LaunchAgain,
        Action::MoveToTrash,
    ];

    /// Stable id, the part of the key after `action:`
    pub fn id(self) -> &'static str {
        match self {
            Action::Open => "open",
            Action::RevealInFolder => "reveal",
            Action::CopyPath => "copy-path",
            Action::LaunchAgain => "launch-again",
            Action::MoveToTrash => "trash",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Open => "Open",
            Action::RevealInFolder => "Reveal in Folder",
            Action::CopyPath => "Copy Path",
            Action::LaunchAgain => "Launch Again",
            Action::MoveToTrash => "Move to Trash",
        }
    }

    /// Look an action up by its object key
    pub fn from_key(key: &str) -> Option<Action> {
        let id = key.strip_prefix(ACTION_KEY_PREFIX)?;
        Self::ALL.into_iter().find(|a| a.id() == id)
    }

    /// Whether the action makes sense for objects of `kind`
    pub fn applies_to(self, kind: ObjectKind) -> bool {
        let on_disk = matches!(kind, ObjectKind::File | ObjectKind::Directory);
        match self {
            Action::Open => kind != ObjectKind::Action,
            Action::RevealInFolder | Action::MoveToTrash => on_disk,
            Action::CopyPath => on_disk || kind == ObjectKind::Url,
            Action::LaunchAgain => kind == ObjectKind::Application,
        }
    }

    /// One-line description of performing the action on `leaf`
    pub fn describe(self, leaf: &dyn Object) -> String {
        let target = leaf.description().unwrap_or_else(|| leaf.display());
        format!("{}: {}", self.name(), target)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Object for Action {
    fn key(&self) -> String {
        format!("{}{}", ACTION_KEY_PREFIX, self.id())
    }

    fn display(&self) -> String {
        self.name().to_string()
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Action
    }

    fn aliases(&self) -> Vec<String> {
        match self {
            Action::RevealInFolder => vec!["show".to_string()],
            Action::MoveToTrash => vec!["delete".to_string()],
            Action::LaunchAgain => vec!["new window".to_string()],
            _ => vec![],
        }
    }

    fn rank_adjust(&self) -> i32 {
        match self {
            Action::Open => 5,
            Action::RevealInFolder | Action::CopyPath => 0,
            Action::LaunchAgain => -5,
            Action::MoveToTrash => -10,
        }
    }
}

/// Every built-in action as an object
pub fn builtin_actions() -> Vec<ObjectRef> {
    Action::ALL
        .into_iter()
        .map(|a| Arc::new(a) as ObjectRef)
        .collect()
}

/// Admission check for the action pane of a leaf of `kind`
pub fn applies_to(kind: ObjectKind) -> impl Fn(&ObjectRef) -> bool {
    move |obj| Action::from_key(&obj.key()).map_or(false, |a| a.applies_to(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::from_key(&action.key()), Some(action));
        }
        assert_eq!(Action::from_key("action:launch-again"), Some(Action::LaunchAgain));
        assert_eq!(Action::from_key("file:/tmp"), None);
        assert_eq!(Action::from_key("action:nope"), None);
    }

    #[test]
    fn test_applies_to() {
        assert!(Action::Open.applies_to(ObjectKind::Url));
        assert!(!Action::Open.applies_to(ObjectKind::Action));
        assert!(Action::MoveToTrash.applies_to(ObjectKind::File));
        assert!(!Action::MoveToTrash.applies_to(ObjectKind::Url));
        assert!(Action::LaunchAgain.applies_to(ObjectKind::Application));
        assert!(!Action::LaunchAgain.applies_to(ObjectKind::File));
        assert!(Action::CopyPath.applies_to(ObjectKind::Url));
        assert!(!Action::CopyPath.applies_to(ObjectKind::Text));
    }

    #[test]
    fn test_check_filters_pane() {
        let check = applies_to(ObjectKind::Text);
        let allowed: Vec<String> = builtin_actions()
            .into_iter()
            .filter(|a| check(a))
            .map(|a| a.key())
            .collect();
        assert_eq!(allowed, vec!["action:open"]);
    }

    #[test]
    fn test_rank_adjust_order() {
        let adjusts: Vec<i32> = Action::ALL.iter().map(|a| a.rank_adjust()).collect();
        assert_eq!(adjusts, vec![5, 0, 0, -5, -10]);
    }
}
