//! In-memory catalog source

use crate::objects::{Leaves, ObjectRef, Source};

/// A fixed list of objects
#[derive(Debug, Clone)]
pub struct ListSource {
    id: String,
    items: Vec<ObjectRef>,
}

impl ListSource {
    pub fn new(id: impl Into<String>, items: Vec<ObjectRef>) -> Self {
        Self {
            id: id.into(),
            items,
        }
    }

    pub fn push(&mut self, item: ObjectRef) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Source for ListSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn leaves(&self) -> Leaves {
        Box::new(self.items.clone().into_iter())
    }
}
