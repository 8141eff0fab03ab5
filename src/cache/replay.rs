//! Materialize-once, replay-many sequences

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

struct Inner<'a, T> {
    items: Vec<T>,
    source: Option<Box<dyn Iterator<Item = T> + 'a>>,
}

/// A lazily filled buffer over an iterator.
///
/// Items are pulled from the underlying iterator only when some cursor walks
/// past the end of what has been buffered so far; every pulled item is kept,
/// so any number of [`Cursor`]s can traverse the sequence independently
/// without the iterator running twice. Cloning the buffer shares storage.
pub struct ReplayBuffer<'a, T> {
    inner: Rc<RefCell<Inner<'a, T>>>,
}

impl<'a, T: Clone> ReplayBuffer<'a, T> {
    /// Wrap an iterator
    pub fn new<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                items: Vec::new(),
                source: Some(Box::new(iter.into_iter())),
            })),
        }
    }

    /// A buffer with nothing in it
    pub fn empty() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                items: Vec::new(),
                source: None,
            })),
        }
    }

    /// A new cursor positioned at the start
    pub fn cursor(&self) -> Cursor<'a, T> {
        Cursor {
            buffer: self.clone(),
            position: 0,
        }
    }

    /// Item at `index`, pulling from the source as needed
    pub fn get(&self, index: usize) -> Option<T> {
        let mut inner = self.inner.borrow_mut();
        while inner.items.len() <= index {
            let next = inner.source.as_mut().and_then(|source| source.next());
            match next {
                Some(item) => inner.items.push(item),
                None => {
                    inner.source = None;
                    return None;
                }
            }
        }
        Some(inner.items[index].clone())
    }

    /// Number of items pulled so far
    pub fn buffered(&self) -> usize {
        self.inner.borrow().items.len()
    }

    /// Whether the underlying iterator has been drained
    pub fn is_exhausted(&self) -> bool {
        self.inner.borrow().source.is_none()
    }
}

impl<T> Clone for ReplayBuffer<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for ReplayBuffer<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ReplayBuffer")
            .field("buffered", &inner.items.len())
            .field("exhausted", &inner.source.is_none())
            .finish()
    }
}

/// Independent read position into a [`ReplayBuffer`]
#[derive(Debug, Clone)]
pub struct Cursor<'a, T> {
    buffer: ReplayBuffer<'a, T>,
    position: usize,
}

impl<T: Clone> Cursor<'_, T> {
    /// Index of the next item
    pub fn position(&self) -> usize {
        self.position
    }
}

impl<T: Clone> Iterator for Cursor<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let item = self.buffer.get(self.position)?;
        self.position += 1;
        Some(item)
    }
}
