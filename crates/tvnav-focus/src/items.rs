#![forbid(unsafe_code)]

//! Item sources: the view layer's side of a menu.
//!
//! The engine never owns the items of a menu. It asks an [`ItemSource`] for
//! the current count and keys every time it needs them, so the view layer can
//! add or remove items between key presses.

use std::cell::RefCell;
use std::rc::Rc;

/// Identifier of one item within a menu (e.g. `"play"`, `"log-17"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey(String);

impl ItemKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for ItemKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl std::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, dynamically sized sequence of focusable items.
pub trait ItemSource {
    /// Current number of items.
    fn len(&self) -> usize;

    /// Key of the item at `index`, or `None` past the end.
    fn key(&self, index: usize) -> Option<ItemKey>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the first item whose key equals `key`.
    fn position(&self, key: &str) -> Option<usize> {
        (0..self.len()).find(|&i| self.key(i).is_some_and(|k| k.as_str() == key))
    }
}

impl ItemSource for Vec<ItemKey> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn key(&self, index: usize) -> Option<ItemKey> {
        self.get(index).cloned()
    }
}

/// Item list shared between the view layer and a registered menu.
///
/// Clones share storage: register one clone with the engine and keep the
/// other to add or remove items later.
#[derive(Debug, Clone, Default)]
pub struct SharedItems {
    inner: Rc<RefCell<Vec<ItemKey>>>,
}

impl SharedItems {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list from keys.
    #[must_use]
    pub fn from_keys<K: Into<ItemKey>>(keys: impl IntoIterator<Item = K>) -> Self {
        let items = keys.into_iter().map(Into::into).collect();
        Self {
            inner: Rc::new(RefCell::new(items)),
        }
    }

    /// Append an item.
    pub fn push(&self, key: impl Into<ItemKey>) {
        self.inner.borrow_mut().push(key.into());
    }

    /// Insert an item at `index` (clamped to the end).
    pub fn insert(&self, index: usize, key: impl Into<ItemKey>) {
        let mut items = self.inner.borrow_mut();
        let index = index.min(items.len());
        items.insert(index, key.into());
    }

    /// Remove the first item with `key`. Returns whether one was removed.
    pub fn remove(&self, key: &str) -> bool {
        let mut items = self.inner.borrow_mut();
        match items.iter().position(|k| k.as_str() == key) {
            Some(pos) => {
                items.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Replace every item.
    pub fn set<K: Into<ItemKey>>(&self, keys: impl IntoIterator<Item = K>) {
        *self.inner.borrow_mut() = keys.into_iter().map(Into::into).collect();
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }

    /// Snapshot of the current keys.
    #[must_use]
    pub fn keys(&self) -> Vec<ItemKey> {
        self.inner.borrow().clone()
    }
}

impl ItemSource for SharedItems {
    fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    fn key(&self, index: usize) -> Option<ItemKey> {
        self.inner.borrow().get(index).cloned()
    }
}
