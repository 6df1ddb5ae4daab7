#![forbid(unsafe_code)]

//! Handler bindings held by the [`InputLayer`](crate::InputLayer).

use tvnav_core::KeyCode;
use tvnav_focus::{ItemKey, ItemRef, NavCmd};

/// Handler for a directly bound button; receives the activating key code.
pub type ButtonHandler = Box<dyn FnMut(KeyCode) -> NavCmd>;

/// Handler for a delegated list; receives the focused child.
pub type DelegatedHandler = Box<dyn FnMut(&ItemRef) -> NavCmd>;

/// Handler for a raw key code.
pub type KeyHandler = Box<dyn FnMut(KeyCode) -> NavCmd>;

/// Locates one item: the menu it belongs to and its key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemTarget {
    pub menu: String,
    pub key: ItemKey,
}

impl ItemTarget {
    #[must_use]
    pub fn new(menu: impl Into<String>, key: impl Into<ItemKey>) -> Self {
        Self {
            menu: menu.into(),
            key: key.into(),
        }
    }
}

impl std::fmt::Display for ItemTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.menu, self.key)
    }
}

pub(crate) struct ButtonBinding {
    pub(crate) target: ItemTarget,
    pub(crate) handler: ButtonHandler,
}

pub(crate) struct DelegatedGroup {
    pub(crate) container: String,
    pub(crate) handler: DelegatedHandler,
}

pub(crate) struct KeyHandlerBinding {
    pub(crate) code: KeyCode,
    pub(crate) handler: KeyHandler,
}
