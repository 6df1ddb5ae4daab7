#![forbid(unsafe_code)]

//! Commands returned by lifecycle hooks and input handlers.
//!
//! Hooks run while the engine is in the middle of an operation, so they
//! cannot call back into it. Instead they return a [`NavCmd`] describing what
//! should happen next; the engine applies it once the hook has returned.

/// A deferred change to the focus engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NavCmd {
    /// No operation.
    #[default]
    None,
    /// Make `name` the active menu, optionally focusing `index`.
    ChangeActiveMenu { name: String, index: Option<usize> },
    /// Open the focus engine gate.
    Enable,
    /// Close the focus engine gate.
    Disable,
    /// Remove a menu.
    Unregister(String),
    /// Point `menu`'s previous edge at `target` (or clear it).
    SetPreviousMenu { menu: String, target: Option<String> },
    /// Point `menu`'s next edge at `target` (or clear it).
    SetNextMenu { menu: String, target: Option<String> },
    /// Apply commands in order.
    Batch(Vec<NavCmd>),
}

impl NavCmd {
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::None
    }

    /// Switch the active menu.
    #[must_use]
    pub fn change_active_menu(name: impl Into<String>) -> Self {
        Self::ChangeActiveMenu {
            name: name.into(),
            index: None,
        }
    }

    /// Switch the active menu and focus `index` in it.
    #[must_use]
    pub fn change_active_menu_at(name: impl Into<String>, index: usize) -> Self {
        Self::ChangeActiveMenu {
            name: name.into(),
            index: Some(index),
        }
    }

    /// Combine commands, dropping no-ops and flattening single entries.
    #[must_use]
    pub fn batch(cmds: Vec<NavCmd>) -> Self {
        let mut cmds: Vec<_> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.remove(0),
            _ => Self::Batch(cmds),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
