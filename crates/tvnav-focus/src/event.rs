#![forbid(unsafe_code)]

//! Events recorded by the focus engine for the view layer.

/// Which end of a menu was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    First,
    Last,
}

/// Focus change events, drained with `FocusEngine::take_events`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    MenuRegistered {
        name: String,
    },
    MenuUnregistered {
        name: String,
    },
    ActiveMenuChanged {
        from: Option<String>,
        to: Option<String>,
    },
    /// Focused index changed. A menu transfer that syncs the index reports
    /// it after `ActiveMenuChanged`.
    FocusMoved {
        menu: String,
        from: usize,
        to: usize,
    },
    /// A step was requested past `edge`; focus did not move.
    BoundaryReached {
        menu: String,
        edge: Edge,
    },
    ItemSelected {
        menu: String,
        index: usize,
    },
}

impl NavEvent {
    /// Name of the menu the event concerns (the target for menu changes).
    #[must_use]
    pub fn menu(&self) -> Option<&str> {
        match self {
            Self::MenuRegistered { name } | Self::MenuUnregistered { name } => Some(name),
            Self::ActiveMenuChanged { to, .. } => to.as_deref(),
            Self::FocusMoved { menu, .. }
            | Self::BoundaryReached { menu, .. }
            | Self::ItemSelected { menu, .. } => Some(menu),
        }
    }
}
