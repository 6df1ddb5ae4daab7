#![forbid(unsafe_code)]

//! Key vocabulary for remote-control input.
//!
//! Three layers, from raw to semantic:
//!
//! 1. [`KeyCode`]: the numeric code the host delivers with a key event.
//! 2. [`RemoteKey`]: what the button on the remote means.
//! 3. [`NavAction`]: the subset of keys the focus engine routes.
//!
//! Media keys and digits have no [`NavAction`]; they reach the application
//! only through raw key handlers, and the host must be asked to deliver them
//! first (see [`RemoteKey::host_name`]).

use serde::{Deserialize, Serialize};

/// Raw key code as delivered by the host input subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u32);

impl KeyCode {
    /// Create a key code.
    #[must_use]
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    /// The numeric value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for KeyCode {
    fn from(code: u32) -> Self {
        Self(code)
    }
}

impl std::fmt::Display for KeyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A button on the remote control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteKey {
    Left,
    Up,
    Right,
    Down,
    /// Activation ("OK") key.
    Enter,
    /// Back key.
    Return,
    MediaPlayPause,
    MediaPlay,
    MediaPause,
    MediaStop,
    MediaFastForward,
    MediaRewind,
    /// Number key `0..=9`.
    Digit(u8),
}

impl RemoteKey {
    /// The navigation action this key drives, if any.
    #[must_use]
    pub const fn nav_action(self) -> Option<NavAction> {
        match self {
            Self::Left => Some(NavAction::Left),
            Self::Up => Some(NavAction::Up),
            Self::Right => Some(NavAction::Right),
            Self::Down => Some(NavAction::Down),
            Self::Enter => Some(NavAction::Enter),
            Self::Return => Some(NavAction::Return),
            _ => None,
        }
    }

    /// True for the activation key.
    #[must_use]
    pub const fn is_activation(self) -> bool {
        matches!(self, Self::Enter)
    }

    /// Name under which the host must register this key before delivering it.
    ///
    /// Directional keys, Enter and Return are always delivered and need no
    /// registration.
    #[must_use]
    pub fn host_name(self) -> Option<String> {
        let name = match self {
            Self::MediaPlayPause => "MediaPlayPause",
            Self::MediaPlay => "MediaPlay",
            Self::MediaPause => "MediaPause",
            Self::MediaStop => "MediaStop",
            Self::MediaFastForward => "MediaFastForward",
            Self::MediaRewind => "MediaRewind",
            Self::Digit(d) if d <= 9 => return Some(d.to_string()),
            _ => return None,
        };
        Some(name.to_string())
    }
}

/// Semantic navigation action consumed by the focus engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavAction {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Return,
}
