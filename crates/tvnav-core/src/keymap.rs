#![forbid(unsafe_code)]

//! Raw key code to [`RemoteKey`] lookup.
//!
//! # Invariants
//!
//! 1. A key code maps to at most one remote key.
//! 2. Several codes may map to the same remote key (e.g. two activation
//!    codes on different remote models).
//! 3. Lookups of unbound codes return `None`; they never fall back to a
//!    default key.

use rustc_hash::FxHashMap;

use crate::config::ConfigError;
use crate::key::{KeyCode, NavAction, RemoteKey};

/// One raw code bound to a remote key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub key: RemoteKey,
}

impl KeyBinding {
    #[must_use]
    pub const fn new(code: u32, key: RemoteKey) -> Self {
        Self {
            code: KeyCode(code),
            key,
        }
    }
}

/// Default television remote layout.
const TELEVISION_BINDINGS: [KeyBinding; 22] = [
    KeyBinding::new(37, RemoteKey::Left),
    KeyBinding::new(38, RemoteKey::Up),
    KeyBinding::new(39, RemoteKey::Right),
    KeyBinding::new(40, RemoteKey::Down),
    KeyBinding::new(13, RemoteKey::Enter),
    KeyBinding::new(10009, RemoteKey::Return),
    KeyBinding::new(10252, RemoteKey::MediaPlayPause),
    KeyBinding::new(415, RemoteKey::MediaPlay),
    KeyBinding::new(19, RemoteKey::MediaPause),
    KeyBinding::new(413, RemoteKey::MediaStop),
    KeyBinding::new(417, RemoteKey::MediaFastForward),
    KeyBinding::new(412, RemoteKey::MediaRewind),
    KeyBinding::new(48, RemoteKey::Digit(0)),
    KeyBinding::new(49, RemoteKey::Digit(1)),
    KeyBinding::new(50, RemoteKey::Digit(2)),
    KeyBinding::new(51, RemoteKey::Digit(3)),
    KeyBinding::new(52, RemoteKey::Digit(4)),
    KeyBinding::new(53, RemoteKey::Digit(5)),
    KeyBinding::new(54, RemoteKey::Digit(6)),
    KeyBinding::new(55, RemoteKey::Digit(7)),
    KeyBinding::new(56, RemoteKey::Digit(8)),
    KeyBinding::new(57, RemoteKey::Digit(9)),
];

/// Mapping from raw key codes to remote keys.
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    by_code: FxHashMap<KeyCode, RemoteKey>,
}

impl KeyMap {
    /// Create an empty key map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The default television remote layout.
    #[must_use]
    pub fn television() -> Self {
        let mut map = Self::new();
        for binding in TELEVISION_BINDINGS {
            map.by_code.insert(binding.code, binding.key);
        }
        map
    }

    /// The bindings of [`KeyMap::television`].
    #[must_use]
    pub fn television_bindings() -> &'static [KeyBinding] {
        &TELEVISION_BINDINGS
    }

    /// Build a key map, rejecting codes bound twice.
    pub fn from_bindings(
        bindings: impl IntoIterator<Item = KeyBinding>,
    ) -> Result<Self, ConfigError> {
        let mut map = Self::new();
        for binding in bindings {
            if let Some(existing) = map.by_code.get(&binding.code) {
                return Err(ConfigError::DuplicateCode {
                    code: binding.code,
                    first: *existing,
                    second: binding.key,
                });
            }
            map.by_code.insert(binding.code, binding.key);
        }
        Ok(map)
    }

    /// Bind (or rebind) a code. Returns the key previously bound to it.
    pub fn bind(&mut self, code: KeyCode, key: RemoteKey) -> Option<RemoteKey> {
        self.by_code.insert(code, key)
    }

    /// Remove a binding.
    pub fn unbind(&mut self, code: KeyCode) -> Option<RemoteKey> {
        self.by_code.remove(&code)
    }

    /// Remote key bound to `code`.
    #[inline]
    #[must_use]
    pub fn lookup(&self, code: KeyCode) -> Option<RemoteKey> {
        self.by_code.get(&code).copied()
    }

    /// Navigation action bound to `code`.
    #[must_use]
    pub fn action(&self, code: KeyCode) -> Option<NavAction> {
        self.lookup(code).and_then(RemoteKey::nav_action)
    }

    /// Whether `code` is an activation key.
    #[must_use]
    pub fn is_activation(&self, code: KeyCode) -> bool {
        self.lookup(code).is_some_and(RemoteKey::is_activation)
    }

    /// Lowest code bound to `key`.
    #[must_use]
    pub fn code_for(&self, key: RemoteKey) -> Option<KeyCode> {
        self.by_code
            .iter()
            .filter(|(_, bound)| **bound == key)
            .map(|(code, _)| *code)
            .min()
    }

    /// All bindings, ordered by code.
    #[must_use]
    pub fn bindings(&self) -> Vec<KeyBinding> {
        let mut out: Vec<_> = self
            .by_code
            .iter()
            .map(|(code, key)| KeyBinding {
                code: *code,
                key: *key,
            })
            .collect();
        out.sort_by_key(|b| b.code);
        out
    }

    /// Number of bound codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}
