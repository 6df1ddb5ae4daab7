#![forbid(unsafe_code)]

//! Core: remote-control keys, key maps, item markers, and host input.
//!
//! # Role in tvnav
//! `tvnav-core` is the input vocabulary shared by the focus engine
//! (`tvnav-focus`) and the dispatch layer (`tvnav-input`). It knows nothing
//! about menus; it only names keys, maps raw key codes onto them, and
//! describes the per-item marker flags the engine toggles.
//!
//! # Primary responsibilities
//! - **KeyCode / RemoteKey / NavAction**: raw codes, semantic keys, and the
//!   navigation subset the focus engine understands.
//! - **KeyMap**: raw code to semantic key lookup, built from [`NavConfig`].
//! - **Marks**: the `FOCUSED` / `SELECTED` flag pair owned per item.
//! - **HostInput**: one-time registration of keys the host only delivers on
//!   request (media keys, digits).
//! - **logging**: optional subscriber setup from the environment.

pub mod config;
pub mod host;
pub mod key;
pub mod keymap;
pub mod logging;
pub mod marks;

pub use config::{BindingEntry, ConfigError, NavConfig};
pub use host::{HostInput, HostKeyError, NullHost};
pub use key::{KeyCode, NavAction, RemoteKey};
pub use keymap::{KeyBinding, KeyMap};
pub use marks::Marks;
