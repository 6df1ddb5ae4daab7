#![forbid(unsafe_code)]

//! Input dispatch for tvnav.
//!
//! The [`InputLayer`] holds button, delegated-list and raw key handlers; the
//! [`Navigator`] combines it with a [`FocusEngine`](tvnav_focus::FocusEngine)
//! and a [`KeyMap`](tvnav_core::KeyMap) so the host only has to forward key
//! codes to [`Navigator::handle_key`].

pub mod binding;
pub mod dispatcher;
pub mod layer;

pub use binding::{ButtonHandler, DelegatedHandler, ItemTarget, KeyHandler};
pub use dispatcher::{DispatchOutcome, Navigator, Route};
pub use layer::{Activation, InputLayer};
