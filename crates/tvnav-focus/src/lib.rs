#![forbid(unsafe_code)]

//! Focus navigation for remote-control driven menus.
//!
//! A screen is split into named menus, each an ordered list of items laid out
//! horizontally or vertically. Exactly one menu is active at a time and its
//! focused item carries the focus marker. Directional actions move focus
//! within the active menu or hop to a neighboring menu along the
//! previous/next edges configured at registration.
//!
//! ```
//! use tvnav_core::NavAction;
//! use tvnav_focus::{Alignment, FocusEngine, MenuConfig, SharedItems};
//!
//! let mut engine = FocusEngine::new();
//! engine.register_menu(
//!     MenuConfig::new("List", SharedItems::from_keys(["a", "b", "c"]))
//!         .with_alignment(Alignment::Vertical),
//! );
//! engine.handle_action(NavAction::Down);
//! assert!(engine.is_focus_marked("List", "b"));
//! ```

pub mod command;
pub mod engine;
pub mod event;
pub mod items;
pub mod menu;

pub use command::NavCmd;
pub use engine::{FocusEngine, MenuHandle};
pub use event::{Edge, NavEvent};
pub use items::{ItemKey, ItemSource, SharedItems};
pub use menu::{Alignment, DirectionMap, ItemRef, Menu, MenuConfig, MenuOp};
