#![forbid(unsafe_code)]

//! Menu definitions: configuration, lifecycle hooks and per-item markers.
//!
//! A [`Menu`] is created from a [`MenuConfig`] when it is registered with the
//! [`FocusEngine`](crate::FocusEngine). The engine keeps one [`Marks`] entry
//! per item and resizes that vector whenever it notices the item source
//! changed length.
//!
//! # Invariants
//!
//! 1. `focused < len` whenever the menu is non-empty (re-clamped on every
//!    engine entry point).
//! 2. Only the active menu carries `FOCUSED` marks, and at most one.
//! 3. `SELECTED` is only set when `selection_visible` is true.

use tvnav_core::{Marks, NavAction};

use crate::command::NavCmd;
use crate::items::{ItemKey, ItemSource};

/// Axis along which a menu lays out its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    /// Left/Right move between items, Up/Down between menus.
    #[default]
    Horizontal,
    /// Up/Down move between items, Left/Right between menus.
    Vertical,
}

/// Engine operation a navigation action resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuOp {
    PreviousItem,
    NextItem,
    PreviousMenu,
    NextMenu,
    Enter,
    Return,
}

/// Direction routing table, fixed when the menu is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionMap {
    pub left: MenuOp,
    pub right: MenuOp,
    pub up: MenuOp,
    pub down: MenuOp,
}

impl DirectionMap {
    #[must_use]
    pub const fn for_alignment(alignment: Alignment) -> Self {
        match alignment {
            Alignment::Horizontal => Self {
                left: MenuOp::PreviousItem,
                right: MenuOp::NextItem,
                up: MenuOp::PreviousMenu,
                down: MenuOp::NextMenu,
            },
            Alignment::Vertical => Self {
                left: MenuOp::PreviousMenu,
                right: MenuOp::NextMenu,
                up: MenuOp::PreviousItem,
                down: MenuOp::NextItem,
            },
        }
    }

    #[must_use]
    pub const fn route(&self, action: NavAction) -> MenuOp {
        match action {
            NavAction::Left => self.left,
            NavAction::Right => self.right,
            NavAction::Up => self.up,
            NavAction::Down => self.down,
            NavAction::Enter => MenuOp::Enter,
            NavAction::Return => MenuOp::Return,
        }
    }
}

/// The item a hook is told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRef {
    pub index: usize,
    pub key: ItemKey,
}

pub type ItemHook = Box<dyn FnMut(&ItemRef) -> NavCmd>;
pub type MenuHook = Box<dyn FnMut() -> NavCmd>;

fn noop_item() -> ItemHook {
    Box::new(|_| NavCmd::None)
}

fn noop() -> MenuHook {
    Box::new(|| NavCmd::None)
}

/// Lifecycle callbacks. Every hook defaults to a no-op.
pub struct MenuHooks {
    pub(crate) on_active_item_changed: ItemHook,
    pub(crate) on_before_first_item: MenuHook,
    pub(crate) on_after_last_item: MenuHook,
    pub(crate) on_previous_menu: MenuHook,
    pub(crate) on_next_menu: MenuHook,
    pub(crate) on_return: MenuHook,
}

impl Default for MenuHooks {
    fn default() -> Self {
        Self {
            on_active_item_changed: noop_item(),
            on_before_first_item: noop(),
            on_after_last_item: noop(),
            on_previous_menu: noop(),
            on_next_menu: noop(),
            on_return: noop(),
        }
    }
}

impl std::fmt::Debug for MenuHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MenuHooks { .. }")
    }
}

/// Registration record for a menu.
///
/// ```
/// use tvnav_focus::{Alignment, MenuConfig, NavCmd, SharedItems};
///
/// let config = MenuConfig::new("Basic", SharedItems::from_keys(["play", "stop"]))
///     .with_alignment(Alignment::Horizontal)
///     .with_next_menu("Logs")
///     .with_selection_visible(true)
///     .on_after_last_item(|| NavCmd::change_active_menu("Logs"));
/// assert_eq!(config.name(), "Basic");
/// ```
pub struct MenuConfig {
    name: String,
    alignment: Alignment,
    previous_menu: Option<String>,
    next_menu: Option<String>,
    sync_with: Option<String>,
    selection_visible: bool,
    items: Box<dyn ItemSource>,
    hooks: MenuHooks,
}

impl MenuConfig {
    #[must_use]
    pub fn new(name: impl Into<String>, items: impl ItemSource + 'static) -> Self {
        Self {
            name: name.into(),
            alignment: Alignment::default(),
            previous_menu: None,
            next_menu: None,
            sync_with: None,
            selection_visible: false,
            items: Box::new(items),
            hooks: MenuHooks::default(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    #[must_use]
    pub fn with_previous_menu(mut self, name: impl Into<String>) -> Self {
        self.previous_menu = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_next_menu(mut self, name: impl Into<String>) -> Self {
        self.next_menu = Some(name.into());
        self
    }

    /// Copy the focused index from `name` when entering this menu from it.
    #[must_use]
    pub fn with_sync_with(mut self, name: impl Into<String>) -> Self {
        self.sync_with = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_selection_visible(mut self, visible: bool) -> Self {
        self.selection_visible = visible;
        self
    }

    #[must_use]
    pub fn on_active_item_changed(mut self, f: impl FnMut(&ItemRef) -> NavCmd + 'static) -> Self {
        self.hooks.on_active_item_changed = Box::new(f);
        self
    }

    #[must_use]
    pub fn on_before_first_item(mut self, f: impl FnMut() -> NavCmd + 'static) -> Self {
        self.hooks.on_before_first_item = Box::new(f);
        self
    }

    #[must_use]
    pub fn on_after_last_item(mut self, f: impl FnMut() -> NavCmd + 'static) -> Self {
        self.hooks.on_after_last_item = Box::new(f);
        self
    }

    #[must_use]
    pub fn on_previous_menu(mut self, f: impl FnMut() -> NavCmd + 'static) -> Self {
        self.hooks.on_previous_menu = Box::new(f);
        self
    }

    #[must_use]
    pub fn on_next_menu(mut self, f: impl FnMut() -> NavCmd + 'static) -> Self {
        self.hooks.on_next_menu = Box::new(f);
        self
    }

    #[must_use]
    pub fn on_return(mut self, f: impl FnMut() -> NavCmd + 'static) -> Self {
        self.hooks.on_return = Box::new(f);
        self
    }
}

impl std::fmt::Debug for MenuConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuConfig")
            .field("name", &self.name)
            .field("alignment", &self.alignment)
            .field("previous_menu", &self.previous_menu)
            .field("next_menu", &self.next_menu)
            .field("sync_with", &self.sync_with)
            .field("selection_visible", &self.selection_visible)
            .field("items", &self.items.len())
            .finish()
    }
}

/// A registered menu.
pub struct Menu {
    name: String,
    alignment: Alignment,
    pub(crate) directions: DirectionMap,
    pub(crate) previous_menu: Option<String>,
    pub(crate) next_menu: Option<String>,
    sync_with: Option<String>,
    selection_visible: bool,
    items: Box<dyn ItemSource>,
    marks: Vec<Marks>,
    pub(crate) focused: usize,
    selected: usize,
    pub(crate) hooks: MenuHooks,
}

impl Menu {
    pub(crate) fn from_config(config: MenuConfig) -> Self {
        let mut menu = Self {
            directions: DirectionMap::for_alignment(config.alignment),
            name: config.name,
            alignment: config.alignment,
            previous_menu: config.previous_menu,
            next_menu: config.next_menu,
            sync_with: config.sync_with,
            selection_visible: config.selection_visible,
            items: config.items,
            marks: Vec::new(),
            focused: 0,
            selected: 0,
            hooks: config.hooks,
        };
        menu.sync_len();
        menu
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    #[must_use]
    pub fn directions(&self) -> DirectionMap {
        self.directions
    }

    #[must_use]
    pub fn previous_menu(&self) -> Option<&str> {
        self.previous_menu.as_deref()
    }

    #[must_use]
    pub fn next_menu(&self) -> Option<&str> {
        self.next_menu.as_deref()
    }

    #[must_use]
    pub fn sync_with(&self) -> Option<&str> {
        self.sync_with.as_deref()
    }

    #[must_use]
    pub fn selection_visible(&self) -> bool {
        self.selection_visible
    }

    /// Live item count, read from the item source.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Focused index clamped to the live item count; `None` when empty.
    #[must_use]
    pub fn focused_index(&self) -> Option<usize> {
        let len = self.len();
        (len > 0).then(|| self.focused.min(len - 1))
    }

    /// Last confirmed index, clamped to the live item count. Independent of
    /// focus and of whether the item still carries the selection marker.
    /// `None` without `selection_visible` or when empty.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        let len = self.len();
        (self.selection_visible && len > 0).then(|| self.selected.min(len - 1))
    }

    #[must_use]
    pub fn item_key(&self, index: usize) -> Option<ItemKey> {
        self.items.key(index)
    }

    #[must_use]
    pub fn position(&self, key: &str) -> Option<usize> {
        self.items.position(key)
    }

    /// Key of the focused item.
    #[must_use]
    pub fn focused_item(&self) -> Option<ItemRef> {
        let index = self.focused_index()?;
        Some(self.item_ref(index))
    }

    /// Markers on item `index`. Items past the live end carry none.
    #[must_use]
    pub fn marks(&self, index: usize) -> Marks {
        if index >= self.len() {
            return Marks::empty();
        }
        self.marks.get(index).copied().unwrap_or_default()
    }

    /// Number of live items carrying the focus marker.
    #[must_use]
    pub fn focus_marked_count(&self) -> usize {
        (0..self.len()).filter(|&i| self.marks(i).is_focused()).count()
    }

    /// First live item carrying the focus marker.
    #[must_use]
    pub fn first_focus_marked(&self) -> Option<ItemRef> {
        (0..self.len())
            .find(|&i| self.marks(i).is_focused())
            .map(|i| self.item_ref(i))
    }

    pub(crate) fn item_ref(&self, index: usize) -> ItemRef {
        ItemRef {
            index,
            key: self.items.key(index).unwrap_or_default(),
        }
    }

    // ========================================================================
    // Engine-side bookkeeping
    // ========================================================================

    /// Resize markers to the live item count and clamp `focused`.
    /// Returns the live length.
    pub(crate) fn sync_len(&mut self) -> usize {
        let len = self.items.len();
        self.marks.resize(len, Marks::empty());
        self.focused = if len == 0 { 0 } else { self.focused.min(len - 1) };
        len
    }

    pub(crate) fn clamp(&self, index: usize) -> usize {
        index.min(self.marks.len().saturating_sub(1))
    }

    pub(crate) fn mark_focus(&mut self) {
        if let Some(mark) = self.marks.get_mut(self.focused) {
            mark.insert(Marks::FOCUSED);
        }
    }

    pub(crate) fn unmark_focus(&mut self) {
        for mark in &mut self.marks {
            mark.remove(Marks::FOCUSED);
        }
    }

    /// Restore "exactly one focus marker, on `focused`" for the active menu.
    pub(crate) fn reconcile_focus(&mut self) {
        if self.marks.is_empty() {
            return;
        }
        let marked = self.marks.iter().filter(|m| m.is_focused()).count();
        if marked != 1 || !self.marks[self.focused].is_focused() {
            self.unmark_focus();
            self.mark_focus();
        }
    }

    /// Drop the selection marker when focus has moved off the selected item.
    pub(crate) fn clear_stale_selection(&mut self) {
        if self.focused == self.selected {
            return;
        }
        if let Some(mark) = self.marks.get_mut(self.selected) {
            mark.remove(Marks::SELECTED);
        }
    }

    /// Move the selection marker to the focused item.
    pub(crate) fn select_focused(&mut self) {
        if let Some(mark) = self.marks.get_mut(self.selected) {
            mark.remove(Marks::SELECTED);
        }
        self.selected = self.focused;
        if let Some(mark) = self.marks.get_mut(self.selected) {
            mark.insert(Marks::SELECTED);
        }
    }

    pub(crate) fn set_previous(&mut self, target: Option<String>) {
        self.previous_menu = target;
    }

    pub(crate) fn set_next(&mut self, target: Option<String>) {
        self.next_menu = target;
    }
}

impl std::fmt::Debug for Menu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Menu")
            .field("name", &self.name)
            .field("alignment", &self.alignment)
            .field("previous_menu", &self.previous_menu)
            .field("next_menu", &self.next_menu)
            .field("sync_with", &self.sync_with)
            .field("selection_visible", &self.selection_visible)
            .field("marks", &self.marks)
            .field("focused", &self.focused)
            .field("selected", &self.selected)
            .finish()
    }
}
