#![forbid(unsafe_code)]

//! Focus engine: menu registry, active-menu tracking and directional moves.
//!
//! The engine owns every registered [`Menu`] and the name of the active one.
//! Navigation actions are routed through the active menu's [`DirectionMap`]
//! to one of six operations (previous/next item, previous/next menu, enter,
//! return). Lifecycle hooks fire synchronously inside those operations and
//! return a [`NavCmd`] that the engine applies after the hook returns.
//!
//! # Invariants
//!
//! 1. At most one menu is active.
//! 2. After any public operation, the active menu (when non-empty) carries
//!    exactly one focus marker, on its focused index; every other menu
//!    carries none.
//! 3. Removing a menu clears every previous/next edge that pointed at it.
//! 4. A menu transfer never lands on an empty or unregistered menu.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Action while disabled | Ignored, `handle_action` returns `false` |
//! | No active menu | Every operation is a no-op |
//! | Unknown menu name | Active menu kept, debug log |
//! | Duplicate registration | Old menu replaced, warning log |
//! | Item source shrank | Focus re-clamped on next operation |

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};
use tvnav_core::NavAction;

use crate::command::NavCmd;
use crate::event::{Edge, NavEvent};
use crate::menu::{Menu, MenuConfig, MenuOp};

/// Upper bound on undrained events.
const MAX_PENDING_EVENTS: usize = 256;

/// Registry of menus plus the active-menu pointer.
#[derive(Debug)]
pub struct FocusEngine {
    menus: FxHashMap<String, Menu>,
    active: Option<String>,
    enabled: bool,
    events: VecDeque<NavEvent>,
}

impl Default for FocusEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusEngine {
    /// Create an empty, enabled engine.
    #[must_use]
    pub fn new() -> Self {
        Self {
            menus: FxHashMap::default(),
            active: None,
            enabled: true,
            events: VecDeque::new(),
        }
    }

    // ========================================================================
    // Gate
    // ========================================================================

    /// Allow [`handle_action`](Self::handle_action) to route actions.
    pub fn enable(&mut self) {
        if !self.enabled {
            debug!("focus engine enabled");
        }
        self.enabled = true;
    }

    /// Make [`handle_action`](Self::handle_action) ignore every action.
    pub fn disable(&mut self) {
        if self.enabled {
            debug!("focus engine disabled");
        }
        self.enabled = false;
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn get_menu(&self, name: &str) -> Option<&Menu> {
        self.menus.get(name)
    }

    #[must_use]
    pub fn contains_menu(&self, name: &str) -> bool {
        self.menus.contains_key(name)
    }

    #[must_use]
    pub fn active_menu(&self) -> Option<&Menu> {
        self.active.as_deref().and_then(|name| self.menus.get(name))
    }

    #[must_use]
    pub fn active_menu_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Registered menu names, sorted.
    #[must_use]
    pub fn menu_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.menus.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn menu_count(&self) -> usize {
        self.menus.len()
    }

    /// Whether the first item with `key` in `menu` carries the focus marker.
    #[must_use]
    pub fn is_focus_marked(&self, menu: &str, key: &str) -> bool {
        self.menus.get(menu).is_some_and(|m| {
            m.position(key)
                .is_some_and(|index| m.marks(index).is_focused())
        })
    }

    /// Total focus markers across every menu.
    #[must_use]
    pub fn focus_marked_count(&self) -> usize {
        self.menus.values().map(Menu::focus_marked_count).sum()
    }

    /// Events recorded since the last [`take_events`](Self::take_events).
    #[must_use]
    pub fn events(&self) -> Vec<&NavEvent> {
        self.events.iter().collect()
    }

    /// Drain recorded events.
    pub fn take_events(&mut self) -> Vec<NavEvent> {
        self.events.drain(..).collect()
    }

    fn push_event(&mut self, event: NavEvent) {
        if self.events.len() == MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a menu. Becomes active when no menu is active.
    ///
    /// Registering a name that already exists replaces the old menu.
    pub fn register_menu(&mut self, config: MenuConfig) -> MenuHandle<'_> {
        let menu = Menu::from_config(config);
        let name = menu.name().to_string();
        debug!(
            menu = %name,
            alignment = ?menu.alignment(),
            items = menu.len(),
            "registering menu"
        );
        if self.menus.insert(name.clone(), menu).is_some() {
            warn!(menu = %name, "menu re-registered; replacing previous definition");
        }
        self.push_event(NavEvent::MenuRegistered { name: name.clone() });

        if self.active.is_none() {
            self.change_active_menu(&name, None);
        } else if self.active.as_deref() == Some(name.as_str())
            && let Some(menu) = self.menus.get_mut(&name)
        {
            menu.mark_focus();
        }
        MenuHandle { engine: self, name }
    }

    /// Remove a menu. Returns `false` for unknown names.
    ///
    /// When the removed menu was active, its previous menu (else its next
    /// menu) becomes active if registered; otherwise no menu is active.
    pub fn unregister_menu(&mut self, name: &str) -> bool {
        let Some(menu) = self.menus.get(name) else {
            debug!(menu = name, "unregister of unknown menu");
            return false;
        };
        let fallback = [menu.previous_menu.clone(), menu.next_menu.clone()]
            .into_iter()
            .flatten()
            .find(|candidate| candidate != name && self.menus.contains_key(candidate));

        if self.active.as_deref() == Some(name) {
            match fallback {
                Some(target) => self.change_active_menu(&target, None),
                None => {
                    if let Some(menu) = self.menus.get_mut(name) {
                        menu.unmark_focus();
                    }
                    self.active = None;
                    self.push_event(NavEvent::ActiveMenuChanged {
                        from: Some(name.to_string()),
                        to: None,
                    });
                }
            }
        }

        for other in self.menus.values_mut() {
            if other.previous_menu.as_deref() == Some(name) {
                other.set_previous(None);
            }
            if other.next_menu.as_deref() == Some(name) {
                other.set_next(None);
            }
        }
        self.menus.remove(name);
        debug!(menu = name, active = ?self.active, "unregistered menu");
        self.push_event(NavEvent::MenuUnregistered {
            name: name.to_string(),
        });
        true
    }

    /// Handle for reading and adjusting a registered menu.
    pub fn menu_mut(&mut self, name: &str) -> Option<MenuHandle<'_>> {
        if !self.menus.contains_key(name) {
            return None;
        }
        Some(MenuHandle {
            engine: self,
            name: name.to_string(),
        })
    }

    /// Point `menu`'s previous edge at `target` (`None` clears it).
    pub fn set_previous_menu(&mut self, menu: &str, target: Option<&str>) -> bool {
        match self.menus.get_mut(menu) {
            Some(m) => {
                m.set_previous(target.map(str::to_string));
                true
            }
            None => false,
        }
    }

    /// Point `menu`'s next edge at `target` (`None` clears it).
    pub fn set_next_menu(&mut self, menu: &str, target: Option<&str>) -> bool {
        match self.menus.get_mut(menu) {
            Some(m) => {
                m.set_next(target.map(str::to_string));
                true
            }
            None => false,
        }
    }

    /// Re-read item counts and restore the focus marker on the active menu.
    pub fn refresh(&mut self) {
        for menu in self.menus.values_mut() {
            menu.sync_len();
        }
        if let Some(menu) = self.active_menu_mut() {
            menu.reconcile_focus();
        }
    }

    fn active_menu_mut(&mut self) -> Option<&mut Menu> {
        let name = self.active.as_deref()?;
        self.menus.get_mut(name)
    }

    // ========================================================================
    // Menu transfer
    // ========================================================================

    /// Make `name` the active menu, optionally focusing `index` (clamped).
    ///
    /// An unknown `name` keeps the current active menu but still applies
    /// `index` to it.
    pub fn change_active_menu(&mut self, name: &str, index: Option<usize>) {
        let from = self.active.clone();
        if let Some(current) = self.active_menu_mut() {
            current.unmark_focus();
        }

        if self.menus.contains_key(name) {
            self.active = Some(name.to_string());
        } else {
            debug!(menu = name, "unknown menu; keeping active menu");
        }

        let to = self.active.clone();
        let mut moved = None;
        if let Some(menu) = self.active_menu_mut() {
            menu.sync_len();
            if let Some(i) = index
                && menu.len() > 0
            {
                let before = menu.focused;
                menu.focused = menu.clamp(i);
                if before != menu.focused {
                    moved = Some((before, menu.focused));
                }
            }
            menu.mark_focus();
        }

        if from != to {
            debug!(from = ?from, to = ?to, "active menu changed");
            self.push_event(NavEvent::ActiveMenuChanged {
                from,
                to: to.clone(),
            });
        }
        if let (Some((from, to_index)), Some(menu)) = (moved, to) {
            self.push_event(NavEvent::FocusMoved {
                menu,
                from,
                to: to_index,
            });
        }
    }

    /// Move to the active menu's previous menu, then fire its
    /// `on_previous_menu` hook.
    pub fn change_to_previous_menu(&mut self) {
        self.change_to_adjacent_menu(false);
    }

    /// Move to the active menu's next menu, then fire its `on_next_menu`
    /// hook.
    pub fn change_to_next_menu(&mut self) {
        self.change_to_adjacent_menu(true);
    }

    fn change_to_adjacent_menu(&mut self, forward: bool) {
        let Some(source) = self.active.clone() else {
            trace!("menu transfer without active menu");
            return;
        };
        let Some(src) = self.menus.get_mut(&source) else {
            return;
        };
        src.sync_len();
        let source_focused = src.focused;
        let target = if forward {
            src.next_menu.clone()
        } else {
            src.previous_menu.clone()
        };
        let Some(target) = target else {
            trace!(menu = %source, forward, "no adjacent menu");
            return;
        };
        let Some(dst) = self.menus.get_mut(&target) else {
            debug!(menu = %source, adjacent = %target, "adjacent menu not registered");
            return;
        };
        if dst.sync_len() == 0 {
            debug!(adjacent = %target, "adjacent menu is empty; staying");
            return;
        }
        let synced = (dst.sync_with() == Some(source.as_str())).then_some(source_focused);

        self.change_active_menu(&target, synced);

        let cmd = match self.menus.get_mut(&source) {
            Some(src) if forward => (src.hooks.on_next_menu)(),
            Some(src) => (src.hooks.on_previous_menu)(),
            None => NavCmd::None,
        };
        self.apply(cmd);
    }

    // ========================================================================
    // Item movement
    // ========================================================================

    /// Step focus one item back in the active menu.
    ///
    /// At the first item focus stays and `on_before_first_item` fires.
    pub fn previous_item(&mut self) {
        self.step(false);
    }

    /// Step focus one item forward in the active menu.
    ///
    /// At the last item focus stays and `on_after_last_item` fires.
    pub fn next_item(&mut self) {
        self.step(true);
    }

    fn step(&mut self, forward: bool) {
        let Some(name) = self.active.clone() else {
            trace!("item step without active menu");
            return;
        };
        let Some(menu) = self.menus.get_mut(&name) else {
            return;
        };
        let len = menu.sync_len();
        if len == 0 {
            trace!(menu = %name, "item step in empty menu");
            return;
        }
        menu.reconcile_focus();

        let current = menu.focused;
        let at_boundary = if forward {
            current == len - 1
        } else {
            current == 0
        };
        if !at_boundary {
            menu.unmark_focus();
        }
        menu.focused = if forward {
            (current + 1).min(len - 1)
        } else {
            current.saturating_sub(1)
        };
        menu.clear_stale_selection();

        if at_boundary {
            let edge = if forward { Edge::Last } else { Edge::First };
            trace!(menu = %name, ?edge, "boundary reached");
            let cmd = if forward {
                (menu.hooks.on_after_last_item)()
            } else {
                (menu.hooks.on_before_first_item)()
            };
            self.push_event(NavEvent::BoundaryReached { menu: name, edge });
            self.apply(cmd);
            return;
        }

        let item = menu.item_ref(menu.focused);
        let cmd = (menu.hooks.on_active_item_changed)(&item);
        menu.mark_focus();
        trace!(menu = %name, from = current, to = item.index, "focus moved");
        self.push_event(NavEvent::FocusMoved {
            menu: name,
            from: current,
            to: item.index,
        });
        self.apply(cmd);
    }

    /// Enter on the active menu: moves the selection marker to the focused
    /// item when the menu shows selection.
    pub fn key_enter(&mut self) {
        let Some(name) = self.active.clone() else {
            return;
        };
        let Some(menu) = self.menus.get_mut(&name) else {
            return;
        };
        if !menu.selection_visible() || menu.sync_len() == 0 {
            return;
        }
        menu.reconcile_focus();
        menu.select_focused();
        let index = menu.focused;
        debug!(menu = %name, index, "item selected");
        self.push_event(NavEvent::ItemSelected { menu: name, index });
    }

    /// Return on the active menu: fires its `on_return` hook.
    pub fn key_return(&mut self) {
        let Some(menu) = self.active_menu_mut() else {
            return;
        };
        let cmd = (menu.hooks.on_return)();
        self.apply(cmd);
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Route a navigation action through the active menu.
    ///
    /// Returns `false` when the engine is disabled or no menu is active.
    pub fn handle_action(&mut self, action: NavAction) -> bool {
        if !self.enabled {
            trace!(?action, "focus engine disabled; action ignored");
            return false;
        }
        let Some(menu) = self.active_menu() else {
            trace!(?action, "no active menu; action ignored");
            return false;
        };
        let op = menu.directions.route(action);
        trace!(menu = menu.name(), ?action, ?op, "routing action");
        match op {
            MenuOp::PreviousItem => self.previous_item(),
            MenuOp::NextItem => self.next_item(),
            MenuOp::PreviousMenu => self.change_to_previous_menu(),
            MenuOp::NextMenu => self.change_to_next_menu(),
            MenuOp::Enter => self.key_enter(),
            MenuOp::Return => self.key_return(),
        }
        true
    }

    /// Apply a command returned by a hook or handler.
    pub fn apply(&mut self, cmd: NavCmd) {
        match cmd {
            NavCmd::None => {}
            NavCmd::ChangeActiveMenu { name, index } => self.change_active_menu(&name, index),
            NavCmd::Enable => self.enable(),
            NavCmd::Disable => self.disable(),
            NavCmd::Unregister(name) => {
                self.unregister_menu(&name);
            }
            NavCmd::SetPreviousMenu { menu, target } => {
                self.set_previous_menu(&menu, target.as_deref());
            }
            NavCmd::SetNextMenu { menu, target } => {
                self.set_next_menu(&menu, target.as_deref());
            }
            NavCmd::Batch(cmds) => {
                for cmd in cmds {
                    self.apply(cmd);
                }
            }
        }
    }

    fn set_focused_index(&mut self, name: &str, index: usize) {
        let is_active = self.active.as_deref() == Some(name);
        let Some(menu) = self.menus.get_mut(name) else {
            return;
        };
        if menu.sync_len() == 0 {
            return;
        }
        let before = menu.focused;
        if is_active {
            menu.unmark_focus();
        }
        menu.focused = menu.clamp(index);
        let after = menu.focused;
        if !is_active {
            return;
        }
        menu.mark_focus();
        if before != after {
            self.push_event(NavEvent::FocusMoved {
                menu: name.to_string(),
                from: before,
                to: after,
            });
        }
    }
}

/// Mutable view of one registered menu.
///
/// Obtained from [`FocusEngine::register_menu`] or [`FocusEngine::menu_mut`].
pub struct MenuHandle<'a> {
    engine: &'a mut FocusEngine,
    name: String,
}

impl MenuHandle<'_> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn menu(&self) -> Option<&Menu> {
        self.engine.get_menu(&self.name)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.engine.active_menu_name() == Some(self.name.as_str())
    }

    #[must_use]
    pub fn focused_index(&self) -> Option<usize> {
        self.menu().and_then(Menu::focused_index)
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.menu().and_then(Menu::selected_index)
    }

    /// Set the focused index (clamped). Markers move only on the active menu.
    pub fn set_focused_index(&mut self, index: usize) -> &mut Self {
        self.engine.set_focused_index(&self.name, index);
        self
    }

    /// Focus the first item with `key`. Returns whether it was found.
    pub fn focus_item_named(&mut self, key: &str) -> bool {
        let Some(index) = self.menu().and_then(|m| m.position(key)) else {
            debug!(menu = %self.name, key, "no item with that key");
            return false;
        };
        self.engine.set_focused_index(&self.name, index);
        true
    }

    /// Make this menu active.
    pub fn activate(&mut self) -> &mut Self {
        self.engine.change_active_menu(&self.name, None);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::SharedItems;
    use crate::menu::Alignment;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn items(n: usize) -> SharedItems {
        SharedItems::from_keys((0..n).map(|i| format!("i{i}")))
    }

    fn focused(engine: &FocusEngine, menu: &str) -> Option<usize> {
        engine.get_menu(menu).and_then(Menu::focused_index)
    }

    #[test]
    fn first_registered_menu_becomes_active() {
        let mut engine = FocusEngine::new();
        engine.register_menu(MenuConfig::new("A", items(3)));
        engine.register_menu(MenuConfig::new("B", items(3)));
        assert_eq!(engine.active_menu_name(), Some("A"));
        assert!(engine.is_focus_marked("A", "i0"));
        assert!(!engine.is_focus_marked("B", "i0"));
        assert_eq!(engine.focus_marked_count(), 1);
    }

    #[test]
    fn next_item_moves_and_marks() {
        let mut engine = FocusEngine::new();
        engine.register_menu(MenuConfig::new("A", items(3)));
        engine.next_item();
        assert_eq!(focused(&engine, "A"), Some(1));
        assert!(engine.is_focus_marked("A", "i1"));
        assert!(!engine.is_focus_marked("A", "i0"));
        assert_eq!(engine.focus_marked_count(), 1);
    }

    #[test]
    fn boundary_keeps_focus_and_fires_hook() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let (before, after) = (hits.clone(), hits.clone());
        let mut engine = FocusEngine::new();
        engine.register_menu(
            MenuConfig::new("A", items(2))
                .on_before_first_item(move || {
                    before.borrow_mut().push("first");
                    NavCmd::None
                })
                .on_after_last_item(move || {
                    after.borrow_mut().push("last");
                    NavCmd::None
                }),
        );
        engine.previous_item();
        engine.previous_item();
        assert_eq!(focused(&engine, "A"), Some(0));
        engine.next_item();
        engine.next_item();
        engine.next_item();
        assert_eq!(focused(&engine, "A"), Some(1));
        assert_eq!(*hits.borrow(), vec!["first", "first", "last", "last"]);
        assert!(engine.is_focus_marked("A", "i1"));
    }

    #[test]
    fn active_item_hook_sees_new_item() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut engine = FocusEngine::new();
        engine.register_menu(MenuConfig::new("A", items(3)).on_active_item_changed(
            move |item| {
                sink.borrow_mut().push((item.index, item.key.to_string()));
                NavCmd::None
            },
        ));
        engine.next_item();
        engine.next_item();
        engine.previous_item();
        assert_eq!(
            *seen.borrow(),
            vec![
                (1, "i1".to_string()),
                (2, "i2".to_string()),
                (1, "i1".to_string())
            ]
        );
    }

    #[test]
    fn horizontal_and_vertical_routing() {
        let mut engine = FocusEngine::new();
        engine.register_menu(MenuConfig::new("H", items(3)).with_next_menu("V"));
        engine.register_menu(
            MenuConfig::new("V", items(3))
                .with_alignment(Alignment::Vertical)
                .with_previous_menu("H"),
        );
        assert!(engine.handle_action(NavAction::Right));
        assert_eq!(focused(&engine, "H"), Some(1));
        engine.handle_action(NavAction::Down);
        assert_eq!(engine.active_menu_name(), Some("V"));
        engine.handle_action(NavAction::Down);
        assert_eq!(focused(&engine, "V"), Some(1));
        engine.handle_action(NavAction::Left);
        assert_eq!(engine.active_menu_name(), Some("H"));
        assert_eq!(focused(&engine, "H"), Some(1));
        assert_eq!(engine.focus_marked_count(), 1);
    }

    #[test]
    fn disabled_engine_ignores_actions() {
        let mut engine = FocusEngine::new();
        engine.register_menu(MenuConfig::new("A", items(3)));
        engine.disable();
        assert!(!engine.handle_action(NavAction::Right));
        assert_eq!(focused(&engine, "A"), Some(0));
        engine.enable();
        assert!(engine.handle_action(NavAction::Right));
        assert_eq!(focused(&engine, "A"), Some(1));
    }

    #[test]
    fn no_active_menu_is_noop() {
        let mut engine = FocusEngine::new();
        assert!(!engine.handle_action(NavAction::Right));
        engine.next_item();
        engine.key_enter();
        engine.change_to_next_menu();
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn sync_with_copies_index() {
        let mut engine = FocusEngine::new();
        engine.register_menu(MenuConfig::new("Top", items(5)).with_next_menu("Bottom"));
        engine.register_menu(
            MenuConfig::new("Bottom", items(3))
                .with_previous_menu("Top")
                .with_sync_with("Top"),
        );
        engine.next_item();
        engine.next_item();
        engine.take_events();
        engine.change_to_next_menu();
        assert_eq!(focused(&engine, "Bottom"), Some(2));
        assert_eq!(
            engine.take_events(),
            vec![
                NavEvent::ActiveMenuChanged {
                    from: Some("Top".into()),
                    to: Some("Bottom".into())
                },
                NavEvent::FocusMoved {
                    menu: "Bottom".into(),
                    from: 0,
                    to: 2
                },
            ]
        );

        engine.change_to_previous_menu();
        for _ in 0..2 {
            engine.next_item();
        }
        // Top is at 4, Bottom only has 3 items.
        engine.take_events();
        engine.change_to_next_menu();
        assert_eq!(focused(&engine, "Bottom"), Some(2));
        // Index unchanged, so only the activation is reported.
        assert!(
            engine
                .take_events()
                .iter()
                .all(|e| !matches!(e, NavEvent::FocusMoved { .. }))
        );
    }

    #[test]
    fn transfer_to_empty_menu_is_refused() {
        let fired = Rc::new(RefCell::new(0));
        let counter = fired.clone();
        let mut engine = FocusEngine::new();
        engine.register_menu(
            MenuConfig::new("A", items(2))
                .with_next_menu("Empty")
                .on_next_menu(move || {
                    *counter.borrow_mut() += 1;
                    NavCmd::None
                }),
        );
        engine.register_menu(MenuConfig::new("Empty", items(0)));
        engine.change_to_next_menu();
        assert_eq!(engine.active_menu_name(), Some("A"));
        assert!(engine.is_focus_marked("A", "i0"));
        assert_eq!(*fired.borrow(), 0);
    }

    #[test]
    fn transfer_fires_source_hook_after_switch() {
        let observed = Rc::new(RefCell::new(None));
        let sink = observed.clone();
        let mut engine = FocusEngine::new();
        engine.register_menu(
            MenuConfig::new("A", items(2))
                .with_next_menu("B")
                .on_next_menu(move || {
                    *sink.borrow_mut() = Some("fired");
                    NavCmd::None
                }),
        );
        engine.register_menu(MenuConfig::new("B", items(2)));
        engine.change_to_next_menu();
        assert_eq!(*observed.borrow(), Some("fired"));
        assert_eq!(engine.active_menu_name(), Some("B"));
    }

    #[test]
    fn change_active_menu_unknown_keeps_current() {
        let mut engine = FocusEngine::new();
        engine.register_menu(MenuConfig::new("A", items(3)));
        engine.change_active_menu("missing", Some(2));
        assert_eq!(engine.active_menu_name(), Some("A"));
        assert_eq!(focused(&engine, "A"), Some(2));
        assert!(engine.is_focus_marked("A", "i2"));
    }

    #[test]
    fn change_active_menu_clamps_index() {
        let mut engine = FocusEngine::new();
        engine.register_menu(MenuConfig::new("A", items(3)));
        engine.register_menu(MenuConfig::new("B", items(2)));
        engine.change_active_menu("B", Some(10));
        assert_eq!(focused(&engine, "B"), Some(1));
        assert_eq!(engine.focus_marked_count(), 1);
    }

    #[test]
    fn unregister_active_falls_back_to_previous() {
        let mut engine = FocusEngine::new();
        engine.register_menu(MenuConfig::new("A", items(2)).with_next_menu("B"));
        engine.register_menu(
            MenuConfig::new("B", items(2))
                .with_previous_menu("A")
                .with_next_menu("C"),
        );
        engine.register_menu(MenuConfig::new("C", items(2)).with_previous_menu("B"));
        engine.change_active_menu("B", None);
        assert!(engine.unregister_menu("B"));
        assert_eq!(engine.active_menu_name(), Some("A"));
        assert_eq!(engine.get_menu("A").and_then(Menu::next_menu), None);
        assert_eq!(engine.get_menu("C").and_then(Menu::previous_menu), None);
        assert_eq!(engine.focus_marked_count(), 1);
    }

    #[test]
    fn unregister_active_falls_back_to_next() {
        let mut engine = FocusEngine::new();
        engine.register_menu(MenuConfig::new("A", items(2)).with_next_menu("B"));
        engine.register_menu(MenuConfig::new("B", items(2)));
        engine.unregister_menu("A");
        assert_eq!(engine.active_menu_name(), Some("B"));
        assert!(engine.is_focus_marked("B", "i0"));
    }

    #[test]
    fn unregister_last_menu_clears_active() {
        let mut engine = FocusEngine::new();
        engine.register_menu(MenuConfig::new("A", items(2)));
        engine.unregister_menu("A");
        assert_eq!(engine.active_menu_name(), None);
        assert!(!engine.unregister_menu("A"));
        engine.register_menu(MenuConfig::new("B", items(1)));
        assert_eq!(engine.active_menu_name(), Some("B"));
    }

    #[test]
    fn enter_moves_selection_when_visible() {
        let mut engine = FocusEngine::new();
        engine.register_menu(MenuConfig::new("A", items(3)).with_selection_visible(true));
        engine.next_item();
        engine.key_enter();
        assert_eq!(engine.get_menu("A").and_then(Menu::selected_index), Some(1));
        assert!(engine.get_menu("A").unwrap().marks(1).is_selected());

        engine.next_item();
        // Focus left the selected item: the marker goes, the index stays.
        let menu = engine.get_menu("A").unwrap();
        assert_eq!(menu.selected_index(), Some(1));
        assert!(!menu.marks(1).is_selected());

        engine.key_enter();
        let menu = engine.get_menu("A").unwrap();
        assert_eq!(menu.selected_index(), Some(2));
        assert!(menu.marks(2).is_selected());
    }

    #[test]
    fn stale_selection_cleared_at_boundary() {
        let hits = Rc::new(RefCell::new(0));
        let counter = hits.clone();
        let mut engine = FocusEngine::new();
        engine.register_menu(
            MenuConfig::new("A", items(3))
                .with_selection_visible(true)
                .on_before_first_item(move || {
                    *counter.borrow_mut() += 1;
                    NavCmd::None
                }),
        );
        engine.next_item();
        engine.next_item();
        engine.key_enter();
        assert!(engine.get_menu("A").unwrap().marks(2).is_selected());

        engine.menu_mut("A").unwrap().set_focused_index(0);
        // Still marked: no step has happened since focus was placed.
        assert!(engine.get_menu("A").unwrap().marks(2).is_selected());

        engine.previous_item();
        assert_eq!(*hits.borrow(), 1);
        assert_eq!(focused(&engine, "A"), Some(0));
        let menu = engine.get_menu("A").unwrap();
        assert!(!menu.marks(2).is_selected());
        assert_eq!(menu.selected_index(), Some(2));
    }

    #[test]
    fn enter_without_selection_visible_is_noop() {
        let mut engine = FocusEngine::new();
        engine.register_menu(MenuConfig::new("A", items(3)));
        engine.key_enter();
        assert_eq!(engine.get_menu("A").and_then(Menu::selected_index), None);
    }

    #[test]
    fn return_fires_hook_and_applies_command() {
        let mut engine = FocusEngine::new();
        engine.register_menu(
            MenuConfig::new("A", items(2)).on_return(|| NavCmd::change_active_menu("B")),
        );
        engine.register_menu(MenuConfig::new("B", items(2)));
        engine.handle_action(NavAction::Return);
        assert_eq!(engine.active_menu_name(), Some("B"));
    }

    #[test]
    fn hook_command_switches_menu_at_boundary() {
        let mut engine = FocusEngine::new();
        engine.register_menu(
            MenuConfig::new("Basic", items(2))
                .on_after_last_item(|| NavCmd::change_active_menu("Logs")),
        );
        engine.register_menu(MenuConfig::new("Logs", items(4)));
        engine.next_item();
        engine.next_item();
        assert_eq!(engine.active_menu_name(), Some("Logs"));
        assert_eq!(engine.focus_marked_count(), 1);
    }

    #[test]
    fn items_shrinking_under_focus_reclamp() {
        let list = items(3);
        let mut engine = FocusEngine::new();
        engine.register_menu(MenuConfig::new("A", list.clone()));
        engine.next_item();
        engine.next_item();
        list.remove("i2");
        engine.previous_item();
        assert_eq!(focused(&engine, "A"), Some(0));
        assert_eq!(engine.focus_marked_count(), 1);
    }

    #[test]
    fn refresh_restores_marker() {
        let list = items(2);
        let mut engine = FocusEngine::new();
        engine.register_menu(MenuConfig::new("A", list.clone()));
        engine.next_item();
        list.remove("i1");
        assert_eq!(engine.focus_marked_count(), 0);
        engine.refresh();
        assert!(engine.is_focus_marked("A", "i0"));
    }

    #[test]
    fn handle_focus_item_named() {
        let mut engine = FocusEngine::new();
        engine.register_menu(MenuConfig::new("A", items(4)));
        let mut handle = engine.menu_mut("A").unwrap();
        assert!(handle.focus_item_named("i3"));
        assert!(!handle.focus_item_named("nope"));
        assert_eq!(handle.focused_index(), Some(3));
        assert!(engine.is_focus_marked("A", "i3"));
    }

    #[test]
    fn set_focused_index_on_inactive_menu_does_not_mark() {
        let mut engine = FocusEngine::new();
        engine.register_menu(MenuConfig::new("A", items(2)));
        engine.register_menu(MenuConfig::new("B", items(4)));
        engine.menu_mut("B").unwrap().set_focused_index(3);
        assert_eq!(focused(&engine, "B"), Some(3));
        assert!(!engine.is_focus_marked("B", "i3"));
        engine.change_active_menu("B", None);
        assert!(engine.is_focus_marked("B", "i3"));
    }

    #[test]
    fn duplicate_registration_replaces() {
        let mut engine = FocusEngine::new();
        engine.register_menu(MenuConfig::new("A", items(2)));
        engine.register_menu(MenuConfig::new("A", items(5)));
        assert_eq!(engine.menu_count(), 1);
        assert_eq!(engine.get_menu("A").map(Menu::len), Some(5));
        assert_eq!(engine.focus_marked_count(), 1);
    }

    #[test]
    fn events_are_recorded_and_drained() {
        let mut engine = FocusEngine::new();
        engine.register_menu(MenuConfig::new("A", items(2)));
        engine.next_item();
        engine.next_item();
        let events = engine.take_events();
        assert_eq!(
            events,
            vec![
                NavEvent::MenuRegistered { name: "A".into() },
                NavEvent::ActiveMenuChanged {
                    from: None,
                    to: Some("A".into())
                },
                NavEvent::FocusMoved {
                    menu: "A".into(),
                    from: 0,
                    to: 1
                },
                NavEvent::BoundaryReached {
                    menu: "A".into(),
                    edge: Edge::Last
                },
            ]
        );
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn pending_events_are_bounded() {
        let mut engine = FocusEngine::new();
        engine.register_menu(MenuConfig::new("A", items(1)));
        for _ in 0..(MAX_PENDING_EVENTS * 2) {
            engine.next_item();
        }
        assert_eq!(engine.take_events().len(), MAX_PENDING_EVENTS);
    }

    #[test]
    fn apply_batch_and_edges() {
        let mut engine = FocusEngine::new();
        engine.register_menu(MenuConfig::new("A", items(1)));
        engine.register_menu(MenuConfig::new("B", items(1)));
        engine.apply(NavCmd::batch(vec![
            NavCmd::SetNextMenu {
                menu: "A".into(),
                target: Some("B".into()),
            },
            NavCmd::Disable,
        ]));
        assert_eq!(engine.get_menu("A").and_then(Menu::next_menu), Some("B"));
        assert!(!engine.is_enabled());
        engine.apply(NavCmd::Enable);
        engine.handle_action(NavAction::Down);
        assert_eq!(engine.active_menu_name(), Some("B"));
    }
}
