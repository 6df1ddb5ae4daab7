#![forbid(unsafe_code)]

//! Input layer: handlers that see activation and raw keys before the focus
//! engine does.
//!
//! Three kinds of binding are kept:
//!
//! | Binding | Fires on | Gated by `enable_key_handler` |
//! |---------|----------|-------------------------------|
//! | Button | activation key, item carries the focus marker | yes |
//! | Delegated group | activation key, no button fired; first focus-marked child | yes |
//! | Raw key handler | its key code | no |
//!
//! The layer only reads focus state. Handlers return [`NavCmd`]s which the
//! [`Navigator`](crate::Navigator) applies to the engine afterwards.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Host refuses a key | `HostInput::register_key` error | `register_key_handler` returns the error; no handler installed |
//! | Button target menu unknown | menu never registered or removed | button never fires |

use rustc_hash::FxHashSet;
use tracing::{debug, trace, warn};
use tvnav_core::{HostInput, HostKeyError, KeyCode, NullHost};
use tvnav_focus::{FocusEngine, ItemRef, Menu, NavCmd};

use crate::binding::{ButtonBinding, DelegatedGroup, ItemTarget, KeyHandlerBinding};

/// Result of offering an activation key to the layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Disabled, or nothing focus-marked was bound.
    Unhandled,
    /// `fired` button handlers ran.
    Buttons { fired: usize, cmd: NavCmd },
    /// `fired` delegated groups ran.
    Delegated { fired: usize, cmd: NavCmd },
}

impl Activation {
    #[must_use]
    pub fn is_handled(&self) -> bool {
        !matches!(self, Self::Unhandled)
    }
}

/// Button, delegated-list and raw key handlers plus the host registration
/// record.
pub struct InputLayer {
    enabled: bool,
    buttons: Vec<ButtonBinding>,
    delegated: Vec<DelegatedGroup>,
    key_handlers: Vec<KeyHandlerBinding>,
    host: Box<dyn HostInput>,
    host_registered: FxHashSet<String>,
}

impl Default for InputLayer {
    fn default() -> Self {
        Self::new(NullHost)
    }
}

impl InputLayer {
    /// Create an enabled layer talking to `host`.
    #[must_use]
    pub fn new(host: impl HostInput + 'static) -> Self {
        Self {
            enabled: true,
            buttons: Vec::new(),
            delegated: Vec::new(),
            key_handlers: Vec::new(),
            host: Box::new(host),
            host_registered: FxHashSet::default(),
        }
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Bind handlers to individual items. Existing bindings are kept.
    pub fn add_handlers_for_buttons<F>(
        &mut self,
        buttons: impl IntoIterator<Item = (ItemTarget, F)>,
    ) where
        F: FnMut(KeyCode) -> NavCmd + 'static,
    {
        for (target, handler) in buttons {
            trace!(item = %target, "button handler added");
            self.buttons.push(ButtonBinding {
                target,
                handler: Box::new(handler),
            });
        }
    }

    /// Bind a handler to one item.
    pub fn add_handler_for_button(
        &mut self,
        target: ItemTarget,
        handler: impl FnMut(KeyCode) -> NavCmd + 'static,
    ) {
        self.add_handlers_for_buttons([(target, handler)]);
    }

    /// Bind one handler to every child of the `container` menu.
    pub fn add_handler_for_delegated(
        &mut self,
        container: impl Into<String>,
        handler: impl FnMut(&ItemRef) -> NavCmd + 'static,
    ) {
        let container = container.into();
        trace!(container = %container, "delegated handler added");
        self.delegated.push(DelegatedGroup {
            container,
            handler: Box::new(handler),
        });
    }

    /// Install a raw key handler for `code`.
    ///
    /// When `host_name` is given and has not been registered yet, the host is
    /// asked to deliver it first. A refusal is returned and the handler is not
    /// installed.
    pub fn register_key_handler(
        &mut self,
        code: impl Into<KeyCode>,
        host_name: Option<&str>,
        handler: impl FnMut(KeyCode) -> NavCmd + 'static,
    ) -> Result<(), HostKeyError> {
        let code = code.into();
        if let Some(name) = host_name {
            self.ensure_host_key(name)?;
        }
        debug!(%code, host_name, "key handler registered");
        self.key_handlers.push(KeyHandlerBinding {
            code,
            handler: Box::new(handler),
        });
        Ok(())
    }

    fn ensure_host_key(&mut self, name: &str) -> Result<(), HostKeyError> {
        if self.host_registered.contains(name) {
            return Ok(());
        }
        self.host.register_key(name).map_err(|err| {
            warn!(name, error = %err, "host key registration failed");
            err
        })?;
        self.host_registered.insert(name.to_string());
        Ok(())
    }

    /// Whether the host has already been asked for `name`.
    #[must_use]
    pub fn is_host_key_registered(&self, name: &str) -> bool {
        self.host_registered.contains(name)
    }

    // ========================================================================
    // Gate
    // ========================================================================

    pub fn enable_key_handler(&mut self) {
        self.enabled = true;
    }

    pub fn disable_key_handler(&mut self) {
        self.enabled = false;
    }

    #[must_use]
    pub fn is_key_handler_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    #[must_use]
    pub fn delegated_count(&self) -> usize {
        self.delegated.len()
    }

    #[must_use]
    pub fn key_handler_count(&self) -> usize {
        self.key_handlers.len()
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Run every raw handler bound to `code`. Ignores the gate.
    ///
    /// Returns the number of handlers run and their combined command.
    pub fn fire_key_handlers(&mut self, code: KeyCode) -> (usize, NavCmd) {
        let mut cmds = Vec::new();
        for binding in self.key_handlers.iter_mut().filter(|b| b.code == code) {
            cmds.push((binding.handler)(code));
        }
        (cmds.len(), NavCmd::batch(cmds))
    }

    /// Offer an activation key.
    ///
    /// Every button whose item carries the focus marker fires. Only when none
    /// did, each delegated group fires once with the first focus-marked child
    /// of its container.
    pub fn activate(&mut self, engine: &FocusEngine, code: KeyCode) -> Activation {
        if !self.enabled {
            trace!(%code, "input layer disabled");
            return Activation::Unhandled;
        }

        let mut cmds = Vec::new();
        for button in &mut self.buttons {
            if engine.is_focus_marked(&button.target.menu, button.target.key.as_str()) {
                debug!(item = %button.target, "button activated");
                cmds.push((button.handler)(code));
            }
        }
        if !cmds.is_empty() {
            return Activation::Buttons {
                fired: cmds.len(),
                cmd: NavCmd::batch(cmds),
            };
        }

        for group in &mut self.delegated {
            let Some(item) = engine
                .get_menu(&group.container)
                .and_then(Menu::first_focus_marked)
            else {
                continue;
            };
            debug!(container = %group.container, item = %item.key, "delegated item activated");
            cmds.push((group.handler)(&item));
        }
        if cmds.is_empty() {
            return Activation::Unhandled;
        }
        Activation::Delegated {
            fired: cmds.len(),
            cmd: NavCmd::batch(cmds),
        }
    }
}

impl std::fmt::Debug for InputLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputLayer")
            .field("enabled", &self.enabled)
            .field("buttons", &self.buttons.len())
            .field("delegated", &self.delegated.len())
            .field("key_handlers", &self.key_handlers.len())
            .field("host_registered", &self.host_registered)
            .finish()
    }
}
