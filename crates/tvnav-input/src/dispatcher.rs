#![forbid(unsafe_code)]

//! Single-entry key dispatcher.
//!
//! [`Navigator`] owns the focus engine, the input layer and the key map, and
//! decides in a fixed order who sees each key code:
//!
//! 1. Raw key handlers bound to the code (always, never consuming the key).
//! 2. On the activation key, the input layer's buttons, then delegated groups.
//!    Any hit consumes the key.
//! 3. The key map's navigation action, handed to the focus engine.
//! 4. Anything left is logged as unhandled.
//!
//! Commands returned by handlers are applied to the engine after each step.

use tracing::{debug, debug_span, trace};
use tvnav_core::{ConfigError, HostInput, KeyCode, KeyMap, NavAction, NavConfig, NullHost, RemoteKey};
use tvnav_focus::FocusEngine;

use crate::layer::{Activation, InputLayer};

/// Which path consumed a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Focus-marked buttons fired.
    Buttons(usize),
    /// Delegated groups fired.
    Delegated(usize),
    /// The engine routed the action through the active menu.
    Navigated(NavAction),
    /// The key maps to an action but the engine ignored it (disabled, or no
    /// active menu).
    Ignored(NavAction),
    /// No binding and no engine action.
    Unhandled,
}

/// Result of [`Navigator::handle_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub code: KeyCode,
    /// Raw key handlers that ran.
    pub key_handlers: usize,
    pub route: Route,
}

impl DispatchOutcome {
    /// True when nothing at all reacted to the key.
    #[must_use]
    pub fn is_unhandled(&self) -> bool {
        self.key_handlers == 0 && self.route == Route::Unhandled
    }
}

/// Focus engine plus input layer behind one key entry point.
#[derive(Debug)]
pub struct Navigator {
    engine: FocusEngine,
    input: InputLayer,
    keymap: KeyMap,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(KeyMap::television(), NullHost)
    }
}

impl Navigator {
    #[must_use]
    pub fn new(keymap: KeyMap, host: impl HostInput + 'static) -> Self {
        Self {
            engine: FocusEngine::new(),
            input: InputLayer::new(host),
            keymap,
        }
    }

    /// Build from a loaded config: key map plus initial gate states.
    pub fn from_config(
        config: &NavConfig,
        host: impl HostInput + 'static,
    ) -> Result<Self, ConfigError> {
        let mut nav = Self::new(config.keymap()?, host);
        if !config.focus_enabled {
            nav.engine.disable();
        }
        if !config.input_enabled {
            nav.input.disable_key_handler();
        }
        Ok(nav)
    }

    #[must_use]
    pub fn engine(&self) -> &FocusEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut FocusEngine {
        &mut self.engine
    }

    #[must_use]
    pub fn input(&self) -> &InputLayer {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputLayer {
        &mut self.input
    }

    #[must_use]
    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    pub fn keymap_mut(&mut self) -> &mut KeyMap {
        &mut self.keymap
    }

    /// Dispatch one key code.
    pub fn handle_key(&mut self, code: impl Into<KeyCode>) -> DispatchOutcome {
        let code = code.into();
        let _span = debug_span!("handle_key", code = code.value()).entered();

        let (key_handlers, cmd) = self.input.fire_key_handlers(code);
        self.engine.apply(cmd);

        let route = self.route(code);
        let outcome = DispatchOutcome {
            code,
            key_handlers,
            route,
        };
        if outcome.is_unhandled() {
            debug!(%code, "unhandled key");
        } else {
            trace!(?outcome, "key dispatched");
        }
        outcome
    }

    /// Dispatch the code bound to `key`. Unbound keys are unhandled.
    pub fn press(&mut self, key: RemoteKey) -> DispatchOutcome {
        match self.keymap.code_for(key) {
            Some(code) => self.handle_key(code),
            None => {
                debug!(?key, "no code bound for key");
                DispatchOutcome {
                    code: KeyCode(0),
                    key_handlers: 0,
                    route: Route::Unhandled,
                }
            }
        }
    }

    fn route(&mut self, code: KeyCode) -> Route {
        if self.keymap.is_activation(code) {
            match self.input.activate(&self.engine, code) {
                Activation::Unhandled => {}
                Activation::Buttons { fired, cmd } => {
                    self.engine.apply(cmd);
                    return Route::Buttons(fired);
                }
                Activation::Delegated { fired, cmd } => {
                    self.engine.apply(cmd);
                    return Route::Delegated(fired);
                }
            }
        }

        match self.keymap.action(code) {
            Some(action) if self.engine.handle_action(action) => Route::Navigated(action),
            Some(action) => Route::Ignored(action),
            None => Route::Unhandled,
        }
    }
}
