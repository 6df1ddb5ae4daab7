#![forbid(unsafe_code)]

//! Declarative test scenes.
//!
//! A [`Scene`] is a [`Navigator`] whose menus were built from [`MenuSpec`]s,
//! with every lifecycle hook wired to a shared [`HookCall`] log and every
//! item list kept as a [`SharedItems`] handle the test can mutate.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use tvnav_core::host::testing::RecordingHost;
use tvnav_core::{ConfigError, KeyCode, NavConfig};
use tvnav_focus::{Alignment, Menu, MenuConfig, NavCmd, NavEvent, SharedItems};
use tvnav_input::{DispatchOutcome, Navigator};

/// Television key codes.
pub mod keys {
    pub const LEFT: u32 = 37;
    pub const UP: u32 = 38;
    pub const RIGHT: u32 = 39;
    pub const DOWN: u32 = 40;
    pub const ENTER: u32 = 13;
    pub const RETURN: u32 = 10009;
    pub const MEDIA_PLAY_PAUSE: u32 = 10252;
    pub const MEDIA_PLAY: u32 = 415;
    pub const MEDIA_PAUSE: u32 = 19;
    pub const MEDIA_STOP: u32 = 413;
    pub const MEDIA_FAST_FORWARD: u32 = 417;
    pub const MEDIA_REWIND: u32 = 412;
}

/// One recorded hook invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookCall {
    ActiveItemChanged { menu: String, index: usize },
    BeforeFirstItem { menu: String },
    AfterLastItem { menu: String },
    PreviousMenu { menu: String },
    NextMenu { menu: String },
    Return { menu: String },
}

type HookLog = Rc<RefCell<Vec<HookCall>>>;

/// Declarative menu description.
#[derive(Debug, Clone)]
pub struct MenuSpec {
    name: String,
    keys: Vec<String>,
    alignment: Alignment,
    previous: Option<String>,
    next: Option<String>,
    sync_with: Option<String>,
    selection_visible: bool,
    after_last_jump: Option<String>,
}

impl MenuSpec {
    #[must_use]
    pub fn horizontal<S: Into<String>>(name: &str, keys: impl IntoIterator<Item = S>) -> Self {
        Self::new(name, keys, Alignment::Horizontal)
    }

    #[must_use]
    pub fn vertical<S: Into<String>>(name: &str, keys: impl IntoIterator<Item = S>) -> Self {
        Self::new(name, keys, Alignment::Vertical)
    }

    fn new<S: Into<String>>(
        name: &str,
        keys: impl IntoIterator<Item = S>,
        alignment: Alignment,
    ) -> Self {
        Self {
            name: name.to_string(),
            keys: keys.into_iter().map(Into::into).collect(),
            alignment,
            previous: None,
            next: None,
            sync_with: None,
            selection_visible: false,
            after_last_jump: None,
        }
    }

    #[must_use]
    pub fn previous(mut self, name: &str) -> Self {
        self.previous = Some(name.to_string());
        self
    }

    #[must_use]
    pub fn next(mut self, name: &str) -> Self {
        self.next = Some(name.to_string());
        self
    }

    #[must_use]
    pub fn sync_with(mut self, name: &str) -> Self {
        self.sync_with = Some(name.to_string());
        self
    }

    #[must_use]
    pub fn selection_visible(mut self) -> Self {
        self.selection_visible = true;
        self
    }

    /// After the last item, jump to `name` if it has items.
    #[must_use]
    pub fn after_last_jump(mut self, name: &str) -> Self {
        self.after_last_jump = Some(name.to_string());
        self
    }

    fn into_config(
        self,
        log: &HookLog,
        items: SharedItems,
        jump_items: Option<SharedItems>,
    ) -> MenuConfig {
        let name = self.name;
        let mut config = MenuConfig::new(name.clone(), items).with_alignment(self.alignment);
        if let Some(prev) = self.previous {
            config = config.with_previous_menu(prev);
        }
        if let Some(next) = self.next {
            config = config.with_next_menu(next);
        }
        if let Some(sync) = self.sync_with {
            config = config.with_sync_with(sync);
        }
        config = config.with_selection_visible(self.selection_visible);

        let (l, m) = (log.clone(), name.clone());
        config = config.on_active_item_changed(move |item| {
            l.borrow_mut().push(HookCall::ActiveItemChanged {
                menu: m.clone(),
                index: item.index,
            });
            NavCmd::None
        });
        let (l, m) = (log.clone(), name.clone());
        config = config.on_before_first_item(move || {
            l.borrow_mut().push(HookCall::BeforeFirstItem { menu: m.clone() });
            NavCmd::None
        });
        let (l, m) = (log.clone(), name.clone());
        let jump = self.after_last_jump;
        config = config.on_after_last_item(move || {
            l.borrow_mut().push(HookCall::AfterLastItem { menu: m.clone() });
            match (&jump, &jump_items) {
                (Some(target), Some(items)) if !items.keys().is_empty() => {
                    NavCmd::change_active_menu(target.clone())
                }
                _ => NavCmd::None,
            }
        });
        let (l, m) = (log.clone(), name.clone());
        config = config.on_previous_menu(move || {
            l.borrow_mut().push(HookCall::PreviousMenu { menu: m.clone() });
            NavCmd::None
        });
        let (l, m) = (log.clone(), name.clone());
        config = config.on_next_menu(move || {
            l.borrow_mut().push(HookCall::NextMenu { menu: m.clone() });
            NavCmd::None
        });
        let (l, m) = (log.clone(), name);
        config.on_return(move || {
            l.borrow_mut().push(HookCall::Return { menu: m.clone() });
            NavCmd::None
        })
    }
}

/// Builder for [`Scene`].
#[derive(Debug, Default)]
pub struct SceneBuilder {
    menus: Vec<MenuSpec>,
    config: Option<NavConfig>,
}

impl SceneBuilder {
    #[must_use]
    pub fn menu(mut self, spec: MenuSpec) -> Self {
        self.menus.push(spec);
        self
    }

    #[must_use]
    pub fn config(mut self, config: NavConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Register every menu, in order, on a fresh navigator.
    pub fn build(self) -> Result<Scene, ConfigError> {
        let host = RecordingHost::new();
        let config = self.config.unwrap_or_default();
        let mut nav = Navigator::from_config(&config, host.clone())?;
        let log: HookLog = Rc::default();

        let items: FxHashMap<String, SharedItems> = self
            .menus
            .iter()
            .map(|spec| (spec.name.clone(), SharedItems::from_keys(spec.keys.iter().cloned())))
            .collect();
        for spec in self.menus {
            let own = items.get(&spec.name).cloned().unwrap_or_default();
            let jump_items = spec
                .after_last_jump
                .as_ref()
                .and_then(|target| items.get(target).cloned());
            nav.engine_mut()
                .register_menu(spec.into_config(&log, own, jump_items));
        }
        nav.engine_mut().take_events();

        Ok(Scene {
            nav,
            host,
            log,
            items,
        })
    }
}

/// A navigator plus the handles tests need to drive and observe it.
pub struct Scene {
    pub nav: Navigator,
    pub host: RecordingHost,
    log: HookLog,
    items: FxHashMap<String, SharedItems>,
}

impl Scene {
    #[must_use]
    pub fn builder() -> SceneBuilder {
        SceneBuilder::default()
    }

    /// Item list of `menu`, shared with the engine.
    #[must_use]
    pub fn items(&self, menu: &str) -> Option<&SharedItems> {
        self.items.get(menu)
    }

    pub fn press(&mut self, code: impl Into<KeyCode>) -> DispatchOutcome {
        self.nav.handle_key(code)
    }

    pub fn press_all(&mut self, codes: &[u32]) -> Vec<DispatchOutcome> {
        codes.iter().map(|&code| self.nav.handle_key(code)).collect()
    }

    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.nav.engine().active_menu_name()
    }

    #[must_use]
    pub fn focused(&self, menu: &str) -> Option<usize> {
        self.nav.engine().get_menu(menu).and_then(Menu::focused_index)
    }

    #[must_use]
    pub fn selected(&self, menu: &str) -> Option<usize> {
        self.nav.engine().get_menu(menu).and_then(Menu::selected_index)
    }

    /// Whether the item `key` of `menu` carries the selection marker.
    #[must_use]
    pub fn selection_marked(&self, menu: &str, key: &str) -> bool {
        self.nav
            .engine()
            .get_menu(menu)
            .and_then(|m| m.position(key).map(|i| m.marks(i)))
            .is_some_and(|marks| marks.is_selected())
    }

    #[must_use]
    pub fn hook_calls(&self) -> Vec<HookCall> {
        self.log.borrow().clone()
    }

    pub fn take_hook_calls(&mut self) -> Vec<HookCall> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    pub fn take_events(&mut self) -> Vec<NavEvent> {
        self.nav.engine_mut().take_events()
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("nav", &self.nav)
            .field("hook_calls", &self.log.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_registers_in_order() {
        let scene = Scene::builder()
            .menu(MenuSpec::horizontal("A", ["a0", "a1"]).next("B"))
            .menu(MenuSpec::vertical("B", ["b0"]).previous("A"))
            .build()
            .unwrap();
        assert_eq!(scene.active(), Some("A"));
        assert_eq!(scene.nav.engine().menu_names(), vec!["A", "B"]);
        assert_eq!(scene.focused("B"), Some(0));
    }

    #[test]
    fn hooks_are_logged() {
        let mut scene = Scene::builder()
            .menu(MenuSpec::horizontal("A", ["a0", "a1"]))
            .build()
            .unwrap();
        scene.press_all(&[keys::LEFT, keys::RIGHT, keys::RETURN]);
        assert_eq!(
            scene.take_hook_calls(),
            vec![
                HookCall::BeforeFirstItem { menu: "A".into() },
                HookCall::ActiveItemChanged {
                    menu: "A".into(),
                    index: 1
                },
                HookCall::Return { menu: "A".into() },
            ]
        );
        assert!(scene.hook_calls().is_empty());
    }

    #[test]
    fn after_last_jump_requires_items() {
        let mut scene = Scene::builder()
            .menu(MenuSpec::horizontal("Basic", ["play"]).after_last_jump("Logs"))
            .menu(MenuSpec::vertical("Logs", Vec::<String>::new()))
            .build()
            .unwrap();
        scene.press(keys::RIGHT);
        assert_eq!(scene.active(), Some("Basic"));
        scene.items("Logs").unwrap().push("entry");
        scene.press(keys::RIGHT);
        assert_eq!(scene.active(), Some("Logs"));
    }
}
