//! Navigation scenarios driven through full scenes.

use std::cell::RefCell;
use std::rc::Rc;

use tvnav_core::NavAction;
use tvnav_focus::{Edge, NavCmd, NavEvent};
use tvnav_harness::keys::{DOWN, ENTER, LEFT, MEDIA_PLAY_PAUSE, RETURN, RIGHT, UP};
use tvnav_harness::{HookCall, MenuSpec, Scene};
use tvnav_input::{ItemTarget, Route};

fn after_last(menu: &str) -> HookCall {
    HookCall::AfterLastItem { menu: menu.into() }
}

#[test]
fn list_scenario_clamps_and_refires_boundary() {
    let mut scene = Scene::builder()
        .menu(MenuSpec::vertical("List", ["a", "b", "c"]))
        .build()
        .unwrap();

    scene.press(DOWN);
    scene.press(DOWN);
    assert_eq!(scene.focused("List"), Some(2));
    assert!(scene.nav.engine().is_focus_marked("List", "c"));
    let moves = scene.take_hook_calls();
    assert_eq!(moves.len(), 2);
    assert!(!moves.contains(&after_last("List")));

    scene.press(DOWN);
    assert_eq!(scene.focused("List"), Some(2));
    assert_eq!(scene.take_hook_calls(), vec![after_last("List")]);

    scene.press(DOWN);
    assert_eq!(scene.focused("List"), Some(2));
    assert_eq!(scene.take_hook_calls(), vec![after_last("List")]);
    assert_eq!(scene.nav.engine().focus_marked_count(), 1);
}

#[test]
fn no_wraparound_at_first_item() {
    let mut scene = Scene::builder()
        .menu(MenuSpec::horizontal("Row", ["a", "b"]))
        .build()
        .unwrap();
    scene.press(LEFT);
    assert_eq!(scene.focused("Row"), Some(0));
    assert_eq!(
        scene.take_hook_calls(),
        vec![HookCall::BeforeFirstItem { menu: "Row".into() }]
    );
    let events = scene.take_events();
    assert_eq!(
        events,
        vec![NavEvent::BoundaryReached {
            menu: "Row".into(),
            edge: Edge::First
        }]
    );
}

#[test]
fn sync_propagates_focused_index() {
    let mut scene = Scene::builder()
        .menu(MenuSpec::horizontal("Top", ["t0", "t1", "t2", "t3"]).next("Bottom"))
        .menu(
            MenuSpec::horizontal("Bottom", ["b0", "b1", "b2", "b3"])
                .previous("Top")
                .sync_with("Top"),
        )
        .build()
        .unwrap();
    scene.press_all(&[RIGHT, RIGHT, RIGHT, DOWN]);
    assert_eq!(scene.active(), Some("Bottom"));
    assert_eq!(scene.focused("Bottom"), Some(3));
    assert!(scene.nav.engine().is_focus_marked("Bottom", "b3"));
    assert_eq!(
        scene.take_hook_calls().last(),
        Some(&HookCall::NextMenu { menu: "Top".into() })
    );
}

#[test]
fn sync_only_applies_from_the_named_source() {
    let mut scene = Scene::builder()
        .menu(MenuSpec::horizontal("Top", ["t0", "t1", "t2"]).next("Bottom"))
        .menu(MenuSpec::horizontal("Bottom", ["b0", "b1", "b2"]).previous("Top"))
        .build()
        .unwrap();
    scene.press_all(&[RIGHT, RIGHT, DOWN]);
    assert_eq!(scene.focused("Bottom"), Some(0));
}

#[test]
fn dangling_edges_are_cleared_on_unregister() {
    let mut scene = Scene::builder()
        .menu(MenuSpec::horizontal("A", ["a0"]).next("B"))
        .menu(MenuSpec::horizontal("B", ["b0"]).previous("A").next("C"))
        .menu(MenuSpec::horizontal("C", ["c0"]).previous("B"))
        .build()
        .unwrap();
    assert!(scene.nav.engine_mut().unregister_menu("B"));
    let engine = scene.nav.engine();
    assert_eq!(engine.get_menu("A").and_then(|m| m.next_menu()), None);
    assert_eq!(engine.get_menu("C").and_then(|m| m.previous_menu()), None);

    scene.press(DOWN);
    assert_eq!(scene.active(), Some("A"));
    assert!(scene.take_hook_calls().is_empty());
}

#[test]
fn empty_target_menu_is_a_noop() {
    let mut scene = Scene::builder()
        .menu(MenuSpec::horizontal("Basic", ["play", "stop"]).next("Logs"))
        .menu(MenuSpec::vertical("Logs", Vec::<String>::new()).previous("Basic"))
        .build()
        .unwrap();
    scene.press(RIGHT);
    scene.take_hook_calls();
    scene.take_events();

    scene.press(DOWN);
    assert_eq!(scene.active(), Some("Basic"));
    assert_eq!(scene.focused("Basic"), Some(1));
    assert!(scene.nav.engine().is_focus_marked("Basic", "stop"));
    assert!(scene.take_hook_calls().is_empty());
    assert!(scene.take_events().is_empty());

    scene.items("Logs").unwrap().push("first entry");
    scene.press(DOWN);
    assert_eq!(scene.active(), Some("Logs"));
}

#[test]
fn button_short_circuits_engine_enter() {
    let mut scene = Scene::builder()
        .menu(MenuSpec::horizontal("Basic", ["play", "stop"]).selection_visible())
        .build()
        .unwrap();
    scene
        .nav
        .input_mut()
        .add_handler_for_button(ItemTarget::new("Basic", "play"), |_| NavCmd::None);

    let outcome = scene.press(ENTER);
    assert_eq!(outcome.route, Route::Buttons(1));
    assert!(!scene.selection_marked("Basic", "play"));

    scene.press(RIGHT);
    let outcome = scene.press(ENTER);
    assert!(matches!(outcome.route, Route::Navigated(_)));
    assert_eq!(scene.selected("Basic"), Some(1));
    assert!(scene.selection_marked("Basic", "stop"));

    // Confirmed index survives focus moving away; the marker does not.
    scene.press(LEFT);
    assert_eq!(scene.selected("Basic"), Some(1));
    assert!(!scene.selection_marked("Basic", "stop"));
}

#[test]
fn first_focus_marked_child_per_group() {
    let mut scene = Scene::builder()
        .menu(MenuSpec::horizontal("Basic", ["play"]).next("Logs"))
        .menu(MenuSpec::vertical("Logs", ["l0", "l1", "l2"]).previous("Basic"))
        .build()
        .unwrap();
    let hits = Rc::new(RefCell::new(Vec::new()));
    for group in ["Logs", "Basic", "Logs"] {
        let hits = hits.clone();
        scene
            .nav
            .input_mut()
            .add_handler_for_delegated(group, move |item| {
                hits.borrow_mut().push(format!("{group}:{}", item.key));
                NavCmd::None
            });
    }
    scene.press_all(&[DOWN, DOWN, ENTER]);
    assert_eq!(
        *hits.borrow(),
        vec!["Logs:l1".to_string(), "Logs:l1".to_string()]
    );
}

#[test]
fn return_key_routes_to_hook() {
    let mut scene = Scene::builder()
        .menu(MenuSpec::horizontal("Basic", ["play"]))
        .build()
        .unwrap();
    let outcome = scene.press(RETURN);
    assert!(matches!(outcome.route, Route::Navigated(_)));
    assert_eq!(
        scene.hook_calls(),
        vec![HookCall::Return { menu: "Basic".into() }]
    );
}

#[test]
fn media_key_handler_registers_host_key_once() {
    let mut scene = Scene::builder()
        .menu(MenuSpec::horizontal("Basic", ["play"]))
        .build()
        .unwrap();
    for _ in 0..2 {
        scene
            .nav
            .input_mut()
            .register_key_handler(MEDIA_PLAY_PAUSE, Some("MediaPlayPause"), |_| {
                NavCmd::Disable
            })
            .unwrap();
    }
    assert_eq!(scene.host.registered(), vec!["MediaPlayPause".to_string()]);
    let outcome = scene.press(MEDIA_PLAY_PAUSE);
    assert_eq!(outcome.key_handlers, 2);
    assert!(!scene.nav.engine().is_enabled());
    assert_eq!(scene.press(UP).route, Route::Ignored(NavAction::Up));
}

#[test]
fn unknown_code_is_unhandled() {
    let mut scene = Scene::builder()
        .menu(MenuSpec::horizontal("Basic", ["play"]))
        .build()
        .unwrap();
    assert!(scene.press(12345u32).is_unhandled());
    assert!(scene.hook_calls().is_empty());
}
