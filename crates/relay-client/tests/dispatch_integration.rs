//! Integration tests for the command dispatch pipeline.
//!
//! These exercise the application layer end-to-end: raw service-shaped JSON
//! commands through validation, routing, execution against the mock
//! injector, and acknowledgment packaging.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde_json::json;

use relay_client::application::dispatch::CommandDispatcher;
use relay_client::application::execute::{ActionExecutor, ExecutorTuning, InputInjector};
use relay_client::infrastructure::injection::mock::InjectedOp;
use relay_client::infrastructure::injection::MockInjector;
use relay_core::{ClickKind, ClickOffset, Command, CommandStatus, Mapping, WindowRegion};

fn fast_tuning() -> ExecutorTuning {
    ExecutorTuning {
        key_hold: Duration::from_millis(1),
        focus_pause: Duration::from_millis(1),
        settle: Duration::from_millis(1),
        drag_duration: Duration::from_millis(8),
        drag_distance_px: 50,
    }
}

fn dispatcher_with(injector: Arc<MockInjector>) -> CommandDispatcher {
    let mapping = Mapping {
        region: WindowRegion::new(0, 0, 800, 600).unwrap(),
        offset: ClickOffset::default(),
    };
    let executor = ActionExecutor::new(
        injector as Arc<dyn InputInjector>,
        Arc::new(RwLock::new(mapping)),
        fast_tuning(),
    );
    CommandDispatcher::new(executor)
}

fn command(value: serde_json::Value) -> Command {
    serde_json::from_value(value).expect("test command must deserialize")
}

#[tokio::test]
async fn test_positional_click_center_clicks_at_400_300() {
    let injector = Arc::new(MockInjector::new());
    let dispatcher = dispatcher_with(Arc::clone(&injector));

    let ack = dispatcher
        .dispatch(command(json!({
            "action": "positional_click",
            "data": { "x": 0.5, "y": 0.5 },
            "userId": "viewer-1"
        })))
        .await;

    assert_eq!(ack.status, CommandStatus::Success);
    // The real click happens at the mapped target (400, 300), after the
    // focus-assurance click at the window center.
    let ops = injector.ops();
    assert_eq!(
        ops,
        vec![
            InjectedOp::MoveTo(400, 300),
            InjectedOp::Click(ClickKind::Left),
            InjectedOp::MoveTo(400, 300),
            InjectedOp::Click(ClickKind::Left),
        ]
    );
}

#[tokio::test]
async fn test_invalid_key_never_reaches_injector() {
    let injector = Arc::new(MockInjector::new());
    let dispatcher = dispatcher_with(Arc::clone(&injector));

    let ack = dispatcher
        .dispatch(command(json!({
            "action": "key_press",
            "data": { "key": "sideways" },
            "userId": "viewer-2"
        })))
        .await;

    assert_eq!(ack.status, CommandStatus::Error);
    let reason = ack.error.expect("failure must carry a reason");
    assert!(reason.contains("invalid payload"), "got: {reason}");
    assert!(injector.ops().is_empty(), "executor must not be invoked");
}

#[tokio::test]
async fn test_unknown_action_never_reaches_injector() {
    let injector = Arc::new(MockInjector::new());
    let dispatcher = dispatcher_with(Arc::clone(&injector));

    let ack = dispatcher
        .dispatch(command(json!({
            "action": "teleport",
            "data": {},
            "userId": "viewer-3"
        })))
        .await;

    assert_eq!(ack.status, CommandStatus::Error);
    assert!(ack.error.unwrap().contains("unknown action"));
    assert!(injector.ops().is_empty());
}

#[tokio::test]
async fn test_legacy_stream_click_matches_canonical_positional_click() {
    let legacy_injector = Arc::new(MockInjector::new());
    let canonical_injector = Arc::new(MockInjector::new());

    dispatcher_with(Arc::clone(&legacy_injector))
        .dispatch(command(json!({
            "action": "stream_click",
            "data": { "zone": "inventory", "x": 0.25, "y": 0.75 },
            "userId": "viewer-4"
        })))
        .await;
    dispatcher_with(Arc::clone(&canonical_injector))
        .dispatch(command(json!({
            "action": "positional_click",
            "data": { "x": 0.25, "y": 0.75 },
            "userId": "viewer-4"
        })))
        .await;

    assert_eq!(legacy_injector.ops(), canonical_injector.ops());
    assert!(!legacy_injector.ops().is_empty());
}

#[tokio::test]
async fn test_primitive_clicks_use_original_type_names() {
    let injector = Arc::new(MockInjector::new());
    let dispatcher = dispatcher_with(Arc::clone(&injector));

    let ack = dispatcher
        .dispatch(command(json!({
            "action": "action",
            "data": { "type": "right-click" },
            "userId": "viewer-5"
        })))
        .await;

    assert_eq!(ack.status, CommandStatus::Success);
    // No coordinate, no focus-assurance: just the click.
    assert_eq!(injector.ops(), vec![InjectedOp::Click(ClickKind::Right)]);
}

#[tokio::test]
async fn test_key_press_taps_the_arrow_key() {
    let injector = Arc::new(MockInjector::new());
    let dispatcher = dispatcher_with(Arc::clone(&injector));

    let ack = dispatcher
        .dispatch(command(json!({
            "action": "key_press",
            "data": { "key": "left" },
            "userId": "viewer-6"
        })))
        .await;

    assert_eq!(ack.status, CommandStatus::Success);
    assert_eq!(
        injector.ops(),
        vec![
            InjectedOp::PressKey(relay_core::ArrowKey::Left),
            InjectedOp::ReleaseKey(relay_core::ArrowKey::Left),
        ]
    );
}

#[tokio::test]
async fn test_camera_drag_presses_drags_and_releases() {
    let injector = Arc::new(MockInjector::new());
    let dispatcher = dispatcher_with(Arc::clone(&injector));

    let ack = dispatcher
        .dispatch(command(json!({
            "action": "camera_drag",
            "data": { "key": "right" },
            "userId": "viewer-7"
        })))
        .await;

    assert_eq!(ack.status, CommandStatus::Success);
    let ops = injector.ops();
    assert!(ops.contains(&InjectedOp::ButtonDown(ClickKind::Left)));
    assert_eq!(*ops.last().unwrap(), InjectedOp::ButtonUp(ClickKind::Left));
}

#[tokio::test]
async fn test_injection_failure_becomes_error_acknowledgment() {
    let injector = Arc::new(MockInjector::failing());
    let dispatcher = dispatcher_with(Arc::clone(&injector));

    let ack = dispatcher
        .dispatch(command(json!({
            "action": "key_press",
            "data": { "key": "up" },
            "userId": "viewer-8"
        })))
        .await;

    // The failure is caught and folded into the acknowledgment; it never
    // panics or escapes the dispatcher.
    assert_eq!(ack.status, CommandStatus::Error);
    assert!(ack.error.unwrap().contains("input injection failed"));
}

#[tokio::test]
async fn test_every_ack_echoes_the_original_command() {
    let injector = Arc::new(MockInjector::new());
    let dispatcher = dispatcher_with(Arc::clone(&injector));

    for value in [
        json!({ "action": "key_press", "data": { "key": "up" }, "userId": "a" }),
        json!({ "action": "key_press", "data": { "key": "sideways" }, "userId": "b" }),
        json!({ "action": "nonsense", "data": { "extra": 1 }, "userId": "c" }),
    ] {
        let original = command(value);
        let ack = dispatcher.dispatch(original.clone()).await;
        assert_eq!(ack.command, original, "ack must carry the command verbatim");
        assert!(ack.timestamp > 0.0);
    }
}
