//! Mock input injector for tests.
//!
//! The real injector moves the cursor and presses keys on whatever machine
//! runs the tests, so the suite records instead: every call is pushed into a
//! single ordered log that assertions can inspect. Ordering matters here —
//! the focus-assurance contract is "center click *before* target click" —
//! which is why there is one combined log rather than one vector per
//! primitive.
//!
//! Set `should_fail` to make every call return an error, for exercising the
//! failure-to-outcome conversion in the dispatcher.

use std::sync::Mutex;

use crate::application::execute::{InjectionError, InputInjector};
use relay_core::{ArrowKey, ClickKind};

/// One recorded injector call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectedOp {
    MoveTo(i32, i32),
    Click(ClickKind),
    ButtonDown(ClickKind),
    ButtonUp(ClickKind),
    PressKey(ArrowKey),
    ReleaseKey(ArrowKey),
}

/// Records all injector calls without performing any OS input.
#[derive(Default)]
pub struct MockInjector {
    /// Every call, in order.
    pub ops: Mutex<Vec<InjectedOp>>,
    /// Simulated pointer position, updated by `move_to`.
    pub pointer: Mutex<(i32, i32)>,
    /// When `true`, every method returns an `InjectionError::Platform`.
    pub should_fail: bool,
}

impl MockInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// A failing injector for error-path tests.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Snapshot of the recorded calls.
    pub fn ops(&self) -> Vec<InjectedOp> {
        self.ops.lock().unwrap().clone()
    }

    fn record(&self, op: InjectedOp) -> Result<(), InjectionError> {
        if self.should_fail {
            return Err(InjectionError::Platform("mock failure".to_string()));
        }
        self.ops.lock().unwrap().push(op);
        Ok(())
    }
}

impl InputInjector for MockInjector {
    fn pointer_position(&self) -> Result<(i32, i32), InjectionError> {
        if self.should_fail {
            return Err(InjectionError::Platform("mock failure".to_string()));
        }
        Ok(*self.pointer.lock().unwrap())
    }

    fn move_to(&self, x: i32, y: i32) -> Result<(), InjectionError> {
        self.record(InjectedOp::MoveTo(x, y))?;
        *self.pointer.lock().unwrap() = (x, y);
        Ok(())
    }

    fn click(&self, kind: ClickKind) -> Result<(), InjectionError> {
        self.record(InjectedOp::Click(kind))
    }

    fn button_down(&self, kind: ClickKind) -> Result<(), InjectionError> {
        self.record(InjectedOp::ButtonDown(kind))
    }

    fn button_up(&self, kind: ClickKind) -> Result<(), InjectionError> {
        self.record(InjectedOp::ButtonUp(kind))
    }

    fn press_key(&self, key: ArrowKey) -> Result<(), InjectionError> {
        self.record(InjectedOp::PressKey(key))
    }

    fn release_key(&self, key: ArrowKey) -> Result<(), InjectionError> {
        self.record(InjectedOp::ReleaseKey(key))
    }
}
