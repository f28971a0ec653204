//! Input action executor: one operation per primitive input action.
//!
//! The executor delegates raw key/mouse primitives to an [`InputInjector`]
//! implementation (the OS adapter lives in the infrastructure layer) and owns
//! the two disciplines that make remote-driven input safe:
//!
//! - **Focus-assurance** – before every positional action the target window
//!   is raised by a short click at its center. The pointer position is
//!   recorded first; click-type actions then move the pointer to the intended
//!   target, drag-type actions restore the recorded position because they
//!   operate relative to wherever the pointer is.
//!
//! - **Settle delays** – every primitive is followed by a short, non-zero
//!   pause that runs on success and failure alike, so upstream command spam
//!   cannot desynchronize the game state from what the next command assumes
//!   about it.
//!
//! Injector errors never escape the dispatcher; they are converted into a
//! failure outcome one layer up. Within this module they propagate as
//! [`InjectionError`] so the settle delay wrapper can still run.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use relay_core::{AbsolutePoint, ArrowKey, ClickKind, Mapping, NormalizedPoint};

/// Error type for OS-level input injection.
#[derive(Debug, Error)]
pub enum InjectionError {
    /// The OS collaborator reported a failure while performing a primitive.
    #[error("input injection failed: {0}")]
    Platform(String),
}

/// Platform-agnostic input injection trait.
///
/// All calls are synchronous and may fail; the OS adapter in the
/// infrastructure layer implements this, and tests substitute a recording
/// mock. The OS collaborator is also expected to provide the
/// pointer-to-screen-corner emergency stop; that convention lives below this
/// interface and is not modelled here.
pub trait InputInjector: Send + Sync {
    /// Current pointer position in absolute screen pixels.
    fn pointer_position(&self) -> Result<(i32, i32), InjectionError>;

    /// Moves the pointer to an absolute screen position.
    fn move_to(&self, x: i32, y: i32) -> Result<(), InjectionError>;

    /// Clicks (press + release) at the current pointer position.
    fn click(&self, kind: ClickKind) -> Result<(), InjectionError>;

    /// Presses a mouse button without releasing it.
    fn button_down(&self, kind: ClickKind) -> Result<(), InjectionError>;

    /// Releases a previously pressed mouse button.
    fn button_up(&self, kind: ClickKind) -> Result<(), InjectionError>;

    /// Presses an arrow key without releasing it.
    fn press_key(&self, key: ArrowKey) -> Result<(), InjectionError>;

    /// Releases an arrow key.
    fn release_key(&self, key: ArrowKey) -> Result<(), InjectionError>;
}

/// Tunable timing and distance constants for the executor.
///
/// None of these are correctness-critical, but the settle delay must be
/// non-zero: it is what keeps rapid-fire viewer commands from outrunning the
/// game's reaction to the previous input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorTuning {
    /// How long a tapped key is held down.
    pub key_hold: Duration,
    /// Pause after the focus-assurance click, before the real action.
    pub focus_pause: Duration,
    /// Pause after every primitive action, regardless of outcome.
    pub settle: Duration,
    /// Total duration of a camera drag.
    pub drag_duration: Duration,
    /// How far a camera drag moves the pointer, in pixels.
    pub drag_distance_px: i32,
}

impl Default for ExecutorTuning {
    fn default() -> Self {
        Self {
            key_hold: Duration::from_millis(50),
            focus_pause: Duration::from_millis(100),
            settle: Duration::from_millis(100),
            drag_duration: Duration::from_millis(200),
            drag_distance_px: 120,
        }
    }
}

/// Shared coordinate mapping configuration.
///
/// Read on every positional action; calibration replaces the whole value
/// under the lock (construct-then-swap), so a reader can never observe a
/// half-updated region.
pub type SharedMapping = Arc<RwLock<Mapping>>;

/// Number of interpolation steps for a camera drag.
const DRAG_STEPS: u32 = 8;

/// Performs primitive input actions against the target window.
pub struct ActionExecutor {
    injector: Arc<dyn InputInjector>,
    mapping: SharedMapping,
    tuning: ExecutorTuning,
}

impl ActionExecutor {
    pub fn new(injector: Arc<dyn InputInjector>, mapping: SharedMapping, tuning: ExecutorTuning) -> Self {
        Self {
            injector,
            mapping,
            tuning,
        }
    }

    fn current_mapping(&self) -> Mapping {
        // Lock poisoning only happens if a writer panicked mid-swap; the
        // swapped value is always whole either way.
        *self.mapping.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Taps an arrow key: press, brief hold, release.
    pub async fn tap_key(&self, key: ArrowKey) -> Result<(), InjectionError> {
        let result = self.tap_key_inner(key).await;
        self.settle().await;
        result
    }

    async fn tap_key_inner(&self, key: ArrowKey) -> Result<(), InjectionError> {
        debug!(?key, "tapping arrow key");
        self.injector.press_key(key)?;
        tokio::time::sleep(self.tuning.key_hold).await;
        self.injector.release_key(key)
    }

    /// Clicks at the current pointer position, no coordinate and no
    /// focus-assurance.
    pub async fn click_current(&self, kind: ClickKind) -> Result<(), InjectionError> {
        debug!(?kind, "clicking at current pointer position");
        let result = self.injector.click(kind);
        self.settle().await;
        result
    }

    /// Clicks at a stream-relative position, mapped through the current
    /// calibration and preceded by focus-assurance.
    pub async fn click_at(&self, kind: ClickKind, point: NormalizedPoint) -> Result<(), InjectionError> {
        let result = self.click_at_inner(kind, point).await;
        self.settle().await;
        result
    }

    async fn click_at_inner(&self, kind: ClickKind, point: NormalizedPoint) -> Result<(), InjectionError> {
        let mapping = self.current_mapping();
        let target = mapping.map(point);
        debug!(?kind, rel_x = point.rel_x, rel_y = point.rel_y, x = target.x, y = target.y, "positional click");
        self.assure_focus(&mapping, Some(target)).await?;
        self.injector.click(kind)
    }

    /// Rotates the camera: a relative drag from the current pointer position
    /// in the given direction, with focus-assurance but no pointer retarget.
    pub async fn camera_drag(&self, key: ArrowKey) -> Result<(), InjectionError> {
        let result = self.camera_drag_inner(key).await;
        self.settle().await;
        result
    }

    async fn camera_drag_inner(&self, key: ArrowKey) -> Result<(), InjectionError> {
        let mapping = self.current_mapping();
        // Restore the recorded position: the drag is relative to wherever
        // the pointer was before focus-assurance moved it.
        self.assure_focus(&mapping, None).await?;

        let d = self.tuning.drag_distance_px;
        let (dx, dy) = match key {
            ArrowKey::Up => (0, -d),
            ArrowKey::Down => (0, d),
            ArrowKey::Left => (-d, 0),
            ArrowKey::Right => (d, 0),
        };
        debug!(?key, dx, dy, "camera drag");

        let (start_x, start_y) = self.injector.pointer_position()?;
        self.injector.button_down(ClickKind::Left)?;
        let step_pause = self.tuning.drag_duration / DRAG_STEPS;
        for step in 1..=DRAG_STEPS {
            let frac = step as f64 / DRAG_STEPS as f64;
            let x = start_x + (dx as f64 * frac).round() as i32;
            let y = start_y + (dy as f64 * frac).round() as i32;
            // Release the button even if a mid-drag move fails, otherwise
            // the OS is left with a stuck button.
            if let Err(e) = self.injector.move_to(x, y) {
                let _ = self.injector.button_up(ClickKind::Left);
                return Err(e);
            }
            tokio::time::sleep(step_pause).await;
        }
        self.injector.button_up(ClickKind::Left)
    }

    /// Raises the target window with a short click at its center.
    ///
    /// The pointer position is recorded first. Afterwards the pointer is
    /// moved to `target` when one is given (click-type actions), or restored
    /// to the recorded position (drag-type actions).
    async fn assure_focus(
        &self,
        mapping: &Mapping,
        target: Option<AbsolutePoint>,
    ) -> Result<(), InjectionError> {
        let (orig_x, orig_y) = self.injector.pointer_position()?;
        let center = mapping.region.center();
        self.injector.move_to(center.x, center.y)?;
        self.injector.click(ClickKind::Left)?;
        tokio::time::sleep(self.tuning.focus_pause).await;
        match target {
            Some(t) => self.injector.move_to(t.x, t.y),
            None => self.injector.move_to(orig_x, orig_y),
        }
    }

    async fn settle(&self) {
        tokio::time::sleep(self.tuning.settle).await;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
