//! Command dispatcher: one command in, exactly one acknowledgment out.
//!
//! Each command runs a single-step pipeline: received → validated →
//! executed → acknowledged. Validation resolves the loosely-typed command
//! into the closed [`RelayAction`] set before anything physical happens;
//! unknown actions and bad payloads short-circuit to a failure acknowledgment
//! without touching the executor. Injection failures are caught at this
//! boundary and folded into the acknowledgment — they never crash the
//! dispatch loop.
//!
//! No command is ever dropped silently, and nothing here retries.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{info, warn};

use relay_core::{Acknowledgment, ActionOutcome, Command, RelayAction};

use super::execute::ActionExecutor;

/// Seconds since the Unix epoch as a float, matching the service's
/// acknowledgment timestamp convention.
pub fn unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Validates, routes, and executes inbound commands sequentially.
pub struct CommandDispatcher {
    executor: ActionExecutor,
}

impl CommandDispatcher {
    pub fn new(executor: ActionExecutor) -> Self {
        Self { executor }
    }

    /// Runs one command's full pipeline and returns its acknowledgment.
    ///
    /// The returned acknowledgment always carries the original command for
    /// upstream correlation, whatever the outcome.
    pub async fn dispatch(&self, command: Command) -> Acknowledgment {
        let user = command.user_id.as_str();
        info!(action = %command.action, user_id = %user, "command received");

        let outcome = match RelayAction::from_command(&command) {
            Ok(action) => match self.run(action).await {
                Ok(()) => ActionOutcome::Success,
                Err(e) => ActionOutcome::failure(e),
            },
            Err(e) => ActionOutcome::failure(e),
        };

        match &outcome {
            ActionOutcome::Success => info!(action = %command.action, "command completed"),
            ActionOutcome::Failure { reason } => {
                warn!(action = %command.action, %reason, "command failed")
            }
        }

        Acknowledgment::new(command, outcome, unix_timestamp())
    }

    /// Routes a validated action to exactly one executor operation.
    async fn run(&self, action: RelayAction) -> Result<(), super::execute::InjectionError> {
        match action {
            RelayAction::KeyPress { key } => self.executor.tap_key(key).await,
            RelayAction::PrimitiveClick { kind } => self.executor.click_current(kind).await,
            RelayAction::PositionalClick { x, y } => {
                self.executor
                    .click_at(
                        relay_core::ClickKind::Left,
                        relay_core::NormalizedPoint { rel_x: x, rel_y: y },
                    )
                    .await
            }
            RelayAction::PositionalRightClick { x, y } => {
                self.executor
                    .click_at(
                        relay_core::ClickKind::Right,
                        relay_core::NormalizedPoint { rel_x: x, rel_y: y },
                    )
                    .await
            }
            RelayAction::CameraDrag { key } => self.executor.camera_drag(key).await,
        }
    }
}
