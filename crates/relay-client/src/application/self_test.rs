//! Canned input exercise for verifying the setup before going live.
//!
//! Runs every arrow key tap and both primitive clicks through the real
//! executor, with a pause between steps so the operator can watch the
//! target window react. Failures are reported but do not stop the sequence;
//! the operator wants to see everything that is broken, not just the first
//! thing.

use std::time::Duration;

use tracing::{info, warn};

use relay_core::{ArrowKey, ClickKind};

use super::execute::ActionExecutor;

/// Pause between self-test steps so each reaction is visible.
const STEP_PAUSE: Duration = Duration::from_millis(500);

/// Exercises arrow keys and primitive clicks in sequence.
///
/// Returns the number of failed steps.
pub async fn run_self_test(executor: &ActionExecutor) -> usize {
    let mut failures = 0;

    info!("testing arrow keys");
    for key in [ArrowKey::Up, ArrowKey::Down, ArrowKey::Left, ArrowKey::Right] {
        if let Err(e) = executor.tap_key(key).await {
            warn!(?key, error = %e, "arrow key failed");
            failures += 1;
        }
        tokio::time::sleep(STEP_PAUSE).await;
    }

    info!("testing clicks");
    for kind in [ClickKind::Left, ClickKind::Right] {
        if let Err(e) = executor.click_current(kind).await {
            warn!(?kind, error = %e, "click failed");
            failures += 1;
        }
        tokio::time::sleep(STEP_PAUSE).await;
    }

    if failures == 0 {
        info!("self-test complete, all steps succeeded");
    } else {
        warn!(failures, "self-test complete with failures");
    }
    failures
}
