//! Interactive calibration: derive the window rectangle from operator
//! samples, verify it live, then commit or discard.
//!
//! The operator parks the pointer on six locations in a fixed order (four
//! window corners, the first inventory slot, an arbitrary test item) and
//! confirms each one. Confirmation is modelled by the [`OperatorPrompt`]
//! trait — a synchronous request/confirm step, one sample per explicit
//! confirmation — so the procedure is testable without a terminal.
//!
//! After derivation the engine immediately performs a mapped click at each
//! reference point *through the candidate region* so the operator can watch
//! whether the clicks land where they sampled. Only an explicit final accept
//! swaps the candidate into the live mapping; a cancel at any step, or a
//! degenerate rectangle, leaves the previous configuration untouched. This
//! verify-before-commit step is the procedure's core safety property:
//! a silently committed miscalibration would misdirect all future input.
//!
//! Calibration is an exclusive mode. It is reached through its own CLI
//! subcommand and never runs concurrently with the dispatch loop, since both
//! touch the shared mapping configuration.

use std::sync::{Arc, RwLock};

use thiserror::Error;
use tracing::info;

use relay_core::{
    derive_calibration, CalibrationSample, ClickKind, GeometryError, Mapping, SampleLabel,
};

use super::execute::{ActionExecutor, ExecutorTuning, InjectionError, InputInjector, SharedMapping};

/// Operator response to a confirm step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Cancel,
}

/// Synchronous operator confirmation source.
///
/// The CLI implementation reads stdin; tests script the decisions.
pub trait OperatorPrompt {
    /// Asks the operator to position the pointer for `label` and confirm.
    fn confirm_sample(&mut self, label: SampleLabel) -> std::io::Result<Decision>;

    /// Asks the operator to confirm the candidate after the verification
    /// clicks have been performed.
    fn confirm_commit(&mut self) -> std::io::Result<Decision>;
}

/// Errors that abort a calibration run. The live mapping is never modified
/// on any of these paths.
#[derive(Debug, Error)]
pub enum CalibrationError {
    /// The corner samples produced a non-positive rectangle.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// The OS collaborator failed while sampling or verifying.
    #[error(transparent)]
    Injection(#[from] InjectionError),

    /// The confirmation channel failed (e.g. stdin closed).
    #[error("operator prompt failed: {0}")]
    Prompt(#[from] std::io::Error),
}

/// How a completed (non-erroring) calibration run ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationOutcome {
    /// The candidate was accepted and is now the live mapping.
    Committed(Mapping),
    /// The operator cancelled; the previous mapping is untouched.
    Cancelled,
}

/// Runs the interactive calibration procedure against a live mapping.
pub struct Calibrator {
    injector: Arc<dyn InputInjector>,
    mapping: SharedMapping,
    tuning: ExecutorTuning,
}

impl Calibrator {
    pub fn new(injector: Arc<dyn InputInjector>, mapping: SharedMapping, tuning: ExecutorTuning) -> Self {
        Self {
            injector,
            mapping,
            tuning,
        }
    }

    /// Collects the six samples, derives and verifies a candidate, and
    /// commits it on the operator's final accept.
    ///
    /// # Errors
    ///
    /// [`CalibrationError::Geometry`] when the samples are degenerate;
    /// [`CalibrationError::Injection`] when sampling or the verification
    /// clicks fail. In every error and cancel path the live mapping keeps
    /// its previous value.
    pub async fn run(&self, prompt: &mut dyn OperatorPrompt) -> Result<CalibrationOutcome, CalibrationError> {
        let mut samples = Vec::with_capacity(SampleLabel::ORDER.len());
        for label in SampleLabel::ORDER {
            match prompt.confirm_sample(label)? {
                Decision::Cancel => {
                    info!(?label, "calibration cancelled while sampling");
                    return Ok(CalibrationOutcome::Cancelled);
                }
                Decision::Accept => {
                    let (x, y) = self.injector.pointer_position()?;
                    info!(?label, x, y, "sample accepted");
                    samples.push(CalibrationSample { label, x, y });
                }
            }
        }
        let samples: [CalibrationSample; 6] =
            samples.try_into().expect("exactly six samples collected");

        let derived = derive_calibration(&samples)?;
        info!(
            origin_x = derived.region.origin_x,
            origin_y = derived.region.origin_y,
            width = derived.region.width,
            height = derived.region.height,
            "candidate region derived"
        );

        // The candidate keeps the currently configured click offset; only
        // the rectangle is being recalibrated.
        let offset = self.mapping.read().unwrap_or_else(|e| e.into_inner()).offset;
        let candidate = Mapping {
            region: derived.region,
            offset,
        };

        // Live verification: click both reference points through the
        // candidate so the operator can visually confirm before committing.
        let verifier = ActionExecutor::new(
            Arc::clone(&self.injector),
            Arc::new(RwLock::new(candidate)),
            self.tuning,
        );
        info!("verification: clicking first inventory slot, then test item");
        verifier.click_at(ClickKind::Left, derived.first_slot).await?;
        verifier.click_at(ClickKind::Left, derived.test_item).await?;

        match prompt.confirm_commit()? {
            Decision::Cancel => {
                info!("candidate discarded; previous mapping kept");
                Ok(CalibrationOutcome::Cancelled)
            }
            Decision::Accept => {
                // Construct-then-swap: the whole mapping is replaced in one
                // write so no concurrent reader sees a partial update.
                *self.mapping.write().unwrap_or_else(|e| e.into_inner()) = candidate;
                info!("calibration committed");
                Ok(CalibrationOutcome::Committed(candidate))
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
