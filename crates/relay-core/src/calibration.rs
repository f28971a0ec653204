//! Derivation of a window rectangle and reference points from operator
//! samples.
//!
//! Calibration is how the operator teaches the relay where the target window
//! sits without typing any numbers: they park the pointer on six locations in
//! a fixed order and confirm each one. The four corner samples yield the
//! window rectangle; the last two samples (the first inventory slot and an
//! arbitrary test item) become normalized reference points the operator uses
//! to visually verify the candidate mapping before committing it.
//!
//! Only the pure math lives here. The interactive prompt/confirm loop, the
//! verification clicks, and the commit are in `relay-client`, which keeps
//! this derivation trivially testable.

use crate::geometry::{GeometryError, NormalizedPoint, WindowRegion};

/// The six sample positions, in the exact order they are collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleLabel {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    FirstInventorySlot,
    TestItem,
}

impl SampleLabel {
    /// All labels in collection order.
    pub const ORDER: [SampleLabel; 6] = [
        SampleLabel::TopLeft,
        SampleLabel::TopRight,
        SampleLabel::BottomLeft,
        SampleLabel::BottomRight,
        SampleLabel::FirstInventorySlot,
        SampleLabel::TestItem,
    ];

    /// Operator-facing instruction for this sample.
    pub fn instruction(&self) -> &'static str {
        match self {
            SampleLabel::TopLeft => "top-left corner of the game area",
            SampleLabel::TopRight => "top-right corner of the game area",
            SampleLabel::BottomLeft => "bottom-left corner of the game area",
            SampleLabel::BottomRight => "bottom-right corner of the game area",
            SampleLabel::FirstInventorySlot => "first inventory slot",
            SampleLabel::TestItem => "any test item you can click",
        }
    }
}

/// One accepted sample: a label plus the pointer position at accept time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationSample {
    pub label: SampleLabel,
    pub x: i32,
    pub y: i32,
}

/// The outcome of a successful derivation: a candidate region plus the two
/// verification reference points expressed relative to it.
///
/// The reference points are for operator verification only; they are never
/// persisted into the engine's runtime state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationResult {
    pub region: WindowRegion,
    pub first_slot: NormalizedPoint,
    pub test_item: NormalizedPoint,
}

/// Derives a candidate window region and reference points from the six
/// samples.
///
/// The rectangle is the tightest one covering the four corner samples:
/// `left = min` of the two left-side Xs, `right = max` of the two right-side
/// Xs, and analogously for top/bottom. Slightly misplaced corner samples
/// therefore err toward a larger window rather than clipping it.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidGeometry`] when the corner samples
/// produce a non-positive width or height (for example the operator sampled
/// the corners in the wrong order). The caller must leave the live mapping
/// untouched in that case.
pub fn derive_calibration(samples: &[CalibrationSample; 6]) -> Result<CalibrationResult, GeometryError> {
    let find = |label: SampleLabel| {
        // ORDER is enforced by the collection loop, but derivation looks
        // samples up by label so it cannot silently mix corners up.
        samples
            .iter()
            .find(|s| s.label == label)
            .copied()
            .unwrap_or(CalibrationSample { label, x: 0, y: 0 })
    };

    let top_left = find(SampleLabel::TopLeft);
    let top_right = find(SampleLabel::TopRight);
    let bottom_left = find(SampleLabel::BottomLeft);
    let bottom_right = find(SampleLabel::BottomRight);

    let left = top_left.x.min(bottom_left.x);
    let right = top_right.x.max(bottom_right.x);
    let top = top_left.y.min(top_right.y);
    let bottom = bottom_left.y.max(bottom_right.y);

    let width = right as i64 - left as i64;
    let height = bottom as i64 - top as i64;
    if width <= 0 || height <= 0 {
        return Err(GeometryError::InvalidGeometry { width, height });
    }

    let region = WindowRegion::new(left, top, width as u32, height as u32)?;

    let relative = |s: CalibrationSample| NormalizedPoint {
        rel_x: (s.x - left) as f64 / width as f64,
        rel_y: (s.y - top) as f64 / height as f64,
    };

    Ok(CalibrationResult {
        region,
        first_slot: relative(find(SampleLabel::FirstInventorySlot)),
        test_item: relative(find(SampleLabel::TestItem)),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
