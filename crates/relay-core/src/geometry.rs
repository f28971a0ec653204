//! Window geometry and the normalized-to-absolute coordinate transform.
//!
//! Viewers interact with a scaled-down video stream of the target window, so
//! their click positions arrive as fractions of the stream surface (nominally
//! 0.0–1.0). Before any click can be injected, that fraction must be mapped
//! onto the actual window rectangle on the local screen, plus a static
//! per-setup correction offset.
//!
//! The transform is pure and total: identical inputs always produce the
//! identical output, and a fraction outside [0, 1] simply lands outside the
//! window, which is legal. Rounding to integer pixels happens exactly once,
//! at the end, so a normalized point that is reused never accumulates
//! rounding error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when constructing or deriving window geometry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    /// The rectangle has non-positive width or height.
    #[error("invalid geometry: derived region is {width}x{height}, both sides must be positive")]
    InvalidGeometry { width: i64, height: i64 },
}

/// The target window's rectangle in absolute screen pixels.
///
/// Set at startup from the configuration file and replaced wholesale by a
/// successful calibration run. Never partially updated: calibration builds a
/// complete new region and swaps it in, so no positional action can observe
/// a half-written rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRegion {
    /// X coordinate of the window's left edge.
    pub origin_x: i32,
    /// Y coordinate of the window's top edge.
    pub origin_y: i32,
    /// Width in pixels. Always positive.
    pub width: u32,
    /// Height in pixels. Always positive.
    pub height: u32,
}

impl WindowRegion {
    /// Creates a region, rejecting degenerate rectangles.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidGeometry`] if `width` or `height`
    /// is zero.
    pub fn new(origin_x: i32, origin_y: i32, width: u32, height: u32) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::InvalidGeometry {
                width: width as i64,
                height: height as i64,
            });
        }
        Ok(Self {
            origin_x,
            origin_y,
            width,
            height,
        })
    }

    /// Returns the center of the region in absolute screen pixels.
    ///
    /// Used by focus-assurance: a short click here raises the window
    /// without hitting anything interactive near its edges.
    pub fn center(&self) -> AbsolutePoint {
        AbsolutePoint {
            x: self.origin_x + (self.width / 2) as i32,
            y: self.origin_y + (self.height / 2) as i32,
        }
    }
}

/// A static pixel correction added after scaling.
///
/// Compensates for window decorations or stream letterboxing that shift the
/// visible stream surface relative to the captured window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClickOffset {
    pub dx: i32,
    pub dy: i32,
}

/// A position expressed as fractions of the target region's size.
///
/// Values are nominally in [0, 1] but this is not enforced: an out-of-range
/// fraction maps to a point outside the window, which the caller may or may
/// not want.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub rel_x: f64,
    pub rel_y: f64,
}

/// An absolute position in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsolutePoint {
    pub x: i32,
    pub y: i32,
}

/// The process-wide coordinate mapping configuration: window rectangle plus
/// click offset.
///
/// Read on every positional action; replaced atomically (construct-then-swap)
/// by a committed calibration run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    pub region: WindowRegion,
    pub offset: ClickOffset,
}

impl Mapping {
    /// Maps a normalized point through this configuration.
    pub fn map(&self, point: NormalizedPoint) -> AbsolutePoint {
        map_to_absolute(point, &self.region, &self.offset)
    }
}

/// Maps a normalized point onto a window rectangle.
///
/// `abs_x = origin_x + rel_x * width + dx`, analogous for Y. The floating
/// point product is rounded to the nearest pixel only here, at the point of
/// use, never earlier.
pub fn map_to_absolute(
    point: NormalizedPoint,
    region: &WindowRegion,
    offset: &ClickOffset,
) -> AbsolutePoint {
    let x = region.origin_x as f64 + point.rel_x * region.width as f64 + offset.dx as f64;
    let y = region.origin_y as f64 + point.rel_y * region.height as f64 + offset.dy as f64;
    AbsolutePoint {
        x: x.round() as i32,
        y: y.round() as i32,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn region_800x600() -> WindowRegion {
        WindowRegion::new(0, 0, 800, 600).unwrap()
    }

    #[test]
    fn test_map_center_of_region() {
        let abs = map_to_absolute(
            NormalizedPoint {
                rel_x: 0.5,
                rel_y: 0.5,
            },
            &region_800x600(),
            &ClickOffset::default(),
        );
        assert_eq!(abs, AbsolutePoint { x: 400, y: 300 });
    }

    #[test]
    fn test_map_applies_origin_and_offset() {
        let region = WindowRegion::new(100, 50, 800, 600).unwrap();
        let offset = ClickOffset { dx: 7, dy: -3 };
        let abs = map_to_absolute(
            NormalizedPoint {
                rel_x: 0.25,
                rel_y: 1.0,
            },
            &region,
            &offset,
        );
        assert_eq!(abs, AbsolutePoint { x: 307, y: 647 });
    }

    #[test]
    fn test_map_output_stays_within_offset_region_for_unit_fractions() {
        let region = WindowRegion::new(-40, 220, 1024, 768).unwrap();
        let offset = ClickOffset { dx: 11, dy: 2 };
        for i in 0..=10 {
            for j in 0..=10 {
                let p = NormalizedPoint {
                    rel_x: i as f64 / 10.0,
                    rel_y: j as f64 / 10.0,
                };
                let abs = map_to_absolute(p, &region, &offset);
                assert!(abs.x >= region.origin_x + offset.dx);
                assert!(abs.x <= region.origin_x + region.width as i32 + offset.dx);
                assert!(abs.y >= region.origin_y + offset.dy);
                assert!(abs.y <= region.origin_y + region.height as i32 + offset.dy);
            }
        }
    }

    #[test]
    fn test_map_is_deterministic() {
        let p = NormalizedPoint {
            rel_x: 0.333,
            rel_y: 0.667,
        };
        let region = region_800x600();
        let offset = ClickOffset { dx: 1, dy: 1 };
        let first = map_to_absolute(p, &region, &offset);
        for _ in 0..100 {
            assert_eq!(map_to_absolute(p, &region, &offset), first);
        }
    }

    #[test]
    fn test_out_of_range_fraction_maps_outside_window() {
        let abs = map_to_absolute(
            NormalizedPoint {
                rel_x: 1.5,
                rel_y: -0.5,
            },
            &region_800x600(),
            &ClickOffset::default(),
        );
        assert_eq!(abs, AbsolutePoint { x: 1200, y: -300 });
    }

    #[test]
    fn test_rounding_happens_once_at_the_end() {
        // 0.1 * 3 = 0.30000000000000004; mapping the summed fraction directly
        // must match mapping it as one product, not three rounded steps.
        let region = WindowRegion::new(0, 0, 1000, 1000).unwrap();
        let abs = map_to_absolute(
            NormalizedPoint {
                rel_x: 0.1 + 0.1 + 0.1,
                rel_y: 0.0,
            },
            &region,
            &ClickOffset::default(),
        );
        assert_eq!(abs.x, 300);
    }

    #[test]
    fn test_degenerate_region_rejected() {
        assert!(matches!(
            WindowRegion::new(0, 0, 0, 600),
            Err(GeometryError::InvalidGeometry { .. })
        ));
        assert!(matches!(
            WindowRegion::new(0, 0, 800, 0),
            Err(GeometryError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_region_center() {
        let region = WindowRegion::new(100, 100, 800, 600).unwrap();
        assert_eq!(region.center(), AbsolutePoint { x: 500, y: 400 });
    }
}
