//! # relay-core
//!
//! Shared library for the stream relay client containing the coordinate
//! mapping engine, calibration derivation, the command model, and the JSON
//! wire protocol spoken with the relay service.
//!
//! This crate is pure logic: it has zero dependencies on OS input APIs,
//! network sockets, or timers. Everything that touches the outside world
//! lives in `relay-client`.
//!
//! # Architecture overview
//!
//! The relay client receives discrete action commands from a network service
//! (issued by remote viewers) and replays them as real keyboard and mouse
//! input against a single target application window. This crate defines:
//!
//! - **`geometry`** – The normalized-to-absolute coordinate transform.
//!   Viewers click on a video stream; their clicks arrive as fractions of
//!   the stream surface and must be mapped onto the actual window rectangle
//!   on the local screen.
//!
//! - **`calibration`** – Pure derivation of a window rectangle and two
//!   reference points from six operator-supplied sample points. The
//!   interactive sampling loop itself lives in `relay-client`.
//!
//! - **`command`** – The inbound command model and its validation: a closed
//!   set of action kinds, per-kind required payload fields, and the
//!   success/failure outcome type.
//!
//! - **`protocol`** – JSON event types exchanged with the relay service
//!   (registration, command delivery, acknowledgment).

pub mod calibration;
pub mod command;
pub mod geometry;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `relay_core::WindowRegion` instead of `relay_core::geometry::WindowRegion`.
pub use calibration::{derive_calibration, CalibrationResult, CalibrationSample, SampleLabel};
pub use command::{ActionOutcome, ArrowKey, ClickKind, Command, CommandError, RelayAction};
pub use geometry::{
    map_to_absolute, AbsolutePoint, ClickOffset, GeometryError, Mapping, NormalizedPoint,
    WindowRegion,
};
pub use protocol::{Acknowledgment, ClientEvent, CommandStatus, ServerEvent};
