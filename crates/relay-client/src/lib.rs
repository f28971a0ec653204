//! relay-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does relay-client do?
//!
//! This is the program that runs on the gaming PC. Remote viewers issue
//! discrete action commands through a web service; the service forwards them
//! over a persistent WebSocket connection to this client, which replays each
//! command as real keyboard/mouse input against the target game window and
//! reports the outcome back.
//!
//! The pipeline for every command is strictly sequential:
//!
//! 1. The transport delivers an `execute_command` event.
//! 2. The dispatcher validates it against the closed action set.
//! 3. The executor performs the physical input (mapping stream-relative
//!    coordinates through the calibrated window rectangle first, and
//!    asserting window focus before every positional action).
//! 4. An acknowledgment carrying the original command is emitted upstream.
//!
//! One command completes its whole pipeline before the next is considered;
//! there is no queue and no parallelism.

/// Application layer: dispatch, execution, calibration, and self-test use cases.
pub mod application;

/// Infrastructure layer: WebSocket transport, OS input injection, configuration.
pub mod infrastructure;
