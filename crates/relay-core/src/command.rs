//! Inbound command model, validation, and routing.
//!
//! The relay service delivers commands as loosely-typed JSON: an action name
//! string plus a payload object whose required fields depend on the action.
//! This module converts that into a closed [`RelayAction`] enum exactly once,
//! at the system boundary. Downstream code never inspects raw payload maps.
//!
//! Unknown action names and missing or ill-typed payload fields are rejected
//! here, before any physical input is attempted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A command as delivered by the relay service.
///
/// Immutable once received and echoed verbatim in the acknowledgment so the
/// service can correlate results to requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Action name, e.g. `"key_press"` or `"positional_click"`.
    pub action: String,
    /// Action-specific payload fields.
    #[serde(default)]
    pub data: Map<String, Value>,
    /// Identifier of the viewer who issued the command.
    #[serde(rename = "userId", default)]
    pub user_id: String,
}

/// Validation errors detected before any physical action.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// The action name is not in the routing table.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// A required payload field is missing or has the wrong shape.
    #[error("invalid payload for {action}: {reason}")]
    InvalidPayload { action: String, reason: String },
}

/// The four arrow keys used for camera movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowKey {
    Up,
    Down,
    Left,
    Right,
}

impl ArrowKey {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "up" => Some(ArrowKey::Up),
            "down" => Some(ArrowKey::Down),
            "left" => Some(ArrowKey::Left),
            "right" => Some(ArrowKey::Right),
            _ => None,
        }
    }
}

/// Mouse button selector for primitive clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickKind {
    Left,
    Right,
}

/// The closed set of actions the relay can perform.
///
/// Every inbound [`Command`] resolves to exactly one variant or fails
/// validation. Legacy wire names resolve to the same variants as their
/// canonical counterparts, so old and new service versions dispatch
/// identically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RelayAction {
    /// Tap an arrow key (camera nudge).
    KeyPress { key: ArrowKey },
    /// Click at the current pointer position, no coordinate.
    PrimitiveClick { kind: ClickKind },
    /// Left-click at a stream-relative position.
    PositionalClick { x: f64, y: f64 },
    /// Right-click at a stream-relative position.
    PositionalRightClick { x: f64, y: f64 },
    /// Rotate the camera by dragging from the current pointer position.
    CameraDrag { key: ArrowKey },
}

impl RelayAction {
    /// Validates and routes a command to exactly one action.
    ///
    /// # Errors
    ///
    /// [`CommandError::UnknownAction`] for names outside the routing table;
    /// [`CommandError::InvalidPayload`] when a required field is missing or
    /// has the wrong type. Neither reaches the executor.
    pub fn from_command(command: &Command) -> Result<Self, CommandError> {
        let invalid = |reason: &str| CommandError::InvalidPayload {
            action: command.action.clone(),
            reason: reason.to_string(),
        };

        match command.action.as_str() {
            "key_press" => {
                let key = require_arrow_key(&command.data, "key")
                    .map_err(|r| invalid(&r))?;
                Ok(RelayAction::KeyPress { key })
            }
            // "action" is the original wire name for a coordinate-free click.
            "action" | "click" => {
                let kind = match field_str(&command.data, "type") {
                    Some("left-click") | Some("left") => ClickKind::Left,
                    Some("right-click") | Some("right") => ClickKind::Right,
                    Some(other) => return Err(invalid(&format!("unknown click type: {other}"))),
                    None => return Err(invalid("missing click type")),
                };
                Ok(RelayAction::PrimitiveClick { kind })
            }
            // "stream_click" is the legacy name for a click at a
            // stream-relative point; it must dispatch identically to the
            // canonical name.
            "positional_click" | "stream_click" => {
                let (x, y) = require_xy(&command.data).map_err(|r| invalid(&r))?;
                Ok(RelayAction::PositionalClick { x, y })
            }
            "positional_right_click" => {
                let (x, y) = require_xy(&command.data).map_err(|r| invalid(&r))?;
                Ok(RelayAction::PositionalRightClick { x, y })
            }
            "camera_drag" => {
                let key = require_arrow_key(&command.data, "key")
                    .map_err(|r| invalid(&r))?;
                Ok(RelayAction::CameraDrag { key })
            }
            other => Err(CommandError::UnknownAction(other.to_string())),
        }
    }
}

/// Result of performing one command. Produced exactly once per command,
/// never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Success,
    Failure { reason: String },
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Success)
    }

    /// Builds a failure outcome from any displayable error.
    pub fn failure(err: impl std::fmt::Display) -> Self {
        ActionOutcome::Failure {
            reason: err.to_string(),
        }
    }
}

// ── Payload field helpers ─────────────────────────────────────────────────────

fn field_str<'a>(data: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    data.get(key).and_then(Value::as_str)
}

fn require_arrow_key(data: &Map<String, Value>, key: &str) -> Result<ArrowKey, String> {
    match field_str(data, key) {
        Some(s) => ArrowKey::parse(s).ok_or_else(|| format!("unknown key: {s}")),
        None => Err(format!("missing field: {key}")),
    }
}

fn require_xy(data: &Map<String, Value>) -> Result<(f64, f64), String> {
    let num = |key: &str| {
        data.get(key)
            .and_then(Value::as_f64)
            .ok_or_else(|| format!("missing or non-numeric field: {key}"))
    };
    Ok((num("x")?, num("y")?))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
