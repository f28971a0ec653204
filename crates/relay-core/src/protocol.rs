//! JSON event types exchanged with the relay service over the WebSocket
//! transport.
//!
//! Every event is a JSON object with an `"event"` field naming the variant
//! and an optional `"data"` field carrying the payload, e.g.:
//!
//! ```json
//! {"event":"execute_command","data":{"action":"key_press","data":{"key":"up"},"userId":"abc"}}
//! {"event":"command_completed","data":{"command":{...},"status":"success","timestamp":1699999999.5}}
//! ```
//!
//! Serde's `tag`/`content` attributes handle the envelope automatically.
//!
//! Two distinct enums separate the directions: the client *sends*
//! registration and acknowledgments, the service *sends* commands and
//! lifecycle notices. Mixing them up is a compile-time error.

use serde::{Deserialize, Serialize};

use crate::command::{ActionOutcome, Command};

/// Completion status reported upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandStatus {
    Success,
    Error,
}

/// The status message returned after a command's pipeline completes.
///
/// Always carries the original command so the service can correlate the
/// result to the request that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acknowledgment {
    /// The original command, echoed verbatim.
    pub command: Command,
    pub status: CommandStatus,
    /// Failure reason; present only when `status` is `Error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Seconds since the Unix epoch at completion time.
    pub timestamp: f64,
}

impl Acknowledgment {
    /// Packages an outcome with its originating command and a timestamp.
    pub fn new(command: Command, outcome: ActionOutcome, timestamp: f64) -> Self {
        match outcome {
            ActionOutcome::Success => Self {
                command,
                status: CommandStatus::Success,
                error: None,
                timestamp,
            },
            ActionOutcome::Failure { reason } => Self {
                command,
                status: CommandStatus::Error,
                error: Some(reason),
                timestamp,
            },
        }
    }
}

/// Events the PC client sends to the relay service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Identify this connection as the PC client (sent once after connect).
    RegisterPc,
    /// Report the outcome of one executed command.
    CommandCompleted(Acknowledgment),
}

/// Events the relay service sends to the PC client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A viewer command to execute.
    ExecuteCommand(Command),
    /// Registration confirmed; log-only, no state change. The service sends
    /// an informational payload (`{"status":"success"}`) which is accepted
    /// and ignored, and the event also parses without one.
    PcRegistered(Option<serde_json::Value>),
    /// Periodic service statistics; log-only.
    StatsUpdate(serde_json::Value),
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_pc_wire_shape() {
        let text = serde_json::to_value(&ClientEvent::RegisterPc).unwrap();
        assert_eq!(text, json!({ "event": "register_pc" }));
    }

    #[test]
    fn test_execute_command_parses_from_service_envelope() {
        let event: ServerEvent = serde_json::from_value(json!({
            "event": "execute_command",
            "data": {
                "action": "positional_click",
                "data": { "x": 0.5, "y": 0.5 },
                "userId": "viewer-9"
            }
        }))
        .unwrap();

        match event {
            ServerEvent::ExecuteCommand(cmd) => {
                assert_eq!(cmd.action, "positional_click");
                assert_eq!(cmd.user_id, "viewer-9");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_success_ack_omits_error_field() {
        let cmd = Command {
            action: "key_press".to_string(),
            data: json!({ "key": "up" }).as_object().cloned().unwrap(),
            user_id: "v".to_string(),
        };
        let ack = Acknowledgment::new(cmd, ActionOutcome::Success, 1700000000.25);
        let value = serde_json::to_value(&ClientEvent::CommandCompleted(ack)).unwrap();

        assert_eq!(value["event"], "command_completed");
        assert_eq!(value["data"]["status"], "success");
        assert!(value["data"].get("error").is_none());
        assert_eq!(value["data"]["command"]["action"], "key_press");
        assert_eq!(value["data"]["timestamp"], 1700000000.25);
    }

    #[test]
    fn test_failure_ack_carries_reason_and_original_command() {
        let cmd = Command {
            action: "key_press".to_string(),
            data: json!({ "key": "sideways" }).as_object().cloned().unwrap(),
            user_id: "v".to_string(),
        };
        let ack = Acknowledgment::new(
            cmd.clone(),
            ActionOutcome::failure("unknown key: sideways"),
            1.0,
        );
        assert_eq!(ack.status, CommandStatus::Error);
        assert_eq!(ack.error.as_deref(), Some("unknown key: sideways"));
        assert_eq!(ack.command, cmd);
    }

    #[test]
    fn test_pc_registered_parses_with_service_payload() {
        let event: ServerEvent = serde_json::from_value(json!({
            "event": "pc_registered",
            "data": { "status": "success" }
        }))
        .unwrap();
        assert!(matches!(event, ServerEvent::PcRegistered(_)));
    }

    #[test]
    fn test_pc_registered_parses_without_payload() {
        let event: ServerEvent =
            serde_json::from_value(json!({ "event": "pc_registered" })).unwrap();
        assert!(matches!(event, ServerEvent::PcRegistered(_)));
    }

    #[test]
    fn test_stats_update_tolerates_arbitrary_payload() {
        let event: ServerEvent = serde_json::from_value(json!({
            "event": "stats_update",
            "data": { "connectedUsers": 12, "queueLength": 3 }
        }))
        .unwrap();
        assert!(matches!(event, ServerEvent::StatsUpdate(_)));
    }
}
