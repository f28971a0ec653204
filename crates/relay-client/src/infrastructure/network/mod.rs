//! WebSocket transport to the relay service.
//!
//! The service holds one persistent bidirectional connection per PC client.
//! Events travel as JSON text frames in the envelope defined by
//! [`relay_core::protocol`]: inbound `execute_command` events are forwarded
//! to the dispatch loop over an `mpsc` channel, outbound acknowledgments are
//! written through [`ServerConnection::send`].
//!
//! A connect-time failure is fatal: it is reported to the operator and
//! terminates the run. There is no automatic reconnect loop — the operator
//! restarts the client deliberately. A disconnect after a successful connect
//! ends the event stream, which in turn ends the dispatch loop.
//!
//! Lifecycle events (connected, disconnected, registration confirmed)
//! produce log output only; they change no engine state.

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use relay_core::{ClientEvent, Command, ServerEvent};

/// Connection-level failures, reported to the operator rather than per
/// command.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The WebSocket connection could not be established.
    #[error("failed to connect to relay service at {url}: {source}")]
    ConnectFailed {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },

    /// An error occurred on the established connection.
    #[error("transport error: {0}")]
    Ws(#[from] tokio_tungstenite::tungstenite::Error),

    /// An outbound event could not be serialized.
    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Events the transport delivers to the dispatch loop.
#[derive(Debug)]
pub enum NetworkEvent {
    /// A viewer command arrived.
    CommandReceived(Command),
    /// The service confirmed our `register_pc`. Log-only.
    Registered,
    /// The connection closed; no further events will arrive.
    Disconnected,
}

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, WsMessage>;

/// One persistent connection to the relay service.
pub struct ServerConnection {
    sink: Mutex<WsSink>,
}

impl ServerConnection {
    /// Connects, registers this machine as the PC client, and starts the
    /// read loop.
    ///
    /// Returns the connection (for sending acknowledgments) and the channel
    /// on which inbound [`NetworkEvent`]s arrive.
    ///
    /// # Errors
    ///
    /// [`TransportError::ConnectFailed`] when the WebSocket handshake fails.
    /// This is fatal to the run by design.
    pub async fn connect(url: &str) -> Result<(Self, mpsc::Receiver<NetworkEvent>), TransportError> {
        let (stream, _response) =
            connect_async(url)
                .await
                .map_err(|source| TransportError::ConnectFailed {
                    url: url.to_string(),
                    source,
                })?;
        info!(%url, "connected to relay service");

        let (sink, read_half) = stream.split();
        let connection = Self {
            sink: Mutex::new(sink),
        };

        // Identify this connection as the PC client before anything else.
        connection.send(&ClientEvent::RegisterPc).await?;

        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(read_loop(read_half, tx));

        Ok((connection, rx))
    }

    /// Sends one event to the service as a JSON text frame.
    pub async fn send(&self, event: &ClientEvent) -> Result<(), TransportError> {
        let text = serde_json::to_string(event)?;
        let mut sink = self.sink.lock().await;
        sink.send(WsMessage::Text(text)).await?;
        Ok(())
    }
}

/// Reads frames until the connection closes, forwarding commands to the
/// dispatch loop.
async fn read_loop(
    mut read_half: impl StreamExt<Item = Result<WsMessage, tokio_tungstenite::tungstenite::Error>>
        + Unpin,
    tx: mpsc::Sender<NetworkEvent>,
) {
    while let Some(frame) = read_half.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                error!(error = %e, "read error on relay connection");
                break;
            }
        };

        match frame {
            WsMessage::Text(text) => match serde_json::from_str::<ServerEvent>(&text) {
                Ok(ServerEvent::ExecuteCommand(command)) => {
                    if tx.send(NetworkEvent::CommandReceived(command)).await.is_err() {
                        // Dispatch loop is gone; nothing left to deliver to.
                        return;
                    }
                }
                Ok(ServerEvent::PcRegistered(_)) => {
                    info!("registered with relay service, ready for viewer commands");
                    if tx.send(NetworkEvent::Registered).await.is_err() {
                        return;
                    }
                }
                Ok(ServerEvent::StatsUpdate(stats)) => {
                    debug!(%stats, "service stats");
                }
                Err(e) => {
                    warn!(error = %e, "ignoring unparseable event from service");
                }
            },
            WsMessage::Close(_) => {
                info!("relay service closed the connection");
                break;
            }
            // Protocol-level ping/pong is handled by tokio-tungstenite.
            _ => {}
        }
    }

    let _ = tx.send(NetworkEvent::Disconnected).await;
}
