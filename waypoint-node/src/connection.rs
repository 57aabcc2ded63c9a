//! Per-connection transport tasks.
//!
//! Each accepted socket runs in its own task: the WebSocket handshake,
//! then a loop over outbound commands from the hub and inbound frames
//! from the peer. The task funnels everything into the node's single
//! event channel, so the hub itself never touches a socket and all
//! transport failures surface as ordinary disconnect events.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

use waypoint_signal::{PeerCommand, PeerId};

/// Event from a transport task to the node's dispatch loop.
#[derive(Debug)]
pub enum SessionEvent {
    /// WebSocket handshake completed; the hub should register the peer
    /// and reply with its assigned id.
    Connected {
        addr: SocketAddr,
        command_tx: mpsc::UnboundedSender<PeerCommand>,
        id_tx: oneshot::Sender<PeerId>,
    },
    /// One text message from the peer.
    Message { id: PeerId, text: String },
    /// The transport is gone: clean close, error, or hangup.
    Disconnected { id: PeerId },
}

/// Spawn the transport task for an accepted TCP stream.
pub fn spawn_connection(
    stream: TcpStream,
    addr: SocketAddr,
    event_tx: mpsc::Sender<SessionEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let ws = match tokio_tungstenite::accept_async(stream).await {
            Ok(ws) => ws,
            Err(e) => {
                tracing::debug!(addr = %addr, error = %e, "WebSocket handshake failed");
                return;
            }
        };

        let (command_tx, mut command_rx) = mpsc::unbounded_channel();
        let (id_tx, id_rx) = oneshot::channel();

        if event_tx
            .send(SessionEvent::Connected {
                addr,
                command_tx,
                id_tx,
            })
            .await
            .is_err()
        {
            // Node is shutting down.
            return;
        }
        let Ok(id) = id_rx.await else {
            return;
        };

        let (mut ws_tx, mut ws_rx) = ws.split();

        loop {
            tokio::select! {
                command = command_rx.recv() => match command {
                    Some(PeerCommand::Send(text)) => {
                        if let Err(e) = ws_tx.send(Message::Text(text)).await {
                            tracing::debug!(peer = %id, error = %e, "send failed");
                            break;
                        }
                    }
                    // A dropped sender means the hub already removed us.
                    Some(PeerCommand::Disconnect) | None => {
                        let _ = ws_tx.send(Message::Close(None)).await;
                        break;
                    }
                },

                incoming = ws_rx.next() => match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if event_tx.send(SessionEvent::Message { id, text }).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Binary(data))) => {
                        // The protocol is text; a binary frame is decoded
                        // lossily and fed through the same strict parser,
                        // where garbage degrades to an ignored command.
                        let text = String::from_utf8_lossy(&data).into_owned();
                        if event_tx.send(SessionEvent::Message { id, text }).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = ws_tx.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Pong(_))) | Some(Ok(Message::Frame(_))) => {}
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!(peer = %id, "connection closed");
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::debug!(peer = %id, error = %e, "connection error");
                        break;
                    }
                },
            }
        }

        let _ = event_tx.send(SessionEvent::Disconnected { id }).await;
    })
}
