//! Acceptance tests for the rendezvous server.
//!
//! Each test boots a real node on port 0, connects WebSocket clients to
//! it and walks the signaling protocol end to end:
//! 1. Echo - diagnostic loop-back over a live connection
//! 2. Rendezvous - host and joiner pair up and exchange payloads
//! 3. Sequential joiners - a host serves a second joiner after success
//! 4. Garbage tolerance - malformed commands never kill a connection
//! 5. Status RPC - the JSON-RPC surface reflects the registry
//! 6. Shutdown - a shutdown request closes client connections

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use waypoint_node::config::NodeConfig;
use waypoint_node::node::Node;

/// Timeout for any single wait in these tests.
const WAIT: Duration = Duration::from_secs(5);

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Start a node on ephemeral ports and return its addresses plus the
/// shutdown handle.
async fn start_node() -> (SocketAddr, SocketAddr, mpsc::Sender<()>) {
    let mut config = NodeConfig::default();
    config.listen = "127.0.0.1:0".parse().unwrap();
    config.rpc_listen = "127.0.0.1:0".parse().unwrap();

    let mut node = Node::new(config);
    let bound_rx = node.bound_addr_receiver();
    let rpc_rx = node.rpc_addr_receiver();
    let shutdown = node.shutdown_handle();

    tokio::spawn(node.run());

    let addr = timeout(WAIT, bound_rx).await.unwrap().unwrap();
    let rpc_addr = timeout(WAIT, rpc_rx).await.unwrap().unwrap();
    (addr, rpc_addr, shutdown)
}

/// Connect a WebSocket client to the signaling address.
async fn ws_client(addr: SocketAddr) -> WsClient {
    let (ws, _response) = timeout(WAIT, tokio_tungstenite::connect_async(format!("ws://{addr}")))
        .await
        .unwrap()
        .unwrap();
    ws
}

async fn send(ws: &mut WsClient, text: &str) {
    timeout(WAIT, ws.send(Message::Text(text.to_string())))
        .await
        .unwrap()
        .unwrap();
}

/// Receive the next text frame, skipping control frames.
async fn recv_text(ws: &mut WsClient) -> String {
    loop {
        let frame = timeout(WAIT, ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("connection closed unexpectedly")
            .expect("connection error");
        match frame {
            Message::Text(text) => return text,
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

/// Use the echo loop-back as an ordering barrier: once the reply comes
/// back, everything this client sent earlier has been dispatched.
async fn barrier(ws: &mut WsClient) {
    send(ws, "ECHO:barrier").await;
    assert_eq!(recv_text(ws).await, "ECHO:barrier");
}

#[tokio::test]
async fn echo_roundtrip() {
    let (addr, _rpc, _shutdown) = start_node().await;
    let mut client = ws_client(addr).await;

    send(&mut client, "ECHO:hello waypoint").await;
    assert_eq!(recv_text(&mut client).await, "ECHO:hello waypoint");
}

#[tokio::test]
async fn host_and_joiner_rendezvous() {
    let (addr, _rpc, _shutdown) = start_node().await;
    let mut host = ws_client(addr).await;
    let mut joiner = ws_client(addr).await;

    send(&mut host, "HOSTING:room1").await;
    barrier(&mut host).await;

    send(&mut joiner, "CONNECT:room1").await;

    // The host is cued for its offer.
    assert_eq!(recv_text(&mut host).await, "GET_SDP:");

    // Offer travels host -> joiner, answer joiner -> host, verbatim.
    send(&mut host, "POST_SDP:offer-blob").await;
    assert_eq!(recv_text(&mut joiner).await, "POST_SDP:offer-blob");

    send(&mut joiner, "POST_SDP:abc123").await;
    assert_eq!(recv_text(&mut host).await, "POST_SDP:abc123");
}

#[tokio::test]
async fn host_serves_second_joiner_after_success() {
    let (addr, _rpc, _shutdown) = start_node().await;
    let mut host = ws_client(addr).await;

    send(&mut host, "HOSTING:lobby").await;
    barrier(&mut host).await;

    let mut first = ws_client(addr).await;
    send(&mut first, "CONNECT:lobby").await;
    assert_eq!(recv_text(&mut host).await, "GET_SDP:");

    // First negotiation completes on both sides.
    send(&mut first, "SUCCESS:").await;
    barrier(&mut first).await;
    send(&mut host, "SUCCESS:").await;
    barrier(&mut host).await;

    // The same host picks up the next joiner.
    let mut second = ws_client(addr).await;
    send(&mut second, "CONNECT:lobby").await;
    assert_eq!(recv_text(&mut host).await, "GET_SDP:");

    send(&mut host, "POST_SDP:second-offer").await;
    assert_eq!(recv_text(&mut second).await, "POST_SDP:second-offer");
}

#[tokio::test]
async fn malformed_commands_are_ignored() {
    let (addr, _rpc, _shutdown) = start_node().await;
    let mut client = ws_client(addr).await;

    send(&mut client, "").await;
    send(&mut client, "nonsense").await;
    send(&mut client, "HOSTING").await;
    send(&mut client, "GET_SDP:").await;

    // The connection survives and still answers.
    barrier(&mut client).await;
}

#[tokio::test]
async fn status_rpc_reflects_registry() {
    use jsonrpsee::core::client::ClientT;
    use jsonrpsee::http_client::HttpClientBuilder;
    use jsonrpsee::rpc_params;

    use waypoint_node::rpc::StatusResponse;

    let (addr, rpc_addr, _shutdown) = start_node().await;
    let mut host = ws_client(addr).await;
    let mut joiner = ws_client(addr).await;

    send(&mut host, "HOSTING:room1").await;
    send(&mut joiner, "CONNECT:room1").await;
    assert_eq!(recv_text(&mut host).await, "GET_SDP:");
    barrier(&mut host).await;
    barrier(&mut joiner).await;

    let client = HttpClientBuilder::default()
        .build(format!("http://{rpc_addr}"))
        .unwrap();

    let status: StatusResponse = client.request("status", rpc_params![]).await.unwrap();
    assert_eq!(status.peers, 2);
    assert_eq!(status.hosting, 1);
    assert_eq!(status.connecting, 1);
    assert_eq!(status.matched_pairs, 1);

    let count: u64 = client
        .request("getConnectionCount", rpc_params![])
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn shutdown_closes_client_connections() {
    let (addr, _rpc, shutdown) = start_node().await;
    let mut client = ws_client(addr).await;
    barrier(&mut client).await;

    shutdown.send(()).await.unwrap();

    // The stream ends: a close frame, a hangup, or an error.
    let ended = timeout(WAIT, async {
        loop {
            match client.next().await {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await;
    assert!(ended.is_ok(), "connection should end after shutdown");
}
