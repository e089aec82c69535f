//! WebSocket subscriber endpoint tests over a real socket

mod common;

use common::{harness, MockSource};
use futures_util::{SinkExt, StreamExt};
use price_relay::server::WsServer;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

async fn spawn_server(h: &common::Harness) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = WsServer::new(addr.to_string(), h.registry.clone(), h.service.clone());
    tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });

    format!("ws://{}", addr)
}

async fn next_text(
    ws: &mut (impl futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
          + Unpin),
) -> String {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for frame")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = msg {
            return text;
        }
    }
}

#[tokio::test]
async fn test_subscriber_receives_initial_snapshot() {
    let h = harness(MockSource::ok());
    let url = spawn_server(&h).await;

    let (mut ws, _) = connect_async(&url).await.unwrap();
    let frame = next_text(&mut ws).await;

    assert!(frame.contains("crypto_prices"));
    assert!(frame.contains("\"BTC\""));
}

#[tokio::test]
async fn test_get_prices_request_is_answered() {
    let h = harness(MockSource::ok());
    let url = spawn_server(&h).await;

    let (mut ws, _) = connect_async(&url).await.unwrap();

    ws.send(Message::Text(r#"{"type":"get_prices"}"#.to_string()))
        .await
        .unwrap();

    // Skip any snapshot frames until the envelope reply arrives
    let mut reply = next_text(&mut ws).await;
    for _ in 0..3 {
        if reply.contains("\"success\"") {
            break;
        }
        reply = next_text(&mut ws).await;
    }
    assert!(reply.contains("\"success\":true"));
    assert!(reply.contains("\"cached\""));
}

#[tokio::test]
async fn test_broadcast_reaches_connected_subscriber() {
    let h = harness(MockSource::ok());
    let url = spawn_server(&h).await;

    let (mut ws, _) = connect_async(&url).await.unwrap();
    // Drain the initial snapshot (and the fetch-triggered broadcast, if any)
    let _ = next_text(&mut ws).await;

    let snapshot = h.service.get_prices().await.data;
    let delivered = price_relay::broadcast::Broadcaster::new(h.registry.clone())
        .broadcast(&snapshot, chrono::Utc::now())
        .await;
    assert!(delivered >= 1);

    let frame = next_text(&mut ws).await;
    assert!(frame.contains("crypto_prices"));
}

#[tokio::test]
async fn test_disconnect_unregisters_subscriber() {
    let h = harness(MockSource::ok());
    let url = spawn_server(&h).await;

    let (mut ws, _) = connect_async(&url).await.unwrap();
    let _ = next_text(&mut ws).await;
    assert_eq!(h.registry.len().await, 1);

    ws.close(None).await.unwrap();

    // The server notices the close asynchronously
    for _ in 0..50 {
        if h.registry.is_empty().await {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(h.registry.is_empty().await);
}

#[tokio::test]
async fn test_unknown_request_is_ignored() {
    let h = harness(MockSource::ok());
    let url = spawn_server(&h).await;

    let (mut ws, _) = connect_async(&url).await.unwrap();
    let _ = next_text(&mut ws).await;

    ws.send(Message::Text(r#"{"type":"subscribe_candles"}"#.to_string()))
        .await
        .unwrap();

    // Connection stays up and keeps serving valid requests
    ws.send(Message::Text(r#"{"type":"get_prices"}"#.to_string()))
        .await
        .unwrap();

    let mut reply = next_text(&mut ws).await;
    for _ in 0..3 {
        if reply.contains("\"success\"") {
            break;
        }
        reply = next_text(&mut ws).await;
    }
    assert!(reply.contains("\"success\":true"));
}
