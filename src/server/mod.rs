//! WebSocket subscriber endpoint
//!
//! Accepts subscriber connections, registers each with the subscriber
//! registry, pushes the current snapshot on connect, and forwards broadcast
//! frames until the peer goes away. Inbound `get_prices` requests are
//! answered with the full response envelope.

use crate::broadcast::{Broadcaster, SubscriberRegistry};
use crate::service::PriceService;
use crate::telemetry;
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

/// Inbound subscriber request
#[derive(Debug, Deserialize)]
struct InboundRequest {
    #[serde(rename = "type")]
    kind: String,
}

/// WebSocket server for price subscribers
pub struct WsServer {
    bind_addr: String,
    registry: Arc<SubscriberRegistry>,
    service: Arc<PriceService>,
}

impl WsServer {
    /// Create a server over the given registry and service
    pub fn new(
        bind_addr: impl Into<String>,
        registry: Arc<SubscriberRegistry>,
        service: Arc<PriceService>,
    ) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            registry,
            service,
        }
    }

    /// Bind the configured address and serve until the process exits
    pub async fn run(&self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        tracing::info!(addr = %self.bind_addr, "WebSocket server listening");
        self.serve(listener).await
    }

    /// Serve connections from an already-bound listener
    ///
    /// Split from `run` so tests can bind an ephemeral port themselves.
    pub async fn serve(&self, listener: TcpListener) -> anyhow::Result<()> {
        loop {
            let (stream, peer) = listener.accept().await?;
            let registry = self.registry.clone();
            let service = self.service.clone();

            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, peer, registry, service).await {
                    tracing::debug!(%peer, error = %e, "Subscriber connection ended with error");
                }
            });
        }
    }
}

/// Drive one subscriber connection to completion
async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    registry: Arc<SubscriberRegistry>,
    service: Arc<PriceService>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    let (mut write, mut read) = ws_stream.split();

    let (id, mut frames) = registry.register().await;
    telemetry::set_subscriber_count(registry.len().await);
    tracing::info!(subscriber = %id, %peer, "Subscriber connected");

    // New subscribers render immediately from the current snapshot
    let response = service.get_prices().await;
    let initial = Broadcaster::price_frame(&response.data, Utc::now());

    let result = async {
        write.send(Message::Text(initial)).await?;

        loop {
            tokio::select! {
                frame = frames.recv() => {
                    match frame {
                        Some(frame) => write.send(Message::Text(frame)).await?,
                        // Registry pruned this subscriber
                        None => return Ok(()),
                    }
                }

                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            if let Some(reply) = handle_request(&text, &service).await {
                                write.send(Message::Text(reply)).await?;
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            write.send(Message::Pong(data)).await?;
                        }
                        Some(Ok(Message::Close(_))) | None => return Ok(()),
                        Some(Err(e)) => return Err(e.into()),
                        _ => {}
                    }
                }
            }
        }
    }
    .await;

    registry.unregister(&id).await;
    telemetry::set_subscriber_count(registry.len().await);
    tracing::info!(subscriber = %id, %peer, "Subscriber disconnected");

    result
}

/// Answer a text request; unknown or malformed requests are ignored
async fn handle_request(text: &str, service: &PriceService) -> Option<String> {
    let request: InboundRequest = serde_json::from_str(text).ok()?;
    match request.kind.as_str() {
        "get_prices" => {
            let response = service.get_prices().await;
            serde_json::to_string(&response).ok()
        }
        other => {
            tracing::debug!(kind = other, "Ignoring unknown subscriber request");
            None
        }
    }
}
