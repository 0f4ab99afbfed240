//! Swap-event subscription over the node's websocket.
//!
//! Each notification is an opaque trigger for one run. Triggers are delivered
//! through a channel of capacity one: while a run is in progress at most one
//! further trigger waits and the rest are dropped.

use flood_types::{FloodError, FloodResult};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::{sleep, Duration};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::config::RetryConfig;

/// A swap seen in the watched pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapEvent {
    /// Block height, when the notification carried one
    pub height: Option<u64>,
}

/// Result of handing an event to the run loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// A trigger is already pending
    Coalesced,
    /// The run loop is gone
    Closed,
}

/// Hand `event` to the run loop without waiting
pub fn deliver(sender: &mpsc::Sender<SwapEvent>, event: SwapEvent) -> Delivery {
    match sender.try_send(event) {
        Ok(()) => Delivery::Sent,
        Err(TrySendError::Full(_)) => Delivery::Coalesced,
        Err(TrySendError::Closed(_)) => Delivery::Closed,
    }
}

/// Channel pair sized for coalesced delivery
pub fn trigger_channel() -> (mpsc::Sender<SwapEvent>, mpsc::Receiver<SwapEvent>) {
    mpsc::channel(1)
}

/// JSON-RPC `subscribe` request for `query`
pub fn subscribe_request(id: u64, query: &str) -> String {
    json!({
        "jsonrpc": "2.0",
        "method": "subscribe",
        "id": id,
        "params": { "query": query },
    })
    .to_string()
}

/// Interpret one websocket text frame.
///
/// `Ok(None)` for frames that are not event notifications, such as the
/// subscription acknowledgement. A JSON-RPC error is a subscription error.
pub fn parse_message(text: &str) -> FloodResult<Option<SwapEvent>> {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Ignoring non-JSON websocket frame");
            return Ok(None);
        }
    };

    if let Some(error) = value.get("error").filter(|e| !e.is_null()) {
        return Err(FloodError::subscription(format!("node rejected subscription: {}", error)));
    }

    let Some(data) = value.pointer("/result/data").filter(|d| !d.is_null()) else {
        return Ok(None);
    };

    let height = data
        .pointer("/value/TxResult/height")
        .or_else(|| value.pointer("/result/events/tx.height/0"))
        .and_then(|h| match h {
            Value::String(s) => s.parse().ok(),
            Value::Number(n) => n.as_u64(),
            _ => None,
        });

    Ok(Some(SwapEvent { height }))
}

enum StreamEnd {
    /// Server closed an established subscription
    Disconnected,
    /// Receiver dropped, stop
    ReceiverClosed,
}

/// Websocket subscription to swap events, reconnecting with backoff
#[derive(Debug, Clone)]
pub struct SwapSubscription {
    url: String,
    query: String,
    retry: RetryConfig,
}

impl SwapSubscription {
    pub fn new(url: &str, query: &str, retry: RetryConfig) -> Self {
        Self {
            url: url.to_string(),
            query: query.to_string(),
            retry,
        }
    }

    /// Forward events until the receiver is dropped.
    ///
    /// Fails with a subscription error after `max_retries` consecutive
    /// connection failures.
    pub async fn run(self, sender: mpsc::Sender<SwapEvent>) -> FloodResult<()> {
        let mut failures = 0u32;

        loop {
            match self.stream_once(&sender).await {
                Ok(StreamEnd::ReceiverClosed) => return Ok(()),
                Ok(StreamEnd::Disconnected) => {
                    warn!(url = %self.url, "Event subscription closed by node, reconnecting");
                    failures = 0;
                }
                Err(e) => {
                    failures += 1;
                    if failures > self.retry.max_retries {
                        return Err(FloodError::subscription(format!(
                            "giving up after {} attempts: {}",
                            failures, e
                        )));
                    }

                    let delay = self.retry.delay_for_attempt(failures - 1);
                    warn!(url = %self.url, attempt = failures, delay_ms = delay, error = %e, "Event subscription failed");
                    sleep(Duration::from_millis(delay)).await;
                }
            }
        }
    }

    async fn stream_once(&self, sender: &mpsc::Sender<SwapEvent>) -> FloodResult<StreamEnd> {
        let (mut socket, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| FloodError::subscription(format!("connect to {}: {}", self.url, e)))?;

        socket
            .send(Message::Text(subscribe_request(1, &self.query)))
            .await
            .map_err(|e| FloodError::subscription(format!("subscribe: {}", e)))?;

        info!(url = %self.url, query = %self.query, "Subscribed to swap events");

        while let Some(message) = socket.next().await {
            let message = message.map_err(|e| FloodError::subscription(format!("read: {}", e)))?;

            let text = match message {
                Message::Text(text) => text,
                Message::Close(_) => return Ok(StreamEnd::Disconnected),
                _ => continue,
            };

            let Some(event) = parse_message(&text)? else {
                continue;
            };

            match deliver(sender, event.clone()) {
                Delivery::Sent => debug!(height = ?event.height, "Swap event queued"),
                Delivery::Coalesced => debug!(height = ?event.height, "Swap event coalesced into pending run"),
                Delivery::Closed => return Ok(StreamEnd::ReceiverClosed),
            }
        }

        Ok(StreamEnd::Disconnected)
    }
}
