//! Push channel.
//!
//! The collector keeps a WebSocket open to the reporter and uses it purely as
//! a trigger: any inbound data frame asks for a report. Payloads are never
//! parsed and nothing is ever sent except the closing handshake.
//!
//! A [`PushChannel`] runs until the connection ends or the shutdown token is
//! cancelled, translating what happens on the wire into [`PushEvent`]s:
//!
//! ```text
//! connect ──err──► Error (end)
//!    │ok
//! Opened
//!    │
//! ┌──▼─────────────────────────────┐
//! │ text/binary frame ──► Message  │
//! │ ping/pong         ──► (ignored)│
//! └──┬─────────────────────────────┘
//!    ├── close frame / end of stream ──► Closed
//!    ├── read error                  ──► Error
//!    └── shutdown ──► close handshake ──► Closed
//! ```

use std::future::Future;

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use super::error::PushError;

/// Observable push channel transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    /// Connection established.
    Opened,
    /// An inbound frame arrived.
    Message,
    /// The connection failed.
    Error(String),
    /// The connection closed.
    Closed,
}

impl From<PushError> for PushEvent {
    fn from(e: PushError) -> Self {
        Self::Error(e.to_string())
    }
}

/// A long-lived trigger connection.
pub trait PushChannel: Send + 'static {
    /// Connect and forward events until the connection ends or `shutdown`
    /// is cancelled.
    fn run(
        self,
        events: mpsc::Sender<PushEvent>,
        shutdown: CancellationToken,
    ) -> impl Future<Output = ()> + Send;
}

/// Push channel over WebSocket.
#[derive(Debug, Clone)]
pub struct WebSocketChannel {
    url: String,
}

impl WebSocketChannel {
    /// Channel connecting to `url` (`ws://` or `wss://`).
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl PushChannel for WebSocketChannel {
    async fn run(self, events: mpsc::Sender<PushEvent>, shutdown: CancellationToken) {
        let connect = tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                tracing::debug!(url = %self.url, "Shutdown before push channel connected");
                return;
            }
            result = tokio_tungstenite::connect_async(self.url.as_str()) => result,
        };

        let mut ws = match connect {
            Ok((ws, _response)) => ws,
            Err(e) => {
                let err = PushError::Connect {
                    url: self.url.clone(),
                    reason: e.to_string(),
                };
                let _ = events.send(err.into()).await;
                return;
            }
        };

        tracing::info!(url = %self.url, "Push channel connected");
        if events.send(PushEvent::Opened).await.is_err() {
            return;
        }

        let mut frames_received: u64 = 0;

        loop {
            let next = tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    if let Err(e) = ws.close(None).await {
                        tracing::debug!(error = %e, "Close handshake failed");
                    }
                    let _ = events.send(PushEvent::Closed).await;
                    break;
                }
                next = ws.next() => next,
            };

            let event = match next {
                Some(Ok(Message::Text(_))) | Some(Ok(Message::Binary(_))) => {
                    frames_received += 1;
                    tracing::debug!(frames_received, "Push trigger received");
                    PushEvent::Message
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::debug!(frame = ?frame, "Server closed push channel");
                    let _ = events.send(PushEvent::Closed).await;
                    break;
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    let _ = events
                        .send(PushError::Connection(e.to_string()).into())
                        .await;
                    break;
                }
                None => {
                    let _ = events.send(PushEvent::Closed).await;
                    break;
                }
            };

            if events.send(event).await.is_err() {
                tracing::debug!("Push event receiver dropped, stopping channel");
                break;
            }
        }

        tracing::info!(url = %self.url, frames_received, "Push channel stopped");
    }
}
