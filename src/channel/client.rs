// ABOUTME: ChannelClient — owns the single WebSocket connection for one chat session.
// ABOUTME: Drives the Disconnected → Connecting → Open → Closed lifecycle; Closed is terminal.

use std::sync::{Arc, Mutex, MutexGuard};

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use crate::channel::frame::{ChatMessage, decode_inbound, encode_outbound};
use crate::session::SessionId;

/// Capacity of the inbound event queue between the reader task and the controller.
const EVENT_QUEUE: usize = 64;

/// Lifecycle of the real-time channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Open,
    Closed,
}

/// Events surfaced by an open channel, in transport order.
#[derive(Debug)]
pub enum ChannelEvent {
    /// One inbound frame, already decoded for display.
    Message(ChatMessage),
    /// The transport closed or failed; no further events follow.
    Closed { reason: Option<String> },
}

/// Receiver side of an open channel.
pub type ChannelEvents = mpsc::Receiver<ChannelEvent>;

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("invalid channel endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("channel was already opened")]
    AlreadyOpened,
    #[error("failed to connect: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("channel is not open")]
    NotOpen,
    #[error("failed to encode frame: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Build `{ws_url}/chat/ws/customer?sessionId={id}`.
pub fn channel_url(ws_url: &str, session_id: &SessionId) -> Result<Url, ChannelError> {
    let base = format!("{}/chat/ws/customer", ws_url.trim_end_matches('/'));
    let mut url =
        Url::parse(&base).map_err(|e| ChannelError::InvalidEndpoint(format!("{base}: {e}")))?;
    if !matches!(url.scheme(), "ws" | "wss") {
        return Err(ChannelError::InvalidEndpoint(format!(
            "{base}: expected ws:// or wss://"
        )));
    }
    url.query_pairs_mut()
        .append_pair("sessionId", session_id.as_str());
    Ok(url)
}

/// Owns exactly one real-time channel for exactly one session identifier.
pub struct ChannelClient {
    ws_url: String,
    session_id: Option<SessionId>,
    state: Arc<Mutex<ConnectionState>>,
    outbound: Option<mpsc::UnboundedSender<Message>>,
    reader: Option<JoinHandle<()>>,
}

impl ChannelClient {
    /// Create a disconnected client for the given channel base URL.
    pub fn new(ws_url: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
            session_id: None,
            state: Arc::new(Mutex::new(ConnectionState::Disconnected)),
            outbound: None,
            reader: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        *lock(&self.state)
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    fn set_state(&self, state: ConnectionState) {
        *lock(&self.state) = state;
    }

    /// Connect the channel for `session_id` and start delivering inbound events.
    ///
    /// Only valid from `Disconnected`. Any connection failure is logged and
    /// leaves the client `Closed`; there is no retry.
    pub async fn open(&mut self, session_id: &SessionId) -> Result<ChannelEvents, ChannelError> {
        if self.state() != ConnectionState::Disconnected {
            return Err(ChannelError::AlreadyOpened);
        }

        let url = match channel_url(&self.ws_url, session_id) {
            Ok(url) => url,
            Err(e) => {
                self.set_state(ConnectionState::Closed);
                tracing::error!(error = %e, "cannot open chat channel");
                return Err(e);
            }
        };

        self.session_id = Some(session_id.clone());
        self.set_state(ConnectionState::Connecting);
        tracing::debug!(%url, "connecting chat channel");

        let stream = match tokio_tungstenite::connect_async(url.as_str()).await {
            Ok((stream, _response)) => stream,
            Err(e) => {
                self.set_state(ConnectionState::Closed);
                tracing::error!(error = %e, "chat channel connection failed");
                return Err(ChannelError::Connect(e));
            }
        };

        self.set_state(ConnectionState::Open);
        tracing::info!("Connected to chat server");

        let (mut sink, mut source) = stream.split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
        let (event_tx, event_rx) = mpsc::channel::<ChannelEvent>(EVENT_QUEUE);

        tokio::spawn(async move {
            while let Some(frame) = outbound_rx.recv().await {
                let closing = matches!(frame, Message::Close(_));
                if let Err(e) = sink.send(frame).await {
                    tracing::warn!(error = %e, "failed to write chat frame");
                    break;
                }
                if closing {
                    break;
                }
            }
        });

        let state = self.state.clone();
        let sid = session_id.clone();
        let reader = tokio::spawn(async move {
            let reason = loop {
                let raw = match source.next().await {
                    Some(Ok(Message::Text(text))) => text.to_string(),
                    Some(Ok(Message::Binary(bytes))) => String::from_utf8_lossy(&bytes).into_owned(),
                    Some(Ok(Message::Close(frame))) => {
                        break frame
                            .map(|f| f.reason.to_string())
                            .filter(|r| !r.is_empty());
                    }
                    // Ping/pong are answered by the transport.
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "chat channel error");
                        break Some(e.to_string());
                    }
                    None => break None,
                };

                let message = decode_inbound(&raw, &sid);
                if event_tx.send(ChannelEvent::Message(message)).await.is_err() {
                    break None;
                }
            };

            *lock(&state) = ConnectionState::Closed;
            tracing::info!(reason = ?reason, "chat channel closed");
            let _ = event_tx.send(ChannelEvent::Closed { reason }).await;
        });

        self.outbound = Some(outbound_tx);
        self.reader = Some(reader);
        Ok(event_rx)
    }

    /// Transmit one message as an outbound frame. Rejected unless `Open`.
    pub fn send(&self, message: &ChatMessage) -> Result<(), ChannelError> {
        if self.state() != ConnectionState::Open {
            return Err(ChannelError::NotOpen);
        }
        let outbound = self.outbound.as_ref().ok_or(ChannelError::NotOpen)?;
        let text = encode_outbound(message)?;
        outbound
            .send(Message::Text(text.into()))
            .map_err(|_| ChannelError::NotOpen)?;
        tracing::debug!(chars = message.content.chars().count(), "sent chat frame");
        Ok(())
    }

    /// Close the channel and stop its I/O. The client cannot be reopened.
    pub fn close(&mut self) {
        if let Some(outbound) = self.outbound.take() {
            let _ = outbound.send(Message::Close(None));
        }
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        if self.state() != ConnectionState::Closed {
            self.set_state(ConnectionState::Closed);
            tracing::info!("chat channel disposed");
        }
    }
}

impl Drop for ChannelClient {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}

fn lock(state: &Mutex<ConnectionState>) -> MutexGuard<'_, ConnectionState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
