// ABOUTME: WidgetController — glue between user input, the chat channel, and the visible log.
// ABOUTME: Runs the startup sequence (session → channel → attach) and exposes named UI handlers.

use crossterm::event::KeyEvent;

use crate::channel::{
    ChannelClient, ChannelError, ChannelEvent, ChannelEvents, ChatMessage, ConnectionState,
};
use crate::config::WidgetConfig;
use crate::session::{SessionBootstrapper, SessionError, SessionId};
use crate::tui::input::{InputResult, handle_key};
use crate::tui::state::{WidgetState, WidgetStatus};

/// Why the widget could not become live.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

/// A session with its opened channel, ready to attach to a controller.
pub struct Connection {
    pub session_id: SessionId,
    pub channel: ChannelClient,
    pub events: ChannelEvents,
}

/// Obtain the session and open the channel for it, strictly in that order.
pub async fn connect(
    bootstrapper: &mut SessionBootstrapper,
    mut channel: ChannelClient,
) -> Result<Connection, StartupError> {
    let session_id = bootstrapper.ensure_session().await?;
    let events = channel.open(&session_id).await?;
    Ok(Connection {
        session_id,
        channel,
        events,
    })
}

/// Whether the event loop should keep running.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Owns the widget state, the current session, and the channel handle.
pub struct WidgetController {
    state: WidgetState,
    session_id: Option<SessionId>,
    channel: Option<ChannelClient>,
}

impl WidgetController {
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            state: WidgetState::new(config),
            session_id: None,
            channel: None,
        }
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut WidgetState {
        &mut self.state
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.channel
            .as_ref()
            .map(ChannelClient::state)
            .unwrap_or(ConnectionState::Disconnected)
    }

    /// Run the startup sequence and attach the result.
    ///
    /// On failure the widget is marked unavailable and stays inert.
    pub async fn start(
        &mut self,
        bootstrapper: &mut SessionBootstrapper,
        channel: ChannelClient,
    ) -> Result<ChannelEvents, StartupError> {
        match connect(bootstrapper, channel).await {
            Ok(connection) => Ok(self.attach(connection)),
            Err(e) => {
                self.mark_unavailable();
                Err(e)
            }
        }
    }

    /// Take ownership of an opened channel; returns its event receiver.
    pub fn attach(&mut self, connection: Connection) -> ChannelEvents {
        self.state.session_label = Some(connection.session_id.short());
        self.state.status = match connection.channel.state() {
            ConnectionState::Open => WidgetStatus::Online,
            _ => WidgetStatus::Offline,
        };
        self.session_id = Some(connection.session_id);
        self.channel = Some(connection.channel);
        connection.events
    }

    pub fn mark_unavailable(&mut self) {
        self.state.status = WidgetStatus::Unavailable;
    }

    /// Launcher control: show or hide the panel. Never touches the channel.
    pub fn toggle_visibility(&mut self) {
        self.state.toggle_visible();
    }

    /// Inbound delivery: append each message to the end of the log.
    pub fn on_channel_event(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Message(message) => {
                self.state.push_entry(message.sender_type, message.content);
            }
            ChannelEvent::Closed { reason } => {
                tracing::warn!(reason = ?reason, "chat channel lost");
                self.state.status = WidgetStatus::Offline;
            }
        }
    }

    /// Send control: forward the trimmed input as a customer message.
    ///
    /// Blank input is suppressed. The input is cleared in every case.
    /// Returns whether a frame was handed to the channel.
    pub fn submit(&mut self) -> bool {
        let Some(text) = self.state.take_input() else {
            return false;
        };

        let (Some(session_id), Some(channel)) = (self.session_id.as_ref(), self.channel.as_ref())
        else {
            tracing::debug!("input dropped: chat is not connected");
            return false;
        };

        let message = ChatMessage::customer(session_id.clone(), text);
        match channel.send(&message) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "outbound message dropped");
                false
            }
        }
    }

    /// Route a key event to the matching handler.
    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        match handle_key(&mut self.state, key) {
            InputResult::Quit => return Flow::Quit,
            InputResult::ToggleVisibility => self.toggle_visibility(),
            InputResult::Submit => {
                self.submit();
            }
            InputResult::None => {}
        }
        Flow::Continue
    }

    /// Insert pasted text into the input while the panel is open.
    pub fn paste(&mut self, text: &str) {
        if self.state.visible {
            self.state.insert_str_at_cursor(text);
        }
    }

    /// Dispose of the channel. The controller stays usable as an inert widget.
    pub fn shutdown(&mut self) {
        if let Some(channel) = self.channel.as_mut() {
            channel.close();
        }
        if self.state.status == WidgetStatus::Online {
            self.state.status = WidgetStatus::Offline;
        }
    }
}
