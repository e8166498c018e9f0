// ABOUTME: App orchestrator — wires session storage, the chat channel, and the TUI together.
// ABOUTME: Starts the bootstrap in the background and drives the widget event loop.

use std::sync::Arc;

use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event, EventStream, KeyEventKind,
};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tokio::sync::oneshot;

use crate::channel::{ChannelClient, ChannelEvent, ChannelEvents};
use crate::config::Config;
use crate::controller::{Connection, Flow, StartupError, WidgetController, connect};
use crate::session::{FileSessionStore, HttpSessionApi, SessionBootstrapper, SessionStore};
use crate::tui::ui;

type StartupResult = Result<Connection, StartupError>;

/// Top-level application that owns the widget for the lifetime of the process.
pub struct App {
    config: Config,
    reset_session: bool,
}

impl App {
    /// Create a new app with the given configuration.
    pub fn new(config: Config, reset_session: bool) -> Self {
        Self {
            config,
            reset_session,
        }
    }

    /// Run the widget until the user quits.
    pub async fn run(self) -> anyhow::Result<()> {
        let mut store = FileSessionStore::open(
            self.config.storage.resolved_path(),
            self.config.storage.key.clone(),
        );
        if self.reset_session {
            store.clear()?;
            tracing::info!(path = %store.path().display(), "cleared cached session");
        }

        let api = Arc::new(HttpSessionApi::new(&self.config.server.api_url));
        let mut bootstrapper = SessionBootstrapper::new(Box::new(store), api);
        let channel = ChannelClient::new(self.config.server.ws_url.clone());

        // The panel is usable (toggle, typing) while startup is in flight.
        let (ready_tx, ready_rx) = oneshot::channel::<StartupResult>();
        let startup = tokio::spawn(async move {
            let result = connect(&mut bootstrapper, channel).await;
            let _ = ready_tx.send(result);
        });

        let mut controller = WidgetController::new(&self.config.widget);
        let mut terminal = ratatui::init();
        // Pastes must arrive as one Event::Paste; otherwise each newline is an Enter key.
        if let Err(e) = crossterm::execute!(std::io::stdout(), EnableBracketedPaste) {
            tracing::warn!(error = %e, "bracketed paste unavailable");
        }
        let result = drive(&mut terminal, &mut controller, ready_rx).await;
        let _ = crossterm::execute!(std::io::stdout(), DisableBracketedPaste);
        ratatui::restore();

        controller.shutdown();
        startup.abort();
        result
    }
}

/// Event loop: redraw, then wait for startup, channel, or terminal events.
async fn drive(
    terminal: &mut DefaultTerminal,
    controller: &mut WidgetController,
    mut ready_rx: oneshot::Receiver<StartupResult>,
) -> anyhow::Result<()> {
    let mut terminal_events = EventStream::new();
    let mut channel_events: Option<ChannelEvents> = None;
    let mut starting = true;

    loop {
        terminal.draw(|frame| ui::render(frame, controller.state_mut()))?;

        tokio::select! {
            ready = &mut ready_rx, if starting => {
                starting = false;
                match ready {
                    Ok(Ok(connection)) => channel_events = Some(controller.attach(connection)),
                    Ok(Err(e)) => {
                        tracing::error!(error = %e, "chat widget startup failed");
                        controller.mark_unavailable();
                    }
                    Err(_) => {
                        tracing::error!("chat widget startup task ended without a result");
                        controller.mark_unavailable();
                    }
                }
            }
            event = next_channel_event(&mut channel_events) => match event {
                Some(event) => controller.on_channel_event(event),
                None => channel_events = None,
            },
            event = terminal_events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if controller.handle_key(key) == Flow::Quit {
                        break;
                    }
                }
                Some(Ok(Event::Paste(text))) => controller.paste(&text),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
        }
    }

    Ok(())
}

/// Next event from the channel, or never while no channel is attached.
async fn next_channel_event(events: &mut Option<ChannelEvents>) -> Option<ChannelEvent> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
