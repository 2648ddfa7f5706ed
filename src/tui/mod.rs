//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates terminal events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! Each iteration draws (if something changed), polls the terminal for up to
//! 100ms, routes every pending event, then drains the action channel fed by
//! background requests. Requests run on the tokio runtime and report back with
//! exactly one `ResponseReceived` or `ResponseFailed`, tagged with the
//! conversation that asked.

mod component;
pub mod components;
mod event;
mod ui;

use std::io::stdout;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use futures::FutureExt;
use log::{debug, info, warn};
use ratatui::DefaultTerminal;
use tokio::task::AbortHandle;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::{App, ConversationId, Page};
use crate::inference::{CompletionClient, ProviderError, build_client};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputEvent, MessageInput, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input: MessageInput,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input: MessageInput::new(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

/// Owns the request in flight (if any) and how to start new ones.
struct Dispatcher {
    tx: mpsc::Sender<Action>,
    timeout: Option<Duration>,
    in_flight: Option<AbortHandle>,
}

impl Dispatcher {
    /// Carry out an effect. Returns true when the app should quit.
    fn apply(&mut self, app: &App, effect: Effect) -> bool {
        match effect {
            Effect::None => false,
            Effect::SpawnRequest {
                conversation,
                prompt,
            } => {
                match &app.client {
                    Ok(client) => {
                        self.in_flight = Some(spawn_request(
                            client.clone(),
                            conversation,
                            prompt,
                            self.timeout,
                            self.tx.clone(),
                        ));
                    }
                    Err(e) => warn!("SpawnRequest without a client: {}", e),
                }
                false
            }
            Effect::CancelRequest => {
                if let Some(handle) = self.in_flight.take() {
                    debug!("Aborting in-flight request");
                    handle.abort();
                }
                false
            }
            Effect::Quit => true,
        }
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let client = build_client(&config);
    let mut app = App::from_config(client, &config);
    let mut tui = TuiState::new();

    let (tx, rx) = mpsc::channel();
    let mut dispatcher = Dispatcher {
        tx,
        timeout: config.request_timeout,
        in_flight: None,
    };

    let mut terminal = ratatui::init();
    let result = TerminalModeGuard::new().and_then(|_guard| {
        event_loop(&mut terminal, &mut app, &mut tui, &mut dispatcher, &rx)
    });
    ratatui::restore();

    if let Some(handle) = dispatcher.in_flight.take() {
        handle.abort();
    }
    info!("Courier shutting down");
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    tui: &mut TuiState,
    dispatcher: &mut Dispatcher,
    rx: &mpsc::Receiver<Action>,
) -> std::io::Result<()> {
    let mut needs_redraw = true;

    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, app, tui))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(POLL_INTERVAL);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain all pending events before the next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let effect = route_event(app, tui, event);
            if dispatcher.apply(app, effect) {
                return Ok(());
            }
        }

        // Results from background requests
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(app, action);
            if dispatcher.apply(app, effect) {
                return Ok(());
            }
        }
    }
}

/// Translate one terminal event into core updates for the mounted page.
fn route_event(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> Effect {
    if matches!(event, TuiEvent::ForceQuit) {
        return update(app, Action::Quit);
    }

    if matches!(app.page, Page::Landing) {
        return match event {
            TuiEvent::Submit => {
                *tui = TuiState::new();
                update(app, Action::OpenChat)
            }
            _ => Effect::None,
        };
    }

    match event {
        TuiEvent::Escape => update(app, Action::CloseChat),
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(&event);
            Effect::None
        }
        TuiEvent::Resize => Effect::None,
        _ => {
            tui.input.disabled = app.is_responding();
            match tui.input.handle_event(&event) {
                Some(InputEvent::Submit(text)) => update(app, Action::Submit(text)),
                Some(InputEvent::ContentChanged) | None => Effect::None,
            }
        }
    }
}

/// Run one completion call in the background and report the outcome on `tx`.
///
/// Exactly one action is sent per call, even if the client panics or the
/// call exceeds `timeout`. The returned handle aborts the call; an aborted
/// call sends nothing.
pub fn spawn_request(
    client: Arc<dyn CompletionClient>,
    conversation: ConversationId,
    prompt: String,
    timeout: Option<Duration>,
    tx: mpsc::Sender<Action>,
) -> AbortHandle {
    info!(
        "Spawning request for conversation {} via {} ({} chars)",
        conversation,
        client.name(),
        prompt.len()
    );

    let handle = tokio::spawn(async move {
        let started = Instant::now();
        let outcome = AssertUnwindSafe(call_client(client.as_ref(), &prompt, timeout))
            .catch_unwind()
            .await;

        let action = match outcome {
            Ok(Ok(text)) => {
                info!(
                    "Response for conversation {} after {}ms ({} chars)",
                    conversation,
                    started.elapsed().as_millis(),
                    text.len()
                );
                Action::ResponseReceived { conversation, text }
            }
            Ok(Err(e)) => {
                warn!("Request for conversation {} failed: {}", conversation, e);
                Action::ResponseFailed {
                    conversation,
                    description: e.to_string(),
                }
            }
            Err(_) => {
                warn!("Request for conversation {} panicked", conversation);
                Action::ResponseFailed {
                    conversation,
                    description: "the request ended unexpectedly".to_string(),
                }
            }
        };

        if tx.send(action).is_err() {
            warn!("Failed to deliver response for conversation {}: receiver dropped", conversation);
        }
    });

    handle.abort_handle()
}

async fn call_client(
    client: &dyn CompletionClient,
    prompt: &str,
    timeout: Option<Duration>,
) -> Result<String, ProviderError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, client.complete(prompt))
            .await
            .unwrap_or_else(|_| Err(ProviderError::Timeout(limit))),
        None => client.complete(prompt).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::REQUEST_FAILED_PREFIX;
    use crate::inference::EchoClient;
    use crate::test_support::{HangingClient, PanickingClient, ScriptedClient, test_app};
    use std::sync::atomic::Ordering;

    fn dispatcher() -> (Dispatcher, mpsc::Receiver<Action>) {
        let (tx, rx) = mpsc::channel();
        let dispatcher = Dispatcher {
            tx,
            timeout: None,
            in_flight: None,
        };
        (dispatcher, rx)
    }

    async fn recv(rx: mpsc::Receiver<Action>, wait: Duration) -> Option<Action> {
        tokio::task::spawn_blocking(move || rx.recv_timeout(wait).ok())
            .await
            .unwrap()
    }

    fn type_and_submit(app: &mut App, tui: &mut TuiState, text: &str) -> Effect {
        for c in text.chars() {
            route_event(app, tui, TuiEvent::InputChar(c));
        }
        route_event(app, tui, TuiEvent::Submit)
    }

    // ==========================================================================
    // Event routing
    // ==========================================================================

    #[test]
    fn test_enter_on_landing_opens_chat() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        assert_eq!(route_event(&mut app, &mut tui, TuiEvent::Submit), Effect::None);
        assert!(app.conversation().is_some());
    }

    #[test]
    fn test_typing_on_landing_is_ignored() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        route_event(&mut app, &mut tui, TuiEvent::InputChar('x'));
        assert!(tui.input.draft.is_empty());
        assert!(app.conversation().is_none());
    }

    #[test]
    fn test_submit_in_chat_spawns_request() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        route_event(&mut app, &mut tui, TuiEvent::Submit);
        let id = app.conversation().unwrap().id;

        let effect = type_and_submit(&mut app, &mut tui, "  hi there ");
        assert_eq!(
            effect,
            Effect::SpawnRequest {
                conversation: id,
                prompt: "hi there".into()
            }
        );
        assert!(app.is_responding());
        assert!(tui.input.draft.is_empty());
    }

    #[test]
    fn test_submit_while_responding_keeps_draft() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        route_event(&mut app, &mut tui, TuiEvent::Submit);
        type_and_submit(&mut app, &mut tui, "first");

        let effect = type_and_submit(&mut app, &mut tui, "second");
        assert_eq!(effect, Effect::None);
        assert_eq!(tui.input.draft, "second");
        assert_eq!(app.conversation().unwrap().len(), 1);
    }

    #[test]
    fn test_escape_in_chat_closes_and_cancels() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        route_event(&mut app, &mut tui, TuiEvent::Submit);
        assert_eq!(
            route_event(&mut app, &mut tui, TuiEvent::Escape),
            Effect::CancelRequest
        );
        assert!(matches!(app.page, Page::Landing));
    }

    #[test]
    fn test_ctrl_c_quits_from_any_page() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        assert_eq!(route_event(&mut app, &mut tui, TuiEvent::ForceQuit), Effect::Quit);
        route_event(&mut app, &mut tui, TuiEvent::Submit);
        assert_eq!(route_event(&mut app, &mut tui, TuiEvent::ForceQuit), Effect::Quit);
    }

    #[test]
    fn test_reopening_chat_resets_draft() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        route_event(&mut app, &mut tui, TuiEvent::Submit);
        route_event(&mut app, &mut tui, TuiEvent::InputChar('x'));
        route_event(&mut app, &mut tui, TuiEvent::Escape);
        route_event(&mut app, &mut tui, TuiEvent::Submit);
        assert!(tui.input.draft.is_empty());
    }

    // ==========================================================================
    // Background requests
    // ==========================================================================

    #[tokio::test]
    async fn test_spawn_request_reports_reply() {
        let client = Arc::new(ScriptedClient::replying("pong"));
        let (tx, rx) = mpsc::channel();
        spawn_request(client.clone(), ConversationId(7), "ping".into(), None, tx);

        let action = recv(rx, Duration::from_secs(5)).await;
        assert_eq!(
            action,
            Some(Action::ResponseReceived {
                conversation: ConversationId(7),
                text: "pong".into()
            })
        );
        assert_eq!(client.last_prompt.lock().unwrap().as_deref(), Some("ping"));
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_spawn_request_reports_failure() {
        let client = Arc::new(ScriptedClient::failing(ProviderError::Network(
            "connection refused".into(),
        )));
        let (tx, rx) = mpsc::channel();
        spawn_request(client, ConversationId(1), "ping".into(), None, tx);

        match recv(rx, Duration::from_secs(5)).await {
            Some(Action::ResponseFailed { description, .. }) => {
                assert!(description.contains("connection refused"));
            }
            other => panic!("Expected ResponseFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_spawn_request_survives_panicking_client() {
        let (tx, rx) = mpsc::channel();
        spawn_request(Arc::new(PanickingClient), ConversationId(1), "ping".into(), None, tx);

        let action = recv(rx, Duration::from_secs(5)).await;
        assert!(matches!(action, Some(Action::ResponseFailed { .. })));
    }

    #[tokio::test]
    async fn test_spawn_request_times_out() {
        let limit = Duration::from_millis(50);
        let (tx, rx) = mpsc::channel();
        spawn_request(Arc::new(HangingClient), ConversationId(3), "ping".into(), Some(limit), tx);

        let action = recv(rx, Duration::from_secs(5)).await;
        assert_eq!(
            action,
            Some(Action::ResponseFailed {
                conversation: ConversationId(3),
                description: ProviderError::Timeout(limit).to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_aborted_request_sends_nothing() {
        let (tx, rx) = mpsc::channel();
        let handle = spawn_request(Arc::new(HangingClient), ConversationId(1), "ping".into(), None, tx);
        handle.abort();

        assert_eq!(recv(rx, Duration::from_millis(200)).await, None);
    }

    #[tokio::test]
    async fn test_failure_lands_as_agent_message() {
        let mut app = test_app();
        update(&mut app, Action::OpenChat);
        let Effect::SpawnRequest {
            conversation,
            prompt,
        } = update(&mut app, Action::Submit("ping".into()))
        else {
            panic!("Expected SpawnRequest");
        };

        let client = Arc::new(ScriptedClient::failing(ProviderError::Api {
            status: 500,
            message: "boom".into(),
        }));
        let (tx, rx) = mpsc::channel();
        spawn_request(client, conversation, prompt, None, tx);
        let action = recv(rx, Duration::from_secs(5)).await.unwrap();
        update(&mut app, action);

        let conversation = app.conversation().unwrap();
        assert!(!conversation.responding);
        let last = conversation.messages().last().unwrap();
        assert!(!last.is_user());
        assert!(last.text.starts_with(REQUEST_FAILED_PREFIX));
    }

    // ==========================================================================
    // Effect dispatch
    // ==========================================================================

    #[tokio::test]
    async fn test_cancel_aborts_in_flight_request() {
        // Would reply after 50ms if left running
        let app = App::new(
            Ok(Arc::new(EchoClient::new(Duration::from_millis(50)))),
            "test-model".to_string(),
        );
        let (mut dispatcher, rx) = dispatcher();

        let spawn = Effect::SpawnRequest {
            conversation: ConversationId(1),
            prompt: "ping".into(),
        };
        assert!(!dispatcher.apply(&app, spawn));
        assert!(dispatcher.in_flight.is_some());

        assert!(!dispatcher.apply(&app, Effect::CancelRequest));
        assert!(dispatcher.in_flight.is_none());

        assert_eq!(recv(rx, Duration::from_millis(300)).await, None);
    }

    #[tokio::test]
    async fn test_cancel_without_request_is_harmless() {
        let app = App::new(Ok(Arc::new(HangingClient)), "test-model".to_string());
        let (mut dispatcher, _rx) = dispatcher();

        assert!(!dispatcher.apply(&app, Effect::CancelRequest));
        assert!(dispatcher.in_flight.is_none());
        assert!(dispatcher.apply(&app, Effect::Quit));
    }

    #[tokio::test]
    async fn test_inert_submissions_never_reach_client() {
        let client = Arc::new(ScriptedClient::replying("pong"));
        let mut app = App::new(Ok(client.clone()), "test-model".to_string());
        let mut tui = TuiState::new();
        let (mut dispatcher, rx) = dispatcher();
        route_event(&mut app, &mut tui, TuiEvent::Submit);

        // Blank draft: nothing to send
        let effect = type_and_submit(&mut app, &mut tui, "   ");
        dispatcher.apply(&app, effect);
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);

        let effect = type_and_submit(&mut app, &mut tui, "hello");
        dispatcher.apply(&app, effect);

        // Still responding: the second submission stays in the draft
        let effect = type_and_submit(&mut app, &mut tui, "again");
        dispatcher.apply(&app, effect);

        let action = recv(rx, Duration::from_secs(5)).await;
        assert!(matches!(action, Some(Action::ResponseReceived { .. })));
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.last_prompt.lock().unwrap().as_deref(), Some("hello"));
    }
}
