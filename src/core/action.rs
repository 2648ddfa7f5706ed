//! # Actions
//!
//! Everything that can happen in Courier becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! The remote answers? That's `Action::ResponseReceived { .. }`.
//!
//! `update()` takes the current state and an action, mutates the state,
//! and returns an `Effect` describing the I/O the caller must perform.
//! No side effects here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! ## Request lifecycle
//!
//! ```text
//!   Idle (responding=false) ── Submit ──▶ Awaiting (responding=true)
//!        ▲                                     │
//!        └──── ResponseReceived | ResponseFailed
//! ```
//!
//! A submission while awaiting, or with a blank draft, changes nothing.
//! With no usable client, a submission only appends the diagnostic.

use log::{debug, info, warn};

use crate::core::message::Message;
use crate::core::state::{App, Conversation, ConversationId, Page};

/// Shown when the completion client could not be built (missing credential).
pub const CLIENT_UNAVAILABLE_MESSAGE: &str = "The assistant is unavailable: no API key is configured. \
     Set OPENROUTER_API_KEY (or [openrouter] api_key in ~/.courier/config.toml) and restart.";

/// Prefix for the agent message synthesized from a failed request.
pub const REQUEST_FAILED_PREFIX: &str = "Sorry, something went wrong: ";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Mount the chat view with a fresh conversation.
    OpenChat,
    /// Unmount the chat view, discarding its conversation.
    CloseChat,
    /// The user submitted a draft.
    Submit(String),
    /// The remote call settled with a reply.
    ResponseReceived {
        conversation: ConversationId,
        text: String,
    },
    /// The remote call settled with a failure.
    ResponseFailed {
        conversation: ConversationId,
        description: String,
    },
    Quit,
}

/// I/O the event loop must carry out after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Call the remote with `prompt` and report back tagged with `conversation`.
    SpawnRequest {
        conversation: ConversationId,
        prompt: String,
    },
    /// Abort any in-flight request; its conversation is gone.
    CancelRequest,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::OpenChat => {
            if matches!(app.page, Page::Chat(_)) {
                return Effect::None;
            }
            let id = app.allocate_conversation_id();
            let seed = if app.client_available() {
                app.welcome_message.clone().map(Message::agent)
            } else {
                Some(Message::agent(CLIENT_UNAVAILABLE_MESSAGE))
            };
            app.page = Page::Chat(match seed {
                Some(message) => Conversation::seeded(id, message),
                None => Conversation::new(id),
            });
            info!("Chat opened: conversation {}", id);
            Effect::None
        }
        Action::CloseChat => match std::mem::replace(&mut app.page, Page::Landing) {
            Page::Chat(conversation) => {
                info!(
                    "Chat closed: conversation {} ({} messages, responding={})",
                    conversation.id,
                    conversation.len(),
                    conversation.responding
                );
                Effect::CancelRequest
            }
            Page::Landing => Effect::None,
        },
        Action::Submit(text) => submit(app, text),
        Action::ResponseReceived { conversation, text } => {
            settle(app, conversation, Message::agent(text))
        }
        Action::ResponseFailed {
            conversation,
            description,
        } => settle(
            app,
            conversation,
            Message::agent(format!("{REQUEST_FAILED_PREFIX}{description}")),
        ),
        Action::Quit => Effect::Quit,
    }
}

fn submit(app: &mut App, text: String) -> Effect {
    let client_available = app.client_available();
    let Some(conversation) = app.conversation_mut() else {
        debug!("Submit ignored: chat is not open");
        return Effect::None;
    };

    if conversation.responding {
        debug!("Submit ignored: awaiting remote response");
        return Effect::None;
    }

    let prompt = text.trim();
    if prompt.is_empty() {
        return Effect::None;
    }

    if !client_available {
        conversation.push(Message::agent(CLIENT_UNAVAILABLE_MESSAGE));
        return Effect::None;
    }

    conversation.push(Message::user(prompt));
    conversation.responding = true;
    Effect::SpawnRequest {
        conversation: conversation.id,
        prompt: prompt.to_string(),
    }
}

fn settle(app: &mut App, id: ConversationId, reply: Message) -> Effect {
    match app.conversation_mut() {
        Some(conversation) if conversation.id == id => {
            conversation.push(reply);
            conversation.responding = false;
        }
        _ => warn!("Dropping result for discarded conversation {}", id),
    }
    Effect::None
}
