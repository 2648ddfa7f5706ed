//! # Application State
//!
//! Core business state for Courier. Domain logic only, no TUI types.
//! Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── client: ClientHandle          // built once, injected; Err = unavailable
//! ├── page: Page                    // Landing | Chat(Conversation)
//! ├── model_name: String            // shown in the title bar
//! ├── welcome_message: Option       // seeds each new conversation
//! └── next_conversation: u64        // id source for mounted conversations
//!
//! Conversation
//! ├── id: ConversationId
//! ├── messages: Vec<Message>        // append-only
//! └── responding: bool              // a remote call is outstanding
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::fmt;

use crate::core::config::ResolvedConfig;
use crate::core::message::Message;
use crate::inference::ClientHandle;

/// Identifies one mounted conversation. Results carry it back so a reply
/// for a conversation that was since discarded can be recognized and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationId(pub u64);

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
pub struct Conversation {
    pub id: ConversationId,
    messages: Vec<Message>,
    pub responding: bool,
}

impl Conversation {
    pub fn new(id: ConversationId) -> Self {
        Self {
            id,
            messages: Vec::new(),
            responding: false,
        }
    }

    /// A conversation that starts with a single message already in place.
    pub fn seeded(id: ConversationId, seed: Message) -> Self {
        let mut conversation = Self::new(id);
        conversation.push(seed);
        conversation
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The only way a message enters the sequence.
    pub(crate) fn push(&mut self, message: Message) {
        self.messages.push(message);
    }
}

/// Which view is mounted. Leaving the chat drops its conversation.
#[derive(Debug)]
pub enum Page {
    Landing,
    Chat(Conversation),
}

pub struct App {
    pub client: ClientHandle,
    pub page: Page,
    pub model_name: String,
    pub welcome_message: Option<String>,
    next_conversation: u64,
}

impl App {
    pub fn new(client: ClientHandle, model_name: String) -> Self {
        Self {
            client,
            page: Page::Landing,
            model_name,
            welcome_message: None,
            next_conversation: 1,
        }
    }

    pub fn from_config(client: ClientHandle, config: &ResolvedConfig) -> Self {
        let mut app = Self::new(client, config.model_name.clone());
        app.welcome_message = config.welcome_message.clone();
        app
    }

    pub fn client_available(&self) -> bool {
        self.client.is_ok()
    }

    /// Hands out a fresh id for the next mounted conversation.
    pub(crate) fn allocate_conversation_id(&mut self) -> ConversationId {
        let id = ConversationId(self.next_conversation);
        self.next_conversation += 1;
        id
    }

    pub fn conversation(&self) -> Option<&Conversation> {
        match &self.page {
            Page::Chat(conversation) => Some(conversation),
            Page::Landing => None,
        }
    }

    pub(crate) fn conversation_mut(&mut self) -> Option<&mut Conversation> {
        match &mut self.page {
            Page::Chat(conversation) => Some(conversation),
            Page::Landing => None,
        }
    }

    /// True while the mounted conversation waits on the remote.
    pub fn is_responding(&self) -> bool {
        self.conversation().is_some_and(|c| c.responding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_app, unavailable_app};

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert!(matches!(app.page, Page::Landing));
        assert!(!app.is_responding());
        assert!(app.client_available());
        assert_eq!(app.model_name, "test-model");
    }

    #[test]
    fn test_unavailable_client_reported() {
        assert!(!unavailable_app().client_available());
    }

    #[test]
    fn test_conversation_ids_increase() {
        let mut app = test_app();
        let a = app.allocate_conversation_id();
        let b = app.allocate_conversation_id();
        assert!(b.0 > a.0);
    }

    #[test]
    fn test_seeded_conversation_has_one_message() {
        let conversation = Conversation::seeded(ConversationId(7), Message::agent("Welcome"));
        assert_eq!(conversation.len(), 1);
        assert!(!conversation.responding);
        assert_eq!(conversation.messages()[0].text, "Welcome");
    }
}
