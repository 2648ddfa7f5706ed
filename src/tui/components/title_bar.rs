//! # TitleBar Component
//!
//! Single-line header of the chat view.
//!
//! ## Responsibilities
//!
//! - Display the app title and current model name
//! - Display whether the agent is composing a reply
//!
//! TitleBar is purely presentational: all data arrives as props and it keeps
//! no state of its own.
//!
//! ```text
//! AI Chat Agent (model: gpt-4) | Agent is typing...
//! AI Chat Agent (model: gpt-4) | Ready to chat!
//! AI Chat Agent (model: gpt-4) | Offline
//! ```

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

pub const APP_TITLE: &str = "AI Chat Agent";
pub const TYPING_STATUS: &str = "Agent is typing...";
pub const READY_STATUS: &str = "Ready to chat!";
pub const OFFLINE_STATUS: &str = "Offline";

/// Top status bar component.
///
/// # Props
///
/// - `model_name`: model requests are sent to
/// - `responding`: a reply is pending
/// - `client_available`: false when the completion client failed to build
pub struct TitleBar {
    pub model_name: String,
    pub responding: bool,
    pub client_available: bool,
}

impl TitleBar {
    pub fn new(model_name: String, responding: bool, client_available: bool) -> Self {
        Self {
            model_name,
            responding,
            client_available,
        }
    }

    fn status(&self) -> Span<'static> {
        if self.responding {
            Span::styled(
                TYPING_STATUS,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )
        } else if self.client_available {
            Span::styled(READY_STATUS, Style::default().fg(Color::Green))
        } else {
            Span::styled(OFFLINE_STATUS, Style::default().fg(Color::Red))
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(APP_TITLE, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(" (model: {}) | ", self.model_name)),
            self.status(),
        ]);
        frame.render_widget(line, area);
    }
}
