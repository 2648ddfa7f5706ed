//! # MessageInput Component
//!
//! Free-text box at the bottom of the chat view.
//!
//! ## Responsibilities
//!
//! - Capture text input and editing (backspace, delete, cursor movement, paste)
//! - Emit the trimmed draft on Enter and clear itself
//! - Refuse to submit while `disabled` (a reply is pending)
//!
//! ## State Management
//!
//! The draft and cursor are internal state. `disabled` is a prop the parent
//! sets from the application state every frame.

mod layout;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use layout::{
    MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, cursor_line, cursor_screen_pos, inner_width,
    line_count, next_char_boundary, prev_char_boundary, visible_lines,
};

pub const PLACEHOLDER: &str = "Type your message...";
const TITLE: &str = "Message";
const DISABLED_TITLE: &str = "Waiting for reply...";

/// High-level events emitted by the MessageInput
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the trimmed draft (Enter pressed)
    Submit(String),
    /// Draft or cursor changed
    ContentChanged,
}

/// Text input component.
///
/// # Props
///
/// - `disabled`: true while a reply is pending; typing still works, submit does not
///
/// # State
///
/// - `draft`: current text being typed
/// - `cursor`: byte offset into `draft`
/// - `first_line`: first visible wrapped line once the draft outgrows the box
pub struct MessageInput {
    pub draft: String,
    pub disabled: bool,
    cursor: usize,
    first_line: u16,
}

impl Default for MessageInput {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageInput {
    pub fn new() -> Self {
        Self {
            draft: String::new(),
            disabled: false,
            cursor: 0,
            first_line: 0,
        }
    }

    /// Height needed for the current draft, between 1 and `MAX_VISIBLE_LINES`
    /// content lines plus borders.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let lines = line_count(&self.draft, inner_width(area_width));
        lines.min(MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    fn clear(&mut self) {
        self.draft.clear();
        self.cursor = 0;
        self.first_line = 0;
    }

    /// Keep the cursor line inside the visible window.
    fn update_first_line(&mut self, width: u16) {
        if line_count(&self.draft, width) <= MAX_VISIBLE_LINES {
            self.first_line = 0;
            return;
        }
        let line = cursor_line(&self.draft, self.cursor, width);
        if line < self.first_line {
            self.first_line = line;
        } else if line >= self.first_line + MAX_VISIBLE_LINES {
            self.first_line = line + 1 - MAX_VISIBLE_LINES;
        }
    }

    fn render_scrollbar(&self, frame: &mut Frame, area: Rect, total_lines: u16) {
        if total_lines <= MAX_VISIBLE_LINES {
            return;
        }
        let mut state = ScrollbarState::default()
            .content_length(total_lines.saturating_sub(MAX_VISIBLE_LINES) as usize)
            .position(self.first_line as usize);
        let scrollbar_area = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            scrollbar_area,
            &mut state,
        );
    }
}

impl Component for MessageInput {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = inner_width(area.width);
        self.update_first_line(width);

        let (title, border_style) = if self.disabled {
            (DISABLED_TITLE, Style::default().fg(Color::DarkGray))
        } else {
            (TITLE, Style::default().fg(Color::Green))
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .padding(Padding::horizontal(1))
            .title(title);

        let paragraph = if self.draft.is_empty() {
            Paragraph::new(PLACEHOLDER).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            let text_style = if self.disabled {
                Style::default().add_modifier(Modifier::DIM)
            } else {
                Style::default()
            };
            Paragraph::new(visible_lines(&self.draft, width, self.first_line)).style(text_style)
        };

        frame.render_widget(paragraph.block(block), area);
        self.render_scrollbar(frame, area, line_count(&self.draft, width));

        frame.set_cursor_position(cursor_screen_pos(
            &self.draft,
            self.cursor,
            area,
            self.first_line,
        ));
    }
}

impl EventHandler for MessageInput {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.draft.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Terminals send CR for pasted line breaks
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                self.draft.insert_str(self.cursor, &text);
                self.cursor += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => (self.cursor > 0).then(|| {
                let prev = prev_char_boundary(&self.draft, self.cursor);
                self.draft.drain(prev..self.cursor);
                self.cursor = prev;
                InputEvent::ContentChanged
            }),
            TuiEvent::Delete => (self.cursor < self.draft.len()).then(|| {
                let next = next_char_boundary(&self.draft, self.cursor);
                self.draft.drain(self.cursor..next);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = prev_char_boundary(&self.draft, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor < self.draft.len()).then(|| {
                self.cursor = next_char_boundary(&self.draft, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => {
                let line_start = self.draft[..self.cursor]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                (self.cursor != line_start).then(|| {
                    self.cursor = line_start;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let line_end = self.draft[self.cursor..]
                    .find('\n')
                    .map(|i| self.cursor + i)
                    .unwrap_or(self.draft.len());
                (self.cursor != line_end).then(|| {
                    self.cursor = line_end;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::Submit => {
                if self.disabled {
                    return None;
                }
                let text = self.draft.trim();
                if text.is_empty() {
                    return None;
                }
                let text = text.to_string();
                self.clear();
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}
