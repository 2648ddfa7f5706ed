//! # MessageList Component
//!
//! Scrollable view of the conversation.
//!
//! ## Responsibilities
//!
//! - Display the message sequence, one bubble per message
//! - Scroll to just past the newest message whenever the sequence changes
//! - Let the user scroll back through history in between
//! - Cache bubble heights (messages never change once appended)
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the messages (props).
//! Since `Component::render` takes `&mut self`, the layout cache and scroll
//! state are updated during the render pass.
//!
//! A conversation can be taller than a `u16` canvas, so the absolute scroll
//! position and the layout live in `u32`. Each frame only the bubbles that
//! intersect the viewport go into the `ScrollView`, whose canvas starts at
//! the first of them.

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::message::Message;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message_bubble::MessageBubble;
use crate::tui::event::TuiEvent;

/// Blank rows between consecutive bubbles.
const MESSAGE_GAP: u16 = 1;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Row of the whole conversation shown at the top of the viewport
    pub offset: u32,
    /// View state of the per-frame window canvas
    pub scroll_state: ScrollViewState,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// When true, the view is pinned to the newest message
    pub stick_to_bottom: bool,
    /// Message count at the last render; a change re-pins to the bottom
    pub seen_count: usize,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            offset: 0,
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            seen_count: 0,
            viewport_height: 0,
        }
    }

    fn max_offset(&self) -> u32 {
        self.layout
            .total_height()
            .saturating_sub(u32::from(self.viewport_height))
    }

    fn page(&self) -> u32 {
        u32::from(self.viewport_height).max(1)
    }

    /// Re-pin on any change in the number of messages.
    pub fn observe(&mut self, message_count: usize) {
        if message_count != self.seen_count {
            self.seen_count = message_count;
            self.stick_to_bottom = true;
        }
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }

    /// Re-engage auto-scroll once the user scrolls back down to the end.
    pub fn repin_if_at_bottom(&mut self) {
        let max = self.max_offset();
        if self.offset >= max {
            self.stick_to_bottom = true;
            self.offset = max;
        }
    }

    fn scroll_up_by(&mut self, rows: u32) {
        self.offset = self.offset.min(self.max_offset()).saturating_sub(rows);
        self.stick_to_bottom = false;
    }

    fn scroll_down_by(&mut self, rows: u32) {
        self.offset = self.offset.saturating_add(rows);
        self.repin_if_at_bottom();
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [Message],
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut MessageListState, messages: &'a [Message]) -> Self {
        Self { state, messages }
    }

    fn render_empty(frame: &mut Frame, area: Rect) {
        let hint = Paragraph::new("No messages yet. Say hello!")
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            );
        let row = Rect::new(area.x, area.y + area.height / 2, area.width, area.height.min(1));
        frame.render_widget(hint, row);
    }

    fn render_scrollbar(&self, frame: &mut Frame, area: Rect) {
        let max = self.state.max_offset();
        if max == 0 {
            return;
        }
        let mut scrollbar_state = ScrollbarState::new(max as usize).position(self.state.offset as usize);
        let scrollbar_area = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y,
            width: 1,
            height: area.height,
        };
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            scrollbar_area,
            &mut scrollbar_state,
        );
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for the scrollbar column
        self.state.observe(self.messages.len());
        self.state.viewport_height = area.height;

        // 1. Update Layout Cache
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(self.messages.len(), content_width);
        layout.heights.truncate(reusable);
        for message in self.messages.iter().skip(layout.heights.len()) {
            let height = MessageBubble::calculate_height(message, content_width);
            layout.heights.push(u32::from(height) + u32::from(MESSAGE_GAP));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(self.messages.len(), content_width);

        if self.messages.is_empty() {
            Self::render_empty(frame, area);
            return;
        }

        // 2. Resolve the scroll position before deciding what to draw
        if self.state.stick_to_bottom {
            self.state.offset = self.state.max_offset();
        } else {
            self.state.clamp_scroll();
        }

        // 3. Lay the visible bubbles onto a window canvas starting at the first one
        let layout = &self.state.layout;
        let visible_range = layout.visible_range(self.state.offset, area.height);
        let window_start = layout.offset_of(visible_range.start);
        let window_height = u16::try_from(layout.offset_of(visible_range.end) - window_start)
            .unwrap_or(u16::MAX);

        let mut scroll_view = ScrollView::new(Size::new(content_width, window_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Never)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y: u32 = 0;
        for i in visible_range {
            let height = layout.heights[i];
            if y + height > u32::from(window_height) {
                break;
            }
            let bubble_height = u16::try_from(height)
                .unwrap_or(u16::MAX)
                .saturating_sub(MESSAGE_GAP);
            let row = Rect::new(0, y as u16, content_width, bubble_height);
            scroll_view.render_widget(MessageBubble::new(&self.messages[i]), row);
            y += height;
        }

        let window_offset = u16::try_from(self.state.offset - window_start).unwrap_or(u16::MAX);
        self.state
            .scroll_state
            .set_offset(Position { x: 0, y: window_offset });

        let view_area = Rect {
            width: content_width,
            ..area
        };
        frame.render_stateful_widget(scroll_view, view_area, &mut self.state.scroll_state);
        self.render_scrollbar(frame, area);
    }
}

/// EventHandler lives on `MessageListState` because `MessageList` is rebuilt
/// every frame and cannot hold the scroll position itself.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => self.scroll_up_by(1),
            TuiEvent::ScrollDown => self.scroll_down_by(1),
            TuiEvent::ScrollPageUp => self.scroll_up_by(self.page()),
            TuiEvent::ScrollPageDown => self.scroll_down_by(self.page()),
            _ => {}
        }
        None
    }
}

/// Cached layout measurements, in rows of the whole conversation.
pub struct LayoutCache {
    pub heights: Vec<u32>,
    pub prefix_heights: Vec<u32>,
    message_count: usize,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            message_count: 0,
            content_width: 0,
        }
    }

    /// How many cached heights are still valid.
    ///
    /// Messages are immutable, so only a width change or a shorter sequence
    /// (a new conversation) invalidates anything.
    pub fn reusable_count(&self, message_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width || message_count < self.message_count {
            return 0;
        }
        self.heights.len().min(message_count)
    }

    pub fn update_metadata(&mut self, message_count: usize, content_width: u16) {
        self.message_count = message_count;
        self.content_width = content_width;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u32, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u32 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Row where message `index` starts (`len` gives the total height).
    pub fn offset_of(&self, index: usize) -> u32 {
        if index == 0 {
            0
        } else {
            self.prefix_heights.get(index - 1).copied().unwrap_or_else(|| self.total_height())
        }
    }

    /// Indices of the messages intersecting rows `scroll_offset..scroll_offset + viewport_height`.
    pub fn visible_range(&self, scroll_offset: u32, viewport_height: u16) -> std::ops::Range<usize> {
        let view_end = scroll_offset.saturating_add(u32::from(viewport_height));

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= scroll_offset);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < view_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end.max(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn draw(terminal: &mut Terminal<TestBackend>, state: &mut MessageListState, messages: &[Message]) {
        terminal
            .draw(|f| MessageList::new(state, messages).render(f, f.area()))
            .unwrap();
    }

    #[test]
    fn test_layout_cache_reusable() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![3; 5];
        cache.update_metadata(5, 80);

        assert_eq!(cache.reusable_count(5, 80), 5);
        // New message appended: the old five stay valid
        assert_eq!(cache.reusable_count(6, 80), 5);
        // Width change invalidates everything
        assert_eq!(cache.reusable_count(5, 40), 0);
        // Shorter sequence means a different conversation
        assert_eq!(cache.reusable_count(2, 80), 0);
    }

    #[test]
    fn test_prefix_heights_and_offsets() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![3, 4, 5];
        cache.rebuild_prefix_heights();
        assert_eq!(cache.prefix_heights, vec![3, 7, 12]);
        assert_eq!(cache.total_height(), 12);
        assert_eq!(cache.offset_of(0), 0);
        assert_eq!(cache.offset_of(2), 7);
        assert_eq!(cache.offset_of(3), 12);
    }

    #[test]
    fn test_prefix_heights_past_u16() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![40_000; 3];
        cache.rebuild_prefix_heights();
        assert_eq!(cache.total_height(), 120_000);
        assert_eq!(cache.visible_range(100_000, 24), 2..3);
    }

    #[test]
    fn test_visible_range_only_covers_viewport() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![10; 20];
        cache.rebuild_prefix_heights();
        // Rows 100..110 are exactly message 10
        assert_eq!(cache.visible_range(100, 10), 10..11);
        // Rows 95..105 straddle messages 9 and 10
        assert_eq!(cache.visible_range(95, 10), 9..11);
    }

    #[test]
    fn test_new_message_repins_to_bottom() {
        let mut state = MessageListState::new();
        state.observe(2);
        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);

        state.observe(2);
        assert!(!state.stick_to_bottom, "no change, stays where the user put it");

        state.observe(3);
        assert!(state.stick_to_bottom);
    }

    #[test]
    fn test_scroll_down_at_end_repins() {
        let mut state = MessageListState::new();
        state.stick_to_bottom = false;
        // No content: offset 0 is already the bottom
        state.handle_event(&TuiEvent::ScrollDown);
        assert!(state.stick_to_bottom);
        assert_eq!(state.offset, 0);
    }

    #[test]
    fn test_render_scrolls_to_newest() {
        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
        let mut state = MessageListState::new();
        let mut messages: Vec<Message> = (0..10).map(|i| Message::agent(format!("message {i}"))).collect();

        draw(&mut terminal, &mut state, &messages);
        let text = buffer_text(&terminal);
        assert!(text.contains("message 9"));
        assert!(!text.contains("message 0"));

        // User scrolls away, then a reply lands
        for _ in 0..20 {
            state.handle_event(&TuiEvent::ScrollUp);
        }
        draw(&mut terminal, &mut state, &messages);
        assert!(!buffer_text(&terminal).contains("message 9"));

        messages.push(Message::agent("fresh reply"));
        draw(&mut terminal, &mut state, &messages);
        assert!(buffer_text(&terminal).contains("fresh reply"));
    }

    #[test]
    fn test_render_conversation_taller_than_u16() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut state = MessageListState::new();
        // 40 bubbles of 2000+ rows each: over 80k rows in total
        let messages: Vec<Message> = (0..40)
            .map(|i| Message::agent(format!("{}end {i}", "line\n".repeat(1999))))
            .collect();

        draw(&mut terminal, &mut state, &messages);

        assert!(state.layout.total_height() > u32::from(u16::MAX));
        assert!(buffer_text(&terminal).contains("end 39"));

        // Paging back up a long way still lands on real content
        for _ in 0..100 {
            state.handle_event(&TuiEvent::ScrollPageUp);
        }
        draw(&mut terminal, &mut state, &messages);
        assert!(!buffer_text(&terminal).contains("end 39"));
        assert!(buffer_text(&terminal).contains("line"));
    }

    #[test]
    fn test_render_empty_shows_hint() {
        let mut terminal = Terminal::new(TestBackend::new(40, 5)).unwrap();
        let mut state = MessageListState::new();
        draw(&mut terminal, &mut state, &[]);
        assert!(buffer_text(&terminal).contains("Say hello"));
    }
}
