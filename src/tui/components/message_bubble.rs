use chrono::Local;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::core::message::{Message, Sender};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;
/// A bubble never spans more than this share of the list width.
const MAX_WIDTH_PERCENT: u16 = 70;

/// A stateless component that renders one chat message as a bubble.
///
/// User bubbles hug the right edge and agent bubbles the left, each capped at
/// 70% of the list width and shrunk to fit short messages. The border title
/// stands in for an avatar: `You` or `AI`, plus the local send time.
///
/// `MessageBubble` is created fresh each frame by the parent `MessageList`.
#[derive(Clone, Copy)]
pub struct MessageBubble<'a> {
    pub message: &'a Message,
}

impl<'a> MessageBubble<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self { message }
    }

    fn label(sender: Sender) -> &'static str {
        match sender {
            Sender::User => "You",
            Sender::Agent => "AI",
        }
    }

    fn title(message: &Message) -> String {
        let time = message.created_at.with_timezone(&Local).format("%H:%M");
        format!("{} · {}", Self::label(message.sender), time)
    }

    pub fn style(sender: Sender) -> Style {
        match sender {
            Sender::User => Style::default().fg(Color::Green),
            Sender::Agent => Style::default().fg(Color::Blue),
        }
    }

    /// Width of the bubble (borders included) inside a list `list_width` wide.
    pub fn bubble_width(message: &Message, list_width: u16) -> u16 {
        let max = (u32::from(list_width) * u32::from(MAX_WIDTH_PERCENT) / 100) as u16;
        let title_width = Self::title(message).width() as u16 + 2;
        let min = title_width.min(list_width);
        if max < min {
            return list_width;
        }

        let longest_line = message
            .text
            .trim()
            .lines()
            .map(|line| line.width())
            .max()
            .unwrap_or(0)
            .min(u16::MAX as usize) as u16;

        longest_line
            .saturating_add(HORIZONTAL_OVERHEAD)
            .clamp(min, max)
    }

    /// Calculate the height required for this message in a list `list_width` wide.
    ///
    /// Uses `textwrap` with options matching ratatui's `Paragraph` wrapping, so
    /// the list can lay out its scroll canvas without rendering first.
    pub fn calculate_height(message: &Message, list_width: u16) -> u16 {
        let content_width = Self::bubble_width(message, list_width).saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }

        let content = message.text.trim();
        if content.is_empty() {
            return VERTICAL_OVERHEAD;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(content, options);
        u16::try_from(lines.len())
            .unwrap_or(u16::MAX)
            .max(1)
            .saturating_add(VERTICAL_OVERHEAD)
    }

    /// Where the bubble sits inside the row `area` allotted to it.
    pub fn bubble_rect(message: &Message, area: Rect) -> Rect {
        let width = Self::bubble_width(message, area.width);
        let x = match message.sender {
            Sender::User => area.x + area.width.saturating_sub(width),
            Sender::Agent => area.x,
        };
        Rect::new(x, area.y, width, area.height)
    }
}

impl<'a> Widget for MessageBubble<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Self::style(self.message.sender);
        let border_style = style.add_modifier(Modifier::DIM);
        let rect = Self::bubble_rect(self.message, area);

        let mut block = Block::bordered()
            .title(Self::title(self.message))
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));
        if self.message.is_user() {
            block = block.title_alignment(ratatui::layout::Alignment::Right);
        }

        let inner_area = block.inner(rect);
        block.render(rect, buf);

        Paragraph::new(self.message.text.trim())
            .style(style)
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}
