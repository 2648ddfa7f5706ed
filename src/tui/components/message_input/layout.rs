//! Wrapping math for the message input.
//!
//! Stateless helpers shared by rendering, height calculation and cursor
//! placement, so all three agree on where lines break.

use ratatui::layout::Rect;

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// The box grows up to this many lines, then scrolls internally
pub(super) const MAX_VISIBLE_LINES: u16 = 5;
/// Offset from area edge to content (border + left padding)
const CONTENT_OFFSET: u16 = 2;

pub(super) fn wrap_options(inner_width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(inner_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Inner text width for a box `area_width` wide; 0 if too narrow.
pub(super) fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Wrapped line count, counting a trailing newline as an empty last line.
pub(super) fn line_count(text: &str, width: u16) -> u16 {
    if width == 0 || text.is_empty() {
        return 1;
    }

    let lines = textwrap::wrap(text, wrap_options(width));
    let mut count = (lines.len() as u16).max(1);
    if text.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty()) {
        count += 1;
    }
    count
}

/// The wrapped lines of `text` starting at `first`, at most `MAX_VISIBLE_LINES`.
pub(super) fn visible_lines(text: &str, width: u16, first: u16) -> String {
    if first == 0 || width == 0 {
        return text.to_string();
    }
    let lines = textwrap::wrap(text, wrap_options(width));
    let start = (first as usize).min(lines.len());
    let end = (start + MAX_VISIBLE_LINES as usize).min(lines.len());
    lines[start..end].join("\n")
}

pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

/// Wrapped line (0-based) holding byte offset `pos`.
pub(super) fn cursor_line(text: &str, pos: usize, width: u16) -> u16 {
    if width == 0 || pos == 0 {
        return 0;
    }
    let before = &text[..pos];
    let lines = textwrap::wrap(before, wrap_options(width));
    let mut line = lines.len().saturating_sub(1) as u16;
    if before.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty()) {
        line += 1;
    }
    line
}

/// Column (in chars) of byte offset `pos` within its wrapped line.
///
/// Counted from the last newline rather than from textwrap's output because
/// textwrap drops trailing spaces, and a cursor after a typed space must move.
pub(super) fn cursor_column(text: &str, pos: usize, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let before = &text[..pos];
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let logical = &before[line_start..];
    let segments = textwrap::wrap(logical, wrap_options(width));
    if segments.is_empty() {
        return 0;
    }
    let consumed: usize = segments
        .iter()
        .take(segments.len() - 1)
        .map(|seg| seg.chars().count())
        .sum();
    logical.chars().count().saturating_sub(consumed) as u16
}

/// Screen position of the cursor inside `area`, given the first visible line.
pub(super) fn cursor_screen_pos(text: &str, pos: usize, area: Rect, first_line: u16) -> (u16, u16) {
    let width = inner_width(area.width);
    let line = cursor_line(text, pos, width).saturating_sub(first_line);
    let col = cursor_column(text, pos, width).min(width);
    (area.x + CONTENT_OFFSET + col, area.y + 1 + line)
}
