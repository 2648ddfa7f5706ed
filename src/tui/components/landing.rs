//! # Landing Page Component
//!
//! Greeting shown before a conversation is opened.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

pub const HEADLINE: &str = "Welcome to Courier!";
pub const CALL_TO_ACTION: &str = "Press Enter to go to Chat Agent";

/// Stateless landing view. `notice` is shown under the call to action when
/// the completion client could not be built.
pub struct LandingPage<'a> {
    pub notice: Option<&'a str>,
}

impl<'a> LandingPage<'a> {
    pub fn new(notice: Option<&'a str>) -> Self {
        Self { notice }
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let mut lines = vec![
            Line::from(Span::styled(
                HEADLINE,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(Span::styled(
                CALL_TO_ACTION,
                Style::default().fg(Color::Cyan),
            )),
            Line::from(Span::styled(
                "Ctrl+C to quit",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        if let Some(notice) = self.notice {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                notice,
                Style::default().fg(Color::Red),
            )));
        }
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        )));
        lines
    }
}

impl<'a> Component for LandingPage<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines = self.lines();
        let [body] = Layout::vertical([Constraint::Length(lines.len() as u16)])
            .flex(Flex::Center)
            .areas(area);

        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), body);
    }
}
