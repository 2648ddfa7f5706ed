use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::{App, Page};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{LandingPage, MessageList, TitleBar};

/// Draw the mounted page.
///
/// Chat layout, top to bottom: title bar (1 line), message list (rest),
/// input box (grows with the draft).
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    let area = frame.area();
    let conversation = match &app.page {
        Page::Landing => {
            let notice = app.client.as_ref().err().map(|e| e.to_string());
            LandingPage::new(notice.as_deref()).render(frame, area);
            return;
        }
        Page::Chat(conversation) => conversation,
    };

    use Constraint::{Length, Min};
    let input_height = tui.input.calculate_height(area.width);
    let [title_area, list_area, input_area] =
        Layout::vertical([Length(1), Min(0), Length(input_height)]).areas(area);

    TitleBar::new(
        app.model_name.clone(),
        conversation.responding,
        app.client_available(),
    )
    .render(frame, title_area);

    MessageList::new(&mut tui.message_list, conversation.messages()).render(frame, list_area);

    tui.input.disabled = conversation.responding;
    tui.input.render(frame, input_area);
}
