use crate::app::{App, View};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.source_picker.is_some() {
        Cow::Borrowed("[j/k]move [Enter]select [Esc]close")
    } else {
        match app.view {
            View::Browse if app.search_mode => {
                Cow::Borrowed("Type to search | ESC clear | ENTER done")
            }
            View::Browse => Cow::Borrowed(
                "[/]search [Tab]focus [Enter]open [s]ources [r]efresh [T]heme [?]help [q]uit",
            ),
            View::Reader => Cow::Borrowed("[b]ack [j/k]scroll [Ctrl+d/u]page [g]top [o]pen [q]uit"),
        }
    };

    let paragraph = Paragraph::new(text).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}
