use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::loop_runner::SPINNER_FRAMES;

const SPINNER: [&str; SPINNER_FRAMES] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Render the header: app name, search box, spinner and theme name.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border"));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12),
            Constraint::Min(10),
            Constraint::Length(14),
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new(Span::styled(" newsdeck", app.style("header_title"))),
        chunks[0],
    );

    let input = app.intent.search_input();
    let search = if app.search_mode {
        Span::styled(format!(" Search: {}_", input), app.style("search_box_active"))
    } else if input.is_empty() {
        Span::styled(" / to search", app.style("search_box"))
    } else {
        Span::styled(format!(" Search: {}", input), app.style("search_box"))
    };
    f.render_widget(Paragraph::new(Line::from(search)), chunks[1]);

    let mut right = Vec::with_capacity(2);
    if app.is_loading() {
        right.push(Span::styled(
            format!("{} ", SPINNER[app.spinner_frame % SPINNER_FRAMES]),
            app.style("spinner"),
        ));
    }
    right.push(Span::styled(
        format!("[{}]", app.theme_variant.name()),
        app.style("hero_meta"),
    ));
    f.render_widget(
        Paragraph::new(Line::from(right)).alignment(Alignment::Right),
        chunks[2],
    );
}
