use crate::app::App;
use crate::util::{format_relative_time, strip_control_chars, truncate_to_width};
use chrono::Utc;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Height of the hero panel including borders.
pub const HERO_HEIGHT: u16 = 6;

/// Render the hero card for the first article.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 10 || area.height < 3 {
        return;
    }
    let Some(article) = app.hero_article() else {
        return;
    };

    let selected = app.grid_selection().is_none();
    let border = if selected {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };
    let width = area.width.saturating_sub(4) as usize;

    let title = strip_control_chars(&article.title);
    let title_style = if selected {
        app.style("article_selected")
    } else {
        app.style("hero_title")
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(" Trending ", app.style("hero_badge")),
            Span::raw(" "),
            Span::styled(
                format_relative_time(article.published_at, Utc::now()),
                app.style("hero_meta"),
            ),
            Span::styled(" · ", app.style("hero_meta")),
            Span::styled(
                strip_control_chars(&article.source_name).into_owned(),
                app.style("article_source"),
            ),
        ]),
        Line::from(Span::styled(
            truncate_to_width(&title, width).into_owned(),
            title_style,
        )),
    ];
    if let Some(desc) = article.description.as_deref() {
        lines.push(Line::from(Span::styled(
            strip_control_chars(desc).into_owned(),
            app.style("hero_body"),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).border_style(border))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
