use crate::app::{App, Focus};
use crate::util::{display_width, format_relative_time, strip_control_chars, truncate_to_width};
use chrono::Utc;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Shown when the list is empty and nothing is loading.
pub const EMPTY_NOTICE: &str = "No articles found";

/// Render the article grid (every article after the hero).
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let focused = app.focus == Focus::Articles;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            app.style("panel_border_focused")
        } else {
            app.style("panel_border")
        })
        .title(format!(" {} ", app.active_query.describe()));

    let grid = app.grid_articles();
    if grid.is_empty() {
        let text = if app.is_loading() {
            "Loading..."
        } else if app.hero_article().is_some() {
            ""
        } else {
            EMPTY_NOTICE
        };
        let notice = Paragraph::new(Span::styled(text, app.style("empty_notice"))).block(block);
        f.render_widget(notice, area);
        return;
    }

    let now = Utc::now();
    let inner_width = area.width.saturating_sub(2) as usize;
    let selection = if focused { app.grid_selection() } else { None };

    let items: Vec<ListItem> = grid
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let source = strip_control_chars(&article.source_name);
            let time = format_relative_time(article.published_at, now);
            let meta = format!("{} · {}", source, time);
            let meta_width = display_width(&meta) + 2;

            let title = strip_control_chars(&article.title);
            let title_style = if selection == Some(i) {
                app.style("article_selected")
            } else {
                app.style("article_title")
            };
            let title = truncate_to_width(&title, inner_width.saturating_sub(meta_width));

            ListItem::new(Line::from(vec![
                Span::styled(title.into_owned(), title_style),
                Span::raw("  "),
                Span::styled(source.into_owned(), app.style("article_source")),
                Span::styled(format!(" · {}", time), app.style("article_meta")),
            ]))
        })
        .collect();

    let list = List::new(items).block(block);
    let mut state = ListState::default().with_selected(selection);
    f.render_stateful_widget(list, area, &mut state);
}
