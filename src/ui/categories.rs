use crate::app::{App, Focus};
use crate::news::Category;
use crate::util::strip_control_chars;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the filters row: category chips followed by the current source.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let focused = app.focus == Focus::Categories;
    let active = app.intent.category();
    // no category applies while a source or search is active
    let category_applies = app.intent.hero_visible();

    let mut spans = Vec::with_capacity(Category::ALL.len() * 2 + 2);
    for (i, category) in Category::ALL.iter().enumerate() {
        let style = if focused && i == app.selected_category {
            app.style("chip_selected")
        } else if category_applies && *category == active {
            app.style("chip_active")
        } else {
            app.style("chip_normal")
        };
        spans.push(Span::styled(format!(" {} ", category.label()), style));
        spans.push(Span::raw(" "));
    }

    let source_label = match app.intent.source() {
        Some(id) => app
            .sources
            .iter()
            .find(|s| s.id == id)
            .map(|s| strip_control_chars(&s.name).into_owned())
            .unwrap_or_else(|| id.to_string()),
        None => "All Sources".to_string(),
    };
    spans.push(Span::styled("│ Source: ", app.style("article_meta")));
    spans.push(Span::styled(source_label, app.style("article_source")));

    let border = if focused {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };
    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(" Categories "),
    );
    f.render_widget(paragraph, area);
}
