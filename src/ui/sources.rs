use crate::app::App;
use crate::util::strip_control_chars;
use ratatui::{
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::help::centered_rect;

/// Render the source picker overlay. Row 0 is "All Sources".
pub fn render(f: &mut Frame, app: &App) {
    let Some(picker) = app.source_picker.as_ref() else {
        return;
    };

    let overlay = centered_rect(60, 70, f.area());
    if overlay.width < 20 || overlay.height < 5 {
        return;
    }
    f.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border_focused"))
        .title(" Sources ");

    if app.sources.is_empty() && app.is_loading() {
        let loading = Paragraph::new(Span::styled("Loading sources...", app.style("empty_notice")))
            .block(block);
        f.render_widget(loading, overlay);
        return;
    }

    let current = app.intent.source();
    let mut items = Vec::with_capacity(app.sources.len() + 1);
    items.push(ListItem::new(Line::from(Span::styled(
        marked("All Sources", current.is_none()),
        app.style("article_title"),
    ))));
    items.extend(app.sources.iter().map(|source| {
        let name = strip_control_chars(&source.name);
        let mut spans = vec![Span::styled(
            marked(&name, current == Some(source.id.as_str())),
            app.style("article_title"),
        )];
        if let Some(category) = source.category.as_deref() {
            spans.push(Span::styled(format!("  {}", category), app.style("article_meta")));
        }
        ListItem::new(Line::from(spans))
    }));

    let list = List::new(items)
        .block(block)
        .highlight_style(app.style("overlay_selected"));
    let mut state = ListState::default().with_selected(Some(picker.selected));
    f.render_stateful_widget(list, overlay, &mut state);
}

fn marked(label: &str, active: bool) -> String {
    if active {
        format!("● {}", label)
    } else {
        format!("  {}", label)
    }
}
