//! Help overlay listing the live key bindings, config overrides included.

use crate::app::App;
use crate::keybindings::{Action, Context};
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const SECTIONS: [Context; 4] = [
    Context::Global,
    Context::Search,
    Context::SourcePicker,
    Context::Reader,
];

const KEY_COLUMN: usize = 14;

/// Group `(context, key, action, description)` rows into titled sections.
fn help_sections(
    bindings: &[(Context, String, Action, &'static str)],
) -> Vec<(&'static str, Vec<(String, &'static str)>)> {
    SECTIONS
        .iter()
        .filter_map(|ctx| {
            let entries: Vec<_> = bindings
                .iter()
                .filter(|(c, ..)| c == ctx)
                .map(|(_, key, _, desc)| (key.clone(), *desc))
                .collect();
            (!entries.is_empty()).then(|| (ctx.label(), entries))
        })
        .collect()
}

pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(70, 80, f.area());
    if overlay.width < 24 || overlay.height < 6 {
        return;
    }
    f.render_widget(Clear, overlay);

    let heading = app.style("reader_title").add_modifier(Modifier::BOLD);
    let key_style = app.style("reader_link");
    let mut lines = Vec::new();
    for (label, entries) in help_sections(&app.keybindings.all_bindings()) {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(label, heading)));
        for (key, desc) in entries {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<width$}", key, width = KEY_COLUMN), key_style),
                Span::raw(desc),
            ]));
        }
    }

    let inner_height = overlay.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(inner_height);
    let scroll = app.help_scroll_offset.min(max_scroll);

    let title = if max_scroll > 0 {
        format!(" Keys {}/{} (j/k, Esc) ", scroll + 1, max_scroll + 1)
    } else {
        " Keys (? to close) ".to_string()
    };

    let help = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(title),
        )
        .style(app.style("reader_body"))
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
    f.render_widget(help, overlay);
}

/// Rectangle covering `percent_x` by `percent_y` of `area`, centered.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keybindings::KeybindingRegistry;
    use std::collections::HashMap;

    #[test]
    fn test_sections_follow_display_order() {
        let registry = KeybindingRegistry::new();
        let labels: Vec<_> = help_sections(&registry.all_bindings())
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        let expected: Vec<_> = SECTIONS.iter().map(|c| c.label()).collect();
        assert_eq!(labels, expected);
    }

    #[test]
    fn test_sections_reflect_overrides() {
        let mut registry = KeybindingRegistry::new();
        let overrides = HashMap::from([("quit".to_string(), "x".to_string())]);
        assert!(registry.apply_overrides(&overrides).is_empty());

        let sections = help_sections(&registry.all_bindings());
        let global = &sections[0].1;
        assert!(global
            .iter()
            .any(|(key, desc)| key == "x" && *desc == Action::Quit.describe()));
    }

    #[test]
    fn test_centered_rect_is_centered() {
        let rect = centered_rect(50, 50, Rect::new(0, 0, 100, 40));
        assert_eq!(rect, Rect::new(25, 10, 50, 20));
    }
}
