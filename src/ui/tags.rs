use crate::app::{App, Focus};
use crate::news::{TrendingTag, TRENDING_TAGS};
use crate::util::display_width;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const CHIP_GAP: usize = 1;

fn chip_text(tag: &TrendingTag) -> String {
    format!(" {} {} ", tag.icon, tag.label)
}

/// Index of the first chip to draw so that `selected` fits in `width` columns.
pub(super) fn scroll_start(widths: &[usize], selected: usize, width: usize) -> usize {
    let mut start = 0;
    loop {
        let used: usize = widths[start..=selected]
            .iter()
            .map(|w| w + CHIP_GAP)
            .sum();
        if used <= width || start == selected {
            return start;
        }
        start += 1;
    }
}

/// Render the trending tag strip.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let focused = app.focus == Focus::Tags;
    let border = if focused {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };

    let chips: Vec<String> = TRENDING_TAGS.iter().map(chip_text).collect();
    let widths: Vec<usize> = chips.iter().map(|c| display_width(c)).collect();
    let selected = app.selected_tag.min(TRENDING_TAGS.len() - 1);
    let start = scroll_start(&widths, selected, area.width.saturating_sub(2) as usize);

    let mut spans = Vec::with_capacity(chips.len() * 2);
    for (i, (chip, tag)) in chips.iter().zip(TRENDING_TAGS.iter()).enumerate().skip(start) {
        let style = if focused && i == selected {
            app.style("tag_selected")
        } else {
            app.style("tag_normal").patch(Style::default().fg(tag.color))
        };
        spans.push(Span::styled(chip.clone(), style));
        spans.push(Span::raw(" "));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(" Trending "),
    );
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_start_keeps_selected_visible() {
        let widths = [10, 10, 10, 10];
        // 11 columns per chip with the gap
        assert_eq!(scroll_start(&widths, 0, 30), 0);
        assert_eq!(scroll_start(&widths, 1, 30), 0);
        assert_eq!(scroll_start(&widths, 3, 30), 2);
        // a chip wider than the strip still starts at itself
        assert_eq!(scroll_start(&widths, 2, 5), 2);
    }
}
