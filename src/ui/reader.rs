use crate::api::Article;
use crate::app::{App, MAX_SCROLL};
use crate::util::{format_long_date, strip_control_chars};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the article reader view
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    // Visible lines for paging (area height minus 2 for borders)
    app.reader_visible_lines = area.height.saturating_sub(2) as usize;

    let Some(article) = app.reader_article.as_ref() else {
        let paragraph = Paragraph::new("No article selected")
            .block(Block::default().borders(Borders::ALL).title("Reader"));
        f.render_widget(paragraph, area);
        return;
    };

    let styles = ReaderStyles {
        title: app.style("reader_title"),
        body: app.style("reader_body"),
        meta: app.style("reader_metadata"),
        link: app.style("reader_link"),
    };
    let lines = build_lines(article, &app.reader_paragraphs, &styles);

    // Clamp before drawing so a resize never renders past the end
    let inner_width = area.width.saturating_sub(2) as usize;
    let total: usize = lines
        .iter()
        .map(|l| wrapped_height(l.width(), inner_width))
        .sum();
    let visible = app.reader_visible_lines;
    app.clamp_scroll(total, visible);

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border"))
                .title(" Article "),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset.min(MAX_SCROLL) as u16, 0));

    f.render_widget(paragraph, area);
}

struct ReaderStyles {
    title: Style,
    body: Style,
    meta: Style,
    link: Style,
}

/// Reader content: title, byline, date, description, paragraphs, link.
fn build_lines(article: &Article, paragraphs: &[String], s: &ReaderStyles) -> Vec<Line<'static>> {
    let mut byline = strip_control_chars(&article.source_name).into_owned();
    if let Some(author) = article.author.as_deref().filter(|a| !a.trim().is_empty()) {
        byline.push_str(" · ");
        byline.push_str(&strip_control_chars(author));
    }

    let mut lines = vec![
        Line::from(Span::styled(
            strip_control_chars(&article.title).into_owned(),
            s.title,
        )),
        Line::from(Span::styled(byline, s.meta)),
        Line::from(Span::styled(format_long_date(article.published_at), s.meta)),
        Line::from(""),
    ];

    // description repeats the body when there is no content
    if article.content.is_some() {
        if let Some(desc) = article.description.as_deref() {
            lines.push(Line::from(Span::styled(
                strip_control_chars(desc).into_owned(),
                s.meta,
            )));
            lines.push(Line::from(""));
        }
    }

    for paragraph in paragraphs {
        lines.push(Line::from(Span::styled(paragraph.clone(), s.body)));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled("Read more: ", s.meta),
        Span::styled(article.article_url.clone(), s.link),
    ]));
    lines
}

/// Rows a line of `line_width` columns takes when wrapped to `width`.
fn wrapped_height(line_width: usize, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    line_width.div_ceil(width).max(1)
}
