//! Render functions for the TUI.
//!
//! This module handles all rendering logic, dispatching to the appropriate
//! view based on application state.

use crate::app::{App, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    widgets::Paragraph,
    Frame,
};

use super::hero::HERO_HEIGHT;
use super::{articles, categories, header, help, hero, reader, sources, status, tags};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();
    app.viewport_height = area.height;

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    match app.view {
        View::Browse => render_browse(f, app),
        View::Reader => render_reader(f, app),
    }

    if app.source_picker.is_some() {
        sources::render(f, app);
    }

    if app.show_help {
        help::render(f, app);
    }
}

/// Browse layout: header, hero, tags, filters, grid, status bar.
fn render_browse(f: &mut Frame, app: &App) {
    let area = f.area();
    let hero_height = if app.hero_visible() {
        HERO_HEIGHT
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(hero_height),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    header::render(f, app, chunks[0]);
    if hero_height > 0 {
        hero::render(f, app, chunks[1]);
    }
    tags::render(f, app, chunks[2]);
    categories::render(f, app, chunks[3]);
    articles::render(f, app, chunks[4]);
    status::render(f, app, chunks[5]);
}

/// Render the reader view (article content + status bar).
fn render_reader(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());

    reader::render(f, app, chunks[0]);
    status::render(f, app, chunks[1]);
}
