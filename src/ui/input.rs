//! Input handling for the TUI.
//!
//! This module processes keyboard input and dispatches to the appropriate
//! handler based on current view, overlay and mode.

use crate::app::{App, AppEvent, Focus, SourcePicker, View};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::news::{Category, TRENDING_TAGS};
use crate::util::MAX_SEARCH_QUERY_LENGTH;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{open_in_browser, spawn_fetch, spawn_sources_load};
use super::Action;

/// Main input dispatch function.
///
/// Overlays capture all keys while visible; otherwise input is routed by
/// search mode and view.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    if app.show_help {
        return handle_help_input(app, code);
    }

    if app.source_picker.is_some() {
        return handle_picker_input(app, code, modifiers, event_tx);
    }

    if app.search_mode {
        return handle_search_input(app, code, modifiers, event_tx);
    }

    match app.view {
        View::Browse => handle_browse_input(app, code, modifiers, event_tx),
        View::Reader => handle_reader_input(app, code, modifiers),
    }
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input in browse view (tags, category chips, article grid).
fn handle_browse_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    let action = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Global);

    match action {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::NavDown) => app.nav_down(),
        Some(KbAction::NavUp) => app.nav_up(),
        Some(KbAction::NavLeft) => app.nav_left(),
        Some(KbAction::NavRight) => app.nav_right(),
        Some(KbAction::CycleFocus) => app.cycle_focus(),
        Some(KbAction::Back) => {
            // Esc from a strip returns to the grid
            app.focus = Focus::Articles;
        }
        Some(KbAction::Select) => handle_select(app, event_tx),
        Some(KbAction::Refresh) => {
            let query = app.intent.current_query();
            app.set_status(format!("Refreshing {}", query.describe()));
            spawn_fetch(app, query, event_tx);
        }
        Some(KbAction::EnterSearch) => {
            app.search_mode = true;
        }
        Some(KbAction::OpenSourcePicker) => {
            app.source_picker = Some(SourcePicker::default());
            spawn_sources_load(app, event_tx);
        }
        Some(KbAction::OpenInBrowser) => {
            if let Some(url) = app.selected_article().map(|a| a.article_url.clone()) {
                open_in_browser(app, &url);
            }
        }
        Some(KbAction::CycleTheme) => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        Some(KbAction::ShowHelp) => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        _ => {}
    }
    Action::Continue
}

/// Enter acts on whichever strip has focus.
fn handle_select(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    match app.focus {
        Focus::Tags => {
            let Some(&tag) = TRENDING_TAGS.get(app.selected_tag) else {
                return;
            };
            tracing::debug!(tag = tag.id, "Trending tag selected");
            let query = app.intent.on_tag_click(tag.id);
            app.sync_category_cursor();
            app.focus = Focus::Articles;
            spawn_fetch(app, query, event_tx);
        }
        Focus::Categories => {
            let Some(&category) = Category::ALL.get(app.selected_category) else {
                return;
            };
            let query = app.intent.on_category_select(category);
            app.search_mode = false;
            spawn_fetch(app, query, event_tx);
        }
        Focus::Articles => {
            app.enter_reader();
        }
    }
}

/// Handle typing in the search box.
///
/// Every change goes through the intent; a query comes back once the text is
/// long enough (or cleared), and each dispatch supersedes the previous one.
fn handle_search_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    let action = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Search);

    match action {
        Some(KbAction::ExitSearch) => {
            app.search_mode = false;
            if !app.intent.search_input().is_empty() {
                if let Some(query) = app.intent.on_search("") {
                    spawn_fetch(app, query, event_tx);
                }
            }
            return Action::Continue;
        }
        Some(KbAction::CommitSearch) => {
            app.search_mode = false;
            app.focus = Focus::Articles;
            return Action::Continue;
        }
        _ => {}
    }

    let mut text = app.intent.search_input().to_string();
    match code {
        KeyCode::Backspace => {
            if text.pop().is_none() {
                return Action::Continue;
            }
        }
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            if text.len() >= MAX_SEARCH_QUERY_LENGTH {
                app.set_status(format!(
                    "Search query at max length ({} chars)",
                    MAX_SEARCH_QUERY_LENGTH
                ));
                return Action::Continue;
            }
            text.push(c);
        }
        _ => return Action::Continue,
    }

    if let Some(query) = app.intent.on_search(&text) {
        spawn_fetch(app, query, event_tx);
    }
    Action::Continue
}

/// Handle input while the source picker overlay is open.
fn handle_picker_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    let action = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::SourcePicker);

    match action {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::Back) => app.source_picker = None,
        Some(KbAction::NavDown) => app.nav_down(),
        Some(KbAction::NavUp) => app.nav_up(),
        Some(KbAction::Select) => {
            let Some(picker) = app.source_picker.take() else {
                return Action::Continue;
            };
            // row 0 is "All Sources"
            let source = picker
                .selected
                .checked_sub(1)
                .and_then(|i| app.sources.get(i))
                .map(|s| s.id.clone());
            let query = app.intent.on_source_select(source.as_deref());
            app.search_mode = false;
            app.sync_category_cursor();
            spawn_fetch(app, query, event_tx);
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input in the reader view.
fn handle_reader_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    let action = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Reader);
    let page = app.reader_visible_lines.max(1);

    match action {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::ExitReader) => app.exit_reader(),
        Some(KbAction::ScrollDown) => app.scroll_down(1),
        Some(KbAction::ScrollUp) => app.scroll_up(1),
        Some(KbAction::PageDown) => app.scroll_down(page),
        Some(KbAction::PageUp) => app.scroll_up(page),
        Some(KbAction::ScrollTop) => app.scroll_offset = 0,
        Some(KbAction::OpenInBrowser) => {
            if let Some(url) = app.reader_article.as_ref().map(|a| a.article_url.clone()) {
                open_in_browser(app, &url);
            }
        }
        Some(KbAction::CycleTheme) => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        Some(KbAction::ShowHelp) => app.show_help = true,
        _ => {}
    }
    Action::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ClientSettings, CredentialRotator, NewsClient, Source};
    use crate::news::Query;
    use secrecy::SecretString;
    use std::sync::Arc;

    fn test_app() -> App {
        let rotator =
            CredentialRotator::new([SecretString::from("test-key".to_string())]).unwrap();
        let settings = ClientSettings {
            base_url: "http://127.0.0.1:9/v2".to_string(),
            ..ClientSettings::default()
        };
        let client = NewsClient::new(settings, rotator).unwrap();
        App::new(Arc::new(client), Category::General)
    }

    fn press(app: &mut App, code: KeyCode, tx: &mpsc::Sender<AppEvent>) -> Action {
        handle_input(app, code, KeyModifiers::NONE, tx)
    }

    fn type_text(app: &mut App, text: &str, tx: &mpsc::Sender<AppEvent>) {
        for c in text.chars() {
            press(app, KeyCode::Char(c), tx);
        }
    }

    #[tokio::test]
    async fn test_short_search_does_not_dispatch() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);

        press(&mut app, KeyCode::Char('/'), &tx);
        assert!(app.search_mode);
        type_text(&mut app, "ca", &tx);
        assert_eq!(app.fetch_generation, 0);

        press(&mut app, KeyCode::Char('t'), &tx);
        assert_eq!(app.fetch_generation, 1);
        assert_eq!(app.intent.current_query(), Query::Search("cat".into()));
    }

    #[tokio::test]
    async fn test_search_typing_does_not_trigger_bindings() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);

        press(&mut app, KeyCode::Char('/'), &tx);
        // 'q' and 's' are global bindings but must be typed here
        assert!(matches!(press(&mut app, KeyCode::Char('q'), &tx), Action::Continue));
        press(&mut app, KeyCode::Char('s'), &tx);
        assert_eq!(app.intent.search_input(), "qs");
        assert!(app.source_picker.is_none());
    }

    #[tokio::test]
    async fn test_escape_clears_search_and_refetches() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);

        press(&mut app, KeyCode::Char('/'), &tx);
        type_text(&mut app, "mars", &tx);
        let before = app.fetch_generation;

        press(&mut app, KeyCode::Esc, &tx);
        assert!(!app.search_mode);
        assert_eq!(app.intent.search_input(), "");
        assert_eq!(app.fetch_generation, before + 1);
        assert!(app.intent.hero_visible());
    }

    #[tokio::test]
    async fn test_backspace_below_threshold_does_not_dispatch() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);

        press(&mut app, KeyCode::Char('/'), &tx);
        type_text(&mut app, "abc", &tx);
        let before = app.fetch_generation;
        press(&mut app, KeyCode::Backspace, &tx);
        assert_eq!(app.intent.search_input(), "ab");
        assert_eq!(app.fetch_generation, before);
    }

    #[tokio::test]
    async fn test_tab_cycles_focus_and_enter_selects_category() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);

        assert_eq!(app.focus, Focus::Articles);
        press(&mut app, KeyCode::Tab, &tx);
        assert_eq!(app.focus, Focus::Tags);
        press(&mut app, KeyCode::Tab, &tx);
        assert_eq!(app.focus, Focus::Categories);

        press(&mut app, KeyCode::Right, &tx);
        press(&mut app, KeyCode::Enter, &tx);
        assert_eq!(app.intent.category(), Category::ALL[1]);
        assert_eq!(app.fetch_generation, 1);
    }

    #[tokio::test]
    async fn test_tag_enter_runs_tag_search() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);

        app.focus = Focus::Tags;
        press(&mut app, KeyCode::Enter, &tx);
        assert_eq!(app.fetch_generation, 1);
        assert_eq!(app.focus, Focus::Articles);
        assert_eq!(app.intent.category(), Category::General);
    }

    #[tokio::test]
    async fn test_source_picker_selects_source() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);

        press(&mut app, KeyCode::Char('/'), &tx);
        type_text(&mut app, "budget", &tx);
        press(&mut app, KeyCode::Enter, &tx);

        press(&mut app, KeyCode::Char('s'), &tx);
        assert!(app.source_picker.is_some());
        assert!(app.sources_requested);
        app.sources = Arc::new(vec![Source {
            id: "bbc-news".into(),
            name: "BBC News".into(),
            description: None,
            url: None,
            category: None,
            language: None,
            country: None,
        }]);

        press(&mut app, KeyCode::Down, &tx);
        press(&mut app, KeyCode::Enter, &tx);
        assert!(app.source_picker.is_none());
        assert_eq!(app.intent.source(), Some("bbc-news"));
        assert_eq!(app.intent.search_input(), "");
        assert_eq!(app.intent.current_query(), Query::Source("bbc-news".into()));
    }

    #[tokio::test]
    async fn test_help_overlay_captures_keys() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);

        press(&mut app, KeyCode::Char('?'), &tx);
        assert!(app.show_help);
        // q closes the overlay instead of quitting
        assert!(matches!(press(&mut app, KeyCode::Char('q'), &tx), Action::Continue));
        assert!(!app.show_help);
        assert!(matches!(press(&mut app, KeyCode::Char('q'), &tx), Action::Quit));
    }
}
