use crate::api::{Article, FetchOutcome, NewsClient, Source};
use crate::keybindings::KeybindingRegistry;
use crate::news::{Category, LoadingFlag, Query, QueryIntent, TRENDING_TAGS};
use crate::theme::{StyleMap, ThemeVariant};
use crate::util::article_paragraphs;
use ratatui::style::Style;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Maximum scroll offset for the reader view (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

/// How long a status message stays visible.
const STATUS_TTL_SECS: u64 = 3;

/// Status shown when a fetch soft-fails.
pub const FETCH_FAILED_STATUS: &str = "Couldn't load articles. Press r to retry";

/// Below this terminal height the hero card is dropped to leave room for the grid.
pub const HERO_MIN_TERMINAL_HEIGHT: u16 = 24;

// ============================================================================
// View and Focus Enums
// ============================================================================

/// Current view mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Browse, // Hero, tags, chips and article grid
    Reader, // Full-screen article detail
}

/// Which strip has focus in Browse view. Tab cycles in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tags,
    Categories,
    Articles,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Tags => Focus::Categories,
            Focus::Categories => Focus::Articles,
            Focus::Articles => Focus::Tags,
        }
    }
}

/// Source picker overlay. Row 0 is "All Sources".
#[derive(Debug, Clone, Default)]
pub struct SourcePicker {
    pub selected: usize,
}

// ============================================================================
// Events
// ============================================================================

/// Events from background tasks
#[derive(Debug)]
pub enum AppEvent {
    /// A dispatched article fetch finished.
    ///
    /// Only applied when `generation` matches the latest dispatched fetch.
    ArticlesLoaded {
        generation: u64,
        query: Query,
        outcome: FetchOutcome<Article>,
    },
    /// The source listing finished loading.
    SourcesLoaded(FetchOutcome<Source>),
    /// A background task panicked.
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub client: Arc<NewsClient>,
    /// Shared with the client; true while any fetch is in flight.
    pub loading: LoadingFlag,

    // Theme
    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,

    pub keybindings: KeybindingRegistry,

    // Query state
    pub intent: QueryIntent,
    /// Query the current article list belongs to.
    pub active_query: Query,

    // Data
    /// Replaced wholesale on each applied fetch.
    pub articles: Arc<Vec<Article>>,
    pub sources: Arc<Vec<Source>>,
    /// Source listing is fetched once per session.
    pub sources_requested: bool,

    // UI State
    pub view: View,
    pub focus: Focus,
    pub selected_tag: usize,
    /// Cursor over `Category::ALL`.
    pub selected_category: usize,
    /// Index into `articles`; index 0 is the hero when it is visible.
    pub selected_article: usize,
    pub search_mode: bool,
    pub source_picker: Option<SourcePicker>,

    // Reader
    pub reader_article: Option<Article>,
    /// Cleaned body paragraphs for `reader_article`.
    pub reader_paragraphs: Vec<String>,
    pub scroll_offset: usize,
    /// Viewport height from the last render, excluding borders.
    pub reader_visible_lines: usize,

    // Status message with expiry; Cow avoids allocation for static literals
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Generation of the latest dispatched article fetch.
    pub fetch_generation: u64,
    /// Handle to the latest article fetch; aborted when a newer one starts.
    pub fetch_handle: Option<JoinHandle<()>>,
    pub sources_handle: Option<JoinHandle<()>>,

    /// Terminal height of the last frame; the hero only fits on tall terminals.
    pub viewport_height: u16,

    /// Skip rendering when nothing changed.
    pub needs_redraw: bool,
    /// Current frame of the loading spinner animation.
    pub spinner_frame: usize,

    pub show_help: bool,
    pub help_scroll_offset: usize,
}

impl App {
    pub fn new(client: Arc<NewsClient>, category: Category) -> Self {
        let intent = QueryIntent::new(category);
        let active_query = intent.current_query();
        let loading = client.loading();

        Self {
            client,
            loading,
            theme_variant: ThemeVariant::Dark,
            theme: StyleMap::from_palette(&ThemeVariant::Dark.palette()),
            keybindings: KeybindingRegistry::new(),
            intent,
            active_query,
            articles: Arc::new(Vec::new()),
            sources: Arc::new(Vec::new()),
            sources_requested: false,
            view: View::Browse,
            focus: Focus::Articles,
            selected_tag: 0,
            selected_category: category.index(),
            selected_article: 0,
            search_mode: false,
            source_picker: None,
            reader_article: None,
            reader_paragraphs: Vec::new(),
            scroll_offset: 0,
            reader_visible_lines: 0,
            status_message: None,
            fetch_generation: 0,
            fetch_handle: None,
            sources_handle: None,
            viewport_height: u16::MAX,
            needs_redraw: true,
            spinner_frame: 0,
            show_help: false,
            help_scroll_offset: 0,
        }
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    /// Switch to a different theme variant at runtime.
    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Toggle Dark ↔ Light. Returns the new theme name for status display.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    // ------------------------------------------------------------------------
    // Fetch bookkeeping
    // ------------------------------------------------------------------------

    /// Start a new fetch generation, aborting the previous fetch task.
    ///
    /// Returns the generation the new task must report back with.
    pub fn begin_fetch(&mut self) -> u64 {
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
            tracing::debug!(generation = self.fetch_generation, "Aborted previous fetch task");
        }
        self.fetch_generation = self.fetch_generation.wrapping_add(1);
        self.fetch_generation
    }

    /// Apply a finished fetch. Returns false when the result was stale.
    ///
    /// A soft failure still replaces the list (with nothing) so the grid shows
    /// the empty state rather than results for a different query.
    pub fn apply_fetch(
        &mut self,
        generation: u64,
        query: Query,
        outcome: FetchOutcome<Article>,
    ) -> bool {
        if generation != self.fetch_generation {
            tracing::debug!(
                expected = self.fetch_generation,
                got = generation,
                query = %query.describe(),
                "Ignoring stale fetch result (generation mismatch)"
            );
            return false;
        }

        self.fetch_handle = None;
        let count = outcome.items.len();
        self.articles = Arc::new(outcome.items);
        self.active_query = query;
        self.selected_article = 0;
        self.clamp_selections();

        if outcome.error_occurred {
            self.set_status(FETCH_FAILED_STATUS);
        } else if outcome.attempts > 1 {
            self.set_status("Loaded with backup API key");
        }
        tracing::debug!(generation, count, attempts = outcome.attempts, "Applied fetch result");
        true
    }

    pub fn apply_sources(&mut self, outcome: FetchOutcome<Source>) {
        self.sources_handle = None;
        if outcome.error_occurred {
            // allow another attempt next time the picker opens
            self.sources_requested = false;
            self.set_status("Couldn't load sources");
        }
        self.sources = Arc::new(outcome.items);
        if let Some(picker) = self.source_picker.as_mut() {
            picker.selected = picker.selected.min(self.sources.len());
        }
    }

    // ------------------------------------------------------------------------
    // Article layout
    // ------------------------------------------------------------------------

    /// Whether the first article is shown as the hero.
    ///
    /// Rendering and grid selection both go through this, so an article is
    /// never dropped from the grid while the hero is not on screen.
    pub fn hero_visible(&self) -> bool {
        self.intent.hero_visible()
            && !self.articles.is_empty()
            && self.viewport_height >= HERO_MIN_TERMINAL_HEIGHT
    }

    pub fn hero_article(&self) -> Option<&Article> {
        if self.hero_visible() {
            self.articles.first()
        } else {
            None
        }
    }

    /// Articles shown in the grid: everything after the hero, if any.
    pub fn grid_articles(&self) -> &[Article] {
        if self.hero_visible() {
            &self.articles[1..]
        } else {
            &self.articles
        }
    }

    /// Selected row in the grid, `None` while the hero is selected.
    pub fn grid_selection(&self) -> Option<usize> {
        if self.hero_visible() {
            self.selected_article.checked_sub(1)
        } else {
            Some(self.selected_article)
        }
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.articles.get(self.selected_article)
    }

    /// Clamp all selection indices to valid ranges.
    pub fn clamp_selections(&mut self) {
        self.selected_article = self
            .selected_article
            .min(self.articles.len().saturating_sub(1));
        self.selected_tag = self.selected_tag.min(TRENDING_TAGS.len() - 1);
        self.selected_category = self.selected_category.min(Category::ALL.len() - 1);
        if let Some(picker) = self.source_picker.as_mut() {
            picker.selected = picker.selected.min(self.sources.len());
        }
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    pub fn nav_up(&mut self) {
        if let Some(picker) = self.source_picker.as_mut() {
            picker.selected = picker.selected.saturating_sub(1);
            return;
        }
        if self.focus == Focus::Articles {
            self.selected_article = self.selected_article.saturating_sub(1);
        }
    }

    pub fn nav_down(&mut self) {
        if let Some(picker) = self.source_picker.as_mut() {
            picker.selected = picker.selected.saturating_add(1).min(self.sources.len());
            return;
        }
        if self.focus == Focus::Articles && !self.articles.is_empty() {
            self.selected_article = self
                .selected_article
                .saturating_add(1)
                .min(self.articles.len() - 1);
        }
    }

    pub fn nav_left(&mut self) {
        match self.focus {
            Focus::Tags => self.selected_tag = self.selected_tag.saturating_sub(1),
            Focus::Categories => {
                self.selected_category = self.selected_category.saturating_sub(1)
            }
            Focus::Articles => {}
        }
    }

    pub fn nav_right(&mut self) {
        match self.focus {
            Focus::Tags => {
                self.selected_tag = (self.selected_tag + 1).min(TRENDING_TAGS.len() - 1)
            }
            Focus::Categories => {
                self.selected_category = (self.selected_category + 1).min(Category::ALL.len() - 1)
            }
            Focus::Articles => {}
        }
    }

    pub fn cycle_focus(&mut self) {
        self.focus = self.focus.next();
    }

    /// Point the category cursor at the active category.
    pub fn sync_category_cursor(&mut self) {
        self.selected_category = self.intent.category().index();
    }

    // ------------------------------------------------------------------------
    // Reader
    // ------------------------------------------------------------------------

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    /// Clamp scroll offset so the last page of content stays in view.
    pub fn clamp_scroll(&mut self, content_lines: usize, visible_lines: usize) {
        let max_scroll = content_lines.saturating_sub(visible_lines);
        self.scroll_offset = self.scroll_offset.min(max_scroll).min(MAX_SCROLL);
    }

    /// Open the selected article in the reader.
    pub fn enter_reader(&mut self) -> bool {
        let Some(article) = self.articles.get(self.selected_article).cloned() else {
            return false;
        };
        let body = article
            .content
            .as_deref()
            .or(article.description.as_deref())
            .unwrap_or_default();
        self.reader_paragraphs = article_paragraphs(body);
        tracing::debug!(title = %article.title, "Entering reader");
        self.reader_article = Some(article);
        self.view = View::Reader;
        self.scroll_offset = 0;
        true
    }

    pub fn exit_reader(&mut self) {
        self.view = View::Browse;
        self.scroll_offset = 0;
        self.reader_article = None;
        self.reader_paragraphs.clear();
    }

    // ------------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------------

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear the status message if expired. Returns true if one was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

/// Abort in-flight tasks so nothing outlives the event loop.
impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
            tracing::debug!("Aborted fetch task on App drop");
        }
        if let Some(handle) = self.sources_handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ClientSettings, CredentialRotator};
    use crate::keybindings::{Action, Context};
    use chrono::Utc;
    use crossterm::event::{KeyCode, KeyModifiers};
    use secrecy::SecretString;
    use tokio::time::{self, Duration};

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

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            description: Some(format!("{} description", title)),
            image_url: None,
            article_url: format!("https://example.com/{}", title),
            source_name: "Example".to_string(),
            source_id: Some("example".to_string()),
            published_at: Utc::now(),
            content: Some("Para one.\n\nPara two. [+300 chars]".to_string()),
            author: None,
            category: None,
        }
    }

    fn ok(titles: &[&str]) -> FetchOutcome<Article> {
        FetchOutcome {
            items: titles.iter().map(|t| article(t)).collect(),
            error_occurred: false,
            attempts: 1,
        }
    }

    fn failed() -> FetchOutcome<Article> {
        FetchOutcome {
            items: Vec::new(),
            error_occurred: true,
            attempts: 2,
        }
    }

    #[tokio::test]
    async fn test_latest_generation_is_applied() {
        let mut app = test_app();
        let generation = app.begin_fetch();
        assert!(app.apply_fetch(generation, Query::Search("mars".into()), ok(&["a", "b"])));
        assert_eq!(app.articles.len(), 2);
        assert_eq!(app.active_query, Query::Search("mars".into()));
    }

    #[tokio::test]
    async fn test_stale_generation_is_discarded() {
        let mut app = test_app();
        let first = app.begin_fetch();
        let second = app.begin_fetch();

        assert!(app.apply_fetch(second, Query::Search("new".into()), ok(&["new"])));
        assert!(!app.apply_fetch(first, Query::Search("old".into()), ok(&["old1", "old2"])));

        assert_eq!(app.articles.len(), 1);
        assert_eq!(app.articles[0].title, "new");
        assert_eq!(app.active_query, Query::Search("new".into()));
    }

    #[tokio::test]
    async fn test_failed_fetch_empties_list_and_sets_status() {
        let mut app = test_app();
        let generation = app.begin_fetch();
        app.apply_fetch(generation, Query::default(), ok(&["a"]));

        let generation = app.begin_fetch();
        assert!(app.apply_fetch(generation, Query::default(), failed()));
        assert!(app.articles.is_empty());
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, FETCH_FAILED_STATUS);
    }

    #[tokio::test]
    async fn test_hero_and_grid_split() {
        let mut app = test_app();
        let generation = app.begin_fetch();
        app.apply_fetch(generation, Query::default(), ok(&["hero", "g1", "g2"]));

        assert_eq!(app.hero_article().map(|a| a.title.as_str()), Some("hero"));
        assert_eq!(app.grid_articles().len(), 2);
        assert_eq!(app.grid_selection(), None);

        app.nav_down();
        assert_eq!(app.grid_selection(), Some(0));

        // searching hides the hero; the grid shows everything
        app.intent.on_search("abc");
        assert!(app.hero_article().is_none());
        assert_eq!(app.grid_articles().len(), 3);
        assert_eq!(app.grid_selection(), Some(1));
    }

    #[tokio::test]
    async fn test_short_terminal_puts_lead_article_in_grid() {
        let mut app = test_app();
        let generation = app.begin_fetch();
        app.apply_fetch(generation, Query::default(), ok(&["lead", "second"]));
        app.viewport_height = HERO_MIN_TERMINAL_HEIGHT - 1;

        assert!(!app.hero_visible());
        assert!(app.hero_article().is_none());
        assert_eq!(app.grid_articles().len(), 2);
        assert_eq!(app.grid_articles()[0].title, "lead");
        assert_eq!(app.grid_selection(), Some(0));

        app.viewport_height = HERO_MIN_TERMINAL_HEIGHT;
        assert_eq!(app.hero_article().map(|a| a.title.as_str()), Some("lead"));
        assert_eq!(app.grid_selection(), None);
    }

    #[tokio::test]
    async fn test_no_hero_without_articles() {
        let app = test_app();
        assert!(!app.hero_visible());
        assert!(app.grid_articles().is_empty());
    }

    #[tokio::test]
    async fn test_nav_clamps_to_list() {
        let mut app = test_app();
        app.nav_up();
        app.nav_down();
        assert_eq!(app.selected_article, 0);

        let generation = app.begin_fetch();
        app.apply_fetch(generation, Query::default(), ok(&["a", "b"]));
        for _ in 0..5 {
            app.nav_down();
        }
        assert_eq!(app.selected_article, 1);
    }

    #[tokio::test]
    async fn test_left_right_follow_focus() {
        let mut app = test_app();
        app.focus = Focus::Tags;
        app.nav_left();
        assert_eq!(app.selected_tag, 0);
        for _ in 0..20 {
            app.nav_right();
        }
        assert_eq!(app.selected_tag, TRENDING_TAGS.len() - 1);

        app.cycle_focus();
        assert_eq!(app.focus, Focus::Categories);
        for _ in 0..20 {
            app.nav_right();
        }
        assert_eq!(app.selected_category, Category::ALL.len() - 1);

        app.cycle_focus();
        app.cycle_focus();
        assert_eq!(app.focus, Focus::Tags);
    }

    #[tokio::test]
    async fn test_reader_strips_truncation_marker() {
        let mut app = test_app();
        let generation = app.begin_fetch();
        app.apply_fetch(generation, Query::default(), ok(&["story"]));

        assert!(app.enter_reader());
        assert_eq!(app.view, View::Reader);
        assert_eq!(app.reader_paragraphs, vec!["Para one.", "Para two."]);

        app.scroll_down(5);
        app.exit_reader();
        assert_eq!(app.view, View::Browse);
        assert_eq!(app.scroll_offset, 0);
        assert!(app.reader_article.is_none());
    }

    #[tokio::test]
    async fn test_enter_reader_with_no_articles() {
        let mut app = test_app();
        assert!(!app.enter_reader());
        assert_eq!(app.view, View::Browse);
    }

    #[tokio::test]
    async fn test_clamp_scroll() {
        let mut app = test_app();
        app.scroll_offset = 100;
        app.clamp_scroll(30, 10);
        assert_eq!(app.scroll_offset, 20);
        app.clamp_scroll(5, 10);
        assert_eq!(app.scroll_offset, 0);
        app.scroll_up(1);
        assert_eq!(app.scroll_offset, 0);
    }

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        let mut app = test_app();
        time::pause();
        app.set_status("Test message");

        time::advance(Duration::from_secs(2)).await;
        assert!(!app.clear_expired_status());
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_cycle_theme_round_trip() {
        let mut app = test_app();
        assert_eq!(app.theme_variant, ThemeVariant::Dark);
        assert_eq!(app.cycle_theme(), "Light");
        assert_eq!(app.style("status_bar"), ThemeVariant::Light.palette().status_bar);
        assert_eq!(app.cycle_theme(), "Dark");
    }

    #[tokio::test]
    async fn test_sources_failure_allows_retry() {
        let mut app = test_app();
        app.sources_requested = true;
        app.apply_sources(FetchOutcome {
            items: Vec::new(),
            error_occurred: true,
            attempts: 1,
        });
        assert!(!app.sources_requested);
    }

    #[tokio::test]
    async fn test_theme_key_is_bound() {
        let app = test_app();
        assert_eq!(
            app.keybindings
                .action_for_key(KeyCode::Char('T'), KeyModifiers::NONE, Context::Global),
            Some(Action::CycleTheme)
        );
    }
}
