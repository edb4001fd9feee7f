//! Dark and light palettes for the news deck.
//!
//! Widgets ask for a role ("hero_badge", "chip_active") rather than a color;
//! `StyleMap` turns the active palette into a role lookup table.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Toggle: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for the header and status bar.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Header --
    pub header_title: Style,
    pub search_box: Style,
    pub search_box_active: Style,
    pub spinner: Style,

    // -- Hero --
    pub hero_badge: Style,
    pub hero_title: Style,
    pub hero_meta: Style,
    pub hero_body: Style,

    // -- Trending tags --
    pub tag_normal: Style,
    pub tag_selected: Style,

    // -- Category chips --
    pub chip_normal: Style,
    pub chip_active: Style,
    pub chip_selected: Style,

    // -- Article grid --
    pub article_title: Style,
    pub article_selected: Style,
    pub article_meta: Style,
    pub article_source: Style,
    pub empty_notice: Style,

    // -- Reader --
    pub reader_title: Style,
    pub reader_body: Style,
    pub reader_metadata: Style,
    pub reader_link: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
    pub overlay_selected: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            header_title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            search_box: Style::default().fg(Color::Gray),
            search_box_active: Style::default().fg(Color::White).bg(Color::DarkGray),
            spinner: Style::default().fg(Color::Yellow),

            hero_badge: Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            hero_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            hero_meta: Style::default().fg(Color::DarkGray),
            hero_body: Style::default().fg(Color::Gray),

            tag_normal: Style::default().fg(Color::Gray),
            tag_selected: Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            chip_normal: Style::default().fg(Color::Gray),
            chip_active: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            chip_selected: Style::default().bg(Color::DarkGray).fg(Color::White),

            article_title: Style::default().add_modifier(Modifier::BOLD),
            article_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            article_meta: Style::default().fg(Color::DarkGray),
            article_source: Style::default().fg(Color::Cyan),
            empty_notice: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            reader_title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            reader_body: Style::default(),
            reader_metadata: Style::default().fg(Color::DarkGray),
            reader_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
            overlay_selected: Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light palette for light terminal backgrounds.
    fn light() -> Self {
        Self {
            header_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            search_box: Style::default().fg(Color::DarkGray),
            search_box_active: Style::default().fg(Color::Black).bg(Color::Gray),
            spinner: Style::default().fg(Color::Magenta),

            hero_badge: Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
            hero_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            hero_meta: Style::default().fg(Color::DarkGray),
            hero_body: Style::default().fg(Color::Black),

            tag_normal: Style::default().fg(Color::DarkGray),
            tag_selected: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            chip_normal: Style::default().fg(Color::DarkGray),
            chip_active: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            chip_selected: Style::default().bg(Color::Blue).fg(Color::White),

            article_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            article_selected: Style::default().bg(Color::Blue).fg(Color::White),
            article_meta: Style::default().fg(Color::DarkGray),
            article_source: Style::default().fg(Color::Blue),
            empty_notice: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            reader_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            reader_body: Style::default().fg(Color::Black),
            reader_metadata: Style::default().fg(Color::DarkGray),
            reader_link: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::UNDERLINED),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
            overlay_selected: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        }
    }
}

// ============================================================================
// Style Map
// ============================================================================

/// String-keyed style lookup used by the render code (`app.style("role")`).
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 26] = [
    "header_title",
    "search_box",
    "search_box_active",
    "spinner",
    "hero_badge",
    "hero_title",
    "hero_meta",
    "hero_body",
    "tag_normal",
    "tag_selected",
    "chip_normal",
    "chip_active",
    "chip_selected",
    "article_title",
    "article_selected",
    "article_meta",
    "article_source",
    "empty_notice",
    "reader_title",
    "reader_body",
    "reader_metadata",
    "reader_link",
    "status_bar",
    "panel_border",
    "panel_border_focused",
    "overlay_selected",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 26] = [
            p.header_title,
            p.search_box,
            p.search_box_active,
            p.spinner,
            p.hero_badge,
            p.hero_title,
            p.hero_meta,
            p.hero_body,
            p.tag_normal,
            p.tag_selected,
            p.chip_normal,
            p.chip_active,
            p.chip_selected,
            p.article_title,
            p.article_selected,
            p.article_meta,
            p.article_source,
            p.empty_notice,
            p.reader_title,
            p.reader_body,
            p.reader_metadata,
            p.reader_link,
            p.status_bar,
            p.panel_border,
            p.panel_border_focused,
            p.overlay_selected,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================
