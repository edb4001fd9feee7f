//! Fixed trending tags shown in the tag strip.

use ratatui::style::Color;

/// A trending tag chip. Selecting it runs a search for `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendingTag {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub color: Color,
}

pub const TRENDING_TAGS: [TrendingTag; 8] = [
    TrendingTag {
        id: "live",
        label: "Live",
        icon: "●",
        color: Color::Red,
    },
    TrendingTag {
        id: "opinion",
        label: "Opinion",
        icon: "✎",
        color: Color::Magenta,
    },
    TrendingTag {
        id: "gaming",
        label: "Gaming",
        icon: "▶",
        color: Color::Blue,
    },
    TrendingTag {
        id: "tech",
        label: "Tech",
        icon: "⌘",
        color: Color::Cyan,
    },
    TrendingTag {
        id: "finance",
        label: "Finance",
        icon: "$",
        color: Color::Green,
    },
    TrendingTag {
        id: "sports",
        label: "Sports",
        icon: "◎",
        color: Color::LightRed,
    },
    TrendingTag {
        id: "health",
        label: "Health",
        icon: "+",
        color: Color::Yellow,
    },
    TrendingTag {
        id: "world",
        label: "World",
        icon: "◍",
        color: Color::Gray,
    },
];
