//! Keybinding registry: maps actions to key events with config overrides.
//!
//! Bindings are looked up per dispatch context with a fallback to `Global`,
//! so views only declare the keys that differ.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    NavLeft,
    NavRight,
    CycleFocus,
    Back,
    Select,
    Refresh,
    EnterSearch,
    ExitSearch,
    CommitSearch,
    OpenSourcePicker,
    OpenInBrowser,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    ScrollTop,
    ExitReader,
    CycleTheme,
    ShowHelp,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavDown => "Next article",
            Self::NavUp => "Previous article",
            Self::NavLeft => "Previous tag / category",
            Self::NavRight => "Next tag / category",
            Self::CycleFocus => "Cycle focus: tags, categories, articles",
            Self::Back => "Go back / dismiss",
            Self::Select => "Select / open",
            Self::Refresh => "Reload current query",
            Self::EnterSearch => "Search articles",
            Self::ExitSearch => "Clear search",
            Self::CommitSearch => "Keep search, browse results",
            Self::OpenSourcePicker => "Choose news source",
            Self::OpenInBrowser => "Open in browser",
            Self::ScrollDown => "Scroll down one line",
            Self::ScrollUp => "Scroll up one line",
            Self::PageDown => "Page down",
            Self::PageUp => "Page up",
            Self::ScrollTop => "Back to top",
            Self::ExitReader => "Exit reader view",
            Self::CycleTheme => "Toggle light/dark theme",
            Self::ShowHelp => "Show help",
        }
    }

    /// Resolve a `[keybindings]` table key. Underscores are optional.
    pub fn from_config_name(name: &str) -> Option<Self> {
        let wanted: String = name
            .chars()
            .filter(|c| *c != '_')
            .collect::<String>()
            .to_lowercase();
        CONFIG_NAMES
            .iter()
            .find(|(names, _)| names.contains(&wanted.as_str()))
            .map(|(_, action)| *action)
    }
}

/// Config names per action, normalized (lowercase, no underscores).
const CONFIG_NAMES: [(&[&str], Action); 22] = [
    (&["quit"], Action::Quit),
    (&["navdown", "down"], Action::NavDown),
    (&["navup", "up"], Action::NavUp),
    (&["navleft", "left"], Action::NavLeft),
    (&["navright", "right"], Action::NavRight),
    (&["cyclefocus", "tab"], Action::CycleFocus),
    (&["back"], Action::Back),
    (&["select", "enter"], Action::Select),
    (&["refresh", "reload"], Action::Refresh),
    (&["entersearch", "search"], Action::EnterSearch),
    (&["exitsearch"], Action::ExitSearch),
    (&["commitsearch"], Action::CommitSearch),
    (&["opensourcepicker", "sources", "source"], Action::OpenSourcePicker),
    (&["openinbrowser", "open"], Action::OpenInBrowser),
    (&["scrolldown"], Action::ScrollDown),
    (&["scrollup"], Action::ScrollUp),
    (&["pagedown"], Action::PageDown),
    (&["pageup"], Action::PageUp),
    (&["scrolltop", "top"], Action::ScrollTop),
    (&["exitreader"], Action::ExitReader),
    (&["cycletheme", "theme"], Action::CycleTheme),
    (&["showhelp", "help"], Action::ShowHelp),
];

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context; determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    Reader,
    Search,
    SourcePicker,
}

impl Context {
    /// Section title in the help overlay.
    pub fn label(self) -> &'static str {
        match self {
            Self::Global => "Browse",
            Self::Reader => "Reader",
            Self::Search => "Search",
            Self::SourcePicker => "Sources",
        }
    }
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    const fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }
}

/// Parses config key strings: a single char ("q", "/"), a named key
/// ("Enter", "Esc", "Space", arrows), "Ctrl+<char>", or "F1".."F12".
impl FromStr for KeySpec {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        let s = s.trim();
        let single = |text: &str| {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(()),
            }
        };

        if let Some(rest) = s.strip_prefix("Ctrl+") {
            return single(rest.trim()).map(KeySpec::ctrl);
        }

        let named = match s.to_lowercase().as_str() {
            "enter" | "return" => Some(KeyCode::Enter),
            "esc" | "escape" => Some(KeyCode::Esc),
            "tab" => Some(KeyCode::Tab),
            "up" => Some(KeyCode::Up),
            "down" => Some(KeyCode::Down),
            "left" => Some(KeyCode::Left),
            "right" => Some(KeyCode::Right),
            "backspace" => Some(KeyCode::Backspace),
            "space" => Some(KeyCode::Char(' ')),
            _ => None,
        };
        if let Some(code) = named {
            return Ok(KeySpec::plain(code));
        }

        if let Some(Ok(n)) = s.strip_prefix(['F', 'f']).map(str::parse::<u8>) {
            return match n {
                1..=12 => Ok(KeySpec::plain(KeyCode::F(n))),
                _ => Err(()),
            };
        }

        single(s).map(KeySpec::char)
    }
}

impl fmt::Display for KeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("Ctrl+")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("Space"),
            KeyCode::Char(c) => write!(f, "{}", c),
            KeyCode::F(n) => write!(f, "F{}", n),
            KeyCode::Enter => f.write_str("Enter"),
            KeyCode::Esc => f.write_str("Esc"),
            KeyCode::Tab => f.write_str("Tab"),
            KeyCode::Up => f.write_str("Up"),
            KeyCode::Down => f.write_str("Down"),
            KeyCode::Left => f.write_str("Left"),
            KeyCode::Right => f.write_str("Right"),
            KeyCode::Backspace => f.write_str("Backspace"),
            _ => f.write_str("?"),
        }
    }
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// The same key can map to different actions in different contexts.
#[derive(Debug)]
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings in registration order, for the help screen
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use Action::*;

        // === Browse view ===
        let global = [
            (KeySpec::char('q'), Quit),
            (KeySpec::char('j'), NavDown),
            (KeySpec::plain(KeyCode::Down), NavDown),
            (KeySpec::char('k'), NavUp),
            (KeySpec::plain(KeyCode::Up), NavUp),
            (KeySpec::char('h'), NavLeft),
            (KeySpec::plain(KeyCode::Left), NavLeft),
            (KeySpec::char('l'), NavRight),
            (KeySpec::plain(KeyCode::Right), NavRight),
            (KeySpec::plain(KeyCode::Tab), CycleFocus),
            (KeySpec::plain(KeyCode::Esc), Back),
            (KeySpec::plain(KeyCode::Enter), Select),
            (KeySpec::char('r'), Refresh),
            (KeySpec::char('/'), EnterSearch),
            (KeySpec::char('s'), OpenSourcePicker),
            (KeySpec::char('o'), OpenInBrowser),
            (KeySpec::char('T'), CycleTheme),
            (KeySpec::char('?'), ShowHelp),
        ];
        for (key, action) in global {
            self.bind(Context::Global, key, action);
        }

        // === Reader view ===
        let reader = [
            (KeySpec::char('q'), Quit),
            (KeySpec::char('b'), ExitReader),
            (KeySpec::plain(KeyCode::Esc), ExitReader),
            (KeySpec::char('j'), ScrollDown),
            (KeySpec::plain(KeyCode::Down), ScrollDown),
            (KeySpec::char('k'), ScrollUp),
            (KeySpec::plain(KeyCode::Up), ScrollUp),
            (KeySpec::ctrl('d'), PageDown),
            (KeySpec::ctrl('u'), PageUp),
            (KeySpec::char('g'), ScrollTop),
            (KeySpec::char('o'), OpenInBrowser),
        ];
        for (key, action) in reader {
            self.bind(Context::Reader, key, action);
        }

        // === Search box ===
        self.bind(Context::Search, KeySpec::plain(KeyCode::Esc), ExitSearch);
        self.bind(Context::Search, KeySpec::plain(KeyCode::Enter), CommitSearch);

        // === Source picker ===
        self.bind(Context::SourcePicker, KeySpec::plain(KeyCode::Esc), Back);
        self.bind(Context::SourcePicker, KeySpec::char('s'), Back);
        self.bind(Context::SourcePicker, KeySpec::plain(KeyCode::Enter), Select);
    }

    /// Apply user overrides from the config keybindings map.
    ///
    /// Keys in the map are action names (e.g., "quit", "nav_down").
    /// Values are key strings (e.g., "q", "Ctrl+d", "F5").
    ///
    /// Returns a list of warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = Action::from_config_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Ok(key) = key_str.parse::<KeySpec>() else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            // Rebind in every context that had the action.
            let mut contexts: Vec<Context> = self
                .bindings
                .iter()
                .filter(|(_, _, a)| *a == action)
                .map(|(c, _, _)| *c)
                .collect();
            contexts.dedup();

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a key, trying `context` first and then Global.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        // Shift is already reflected in the character itself ('T', '?')
        let modifiers = match code {
            KeyCode::Char(_) => modifiers - KeyModifiers::SHIFT,
            _ => modifiers,
        };
        let key = KeySpec::new(code, modifiers);

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        if context != Context::Global {
            return self.lookup.get(&(Context::Global, key)).copied();
        }

        None
    }

    /// All bindings as (context, key display string, action, description).
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, key.to_string(), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
