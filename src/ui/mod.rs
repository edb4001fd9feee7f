//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - View rendering dispatch
//! - `helpers` - Fetch spawning, panic capture, browser hand-off
//! - `header`, `hero`, `tags`, `categories`, `articles` - Browse view widgets
//! - `reader` - Article reader widget
//! - `sources` - Source picker overlay
//! - `help` - Keybinding overlay
//! - `status` - Status bar widget

mod articles;
mod categories;
mod events;
mod header;
mod help;
mod helpers;
mod hero;
mod input;
mod loop_runner;
mod reader;
mod render;
mod sources;
mod status;
mod tags;

pub use loop_runner::{run, Action};
