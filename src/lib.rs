//! Terminal news reader for NewsAPI.
//!
//! The binary wires these modules together; integration tests use them
//! directly.

pub mod api;
pub mod app;
pub mod config;
pub mod keybindings;
pub mod news;
pub mod theme;
pub mod ui;
pub mod util;
