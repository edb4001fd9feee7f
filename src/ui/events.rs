//! Application event handling.
//!
//! Applies background fetch results to the application state.

use crate::app::{App, AppEvent};

/// Handle application events from background tasks.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::ArticlesLoaded {
            generation,
            query,
            outcome,
        } => {
            app.apply_fetch(generation, query, outcome);
        }
        AppEvent::SourcesLoaded(outcome) => {
            tracing::debug!(
                count = outcome.items.len(),
                failed = outcome.error_occurred,
                "Sources loaded"
            );
            app.apply_sources(outcome);
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}
