//! Helper functions for UI operations.
//!
//! Background fetch spawning, panic capture for spawned tasks, and opening
//! article links in the system browser.

use crate::app::{App, AppEvent};
use crate::news::Query;
use crate::util::validate_url_for_open;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Wraps a future to catch panics and convert them to errors.
///
/// Panics inside a spawned task would otherwise vanish into the runtime; this
/// turns them into `Err(message)` so the task can report `TaskPanicked`.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            }
        })
}

/// Spawn a background article fetch for `query`.
///
/// Starts a new generation (aborting the previous fetch task) so a late
/// response for an older query can never overwrite a newer one. The loading
/// mark is taken here, before the task is first polled, and travels with it.
pub(super) fn spawn_fetch(app: &mut App, query: Query, event_tx: &mpsc::Sender<AppEvent>) {
    let generation = app.begin_fetch();
    let loading = app.loading.begin();
    let client = app.client.clone();
    let tx = event_tx.clone();

    tracing::debug!(query = %query.describe(), generation, "Spawning fetch task");

    app.fetch_handle = Some(tokio::spawn(async move {
        let _loading = loading;
        let result = catch_task_panic(client.fetch(&query)).await;
        match result {
            Ok(outcome) => {
                let event = AppEvent::ArticlesLoaded {
                    generation,
                    query,
                    outcome,
                };
                if let Err(e) = tx.send(event).await {
                    tracing::warn!(error = %e, event = "ArticlesLoaded", "Channel send failed (receiver dropped)");
                }
            }
            Err(panic_msg) => {
                tracing::error!(task = "fetch", generation, error = %panic_msg, "Background task panicked");
                let _ = tx
                    .send(AppEvent::TaskPanicked {
                        task: "fetch",
                        error: panic_msg,
                    })
                    .await;
            }
        }
    }));
}

/// Load the source listing once per session (again only after a failure).
pub(super) fn spawn_sources_load(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    if app.sources_requested {
        return;
    }
    app.sources_requested = true;

    let loading = app.loading.begin();
    let client = app.client.clone();
    let tx = event_tx.clone();
    tracing::debug!("Spawning sources load task");

    app.sources_handle = Some(tokio::spawn(async move {
        let _loading = loading;
        match catch_task_panic(client.fetch_sources()).await {
            Ok(outcome) => {
                if let Err(e) = tx.send(AppEvent::SourcesLoaded(outcome)).await {
                    tracing::warn!(error = %e, event = "SourcesLoaded", "Channel send failed (receiver dropped)");
                }
            }
            Err(panic_msg) => {
                tracing::error!(task = "sources", error = %panic_msg, "Background task panicked");
                let _ = tx
                    .send(AppEvent::TaskPanicked {
                        task: "sources",
                        error: panic_msg,
                    })
                    .await;
            }
        }
    }));
}

/// Open the article link with the system browser.
///
/// The URL comes from the API, so it is validated before being handed to
/// the OS opener.
pub(super) fn open_in_browser(app: &mut App, url: &str) {
    match validate_url_for_open(url) {
        Err(e) => {
            tracing::warn!(error = %e, "Refusing to open article link");
            app.set_status(format!("Cannot open link: {}", e));
        }
        Ok(valid) => match open::that(valid.as_str()) {
            Ok(()) => app.set_status("Opened in browser"),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to launch browser");
                app.set_status(format!("Failed to open browser: {}", e));
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ClientSettings, CredentialRotator, NewsClient};
    use crate::news::Category;
    use secrecy::SecretString;
    use std::sync::Arc;

    fn unreachable_app() -> App {
        let rotator = CredentialRotator::new([SecretString::from("k".to_string())]).unwrap();
        let settings = ClientSettings {
            base_url: "http://127.0.0.1:9/v2".to_string(),
            ..ClientSettings::default()
        };
        let client = NewsClient::new(settings, rotator).unwrap();
        App::new(Arc::new(client), Category::General)
    }

    #[tokio::test]
    async fn test_loading_is_set_on_dispatch() {
        let mut app = unreachable_app();
        let (tx, mut rx) = mpsc::channel(4);
        assert!(!app.is_loading());

        spawn_fetch(&mut app, Query::default(), &tx);
        // the task has not been polled yet
        assert!(app.is_loading());

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, AppEvent::ArticlesLoaded { .. }));
        app.fetch_handle.take().unwrap().await.unwrap();
        assert!(!app.is_loading());
    }

    #[tokio::test]
    async fn test_aborted_fetch_clears_loading() {
        let mut app = unreachable_app();
        let (tx, _rx) = mpsc::channel(4);

        spawn_fetch(&mut app, Query::default(), &tx);
        let handle = app.fetch_handle.take().unwrap();
        handle.abort();
        let _ = handle.await;
        assert!(!app.is_loading());
    }

    #[tokio::test]
    async fn test_sources_load_sets_loading_on_dispatch() {
        let mut app = unreachable_app();
        let (tx, _rx) = mpsc::channel(4);

        spawn_sources_load(&mut app, &tx);
        assert!(app.is_loading());
        assert!(app.sources_requested);
    }

    #[tokio::test]
    async fn test_catch_task_panic_ok() {
        let result = catch_task_panic(async { 42 }).await;
        assert_eq!(result, Ok(42));
    }

    #[tokio::test]
    async fn test_catch_task_panic_str_message() {
        let result: Result<(), String> = catch_task_panic(async { panic!("fetch exploded") }).await;
        assert_eq!(result, Err("fetch exploded".to_string()));
    }

    #[tokio::test]
    async fn test_catch_task_panic_formatted_message() {
        let code = 7;
        let result: Result<(), String> =
            catch_task_panic(async move { panic!("failed with {}", code) }).await;
        assert_eq!(result, Err("failed with 7".to_string()));
    }
}
