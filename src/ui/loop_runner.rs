//! Event loop and terminal lifecycle.

use crate::app::{App, AppEvent};
use anyhow::{Context as _, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

use super::events::handle_app_event;
use super::helpers::spawn_fetch;
use super::input::handle_input;
use super::render::render;

/// What the loop should do after a key press.
pub enum Action {
    Continue,
    Quit,
}

pub(super) const SPINNER_FRAMES: usize = 10;

const TICK: Duration = Duration::from_millis(250);

/// Raw-mode alternate screen, restored when dropped.
struct Screen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Screen {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self { terminal })
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Resolves on the first SIGINT or SIGTERM.
#[cfg(unix)]
async fn shutdown_signal() -> Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate())?;
    let mut int = signal(SignalKind::interrupt())?;
    Ok(tokio::select! {
        _ = term.recv() => "SIGTERM",
        _ = int.recv() => "SIGINT",
    })
}

#[cfg(not(unix))]
async fn shutdown_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("Ctrl-C")
}

/// Run the TUI until the user quits or a shutdown signal arrives.
///
/// The initial fetch for the app's intent is dispatched before the first
/// frame. Fetch results arrive on `event_rx`; a 250ms tick drives the spinner
/// and status expiry.
pub async fn run(
    app: &mut App,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        previous_hook(info);
    }));

    let mut screen = Screen::enter()?;
    let mut input = EventStream::new();
    let mut ticker = tokio::time::interval(TICK);
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let initial = app.intent.current_query();
    spawn_fetch(app, initial, &event_tx);

    loop {
        if app.clear_expired_status() {
            app.needs_redraw = true;
        }
        if app.needs_redraw {
            screen.terminal.draw(|f| render(f, app))?;
            app.needs_redraw = false;
        }

        tokio::select! {
            biased;

            signal = &mut shutdown => {
                let signal = signal?;
                tracing::info!(signal, "Shutting down");
                break;
            }

            next = input.next() => match next {
                Some(Ok(Event::Key(key))) if key.kind != KeyEventKind::Release => {
                    app.needs_redraw = true;
                    if let Action::Quit = handle_input(app, key.code, key.modifiers, &event_tx) {
                        break;
                    }
                }
                Some(Ok(Event::Resize(..))) => app.needs_redraw = true,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::error!(error = %e, "Terminal event stream failed");
                    break;
                }
                None => break,
            },

            Some(event) = event_rx.recv() => {
                handle_app_event(app, event);
                // pick up anything else that finished in the meantime
                while let Ok(event) = event_rx.try_recv() {
                    handle_app_event(app, event);
                }
                app.needs_redraw = true;
            }

            _ = ticker.tick() => advance_spinner(app),
        }
    }

    drop(screen);
    Ok(())
}

fn advance_spinner(app: &mut App) {
    if app.is_loading() {
        app.spinner_frame = (app.spinner_frame + 1) % SPINNER_FRAMES;
        app.needs_redraw = true;
    } else if app.spinner_frame != 0 {
        app.spinner_frame = 0;
        app.needs_redraw = true;
    }
}
