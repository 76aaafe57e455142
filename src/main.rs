//! markaz-tui: Markaz Academy's featured content, learning videos and
//! learning resources in the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐  PollMsg   ┌──────────┐  draw()  ┌──────────┐
//! │  poll.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (tokio)  │  (channel) │ (state)  │          │ (render) │
//! └──────────┘            └──────────┘          └──────────┘
//!      ▲ refresh               ▲
//!      │                       │ handle_key_event() → Action
//!      │                  ┌──────────┐   open   ┌────────────┐
//!      └───────────────── │ input.rs │ ───────► │ browser.rs │
//!                         └──────────┘          │ counters.rs│
//!                                               └────────────┘
//! ```
//!
//! * **`source/`**: the `DataSource` / `CounterSink` traits, the payload
//!   model, the content index and the HTTP client for the Markaz API.
//! * **`store`**: the cached payload and its index, swapped atomically.
//! * **`search`**: substring search with title matches ranked first.
//! * **`poll`**: a task that fetches at startup, on a timer and on demand.
//! * **`counters`**: best-effort view/download counter updates.
//! * **`app`**: owns all application state (sections, tabs, selection).
//! * **`ui`**: pure rendering: reads `App` state and draws widgets.
//! * **`input`**: maps key events to `App` mutations and actions.
//! * **`main`**: wires everything together: parse config, start the
//!   runtime, set up the terminal and run the event loop.

mod app;
mod browser;
mod config;
mod counters;
mod error;
mod input;
mod logging;
mod poll;
mod search;
mod source;
mod store;
mod ui;

use std::io;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};

use app::{Action, App};
use config::Config;
use counters::BestEffort;
use poll::{PollMsg, Poller};
use source::MarkazSource;

// ---------------------------------------------------------------------------
// RAII terminal guard, restored even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let config = Config::parse();
    logging::init(&config.log_file)?;
    install_panic_hook();
    info!(api_url = %config.api_url, "starting");

    // -- runtime for network I/O; the UI stays on this thread ----------------
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("markaz-io")
        .enable_all()
        .build()?;

    // -- data source, poller and counter policy ------------------------------
    let source = Arc::new(MarkazSource::new(&config.api_url, config.timeout())?);
    let (poller, rx) = poll::spawn(
        runtime.handle(),
        source.clone(),
        config.refresh_interval(),
    );
    let counters = BestEffort::new(runtime.handle().clone(), source);

    // -- terminal setup (RAII, Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(config.max_results);

    let result = run(&mut guard, &mut app, &rx, &poller, &counters);

    // -- teardown -------------------------------------------------------------
    drop(guard);
    poller.stop();
    let stats = counters.stats();
    info!(
        delivered = stats.delivered(),
        dropped = stats.dropped(),
        "counter updates at exit"
    );
    runtime.shutdown_timeout(Duration::from_secs(1));
    result
}

/// The main event loop.
///
/// Runs at ~10 fps (100 ms tick).  Each iteration:
///   1. Drain any messages from the poller.
///   2. Render the UI.
///   3. Poll for keyboard input (non-blocking, up to tick_rate).
fn run(
    guard: &mut TerminalGuard,
    app: &mut App,
    rx: &mpsc::Receiver<PollMsg>,
    poller: &Poller,
    counters: &BestEffort,
) -> Result<()> {
    let tick_rate = Duration::from_millis(100);

    loop {
        // 1. Process poll messages
        while let Ok(msg) = rx.try_recv() {
            app.apply(msg);
        }

        // 2. Render
        guard.terminal.draw(|f| ui::draw(app, f))?;

        // 3. Handle input
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if let Some(action) = input::handle_key_event(app, key) {
                    dispatch(app, action, poller, counters);
                }
            }
        }

        if app.quit {
            return Ok(());
        }
    }
}

/// Perform a side effect requested by input handling.
fn dispatch(app: &mut App, action: Action, poller: &Poller, counters: &BestEffort) {
    match action {
        Action::Refresh => poller.refresh(),
        Action::Open(selection) => {
            // Counter first, detached; navigation never waits for it.
            if let Some(update) = selection.counter {
                let _ = counters.record(update);
            }
            if selection.url.is_empty() {
                return;
            }
            match browser::open(&selection.url) {
                Ok(()) => app.status = format!("Opened {}", selection.url),
                Err(e) => {
                    warn!(error = %e, "could not open link");
                    app.status = format!("Error: {e}");
                }
            }
        }
    }
}
