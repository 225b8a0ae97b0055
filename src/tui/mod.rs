/// Ratatui front end for stagecraft.
///
/// Architecture:
///   main task:   event loop, the only owner of `App`; drains crossterm events
///                and dispatcher results from one mpsc queue each, in arrival order
///   work tasks:  tokio::spawn per `Command`; each sends exactly one `Msg` back
///
/// Layout:
///   ┌────────────────────────────────────────────────┐
///   │  header: title + branch (3 lines)              │
///   ├────────────────────────────────────────────────┤
///   │  screen for the current AppState (Min(0))      │
///   ├────────────────────────────────────────────────┤
///   │  footer: status line + key hints (2 lines)     │
///   └────────────────────────────────────────────────┘
pub mod commit_view;
pub mod files_view;
pub mod head_view;
pub mod help_view;
pub mod overlays;
pub mod render;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;

use crate::app::{App, Msg, Settings};
use crate::dispatch::Dispatcher;
use crate::git::GitRepo;

// ── Terminal setup / teardown ─────────────────────────────────────────────────

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();
}

// ── Main TUI run loop ─────────────────────────────────────────────────────────

pub async fn run(repo: GitRepo, settings: Settings) -> Result<()> {
    let mut terminal = setup_terminal().context("failed to start terminal session")?;

    // Panic hook: restore terminal before printing panic
    let orig_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        orig_hook(info);
    }));

    let result = event_loop(&mut terminal, repo, settings).await;

    restore_terminal(&mut terminal);
    if let Err(e) = &result {
        tracing::error!(error = %e, "event loop aborted");
    }
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    repo: GitRepo,
    settings: Settings,
) -> Result<()> {
    // Channel: work tasks → event loop
    let (tx, mut rx) = mpsc::unbounded_channel::<Msg>();
    let dispatcher = Dispatcher::new(Arc::new(repo), tx);

    let size = terminal.size()?;
    let mut app = App::new(settings, (size.width, size.height));
    dispatcher.dispatch_all(app.init());

    let mut crossterm_events = EventStream::new();
    terminal.draw(|f| render::draw(f, &app))?;

    loop {
        let msg = tokio::select! {
            // ── Results from dispatched work ──────────────────────────────────
            Some(msg) = rx.recv() => msg,

            // ── Keyboard/resize events ────────────────────────────────────────
            Some(ev) = crossterm_events.next() => match ev.context("reading terminal events")? {
                Event::Key(key) => Msg::Key(key),
                Event::Resize(w, h) => Msg::Resize(w, h),
                _ => continue,
            },

            else => break,
        };

        let cmds = app.update(msg);
        if app.should_quit {
            break;
        }
        dispatcher.dispatch_all(cmds);
        terminal.draw(|f| render::draw(f, &app))?;
    }

    tracing::info!("quit");
    Ok(())
}
