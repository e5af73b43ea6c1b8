//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. When a flow file is watched,
//! its modification time is checked on every idle tick and changed contents
//! are reported as [`AppEvent::DraftEdited`].

use std::{
    io::{self, Stdout, stdout},
    path::PathBuf,
    time::{Duration, SystemTime},
};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use kioskflow_app::{App, AppEvent, Driver};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;

use crate::{KeyInput, ui};

/// Idle poll interval.
const TICK: Duration = Duration::from_millis(100);

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A flow file edited outside the kiosk.
struct WatchedFile {
    path: PathBuf,
    seen: Option<SystemTime>,
}

impl WatchedFile {
    fn new(path: PathBuf) -> Self {
        let seen = std::fs::metadata(&path).and_then(|m| m.modified()).ok();
        Self { path, seen }
    }

    /// Contents of the file if it changed since the last successful read.
    async fn changed(&mut self) -> Option<String> {
        let modified = match tokio::fs::metadata(&self.path).await.and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(err) => {
                tracing::debug!(path = %self.path.display(), "watched file unavailable: {err}");
                return None;
            },
        };
        if self.seen == Some(modified) {
            return None;
        }

        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => {
                tracing::debug!(path = %self.path.display(), bytes = text.len(), "watched file changed");
                self.seen = Some(modified);
                Some(text)
            },
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "cannot read watched file: {err}");
                None
            },
        }
    }
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Owns the terminal for its lifetime: raw mode and the alternate screen are
/// entered on creation and left on drop.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    watched: Option<WatchedFile>,
}

impl TerminalDriver {
    /// Take over the terminal, optionally watching a flow file for edits.
    pub fn new(watch: Option<PathBuf>) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal, event_stream: EventStream::new(), watched: watch.map(WatchedFile::new) })
    }
}

/// Idle tick: report a changed flow file, or just the tick.
async fn tick(watched: Option<&mut WatchedFile>) -> AppEvent {
    if let Some(watched) = watched
        && let Some(text) = watched.changed().await
    {
        return AppEvent::DraftEdited { text };
    }
    AppEvent::Tick
}

/// Convert a crossterm key event to a [`KeyInput`].
///
/// Ctrl-C quits, F5 and Ctrl-R restart. Other modified keys are ignored.
pub fn convert_key(event: KeyEvent) -> Option<KeyInput> {
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') => Some(KeyInput::Interrupt),
            KeyCode::Char('r') => Some(KeyInput::Restart),
            _ => None,
        };
    }

    match event.code {
        KeyCode::Char(c) => Some(KeyInput::Char(c)),
        KeyCode::Enter => Some(KeyInput::Enter),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        KeyCode::Tab => Some(KeyInput::Tab),
        KeyCode::BackTab => Some(KeyInput::BackTab),
        KeyCode::Up => Some(KeyInput::Up),
        KeyCode::Down => Some(KeyInput::Down),
        KeyCode::Esc => Some(KeyInput::Esc),
        KeyCode::F(5) => Some(KeyInput::Restart),
        _ => None,
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        tokio::select! {
            biased;

            // Terminal events
            maybe_event = self.event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) if key_event.kind == KeyEventKind::Press => {
                        Ok(convert_key(key_event).map(AppEvent::Key))
                    },
                    Some(Ok(Event::Resize(cols, rows))) => Ok(Some(AppEvent::Resize(cols, rows))),
                    Some(Err(e)) => Err(TerminalError::Io(e)),
                    None => Ok(Some(AppEvent::Key(KeyInput::Interrupt))),
                    _ => Ok(None),
                }
            }

            // Tick timeout
            () = tokio::time::sleep(TICK) => Ok(Some(tick(self.watched.as_mut()).await)),
        }
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| ui::render(frame, app))?;
        Ok(())
    }

    fn stop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
    }
}
