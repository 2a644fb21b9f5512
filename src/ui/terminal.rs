//! Raw-mode terminal lifecycle and the page event loop

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::core::config::AppConfig;
use crate::core::error::Result;
use crate::ui::display::Painter;
use crate::ui::input::action_for_key;
use crate::ui::state::Session;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Enter raw mode and the alternate screen
pub fn setup() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

pub fn restore(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Restores the terminal when dropped, including while unwinding from a panic
struct TerminalGuard {
    terminal: Tui,
    active: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        Ok(Self {
            terminal: setup()?,
            active: true,
        })
    }

    fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        restore(&mut self.terminal)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            tracing::error!(error = %err, "terminal restore failed");
        }
    }
}

/// The loop's own error wins over a failed restore, which is only logged
fn settle(outcome: Result<()>, restored: Result<()>) -> Result<()> {
    match (outcome, restored) {
        (Err(err), Err(restore_err)) => {
            tracing::error!(error = %restore_err, "terminal restore failed");
            Err(err)
        }
        (Err(err), Ok(())) => Err(err),
        (Ok(()), restored) => restored,
    }
}

/// Run the page until the visitor quits; the terminal is restored on error too
pub fn run(session: &mut Session, config: &AppConfig) -> Result<()> {
    let mut guard = TerminalGuard::new()?;
    let outcome = event_loop(&mut guard.terminal, session, config);
    let restored = guard.restore();
    settle(outcome, restored)
}

fn event_loop(terminal: &mut Tui, session: &mut Session, config: &AppConfig) -> Result<()> {
    let mut painter = Painter::new();
    let frame_interval = Duration::from_millis(config.frame_interval_ms);
    let started = Instant::now();
    let mut last_frame = started;
    let mut dirty = true;

    tracing::info!(
        frame_interval_ms = config.frame_interval_ms,
        reduced_motion = config.reduced_motion,
        "page loop started"
    );

    while !session.should_quit() {
        let now = Instant::now();
        if session.on_frame(now - started, now - last_frame) {
            dirty = true;
        }
        last_frame = now;

        if dirty {
            terminal.draw(|frame| painter.draw(frame, session))?;
            dirty = false;
        }

        if event::poll(frame_interval)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(action) = action_for_key(key) {
                        tracing::trace!(action = ?action, "key");
                        session.apply(action);
                        dirty = true;
                    }
                }
                Event::Resize(..) => dirty = true,
                _ => {}
            }
        }
    }

    tracing::info!(frames = session.background().frames_rendered(), "page loop finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::PortfolioError;

    fn io_error(message: &str) -> PortfolioError {
        PortfolioError::IoError(io::Error::new(io::ErrorKind::Other, message.to_string()))
    }

    #[test]
    fn test_loop_error_wins_over_restore_error() {
        let err = settle(Err(PortfolioError::InvalidConfig("loop".into())), Err(io_error("restore")))
            .unwrap_err();
        assert!(matches!(err, PortfolioError::InvalidConfig(message) if message == "loop"));
    }

    #[test]
    fn test_restore_error_surfaces_after_clean_loop() {
        let err = settle(Ok(()), Err(io_error("restore"))).unwrap_err();
        assert!(err.to_string().contains("restore"));
        assert!(settle(Ok(()), Ok(())).is_ok());
        assert!(matches!(
            settle(Err(io_error("loop")), Ok(())),
            Err(PortfolioError::IoError(_))
        ));
    }
}
