use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::{info, warn};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use super::app::App;

/// Spin up the terminal backend, enter the draw loop, and keep processing input
/// until the user exits. The terminal is restored on every exit path.
pub fn run_app(app: &mut App) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut terminal = rollback_on_error(setup_terminal, restore_after_failed_setup)?;

    let result = event_loop(&mut terminal, app);

    cleanup_terminal(&mut terminal)?;
    info!("session ended");
    result
}

/// Run `setup`; if it fails, run `rollback` before handing the error back.
fn rollback_on_error<T>(
    setup: impl FnOnce() -> Result<T>,
    rollback: impl FnOnce(),
) -> Result<T> {
    setup().inspect_err(|_| rollback())
}

/// Enter the alternate screen and wrap stdout in a Ratatui terminal. Raw mode
/// must already be on.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("failed to create terminal backend")
}

/// Best-effort undo of raw mode and the alternate screen when setup fails
/// partway. The setup error is the one reported.
fn restore_after_failed_setup() {
    if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen) {
        warn!("failed to leave alternate screen: {err}");
    }
    if let Err(err) = disable_raw_mode() {
        warn!("failed to disable raw mode: {err}");
    }
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw frame")?;

        if !event::poll(Duration::from_millis(250)).context("event polling failed")? {
            continue;
        }
        let Event::Key(key_event) = event::read().context("failed to read event")? else {
            continue;
        };
        if key_event.kind != KeyEventKind::Press {
            continue;
        }
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            return Ok(());
        }
        if app.handle_key(key_event.code) {
            return Ok(());
        }
    }
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal
        .show_cursor()
        .context("failed to restore cursor visibility")
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use anyhow::anyhow;

    use super::*;

    #[test]
    fn failed_setup_runs_rollback() {
        let rolled_back = Cell::new(false);
        let result: Result<()> = rollback_on_error(
            || Err(anyhow!("failed to create terminal backend")),
            || rolled_back.set(true),
        );

        assert!(result.is_err());
        assert!(rolled_back.get());
    }

    #[test]
    fn successful_setup_skips_rollback() {
        let rolled_back = Cell::new(false);
        let result = rollback_on_error(|| Ok(7), || rolled_back.set(true));

        assert_eq!(result.unwrap(), 7);
        assert!(!rolled_back.get());
    }
}
