//! Terminal front end: header with search, sidebar, routed content and dialogs.

pub mod app;
pub mod colors;
pub mod menu;
pub mod table;
pub mod ui;

pub use app::{App, Focus, ShellOptions};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::sync::Once;

static PANIC_HOOK: Once = Once::new();

/// Raw mode, the alternate screen and mouse capture, held for the lifetime
/// of the shell. Mouse capture is what delivers the click and resize events
/// the shell reacts to, so it is acquired and released together with the rest.
///
/// Release is idempotent and also runs on drop.
pub struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    pub fn acquire() -> io::Result<Self> {
        install_panic_hook();

        enable_raw_mode()?;
        let mut guard = Self { active: true };
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture) {
            guard.release();
            return Err(e);
        }
        tracing::debug!("terminal acquired");
        Ok(guard)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        restore_terminal();
        tracing::debug!("terminal released");
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.release();
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

// Restore the terminal before the panic message is printed, otherwise it
// lands on the alternate screen and is lost.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_terminal();
            previous(info);
        }));
    });
}

/// Run the interactive shell until the user quits or logs out.
pub fn run(app: &mut App) -> crate::Result<()> {
    let mut guard = TerminalGuard::acquire()?;

    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;

    let (width, _) = terminal::size()?;
    app.handle_resize(width);

    let result = app.run(&mut terminal);

    guard.release();
    terminal.show_cursor()?;
    result
}
