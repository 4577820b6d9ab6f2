use std::io::{self, IsTerminal, Stdout};

use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::Size;

use crate::error::SurfaceError;

/// The character grid frames are drawn into. Owned by `main` and passed
/// down explicitly; tests build one around a `TestBackend`.
pub struct TerminalSurface<B: Backend> {
    terminal: Terminal<B>,
    interactive: bool,
    released: bool,
}

impl TerminalSurface<CrosstermBackend<Stdout>> {
    /// Enters raw mode and the alternate screen and hides the cursor.
    /// `ratatui::try_init` also installs a panic hook that restores the terminal.
    pub fn acquire() -> Result<Self, SurfaceError> {
        if !io::stdout().is_terminal() {
            return Err(SurfaceError::NotATerminal);
        }
        let mut terminal = ratatui::try_init().map_err(SurfaceError::Unavailable)?;
        if let Err(err) = terminal.hide_cursor() {
            let _ = ratatui::try_restore();
            return Err(SurfaceError::Unavailable(err));
        }
        Ok(TerminalSurface {
            terminal,
            interactive: true,
            released: false,
        })
    }
}

impl<B: Backend> TerminalSurface<B> {
    /// A surface with no real terminal behind it.
    pub fn headless(backend: B) -> Result<Self, B::Error> {
        Ok(TerminalSurface {
            terminal: Terminal::new(backend)?,
            interactive: false,
            released: false,
        })
    }

    pub fn size(&self) -> Result<Size, B::Error> {
        self.terminal.size()
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    pub fn backend_mut(&mut self) -> &mut B {
        self.terminal.backend_mut()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Shows the cursor again and leaves raw mode and the alternate screen.
    /// Only the first call does anything.
    pub fn release(&mut self) -> io::Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        let cursor = self
            .terminal
            .show_cursor()
            .map_err(|err| io::Error::other(err.to_string()));
        if self.interactive {
            ratatui::try_restore()?;
        }
        cursor
    }
}

impl<B: Backend> Drop for TerminalSurface<B> {
    fn drop(&mut self) {
        let _ = self.release();
    }
}
