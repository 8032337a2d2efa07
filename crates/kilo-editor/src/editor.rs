//! The editor — lifecycle of one editing session.
//!
//! ```text
//! open:  resolve window size → EditorConfig
//! run:   loop { refresh_screen; process_keypress }   until Ctrl-Q
//! ```
//!
//! Raw mode is not managed here. The caller holds a
//! [`RawMode`](kilo_term::terminal::RawMode) guard around the session so
//! the terminal is restored on every exit path, errors included.

use tracing::debug;

use kilo_term::geometry::resolve_window_size;
use kilo_term::{Console, Result};

use crate::config::EditorConfig;
use crate::keys::{self, Action};
use crate::render;

/// An editing session bound to a console.
pub struct Editor<C: Console> {
    console: C,
    config: EditorConfig,
    frames: u64,
}

impl<C: Console> Editor<C> {
    /// Start a session: resolve the window geometry and build the config.
    ///
    /// # Errors
    ///
    /// Fails if neither the direct size query nor the cursor probe yields a
    /// window size.
    pub fn open(mut console: C) -> Result<Self> {
        let size = resolve_window_size(&mut console)?;
        Ok(Self::with_config(console, EditorConfig::new(size)))
    }

    const fn with_config(console: C, config: EditorConfig) -> Self {
        Self {
            console,
            config,
            frames: 0,
        }
    }

    /// The session's configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Frames drawn so far.
    #[inline]
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// The underlying console.
    #[inline]
    #[must_use]
    pub const fn console(&self) -> &C {
        &self.console
    }

    /// Render, wait for a key, repeat. Returns after `Ctrl-Q`.
    ///
    /// # Errors
    ///
    /// Any write or read failure ends the session with that error.
    pub fn run(&mut self) -> Result<()> {
        debug!(rows = self.config.rows, cols = self.config.cols, "editor loop started");
        loop {
            render::refresh_screen(&self.config, &mut self.console)?;
            self.frames += 1;

            if keys::process_keypress(&mut self.console)? == Action::Quit {
                debug!(frames = self.frames, "editor loop finished");
                return Ok(());
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use kilo_term::console::ScriptedConsole;
    use kilo_term::{Error, Size};
    use pretty_assertions::assert_eq;

    const SMALL: Size = Size { cols: 10, rows: 3 };
    const FRAME: &[u8] = b"\x1b[2J\x1b[H~\r\n~\r\n~\x1b[H";

    #[test]
    fn open_uses_direct_size() {
        let editor = Editor::open(ScriptedConsole::with_size(SMALL)).unwrap();
        assert_eq!(*editor.config(), EditorConfig::new(SMALL));
        assert!(editor.console().writes().is_empty());
    }

    #[test]
    fn open_falls_back_to_probe() {
        let mut con = ScriptedConsole::without_size();
        con.push_bytes(b"\x1b[3;10R");
        let editor = Editor::open(con).unwrap();
        assert_eq!(*editor.config(), EditorConfig::new(SMALL));
    }

    #[test]
    fn open_fails_when_geometry_is_unknown() {
        let mut con = ScriptedConsole::without_size();
        con.push_bytes(b"nonsense").push_timeout();
        assert!(matches!(Editor::open(con), Err(Error::CursorReport)));
    }

    #[test]
    fn only_ctrl_q_ends_the_loop() {
        let mut con = ScriptedConsole::with_size(SMALL);
        con.push_bytes(&[0x61, 0x1f, 0x71, 0x11, b'z']);
        let mut editor = Editor::open(con).unwrap();

        editor.run().unwrap();

        assert_eq!(editor.frames(), 4);
        // The byte after Ctrl-Q is never read.
        assert_eq!(editor.console().pending_input(), 1);
    }

    #[test]
    fn each_frame_is_one_write_then_quit_clears() {
        let mut con = ScriptedConsole::with_size(SMALL);
        con.push_bytes(&[b'a', keys::QUIT]);
        let mut editor = Editor::open(con).unwrap();
        editor.run().unwrap();

        let writes = editor.console().writes();
        assert_eq!(writes[0], FRAME);
        assert_eq!(writes[1], FRAME);
        assert_eq!(writes[2..].concat(), b"\x1b[2J\x1b[H");
    }

    #[test]
    fn timeouts_do_not_redraw() {
        let mut con = ScriptedConsole::with_size(SMALL);
        con.push_timeout()
            .push_timeout()
            .push_bytes(b"x")
            .push_timeout()
            .push_bytes(&[keys::QUIT]);
        let mut editor = Editor::open(con).unwrap();
        editor.run().unwrap();
        assert_eq!(editor.frames(), 2);
    }

    #[test]
    fn loop_keeps_running_without_quit() {
        // No Ctrl-Q: the loop only stops when input fails.
        let mut con = ScriptedConsole::with_size(SMALL);
        con.push_bytes(&[0x61, 0x1f, 0x71]);
        let mut editor = Editor::open(con).unwrap();

        let err = editor.run().unwrap_err();

        assert!(matches!(err, Error::Os { op: "read", .. }));
        assert_eq!(editor.frames(), 4);
    }

    #[test]
    fn with_config_skips_geometry() {
        let config = EditorConfig::new(SMALL);
        let editor = Editor::with_config(ScriptedConsole::without_size(), config);
        assert_eq!(editor.console().size_queries(), 0);
        assert_eq!(editor.frames(), 0);
    }
}
