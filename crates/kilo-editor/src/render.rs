//! Screen rendering.
//!
//! A frame is built in an [`OutputBuffer`] and written with a single call:
//!
//! ```text
//! ESC[2J  ESC[H  ~ \r\n ~ \r\n … ~  ESC[H
//! clear   home   one "~" per row    home
//! ```
//!
//! Rows are separated, not terminated, by `\r\n`. A newline after the last
//! row would scroll the terminal by one line. Raw mode disables output
//! processing, so the carriage return must be explicit.

use std::io::Write;

use kilo_term::ansi;
use kilo_term::output::OutputBuffer;
use kilo_term::{Console, Error, Result};

use crate::config::EditorConfig;

/// The glyph drawn at the start of every row that has no content.
pub const PLACEHOLDER: &[u8] = b"~";

/// What goes between two rows.
pub const ROW_SEPARATOR: &[u8] = b"\r\n";

/// Append one placeholder per row, separated by `\r\n`.
pub fn draw_rows(out: &mut OutputBuffer, rows: u16) {
    for y in 0..rows {
        out.append(PLACEHOLDER);
        if y + 1 < rows {
            out.append(ROW_SEPARATOR);
        }
    }
}

/// Build a complete frame for `config` into `out`.
pub fn compose_frame(config: &EditorConfig, out: &mut OutputBuffer) {
    ansi::clear_screen(out).ok();
    ansi::cursor_home(out).ok();
    draw_rows(out, config.rows);
    ansi::cursor_home(out).ok();
}

/// Repaint the screen: compose the frame, write it in one call, release.
///
/// # Errors
///
/// Returns `Error::Os { op: "write", .. }` if the console rejects the frame.
pub fn refresh_screen(config: &EditorConfig, console: &mut impl Console) -> Result<()> {
    let mut out = OutputBuffer::new();
    compose_frame(config, &mut out);
    out.flush_to(console).map_err(|e| Error::os("write", e))
}

/// Clear the screen and home the cursor, writing directly to the console.
///
/// Used on the way out (quit or fatal error), where there is no next frame
/// to batch with.
///
/// # Errors
///
/// Returns `Error::Os { op: "write", .. }` if the write fails.
pub fn clear_screen(console: &mut impl Console) -> Result<()> {
    ansi::clear_screen(console)
        .and_then(|()| ansi::cursor_home(console))
        .and_then(|()| console.flush())
        .map_err(|e| Error::os("write", e))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
