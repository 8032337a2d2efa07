// SPDX-License-Identifier: MIT
//
// Error type for the terminal layer.
//
// Every failure here is fatal to the editor: the terminal is unusable.
// Callers propagate with `?` up to `main`, which restores the terminal,
// clears the screen, prints the diagnostic, and exits with status 1.

use std::io;

use thiserror::Error;

/// A terminal-layer failure.
#[derive(Debug, Error)]
pub enum Error {
    /// An OS call failed. Displays as `"<op>: <os error>"`, the same shape
    /// `perror` produces.
    #[error("{op}: {source}")]
    Os {
        /// The failing operation (`tcgetattr`, `read`, `ioctl`, ...).
        op: &'static str,
        #[source]
        source: io::Error,
    },

    /// The terminal's cursor-position report did not have the form
    /// `ESC [ rows ; cols R`.
    #[error("malformed cursor position report")]
    CursorReport,

    /// Standard input is not connected to a terminal.
    #[error("standard input is not a terminal")]
    NotATerminal,
}

impl Error {
    /// Wrap an I/O error with the name of the operation that produced it.
    #[must_use]
    pub const fn os(op: &'static str, source: io::Error) -> Self {
        Self::Os { op, source }
    }

    /// Capture `errno` for the operation that just failed.
    #[must_use]
    pub fn last_os_error(op: &'static str) -> Self {
        Self::os(op, io::Error::last_os_error())
    }
}

/// Result alias for the terminal layer.
pub type Result<T> = std::result::Result<T, Error>;
