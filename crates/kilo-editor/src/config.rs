//! Editor configuration — the context every component reads.
//!
//! Built once from the resolved window size and passed by reference to the
//! renderer. There is no global editor state.

use kilo_term::Size;

/// Process-wide editor state: the window geometry the screen is drawn for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorConfig {
    /// Screen height in rows.
    pub rows: u16,
    /// Screen width in columns.
    pub cols: u16,
}

impl EditorConfig {
    /// Configuration for a window of `size`.
    #[must_use]
    pub const fn new(size: Size) -> Self {
        Self {
            rows: size.rows,
            cols: size.cols,
        }
    }
}
