// SPDX-License-Identifier: MIT
//
// kilo-term — Terminal layer for kilo.
//
// Direct terminal control via raw termios and ANSI escape sequences:
// entering and leaving raw mode, resolving the window size (with a
// cursor-probe fallback for terminals that don't answer TIOCGWINSZ),
// and an output buffer so each frame reaches the terminal in a single
// write() call.
//
// Everything above the file descriptors is written against the
// `Console` trait, so the resolver, renderer, and key dispatcher can be
// driven by an in-memory console in tests.

pub mod ansi;
pub mod console;
pub mod error;
pub mod geometry;
pub mod output;
#[cfg(unix)]
pub mod terminal;
#[cfg(unix)]
pub mod tty;

pub use console::{Console, Size};
pub use error::{Error, Result};
