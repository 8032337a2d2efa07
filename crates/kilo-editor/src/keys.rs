//! Key input and dispatch.
//!
//! In raw mode every byte arrives verbatim, including control characters.
//! `Ctrl` clears the top three bits of a letter, so `Ctrl-Q` is
//! `b'q' & 0x1f` = `0x11`. That chord quits; every other byte is ignored
//! for now.

use std::io::{self, Read};

use tracing::{info, trace};

use kilo_term::{Console, Error, Result};

use crate::render;

/// The byte a terminal sends for `Ctrl` + `key`.
#[inline]
#[must_use]
pub const fn ctrl_key(key: u8) -> u8 {
    key & 0x1f
}

/// `Ctrl-Q`.
pub const QUIT: u8 = ctrl_key(b'q');

/// What the main loop does after a keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep going.
    Continue,
    /// Leave the loop and exit successfully.
    Quit,
}

/// Block until one byte of input arrives.
///
/// A read that times out with no bytes (raw mode returns after a tenth of a
/// second) just waits again, as do reads interrupted by a signal or
/// reporting `EAGAIN`.
///
/// # Errors
///
/// Returns `Error::Os { op: "read", .. }` on any other read failure.
pub fn read_key(console: &mut impl Console) -> Result<u8> {
    let mut byte = [0u8; 1];
    loop {
        match console.read(&mut byte) {
            Ok(1) => return Ok(byte[0]),
            Ok(_) => {}
            Err(e) if matches!(e.kind(), io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock) => {}
            Err(e) => return Err(Error::os("read", e)),
        }
    }
}

/// Map a key to an action.
#[must_use]
pub const fn dispatch(key: u8) -> Action {
    match key {
        QUIT => Action::Quit,
        _ => Action::Continue,
    }
}

/// Read one key and act on it.
///
/// On quit the screen is cleared directly, bypassing the frame buffer,
/// since no further frame will be drawn.
///
/// # Errors
///
/// Propagates read failures and the failure to clear the screen.
pub fn process_keypress(console: &mut impl Console) -> Result<Action> {
    let key = read_key(console)?;
    trace!(key, "keypress");

    let action = dispatch(key);
    if action == Action::Quit {
        render::clear_screen(console)?;
        info!("quit requested");
    }
    Ok(action)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
