// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode and window-size queries.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, and raw fd writes. These are
// the standard POSIX interfaces for terminal control and there is no safe
// alternative. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// `RawMode` is a scoped guard: creating it snapshots the terminal's
// attributes and switches to raw mode, dropping it puts the snapshot back.
// Early returns, `?` and unwinding panics all go through the drop.
//
// The panic hook is for the window between the panic and the unwind: the
// default hook prints the message while the terminal is still raw (no
// newline translation, so the message staircases across the screen). Our
// hook restores the attributes from a process-wide backup first, clears the
// screen, then hands off to the original hook.

use std::io;
use std::os::unix::io::RawFd;
use std::sync::{Mutex, Once};

use tracing::{debug, warn};

use crate::console::Size;
use crate::error::{Error, Result};

/// Minimum bytes a raw-mode `read()` waits for (`VMIN`).
pub const READ_MIN_BYTES: libc::cc_t = 0;

/// Raw-mode read timeout in tenths of a second (`VTIME`). With
/// `VMIN = 0` a read returns zero bytes after this much silence.
pub const READ_TIMEOUT_DECISECONDS: libc::cc_t = 1;

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the window size of the terminal on `fd` via `ioctl(TIOCGWINSZ)`.
///
/// The size is returned as reported, zero columns included. Deciding what
/// to do with a degenerate answer is the geometry resolver's job.
///
/// # Errors
///
/// Returns the OS error if the ioctl fails (e.g. `fd` is not a terminal).
pub fn window_size(fd: RawFd) -> io::Result<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &raw mut ws) };

    if result == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    })
}

/// Check whether `fd` is connected to a terminal.
#[must_use]
pub fn is_tty(fd: RawFd) -> bool {
    unsafe { libc::isatty(fd) != 0 }
}

// ─── TerminalState ──────────────────────────────────────────────────────────

/// A snapshot of a terminal's attributes: the four flag sets and the
/// control-character table (which holds the `VMIN`/`VTIME` read policy).
#[derive(Clone, Copy)]
pub struct TerminalState {
    termios: libc::termios,
}

impl TerminalState {
    /// Read the current attributes of the terminal on `fd`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Os { op: "tcgetattr", .. }` if `fd` is not a terminal.
    pub fn capture(fd: RawFd) -> Result<Self> {
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &raw mut termios) } == -1 {
            return Err(Error::last_os_error("tcgetattr"));
        }
        Ok(Self { termios })
    }

    /// Apply these attributes to `fd`, discarding unread input first
    /// (`TCSAFLUSH`).
    ///
    /// # Errors
    ///
    /// Returns `Error::Os { op: "tcsetattr", .. }` on failure.
    pub fn apply(&self, fd: RawFd) -> Result<()> {
        if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const self.termios) } == -1 {
            return Err(Error::last_os_error("tcsetattr"));
        }
        Ok(())
    }

    /// Derive the raw-mode attributes from this snapshot.
    ///
    /// - input: no XON/XOFF flow control, no CR→NL translation, no parity
    ///   check, no 8th-bit stripping, no SIGINT on break
    /// - output: no post-processing, so newlines need an explicit `\r\n`
    /// - control: 8-bit characters
    /// - local: no echo, no canonical line buffering, no `Ctrl-V` literal
    ///   input, no signals from `Ctrl-C`/`Ctrl-Z`
    /// - reads return after [`READ_TIMEOUT_DECISECONDS`] with whatever
    ///   arrived, possibly nothing
    #[must_use]
    pub fn raw(&self) -> Self {
        let mut raw = self.termios;
        raw.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
        raw.c_oflag &= !libc::OPOST;
        raw.c_cflag |= libc::CS8;
        raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
        raw.c_cc[libc::VMIN] = READ_MIN_BYTES;
        raw.c_cc[libc::VTIME] = READ_TIMEOUT_DECISECONDS;
        Self { termios: raw }
    }

    /// Input mode flags (`c_iflag`).
    #[inline]
    #[must_use]
    pub const fn input_flags(&self) -> libc::tcflag_t {
        self.termios.c_iflag
    }

    /// Output mode flags (`c_oflag`).
    #[inline]
    #[must_use]
    pub const fn output_flags(&self) -> libc::tcflag_t {
        self.termios.c_oflag
    }

    /// Control mode flags (`c_cflag`).
    #[inline]
    #[must_use]
    pub const fn control_flags(&self) -> libc::tcflag_t {
        self.termios.c_cflag
    }

    /// Local mode flags (`c_lflag`).
    #[inline]
    #[must_use]
    pub const fn local_flags(&self) -> libc::tcflag_t {
        self.termios.c_lflag
    }

    /// The control-character table.
    #[inline]
    #[must_use]
    pub fn control_chars(&self) -> &[libc::cc_t] {
        &self.termios.c_cc
    }

    /// Whether both snapshots carry identical flag sets and control table.
    #[must_use]
    pub fn same_attributes(&self, other: &Self) -> bool {
        self.input_flags() == other.input_flags()
            && self.output_flags() == other.output_flags()
            && self.control_flags() == other.control_flags()
            && self.local_flags() == other.local_flags()
            && self.control_chars() == other.control_chars()
    }
}

impl std::fmt::Debug for TerminalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalState")
            .field("c_iflag", &format_args!("{:#o}", self.input_flags()))
            .field("c_oflag", &format_args!("{:#o}", self.output_flags()))
            .field("c_cflag", &format_args!("{:#o}", self.control_flags()))
            .field("c_lflag", &format_args!("{:#o}", self.local_flags()))
            .field("c_cc", &self.control_chars())
            .finish()
    }
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of the original attributes for the panic hook, which
/// can't reach the [`RawMode`] guard.
///
/// One slot: the most recent guard wins, and any guard's restore clears it.
/// The editor holds a single guard, so that is enough.
static TERMIOS_BACKUP: Mutex<Option<(RawFd, TerminalState)>> = Mutex::new(None);

/// Clear screen and home the cursor so the panic message starts clean.
const EMERGENCY_CLEAR: &[u8] = b"\x1b[2J\x1b[H";

static PANIC_HOOK_INSTALLED: Once = Once::new();

fn set_backup(entry: Option<(RawFd, TerminalState)>) {
    if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
        *guard = entry;
    }
}

/// Restore attributes from the global backup. Best-effort, ignores errors.
fn restore_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some((fd, ref original)) = *guard {
            let _ = original.apply(fd);
        }
    }
}

/// Install the restoring panic hook, at most once per process.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_from_backup();
            // Straight to fd 1: the panic may have happened while the
            // stdout lock was held.
            unsafe {
                let _ = libc::write(
                    libc::STDOUT_FILENO,
                    EMERGENCY_CLEAR.as_ptr().cast::<libc::c_void>(),
                    EMERGENCY_CLEAR.len(),
                );
            }
            original(info);
        }));
    });
}

// ─── RawMode ────────────────────────────────────────────────────────────────

/// Raw mode held for as long as this guard lives.
///
/// # Example
///
/// ```no_run
/// use kilo_term::terminal::RawMode;
///
/// let mut raw = RawMode::enable()?;
/// // ... read keys, draw frames ...
/// raw.disable()?; // or just let it drop
/// # Ok::<(), kilo_term::Error>(())
/// ```
pub struct RawMode {
    fd: RawFd,
    original: TerminalState,
    active: bool,
}

impl RawMode {
    /// Put the controlling terminal (stdin) into raw mode.
    ///
    /// # Errors
    ///
    /// Fails if stdin is not a terminal or its attributes can't be read or
    /// written.
    pub fn enable() -> Result<Self> {
        if !is_tty(libc::STDIN_FILENO) {
            return Err(Error::NotATerminal);
        }
        Self::enable_on(libc::STDIN_FILENO)
    }

    /// Put the terminal on `fd` into raw mode.
    ///
    /// # Errors
    ///
    /// Returns `tcgetattr`/`tcsetattr` failures.
    pub fn enable_on(fd: RawFd) -> Result<Self> {
        install_panic_hook();

        let original = TerminalState::capture(fd)?;
        set_backup(Some((fd, original)));

        if let Err(err) = original.raw().apply(fd) {
            set_backup(None);
            return Err(err);
        }

        debug!(fd, original = ?original, "raw mode enabled");
        Ok(Self {
            fd,
            original,
            active: true,
        })
    }

    /// The attributes captured on entry.
    #[inline]
    #[must_use]
    pub const fn original(&self) -> &TerminalState {
        &self.original
    }

    /// Whether raw mode is still in effect.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Restore the captured attributes. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `Error::Os { op: "tcsetattr", .. }` if the restore fails. The
    /// guard stays active so the drop gets another try.
    pub fn disable(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }

        self.original.apply(self.fd)?;
        self.active = false;
        set_backup(None);

        debug!(fd = self.fd, "raw mode disabled");
        Ok(())
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(err) = self.disable() {
            warn!(error = %err, "failed to restore terminal attributes");
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
