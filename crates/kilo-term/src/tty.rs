// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// The real console: stdin for keys, stdout for frames.
//
// Reads and writes go straight to the file descriptors with read(2) and
// write(2). Rust's `Stdout` is line-buffered, so a frame containing `\r\n`
// would leave it as several writes; `Stdin` is block-buffered and would
// swallow the bytes of a cursor-position reply we need to see one at a
// time. Neither wrapper is wanted here.

use std::io::{self, Read, Write};
use std::os::unix::io::RawFd;

use crate::console::{Console, Size};
use crate::terminal;

/// Console backed by a pair of file descriptors, normally stdin/stdout.
#[derive(Debug, Clone, Copy)]
pub struct Tty {
    input: RawFd,
    output: RawFd,
}

impl Tty {
    /// The process's standard input and output.
    #[must_use]
    pub const fn stdio() -> Self {
        Self::from_fds(libc::STDIN_FILENO, libc::STDOUT_FILENO)
    }

    /// A console over arbitrary descriptors. They are not closed on drop.
    #[must_use]
    pub const fn from_fds(input: RawFd, output: RawFd) -> Self {
        Self { input, output }
    }
}

impl Read for Tty {
    /// One `read(2)`. In raw mode `Ok(0)` is a timeout, not end of input.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = unsafe { libc::read(self.input, buf.as_mut_ptr().cast(), buf.len()) };
        if n < 0 {
            return Err(io::Error::last_os_error());
        }
        #[allow(clippy::cast_sign_loss)] // n >= 0 checked above.
        let n = n as usize;
        Ok(n)
    }
}

impl Write for Tty {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = unsafe { libc::write(self.output, buf.as_ptr().cast(), buf.len()) };
        if n < 0 {
            return Err(io::Error::last_os_error());
        }
        #[allow(clippy::cast_sign_loss)] // n >= 0 checked above.
        let n = n as usize;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        // Unbuffered.
        Ok(())
    }
}

impl Console for Tty {
    fn window_size(&mut self) -> io::Result<Size> {
        terminal::window_size(self.output)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
