// SPDX-License-Identifier: MIT
//
// The console seam.
//
// The geometry resolver, the renderer, and the key dispatcher only need
// three things from a terminal: a byte source, a byte sink, and a direct
// window-size query. `Console` names exactly that. The real implementation
// lives in `tty`; `ScriptedConsole` (behind the `testing` feature) replays
// queued input and records every write call for tests.

use std::io::{self, Read, Write};

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

// ─── Console ────────────────────────────────────────────────────────────────

/// A terminal the editor can talk to.
///
/// `read` follows raw-mode timeout semantics: `Ok(0)` means the read timed
/// out with no input, not end of stream.
pub trait Console: Read + Write {
    /// Ask the OS for the window size directly (`TIOCGWINSZ` on a tty).
    ///
    /// # Errors
    ///
    /// Returns an error if the query is unsupported or fails.
    fn window_size(&mut self) -> io::Result<Size>;
}

// ─── ScriptedConsole ────────────────────────────────────────────────────────

#[cfg(any(test, feature = "testing"))]
pub use scripted::ScriptedConsole;

#[cfg(any(test, feature = "testing"))]
mod scripted {
    use std::collections::VecDeque;
    use std::io::{self, Read, Write};

    use super::{Console, Size};

    /// An in-memory console for tests.
    ///
    /// Input is a queue of read results: a byte, or a timeout (`Ok(0)`). Once
    /// the queue is empty, reads fail with `UnexpectedEof` so a loop under
    /// test can never spin forever. Each `write` call is recorded separately.
    #[derive(Debug)]
    pub struct ScriptedConsole {
        input: VecDeque<Option<u8>>,
        writes: Vec<Vec<u8>>,
        size: Result<Size, io::ErrorKind>,
        size_queries: usize,
    }

    impl ScriptedConsole {
        /// A console whose direct size query succeeds with `size`.
        #[must_use]
        pub const fn with_size(size: Size) -> Self {
            Self {
                input: VecDeque::new(),
                writes: Vec::new(),
                size: Ok(size),
                size_queries: 0,
            }
        }

        /// A console whose direct size query fails.
        #[must_use]
        pub const fn without_size() -> Self {
            Self {
                input: VecDeque::new(),
                writes: Vec::new(),
                size: Err(io::ErrorKind::Unsupported),
                size_queries: 0,
            }
        }

        /// Queue bytes to be returned one per read.
        pub fn push_bytes(&mut self, bytes: &[u8]) -> &mut Self {
            self.input.extend(bytes.iter().copied().map(Some));
            self
        }

        /// Queue a read that times out with zero bytes.
        pub fn push_timeout(&mut self) -> &mut Self {
            self.input.push_back(None);
            self
        }

        /// Number of queued read results not yet consumed.
        #[must_use]
        pub fn pending_input(&self) -> usize {
            self.input.len()
        }

        /// Every write call, in order.
        #[must_use]
        pub fn writes(&self) -> &[Vec<u8>] {
            &self.writes
        }

        /// All written bytes concatenated.
        #[must_use]
        pub fn output(&self) -> Vec<u8> {
            self.writes.concat()
        }

        /// How many times the direct size query was made.
        #[must_use]
        pub const fn size_queries(&self) -> usize {
            self.size_queries
        }
    }

    impl Read for ScriptedConsole {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if buf.is_empty() {
                return Ok(0);
            }
            match self.input.pop_front() {
                Some(Some(byte)) => {
                    buf[0] = byte;
                    Ok(1)
                }
                Some(None) => Ok(0),
                None => Err(io::ErrorKind::UnexpectedEof.into()),
            }
        }
    }

    impl Write for ScriptedConsole {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes.push(buf.to_vec());
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Console for ScriptedConsole {
        fn window_size(&mut self) -> io::Result<Size> {
            self.size_queries += 1;
            self.size.map_err(io::Error::from)
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
