// SPDX-License-Identifier: MIT
//
// Output accumulation.
//
// OutputBuffer collects every byte of a frame (escape sequences and glyphs)
// in memory so the whole frame reaches the terminal in one write() call.
// Issuing the clear, the rows, and the cursor moves as separate writes lets
// the terminal paint half-finished frames, which shows up as flicker.
//
// Appends are best-effort: if the allocator refuses to grow the buffer the
// bytes are dropped and the buffer is left as it was. A short frame is
// repaired by the next redraw; aborting the editor over it is not worth it.

use std::io::{self, Write};

use tracing::warn;

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// A growable byte buffer that batches one frame of terminal output.
///
/// Lifecycle per frame: append everything, [`flush_to`](Self::flush_to)
/// once, which also [`release`](Self::release)s the memory.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    buf: Vec<u8>,
}

impl OutputBuffer {
    /// Create an empty buffer. Nothing is allocated until the first append.
    #[must_use]
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append `bytes` after the existing content.
    ///
    /// Grows the buffer by exactly `bytes.len()`. If the allocation fails the
    /// append is dropped and the buffer is unchanged.
    pub fn append(&mut self, bytes: &[u8]) {
        if self.buf.try_reserve(bytes.len()).is_err() {
            warn!(len = bytes.len(), held = self.buf.len(), "output append dropped");
            return;
        }
        self.buf.extend_from_slice(bytes);
    }

    /// Drop the contents and give the allocation back.
    ///
    /// After this the buffer is indistinguishable from [`OutputBuffer::new`].
    pub fn release(&mut self) {
        self.buf = Vec::new();
    }

    /// Write the accumulated frame to `w` in one `write_all`, then release.
    ///
    /// An empty buffer writes nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails. The buffer is released
    /// either way so a failed frame never leaks into the next one.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let result = w.write_all(&self.buf).and_then(|()| w.flush());
        self.release();
        result
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // No-op. Real flushing goes through flush_to().
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
