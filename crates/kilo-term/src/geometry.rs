// SPDX-License-Identifier: MIT
//
// Window geometry resolution.
//
// The direct route is the console's size query (TIOCGWINSZ on a tty). Not
// every terminal or pseudo-terminal answers it, so when it fails or reports
// zero columns we probe instead:
//
//   1. Push the cursor far right and far down (`ESC[999C ESC[999B`). The
//      terminal clamps the move at its edges, so the cursor lands on the
//      bottom-right cell.
//   2. Ask where the cursor is (`ESC[6n`).
//   3. Read the reply `ESC [ rows ; cols R` one byte at a time until the
//      `R` or until the scratch buffer is full.
//
// The 1-indexed position of the bottom-right cell is the window size.

use std::io::{self, Read, Write};

use tracing::{debug, warn};

use crate::ansi::{self, ESC};
use crate::console::{Console, Size};
use crate::error::{Error, Result};

/// How far the probe pushes the cursor. Terminals clamp it to the edge.
pub const PROBE_DISTANCE: u16 = 999;

/// Scratch space for the cursor-position report, terminator included.
pub const CURSOR_REPORT_MAX: usize = 32;

/// Resolve the window size, falling back to the cursor probe when the
/// direct query fails or reports zero columns.
///
/// # Errors
///
/// Returns an error if the probe cannot be written, the reply cannot be
/// read, or the reply is malformed.
pub fn resolve_window_size(console: &mut impl Console) -> Result<Size> {
    match console.window_size() {
        Ok(size) if size.cols > 0 => {
            debug!(rows = size.rows, cols = size.cols, "window size from direct query");
            return Ok(size);
        }
        Ok(size) => warn!(rows = size.rows, "direct size query reported zero columns"),
        Err(err) => warn!(error = %err, "direct size query failed"),
    }

    let size = probe_window_size(console)?;
    debug!(rows = size.rows, cols = size.cols, "window size from cursor probe");
    Ok(size)
}

/// Move the cursor to the bottom-right corner and read back its position.
///
/// # Errors
///
/// Fails if the probe is not fully written, reading fails, or the report is
/// malformed.
pub fn probe_window_size(console: &mut impl Console) -> Result<Size> {
    let mut probe = Vec::with_capacity(12);
    ansi::cursor_forward(&mut probe, PROBE_DISTANCE).map_err(|e| Error::os("write", e))?;
    ansi::cursor_down(&mut probe, PROBE_DISTANCE).map_err(|e| Error::os("write", e))?;

    // One write; a short write means the terminal isn't taking our output.
    let written = console.write(&probe).map_err(|e| Error::os("write", e))?;
    if written != probe.len() {
        return Err(Error::os("write", io::ErrorKind::WriteZero.into()));
    }
    console.flush().map_err(|e| Error::os("write", e))?;

    cursor_position(console)
}

/// Request a cursor-position report and parse the reply.
///
/// # Errors
///
/// Fails if the request cannot be written, reading fails, or the report is
/// malformed.
pub fn cursor_position(console: &mut impl Console) -> Result<Size> {
    let mut request = Vec::with_capacity(4);
    ansi::request_cursor_position(&mut request).map_err(|e| Error::os("write", e))?;
    console
        .write_all(&request)
        .and_then(|()| console.flush())
        .map_err(|e| Error::os("write", e))?;

    let report = read_cursor_report(console)?;
    parse_cursor_report(&report)
}

/// Read a cursor-position reply byte by byte.
///
/// Stops after the `R` terminator, when a read times out (zero bytes or
/// `EAGAIN`), or when the scratch buffer is full. The terminator is not
/// included.
fn read_cursor_report(console: &mut impl Console) -> Result<Vec<u8>> {
    let mut report = Vec::with_capacity(CURSOR_REPORT_MAX);
    let mut byte = [0u8; 1];

    while report.len() < CURSOR_REPORT_MAX - 1 {
        match console.read(&mut byte) {
            Ok(1) => {
                if byte[0] == b'R' {
                    break;
                }
                report.push(byte[0]);
            }
            Ok(_) => break,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
            Err(e) => return Err(Error::os("read", e)),
        }
    }

    Ok(report)
}

/// Parse a cursor-position report: `ESC [ rows ; cols`, optionally followed
/// by the `R` terminator.
///
/// # Errors
///
/// Returns [`Error::CursorReport`] if the escape or bracket is missing or
/// either field is not a decimal number.
pub fn parse_cursor_report(report: &[u8]) -> Result<Size> {
    let body = match report {
        [ESC, b'[', rest @ ..] => rest,
        _ => return Err(Error::CursorReport),
    };
    let body = body.strip_suffix(b"R").unwrap_or(body);

    let text = std::str::from_utf8(body).map_err(|_| Error::CursorReport)?;
    let (rows, cols) = text.split_once(';').ok_or(Error::CursorReport)?;

    Ok(Size {
        rows: parse_field(rows)?,
        cols: parse_field(cols)?,
    })
}

/// A decimal field. `u16::from_str` alone would accept a leading `+`.
fn parse_field(field: &str) -> Result<u16> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::CursorReport);
    }
    field.parse().map_err(|_| Error::CursorReport)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use pretty_assertions::assert_eq;

    const TERM_80X24: Size = Size { cols: 80, rows: 24 };

    // ── parse_cursor_report ─────────────────────────────────────────────

    #[test]
    fn parses_standard_report() {
        assert_eq!(parse_cursor_report(b"\x1b[24;80R").unwrap(), TERM_80X24);
    }

    #[test]
    fn parses_report_without_terminator() {
        assert_eq!(parse_cursor_report(b"\x1b[24;80").unwrap(), TERM_80X24);
    }

    #[test]
    fn parses_large_report() {
        let size = parse_cursor_report(b"\x1b[200;500R").unwrap();
        assert_eq!(size, Size { cols: 500, rows: 200 });
    }

    #[test]
    fn rejects_missing_escape() {
        assert!(matches!(
            parse_cursor_report(b"[24;80R"),
            Err(Error::CursorReport)
        ));
    }

    #[test]
    fn rejects_missing_bracket() {
        assert!(matches!(
            parse_cursor_report(b"\x1b24;80R"),
            Err(Error::CursorReport)
        ));
    }

    #[test]
    fn rejects_non_numeric_fields() {
        let cases: [&[u8]; 6] = [
            b"\x1b[ab;80R",
            b"\x1b[24;xyR",
            b"\x1b[24;R",
            b"\x1b[;80R",
            b"\x1b[+24;80R",
            b"\x1b[2480R",
        ];
        for bad in cases {
            assert!(
                matches!(parse_cursor_report(bad), Err(Error::CursorReport)),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn rejects_empty_input() {
        assert!(parse_cursor_report(b"").is_err());
    }

    // ── resolve_window_size ─────────────────────────────────────────────

    #[test]
    fn direct_query_wins_without_probing() {
        let mut con = ScriptedConsole::with_size(TERM_80X24);
        assert_eq!(resolve_window_size(&mut con).unwrap(), TERM_80X24);
        assert_eq!(con.size_queries(), 1);
        assert!(con.writes().is_empty(), "fallback must not run");
    }

    #[test]
    fn failed_query_falls_back_to_probe() {
        let mut con = ScriptedConsole::without_size();
        con.push_bytes(b"\x1b[50;132R");

        let size = resolve_window_size(&mut con).unwrap();

        assert_eq!(size, Size { cols: 132, rows: 50 });
        assert_eq!(con.size_queries(), 1);
        assert_eq!(con.output(), b"\x1b[999C\x1b[999B\x1b[6n");
    }

    #[test]
    fn zero_columns_falls_back_to_probe() {
        let mut con = ScriptedConsole::with_size(Size { cols: 0, rows: 24 });
        con.push_bytes(b"\x1b[24;80R");

        assert_eq!(resolve_window_size(&mut con).unwrap(), TERM_80X24);
        assert!(!con.writes().is_empty());
    }

    #[test]
    fn probe_moves_cursor_in_one_write() {
        let mut con = ScriptedConsole::without_size();
        con.push_bytes(b"\x1b[24;80R");
        probe_window_size(&mut con).unwrap();
        assert_eq!(con.writes()[0], b"\x1b[999C\x1b[999B");
    }

    #[test]
    fn probe_failure_is_an_error() {
        let mut con = ScriptedConsole::without_size();
        con.push_bytes(b"garbage").push_timeout();
        assert!(matches!(
            resolve_window_size(&mut con),
            Err(Error::CursorReport)
        ));
    }

    #[test]
    fn probe_stops_reading_at_terminator() {
        let mut con = ScriptedConsole::without_size();
        con.push_bytes(b"\x1b[24;80Rxyz");
        resolve_window_size(&mut con).unwrap();
        assert_eq!(con.pending_input(), 3);
    }

    #[test]
    fn probe_timeout_ends_report() {
        let mut con = ScriptedConsole::without_size();
        con.push_bytes(b"\x1b[24;80").push_timeout();
        assert_eq!(resolve_window_size(&mut con).unwrap(), TERM_80X24);
    }

    #[test]
    fn probe_read_error_is_reported() {
        // Nothing queued: the scripted console reports UnexpectedEof.
        let mut con = ScriptedConsole::without_size();
        let err = resolve_window_size(&mut con).unwrap_err();
        assert!(matches!(err, Error::Os { op: "read", .. }));
    }

    /// Wraps a scripted console; the first read after `fail_at` successful
    /// bytes reports `kind` instead.
    struct Stumbling {
        inner: ScriptedConsole,
        fail_at: usize,
        kind: io::ErrorKind,
        reads: usize,
    }

    impl Stumbling {
        fn new(reply: &[u8], fail_at: usize, kind: io::ErrorKind) -> Self {
            let mut inner = ScriptedConsole::without_size();
            inner.push_bytes(reply);
            Self {
                inner,
                fail_at,
                kind,
                reads: 0,
            }
        }
    }

    impl io::Read for Stumbling {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads += 1;
            if self.reads == self.fail_at + 1 {
                return Err(self.kind.into());
            }
            self.inner.read(buf)
        }
    }

    impl io::Write for Stumbling {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.inner.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            self.inner.flush()
        }
    }

    impl Console for Stumbling {
        fn window_size(&mut self) -> io::Result<Size> {
            self.inner.window_size()
        }
    }

    #[test]
    fn would_block_ends_report_like_a_timeout() {
        let mut con = Stumbling::new(b"\x1b[24;80R", 7, io::ErrorKind::WouldBlock);
        assert_eq!(resolve_window_size(&mut con).unwrap(), TERM_80X24);
    }

    #[test]
    fn would_block_before_reply_is_a_parse_error_not_a_read_error() {
        let mut con = Stumbling::new(b"\x1b[24;80R", 0, io::ErrorKind::WouldBlock);
        assert!(matches!(
            resolve_window_size(&mut con),
            Err(Error::CursorReport)
        ));
    }

    #[test]
    fn interrupted_read_is_retried() {
        let mut con = Stumbling::new(b"\x1b[24;80R", 3, io::ErrorKind::Interrupted);
        assert_eq!(resolve_window_size(&mut con).unwrap(), TERM_80X24);
    }

    #[test]
    fn overlong_report_is_bounded() {
        let mut con = ScriptedConsole::without_size();
        con.push_bytes(&[b'9'; 64]);
        assert!(resolve_window_size(&mut con).is_err());
        assert_eq!(con.pending_input(), 64 - (CURSOR_REPORT_MAX - 1));
    }
}
