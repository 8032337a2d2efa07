// SPDX-License-Identifier: MIT
//
// kilo — a minimal terminal text editor.
//
// This is the binary that wires the crates together:
//
//   kilo-term   → raw mode, window geometry, buffered output, the tty
//   kilo-editor → editor config, screen renderer, key dispatch, main loop
//
// Lifecycle:
//
//   raw mode on → resolve window size → { draw frame, read key } → Ctrl-Q
//
// Errors from any layer propagate here. By the time `run` returns the raw
// mode guard has already put the terminal back, so the handler only has to
// clear the screen, print the diagnostic, and exit with status 1.

mod logging;

use std::process;

#[cfg(unix)]
fn run() -> kilo_term::Result<()> {
    use kilo_editor::Editor;
    use kilo_term::terminal::RawMode;
    use kilo_term::tty::Tty;

    let mut raw = RawMode::enable()?;
    let session = Editor::open(Tty::stdio()).and_then(|mut editor| editor.run());
    let restored = raw.disable();
    session.and(restored)
}

#[cfg(unix)]
fn main() {
    let _log = logging::init(&logging::LogConfig::from_env());

    if let Err(err) = run() {
        let _ = kilo_editor::render::clear_screen(&mut kilo_term::tty::Tty::stdio());
        tracing::error!(error = %err, "fatal");
        eprintln!("kilo: {err}");
        process::exit(1);
    }
}

#[cfg(not(unix))]
fn main() {
    let _log = logging::init(&logging::LogConfig::from_env());
    eprintln!("kilo: only Unix terminals are supported");
    process::exit(1);
}
