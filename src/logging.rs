// SPDX-License-Identifier: MIT
//
// Logging setup.
//
// The terminal is the editor's screen, so logs can never go to stdout or
// stderr. They go to a file, and only when asked for:
//
//   KILO_LOG=/tmp/kilo.log        enable logging, append to this file
//   KILO_LOG_LEVEL=kilo_term=trace   EnvFilter directives (optional)
//
// Without KILO_LOG no subscriber is installed and every tracing macro in
// the crates is a no-op.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable naming the log file.
pub const LOG_PATH_VAR: &str = "KILO_LOG";

/// Environment variable holding the filter directives.
pub const LOG_FILTER_VAR: &str = "KILO_LOG_LEVEL";

/// Filter used when `KILO_LOG_LEVEL` is unset.
pub const DEFAULT_FILTER: &str = "kilo=debug,kilo_term=debug,kilo_editor=debug";

/// Where to log and what to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log file. `None` disables logging.
    pub path: Option<PathBuf>,
    /// `EnvFilter` directives.
    pub filter: String,
}

impl LogConfig {
    /// Read the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var_os(LOG_PATH_VAR),
            std::env::var(LOG_FILTER_VAR).ok(),
        )
    }

    /// Build the configuration from raw variable values. Empty values count
    /// as unset.
    #[must_use]
    pub fn from_vars(path: Option<OsString>, filter: Option<String>) -> Self {
        Self {
            path: path.filter(|p| !p.is_empty()).map(PathBuf::from),
            filter: filter
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FILTER.to_owned()),
        }
    }
}

/// Install the file subscriber described by `config`.
///
/// Returns the log path when logging was enabled. Any failure on the way
/// (directory, file, subscriber) leaves logging off; it never stops the
/// editor.
pub fn init(config: &LogConfig) -> Option<PathBuf> {
    let path = config.path.clone()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .ok()?;

    tracing::info!(path = %path.display(), "kilo starting");
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn disabled_without_path() {
        let config = LogConfig::from_vars(None, None);
        assert_eq!(config.path, None);
        assert_eq!(config.filter, DEFAULT_FILTER);
        assert_eq!(init(&config), None);
    }

    #[test]
    fn empty_path_counts_as_unset() {
        let config = LogConfig::from_vars(Some(OsString::new()), None);
        assert_eq!(config.path, None);
    }

    #[test]
    fn path_and_filter_from_vars() {
        let config = LogConfig::from_vars(
            Some(OsString::from("/tmp/kilo.log")),
            Some("kilo_term=trace".to_owned()),
        );
        assert_eq!(config.path, Some(PathBuf::from("/tmp/kilo.log")));
        assert_eq!(config.filter, "kilo_term=trace");
    }

    #[test]
    fn unusable_log_directory_leaves_logging_off() {
        let config = LogConfig::from_vars(Some(OsString::from("/dev/null/kilo/kilo.log")), None);
        assert_eq!(init(&config), None);
    }

    #[test]
    fn blank_filter_falls_back_to_default() {
        let config = LogConfig::from_vars(None, Some("   ".to_owned()));
        assert_eq!(config.filter, DEFAULT_FILTER);
    }
}
