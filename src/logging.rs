//! Tracing subscriber setup for hosts of the reveal engine.
//!
//! Logging stays off unless a filter is configured. Console hosts own stdout,
//! so events go to the configured log file or, failing that, to stderr.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::EnvConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter '{filter}': {source}")]
    Filter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("I/O error while opening log file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Installs the global subscriber described by `config`.
///
/// Returns `Ok(false)` when no filter is configured and nothing was installed.
pub fn init(config: &EnvConfig) -> Result<bool, LoggingError> {
    let Some(filter) = config.log_filter.as_deref() else {
        return Ok(false);
    };

    install(filter, config.log_file.as_deref().map(Path::new))?;
    Ok(true)
}

fn install(filter: &str, log_file: Option<&Path>) -> Result<(), LoggingError> {
    let env_filter = EnvFilter::try_new(filter).map_err(|source| LoggingError::Filter {
        filter: filter.to_string(),
        source,
    })?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true);

    let installed = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(io::stderr).try_init(),
    };

    installed.map_err(|error| LoggingError::Install(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RevealConfig;

    fn env_config(log_filter: Option<&str>, log_file: Option<String>) -> EnvConfig {
        EnvConfig {
            reveal: RevealConfig::default(),
            log_filter: log_filter.map(str::to_string),
            log_file,
            skip_boot: true,
        }
    }

    #[test]
    fn missing_filter_installs_nothing() {
        let installed = init(&env_config(None, None)).expect("no-op init succeeds");
        assert!(!installed);
    }

    #[test]
    fn unopenable_log_file_is_reported_with_its_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing").join("reveal.log");

        let error = install("info", Some(&path)).expect_err("parent directory is missing");
        assert!(matches!(error, LoggingError::Io { path: ref reported, .. } if reported == &path));
    }

    #[test]
    fn file_sink_receives_events_without_ansi() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("reveal.log");
        let config = env_config(Some("info"), Some(path.display().to_string()));

        assert!(init(&config).expect("subscriber installs"));
        tracing::info!(target: "chat_reveal::logging", "file sink ready");

        let written = std::fs::read_to_string(&path).expect("log file exists");
        assert!(written.contains("file sink ready"), "{written}");
        assert!(!written.contains("\x1b["), "{written}");
    }
}
