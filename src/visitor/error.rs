use std::env;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use nix::errno::Errno;

#[derive(Error, Debug)]
pub enum VisitorLogError {
    #[error("Visitor name must not be empty.")]
    EmptyName,
    #[error("Duplicate consecutive visitor not allowed.")]
    DuplicateConsecutiveVisitor {
        name: String,
    },
    #[error("Must wait 5 minutes between different visitors.")]
    TooEarly {
        elapsed: time::Duration,
        required: time::Duration,
    },
    #[error("malformed visitor record: {line:?}")]
    Format {
        line: String,
    },
    #[error("invalid timestamp in visitor record {line:?}: {source}")]
    Timestamp {
        #[source]
        source: time::error::Parse,
        line: String,
    },
    #[error("visitor store {}: {source}", path.display())]
    Io {
        #[source]
        source: io::Error,
        path: PathBuf,
    },
    #[error("locking visitor store {}: {source}", path.display())]
    Lock {
        #[source]
        source: Errno,
        path: PathBuf,
    },
    #[error("clock: {source:#}")]
    Clock {
        #[source]
        source: anyhow::Error,
    },
    #[error("environment variable {var}: {source}")]
    Config {
        #[source]
        source: env::VarError,
        var: String,
    },
    #[error("invalid log level {0:?}")]
    LogLevel(String),
    #[error("setting up logger: {source}")]
    Logger {
        #[source]
        source: log::SetLoggerError,
    },
    #[error("terminal: {source}")]
    Terminal {
        #[source]
        source: io::Error,
    },
}

impl VisitorLogError {
    /// True when the submission was refused by a visitor rule rather than
    /// failing on I/O, format or environment problems.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            VisitorLogError::EmptyName
                | VisitorLogError::DuplicateConsecutiveVisitor { .. }
                | VisitorLogError::TooEarly { .. }
        )
    }

    pub(crate) fn io(source: io::Error, path: impl Into<PathBuf>) -> Self {
        VisitorLogError::Io { source, path: path.into() }
    }
}
