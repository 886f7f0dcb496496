//! Error taxonomy for an aggregation run.
//!
//! Every variant aborts the run: there is no per-line recovery and no partial
//! report. Workers hand their first error back to the runner, which drops all
//! partial state and surfaces that single error to the caller.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Longest slice of offending input echoed back in an error message.
const MAX_ECHO: usize = 64;

/// Errors produced while reading, parsing, aggregating or reporting.
#[derive(Debug, Error)]
pub enum Error {
    /// The line has no `;` delimiter, or the station name before it is empty.
    #[error("malformed line {line:?}: {reason}")]
    MalformedLine { line: String, reason: &'static str },

    /// The measurement text does not match `-?digits.digit`.
    #[error("malformed value {value:?}: {reason}")]
    MalformedValue { value: String, reason: &'static str },

    /// A mean was requested from an accumulator that never saw a measurement.
    #[error("mean requested on an empty accumulator")]
    EmptyAccumulator,

    /// The line source failed to produce bytes.
    #[error("failed to read {}", .path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A run was configured with values it cannot honor.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The worker pool could not be started.
    #[error("failed to build worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn malformed_line(line: &[u8], reason: &'static str) -> Self {
        Self::MalformedLine {
            line: echo(line),
            reason,
        }
    }

    pub(crate) fn malformed_value(value: &[u8], reason: &'static str) -> Self {
        Self::MalformedValue {
            value: echo(value),
            reason,
        }
    }

    pub(crate) fn source_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::SourceRead {
            path: path.into(),
            source,
        }
    }

    /// `true` for errors caused by the input text rather than the environment.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::MalformedLine { .. } | Self::MalformedValue { .. })
    }
}

fn echo(bytes: &[u8]) -> String {
    let cut = bytes.len().min(MAX_ECHO);
    let mut s = String::from_utf8_lossy(&bytes[..cut]).into_owned();
    if bytes.len() > MAX_ECHO {
        s.push_str("...");
    }
    s
}
