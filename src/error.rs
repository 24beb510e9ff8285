//! Error types for the sub-merge crate.

use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Fatal, run-level errors.
///
/// Everything that goes wrong for a single source is reported as a
/// [`FetchError`] or [`DecodeError`] inside that source's report instead.
#[derive(Debug, Error)]
pub enum Error {
    /// The source list could not be read. Raised before any network activity.
    #[error("cannot read source list {}: {source}", path.display())]
    SourceListUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Every source was attempted and none contributed a recognized entry.
    #[error("no configurations found across {sources} sources")]
    EmptyAggregate { sources: usize },

    /// Refused to write an output file with no entries.
    #[error("nothing to write to {}: no configurations collected", path.display())]
    EmptyOutput { path: PathBuf },

    /// The output file could not be written.
    #[error("cannot write output {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The HTTP client could not be built, e.g. because of a bad proxy URL.
    #[error("cannot build http client: {0}")]
    Client(#[from] reqwest::Error),

    /// The run was cancelled before it finished.
    #[error("run cancelled")]
    Cancelled,
}

/// Result alias for run-level operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure fetching one source.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    #[error("http status {0}")]
    Status(reqwest::StatusCode),

    #[error("cannot read body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Failure decoding a body that was classified as base64.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded content is not utf-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}
