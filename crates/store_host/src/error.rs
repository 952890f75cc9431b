//! Error taxonomy for content-store operations.

use thiserror::Error;

use crate::fs::codec::CodecError;

/// Transport-level failures raised before a store answer is available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request could not be delivered or the response could not be read.
    #[error("network failure: {0}")]
    Network(String),
    /// No answer arrived within the configured bound.
    #[error("request timed out after {0} ms")]
    Timeout(u32),
    /// The active host has no transport.
    #[error("store transport unavailable: {0}")]
    Unsupported(String),
}

/// Failures surfaced by content-store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The credential was rejected.
    #[error("credential rejected")]
    Auth,
    /// The path has no content or entries.
    #[error("not found: /{path}")]
    NotFound {
        /// Store-relative path that was requested.
        path: String,
    },
    /// The write carried a fingerprint that no longer matches the stored version.
    #[error("`/{path}` was changed elsewhere; reopen it to get the latest version")]
    Conflict {
        /// Store-relative path that was written.
        path: String,
    },
    /// The payload did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    /// The store could not be reached.
    #[error("connection error: {0}")]
    Connection(String),
    /// A user-facing action targeted a reserved control file.
    #[error("`{0}` is a protected file")]
    PolicyViolation(String),
    /// A user-selected local file could not be read.
    #[error("could not read `{name}`: {reason}")]
    LocalFile {
        /// File name as picked by the user.
        name: String,
        /// Host-reported failure.
        reason: String,
    },
    /// Any other non-success answer.
    #[error("store rejected the request ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },
}

impl StoreError {
    /// Short title used for user-visible notifications.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Auth => "Wrong password",
            Self::NotFound { .. } => "Not found",
            Self::Conflict { .. } => "Save failed",
            Self::MalformedResponse(_) => "Unexpected response",
            Self::Connection(_) => "Connection error",
            Self::PolicyViolation(_) => "Not allowed",
            Self::LocalFile { .. } => "Upload failed",
            Self::Rejected { .. } => "Request failed",
        }
    }
}

impl From<TransportError> for StoreError {
    fn from(err: TransportError) -> Self {
        Self::Connection(err.to_string())
    }
}

impl From<CodecError> for StoreError {
    fn from(err: CodecError) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}
