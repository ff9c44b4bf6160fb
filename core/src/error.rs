//! Error types for the Common Sense API client.
//!
//! # Design
//! Only failures that prevent a JSON envelope from reaching the caller are
//! errors. A 401 or 404 from the service arrives as a decoded `Envelope`
//! carrying that `statusCode`, never as an `Error`. Callers who want to
//! treat those as failures must check `Envelope::is_success` themselves.

/// Boxed error produced by a `Transport` implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by `CommonSenseClient` operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `request` was called with an empty resource path.
    #[error("request path must not be empty")]
    EmptyPath,

    /// The request never produced a response body: DNS, connection reset,
    /// TLS, or a failed body read.
    #[error("transport failure for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    /// The response body is not JSON.
    #[error("response body is not JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// The blocking transport task panicked or was cancelled.
    #[error("request task did not complete: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// An async entry point was polled outside a tokio runtime.
    #[error("async requests need a tokio runtime; use request_blocking instead")]
    NoRuntime,
}

impl Error {
    /// True only for failures on the network path (DNS, connection, stream).
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
