//! Fetch error type and its classification for log fields.

use std::io;

/// Error returned by a single GET (curl failure, HTTP status, or sink write failure).
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The URL was rejected before any request was made.
    #[error("invalid URL {0}")]
    InvalidUrl(String),
    /// Curl reported an error (timeout, connection, DNS, TLS, etc.).
    #[error("{0}")]
    Transport(#[from] curl::Error),
    /// The server answered with a non-2xx status.
    #[error("GET {url} returned HTTP {code}")]
    Status { url: String, code: u32 },
    /// Writing the body into the caller's sink failed (e.g. disk full).
    #[error("storage: {0}")]
    Sink(#[source] io::Error),
}

/// Coarse classification of a fetch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connect or transfer timed out.
    Timeout,
    /// Network-level failure (connection reset, DNS, etc.).
    Connection,
    /// Non-2xx HTTP status.
    Http(u16),
    /// The local sink failed; not a network problem.
    Storage,
    Other,
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::InvalidUrl(_) => ErrorKind::Other,
            FetchError::Transport(e) => classify_curl_error(e),
            FetchError::Status { code, .. } => ErrorKind::Http(*code as u16),
            FetchError::Sink(_) => ErrorKind::Storage,
        }
    }

    /// True for the network class (connection, timeout, non-2xx); false for local sink failures.
    pub fn is_network(&self) -> bool {
        !matches!(self, FetchError::Sink(_))
    }
}

/// Classify a curl error.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_ssl_connect_error()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}
