//! Blocking HTTP GET used for both index pages and image bodies.
//!
//! Uses the curl crate (libcurl). Calls block the current thread; call from
//! `spawn_blocking` when used from async code.

mod easy;
mod error;

use std::io::Write;
use url::Url;

pub use easy::CurlFetcher;
pub use error::{classify_curl_error, ErrorKind, FetchError};

/// A fully buffered response body plus the URL it was finally served from.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub body: Vec<u8>,
    /// Effective URL after redirects; relative links resolve against this.
    pub url: Url,
}

/// Performs GET requests. No retries: a failed call is reported once.
pub trait Fetcher: Send + Sync {
    /// Streams the body of `url` into `sink` and returns the effective URL.
    /// Nothing is written to `sink` for non-2xx responses the server rejects outright.
    fn fetch_into(&self, url: &Url, sink: &mut dyn Write) -> Result<Url, FetchError>;

    /// Buffers the whole body in memory (index documents are small).
    fn fetch(&self, url: &Url) -> Result<Fetched, FetchError> {
        let mut body = Vec::new();
        let url = self.fetch_into(url, &mut body)?;
        Ok(Fetched { body, url })
    }
}
