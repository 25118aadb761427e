//! In-memory `Fetcher` for unit tests.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

use crate::fetch::{FetchError, Fetcher};

enum Route {
    Body(Vec<u8>),
    /// Body served after a redirect: `fetch_into` reports `effective` as the final URL.
    Redirected { effective: Url, body: Vec<u8> },
    Status(u32),
}

/// Serves canned bodies keyed by full URL and counts every call.
#[derive(Default)]
pub(crate) struct FakeFetcher {
    routes: Mutex<HashMap<String, Route>>,
    calls: Mutex<HashMap<String, usize>>,
    delay: Option<Duration>,
}

impl FakeFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps for `delay` before answering (widens race windows).
    pub(crate) fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub(crate) fn body(&self, url: &str, body: impl Into<Vec<u8>>) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Route::Body(body.into()));
    }

    /// `url` answers with `body` but reports `effective` as the final URL.
    pub(crate) fn redirected(&self, url: &str, effective: &str, body: impl Into<Vec<u8>>) {
        let effective = Url::parse(effective).unwrap();
        self.routes.lock().unwrap().insert(
            url.to_string(),
            Route::Redirected {
                effective,
                body: body.into(),
            },
        );
    }

    pub(crate) fn status(&self, url: &str, code: u32) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Route::Status(code));
    }

    pub(crate) fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    /// Calls whose URL contains `needle`.
    pub(crate) fn calls_matching(&self, needle: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(url, _)| url.contains(needle))
            .map(|(_, n)| n)
            .sum()
    }
}

impl Fetcher for FakeFetcher {
    fn fetch_into(&self, url: &Url, sink: &mut dyn Write) -> Result<Url, FetchError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default() += 1;
        if let Some(d) = self.delay {
            std::thread::sleep(d);
        }
        let routes = self.routes.lock().unwrap();
        match routes.get(url.as_str()) {
            Some(Route::Body(body)) => {
                sink.write_all(body).map_err(FetchError::Sink)?;
                Ok(url.clone())
            }
            Some(Route::Redirected { effective, body }) => {
                sink.write_all(body).map_err(FetchError::Sink)?;
                Ok(effective.clone())
            }
            Some(Route::Status(code)) => Err(FetchError::Status {
                url: url.to_string(),
                code: *code,
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                code: 404,
            }),
        }
    }
}
