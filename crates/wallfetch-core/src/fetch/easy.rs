//! libcurl-backed fetcher (one Easy handle per request).

use std::io::Write;
use url::Url;

use super::{FetchError, Fetcher};
use crate::config::FetchConfig;

/// Production fetcher. Cheap to share: every call builds its own curl handle.
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    cfg: FetchConfig,
}

impl CurlFetcher {
    pub fn new(cfg: FetchConfig) -> Self {
        Self { cfg }
    }

    fn easy_for(&self, url: &Url) -> Result<curl::easy::Easy, FetchError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str())
            .map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        // >= 400 fails the transfer before any body reaches the sink.
        easy.fail_on_error(true)?;
        easy.connect_timeout(self.cfg.connect_timeout())?;
        easy.timeout(self.cfg.timeout())?;
        easy.useragent(&self.cfg.user_agent)?;
        if self.cfg.compression {
            // Empty string: let libcurl advertise every encoding it was built with.
            easy.accept_encoding("")?;
        }
        Ok(easy)
    }
}

impl Fetcher for CurlFetcher {
    fn fetch_into(&self, url: &Url, sink: &mut dyn Write) -> Result<Url, FetchError> {
        let mut easy = self.easy_for(url)?;
        let mut sink_error: Option<std::io::Error> = None;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match sink.write_all(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    sink_error = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = sink_error {
            return Err(FetchError::Sink(e));
        }

        let code = easy.response_code()?;
        match performed {
            Err(e) if e.is_http_returned_error() => {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    code,
                });
            }
            Err(e) => return Err(FetchError::Transport(e)),
            Ok(()) => {}
        }
        if !(200..300).contains(&code) {
            return Err(FetchError::Status {
                url: url.to_string(),
                code,
            });
        }
        sink.flush().map_err(FetchError::Sink)?;

        let resolved = easy
            .effective_url()?
            .and_then(|s| Url::parse(s).ok())
            .unwrap_or_else(|| url.clone());
        tracing::trace!(url = %url, resolved = %resolved, code, "GET ok");
        Ok(resolved)
    }
}
