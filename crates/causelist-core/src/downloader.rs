//! Single-stream HTTP GET of a cause list PDF with bounded retry.
//!
//! The body is buffered in memory and written only after a 2xx status, so a
//! failed attempt never touches the destination.

use crate::checksum;
use crate::events::{Event, EventSink};
use crate::retry::{run_with_retry, FetchError, Retried, RetryPolicy};
use crate::storage;
use std::path::Path;
use std::time::Duration;

/// Per-attempt network limits.
#[derive(Debug, Clone, Copy)]
pub struct HttpOptions {
    /// Whole-transfer timeout for one attempt.
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            connect_timeout: Duration::from_secs(20),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Downloader {
    pub policy: RetryPolicy,
    pub http: HttpOptions,
}

impl Downloader {
    pub fn new(policy: RetryPolicy, http: HttpOptions) -> Self {
        Self { policy, http }
    }

    /// Fetches `url` into `dest`. Returns `true` once the body is stored,
    /// `false` after every attempt failed (nothing is written then).
    pub fn download(&self, url: &str, dest: &Path, sink: &dyn EventSink) -> bool {
        let outcome = run_with_retry(
            &self.policy,
            || {
                let body = fetch_body(url, &self.http)?;
                storage::write_atomic(dest, &body).map_err(FetchError::Storage)?;
                Ok(body)
            },
            |attempt, err, wait| {
                sink.record(&Event::AttemptFailed {
                    url: url.to_string(),
                    attempt,
                    max_attempts: self.policy.attempts(),
                    error: err.to_string(),
                    retry_in: wait,
                })
            },
        );

        match outcome {
            Retried::Done { value, attempt } => {
                sink.record(&Event::Downloaded {
                    url: url.to_string(),
                    path: dest.to_path_buf(),
                    bytes: value.len() as u64,
                    sha256: checksum::sha256_bytes(&value),
                    attempt,
                });
                true
            }
            Retried::Exhausted { attempts, last } => {
                sink.record(&Event::GaveUp {
                    url: url.to_string(),
                    attempts,
                    error: last.to_string(),
                });
                false
            }
        }
    }
}

/// One GET. Follows redirects; any non-2xx status is an error.
fn fetch_body(url: &str, http: &HttpOptions) -> Result<Vec<u8>, FetchError> {
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(http.connect_timeout)?;
    easy.timeout(http.timeout)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }
    Ok(body)
}
