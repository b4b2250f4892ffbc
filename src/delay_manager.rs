use std::thread;
use std::time::Duration;
use log::{debug, warn};

use crate::error::{Result, ScrapeError};

pub fn page_delay(delay: Duration) {
    if delay.is_zero() {
        return;
    }
    debug!("Waiting {} ms before the next page...", delay.as_millis());
    thread::sleep(delay);
}

pub fn retry_delay(delay: Duration) {
    if delay.is_zero() {
        return;
    }
    debug!("Waiting {} ms before retrying...", delay.as_millis());
    thread::sleep(delay);
}

/// Runs `op` up to `max_attempts` times with a fixed pause between attempts.
///
/// Only errors for which [`ScrapeError::is_retryable`] holds are retried; any
/// other error is returned as-is on first sight. When every attempt fails the
/// last error is wrapped in [`ScrapeError::RetriesExhausted`].
pub fn retry<T, F>(max_attempts: u32, delay: Duration, mut op: F) -> Result<T>
where
    F: FnMut(u32) -> Result<T>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) if attempt >= max_attempts => {
                return Err(ScrapeError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(e),
                });
            }
            Err(e) => {
                warn!("{}, retrying... ({}/{})", e, attempt, max_attempts);
                retry_delay(delay);
                attempt += 1;
            }
        }
    }
}
