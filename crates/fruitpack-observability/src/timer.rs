//! Request latency timing.

use std::time::{Duration, Instant};

/// Times one outbound request and logs the outcome.
#[derive(Debug)]
pub struct RequestTimer {
    method: &'static str,
    path: String,
    attempt: u32,
    start: Instant,
}

impl RequestTimer {
    /// Start timing a request.
    pub fn start(method: &'static str, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            attempt: 0,
            start: Instant::now(),
        }
    }

    /// Mark this as a retry attempt.
    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = attempt;
        self
    }

    /// Time since the request started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Log a completed request with its status code.
    pub fn finish(self, status: u16) -> Duration {
        let elapsed = self.elapsed();
        tracing::debug!(
            method = self.method,
            path = %self.path,
            attempt = self.attempt,
            status,
            elapsed_ms = elapsed.as_millis() as u64,
            "request completed"
        );
        elapsed
    }

    /// Log a request that failed before a response arrived.
    pub fn fail(self, error: &dyn std::error::Error) -> Duration {
        let elapsed = self.elapsed();
        tracing::debug!(
            method = self.method,
            path = %self.path,
            attempt = self.attempt,
            error = %error,
            elapsed_ms = elapsed.as_millis() as u64,
            "request failed"
        );
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_measures() {
        let timer = RequestTimer::start("GET", "/products/").with_attempt(1);
        std::thread::sleep(Duration::from_millis(5));
        assert!(timer.finish(200) >= Duration::from_millis(5));
    }
}
