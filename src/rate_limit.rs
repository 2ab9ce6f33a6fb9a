// Request pacing and retry with exponential backoff for upstream APIs.
//
// Each upstream gets its own `RateLimiter`, a minimum gap between
// consecutive calls. `with_retry` wraps a single call and re-issues it on
// throttling, gateway errors and transport failures, sleeping
// `backoff^attempt` seconds in between.
//
// Limiters are shared across concurrent enrichment tasks through `&self`,
// so state lives behind a Mutex and the lock is never held across an await.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::ApiError;

/// Minimum-delay limiter.
pub struct RateLimiter {
    /// Minimum delay between consecutive requests.
    min_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl RateLimiter {
    pub fn pacing(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_request: Mutex::new(None),
        }
    }

    /// Wait until a request may be issued, then record it.
    ///
    /// The slot is claimed before sleeping, so concurrent callers queue up
    /// one gap apart instead of all waking at once.
    pub async fn acquire(&self) {
        let wait = {
            let now = Instant::now();
            let mut last = lock(&self.last_request);
            let slot = match *last {
                Some(prev) => (prev + self.min_delay).max(now),
                None => now,
            };
            *last = Some(slot);
            slot.saturating_duration_since(now)
        };

        if !wait.is_zero() {
            debug!(delay_ms = wait.as_millis() as u64, "Rate limit: waiting");
            tokio::time::sleep(wait).await;
        }
    }
}

/// Parse a pause given in seconds on the command line. Zero and negative
/// values mean no pause; values too large for a `Duration` are rejected.
pub fn parse_pause(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("`{raw}` is not a number of seconds"))?;
    if secs.is_nan() {
        return Err(format!("`{raw}` is not a number of seconds"));
    }
    if secs <= 0.0 {
        return Ok(Duration::ZERO);
    }
    Duration::try_from_secs_f64(secs).map_err(|_| format!("`{raw}` seconds is out of range"))
}

/// How often and how patiently to retry a call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Zero behaves like one.
    pub attempts: u32,
    /// Backoff base in seconds; the wait after attempt `n` is `base^n`.
    pub backoff: f64,
}

impl RetryPolicy {
    pub fn new(attempts: u32, backoff: f64) -> Self {
        Self { attempts, backoff }
    }

    /// Sleep duration after the given (1-based) failed attempt, capped at 5 minutes.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let secs = self.backoff.max(0.0).powi(attempt as i32);
        if secs.is_finite() {
            Duration::from_secs_f64(secs.min(300.0))
        } else {
            Duration::from_secs(300)
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, 1.5)
    }
}

/// Run `operation`, retrying retryable `ApiError`s per `policy`.
///
/// The limiter is acquired before every attempt so retries stay paced.
pub async fn with_retry<F, Fut, T>(
    limiter: &RateLimiter,
    policy: RetryPolicy,
    operation: F,
) -> Result<T, ApiError>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, ApiError>>,
{
    let max_attempts = policy.attempts.max(1);
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        limiter.acquire().await;

        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_retryable() || attempt >= max_attempts {
                    return Err(err);
                }

                let delay = policy.delay_after(attempt);
                warn!(
                    attempt,
                    max_attempts,
                    backoff_secs = delay.as_secs_f64(),
                    error = %err,
                    "Retrying after {:.1}s",
                    delay.as_secs_f64(),
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn status(code: u16) -> ApiError {
        ApiError::status("test", code, "")
    }

    // ── RateLimiter ─────────────────────────────────────────────────

    #[tokio::test]
    async fn first_request_is_immediate() {
        let limiter = RateLimiter::pacing(Duration::from_millis(100));
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn min_delay_enforced_between_requests() {
        let limiter = RateLimiter::pacing(Duration::from_millis(50));
        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;
        assert!(
            start.elapsed() >= Duration::from_millis(90),
            "expected ~100ms, got {:?}",
            start.elapsed()
        );
    }

    #[tokio::test]
    async fn zero_delay_is_rapid_fire() {
        let limiter = RateLimiter::pacing(Duration::ZERO);
        let start = Instant::now();
        for _ in 0..50 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn concurrent_tasks_are_spaced_out() {
        let limiter = Arc::new(RateLimiter::pacing(Duration::from_millis(30)));
        let start = Instant::now();
        let mut handles = Vec::new();
        for _ in 0..4 {
            let lim = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move { lim.acquire().await }));
        }
        for h in handles {
            h.await.unwrap();
        }
        // Three gaps after the first immediate slot.
        assert!(start.elapsed() >= Duration::from_millis(85));
    }

    #[test]
    fn pauses_parse_from_seconds() {
        assert_eq!(parse_pause("0.7"), Ok(Duration::from_millis(700)));
        assert_eq!(parse_pause("-1"), Ok(Duration::ZERO));
        assert_eq!(parse_pause("0"), Ok(Duration::ZERO));
        assert!(parse_pause("1e20").is_err());
        assert!(parse_pause("inf").is_err());
        assert!(parse_pause("NaN").is_err());
        assert!(parse_pause("soon").is_err());
    }

    // ── RetryPolicy ─────────────────────────────────────────────────

    #[test]
    fn backoff_is_exponential_in_attempt() {
        let policy = RetryPolicy::new(5, 2.0);
        assert_eq!(policy.delay_after(1), Duration::from_secs(2));
        assert_eq!(policy.delay_after(3), Duration::from_secs(8));
    }

    #[test]
    fn backoff_is_capped() {
        let policy = RetryPolicy::new(50, 10.0);
        assert_eq!(policy.delay_after(20), Duration::from_secs(300));
    }

    // ── with_retry ──────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn succeeds_without_retry() {
        let limiter = RateLimiter::pacing(Duration::ZERO);
        let calls = AtomicU32::new(0);
        let result = with_retry(&limiter, RetryPolicy::default(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, ApiError>(42) }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_throttling_then_succeeds() {
        let limiter = RateLimiter::pacing(Duration::ZERO);
        let calls = AtomicU32::new(0);
        let result = with_retry(&limiter, RetryPolicy::new(5, 1.5), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(status(429))
                } else {
                    Ok("ok")
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn client_errors_are_not_retried() {
        let limiter = RateLimiter::pacing(Duration::ZERO);
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&limiter, RetryPolicy::new(5, 1.5), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(status(401)) }
        })
        .await;
        assert!(matches!(result, Err(ApiError::Status { status: 401, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn attempts_is_a_total_budget() {
        let limiter = RateLimiter::pacing(Duration::ZERO);
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&limiter, RetryPolicy::new(3, 1.5), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(status(503)) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_still_tries_once() {
        let limiter = RateLimiter::pacing(Duration::ZERO);
        let calls = AtomicU32::new(0);
        let _: Result<(), _> = with_retry(&limiter, RetryPolicy::new(0, 1.5), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(status(500)) }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
