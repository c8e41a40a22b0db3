//! Linear backoff for transient HTTP statuses.
//!
//! [`retry_with_backoff`] re-runs a request while it fails with a status in
//! [`TRANSIENT_STATUSES`](super::error::TRANSIENT_STATUSES) and the retry budget
//! is not spent. The pause before retry `n` (zero-based) is `backoff × (n + 1)`,
//! with no jitter. Transport and decode failures are returned immediately.

use super::error::FetchError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retry budget and backoff unit for one page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self { max_retries, backoff }
    }

    /// Pause before the retry that follows `retries` earlier retries.
    pub fn delay_for(&self, retries: u32) -> Duration {
        self.backoff.saturating_mul(retries.saturating_add(1))
    }
}

/// Runs `operation`, sleeping through `sleep` between attempts.
///
/// `sleep` is a parameter so callers decide how time passes; the client passes
/// `tokio::time::sleep`.
pub async fn retry_with_backoff<T, Op, OpFut, Sleep, SleepFut>(
    policy: RetryPolicy,
    mut operation: Op,
    mut sleep: Sleep,
) -> Result<T, FetchError>
where
    Op: FnMut() -> OpFut,
    OpFut: Future<Output = Result<T, FetchError>>,
    Sleep: FnMut(Duration) -> SleepFut,
    SleepFut: Future<Output = ()>,
{
    let mut retries = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && retries < policy.max_retries => {
                let wait = policy.delay_for(retries);
                warn!(
                    status = err.status(),
                    retry = retries + 1,
                    max_retries = policy.max_retries,
                    wait_ms = wait.as_millis() as u64,
                    "Transient error, backing off"
                );
                sleep(wait).await;
                retries += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    fn status(code: u16) -> FetchError {
        FetchError::Status { status: code, body: format!("status {}", code) }
    }

    /// Replays scripted outcomes and records every requested pause.
    struct Script {
        outcomes: RefCell<VecDeque<Result<&'static str, FetchError>>>,
        calls: RefCell<u32>,
        sleeps: RefCell<Vec<Duration>>,
    }

    impl Script {
        fn new(outcomes: Vec<Result<&'static str, FetchError>>) -> Self {
            Self {
                outcomes: RefCell::new(outcomes.into()),
                calls: RefCell::new(0),
                sleeps: RefCell::new(Vec::new()),
            }
        }

        fn run(&self, policy: RetryPolicy) -> Result<&'static str, FetchError> {
            tokio_test::block_on(retry_with_backoff(
                policy,
                || {
                    *self.calls.borrow_mut() += 1;
                    let next = self.outcomes.borrow_mut().pop_front().unwrap_or(Ok("exhausted"));
                    async move { next }
                },
                |wait| {
                    self.sleeps.borrow_mut().push(wait);
                    async {}
                },
            ))
        }
    }

    fn policy() -> RetryPolicy {
        RetryPolicy::new(5, Duration::from_millis(1500))
    }

    #[test]
    fn test_delay_is_linear() {
        let p = policy();
        assert_eq!(p.delay_for(0), Duration::from_millis(1500));
        assert_eq!(p.delay_for(1), Duration::from_millis(3000));
        assert_eq!(p.delay_for(4), Duration::from_millis(7500));
    }

    #[test]
    fn test_success_first_try() {
        let script = Script::new(vec![Ok("page")]);
        assert_eq!(script.run(policy()).unwrap(), "page");
        assert_eq!(*script.calls.borrow(), 1);
        assert!(script.sleeps.borrow().is_empty());
    }

    #[test]
    fn test_two_503_then_success() {
        let script = Script::new(vec![Err(status(503)), Err(status(503)), Ok("page")]);
        assert_eq!(script.run(policy()).unwrap(), "page");
        assert_eq!(*script.calls.borrow(), 3);
        assert_eq!(
            *script.sleeps.borrow(),
            vec![Duration::from_millis(1500), Duration::from_millis(3000)]
        );
    }

    #[test]
    fn test_every_transient_status_is_retried() {
        let script = Script::new(vec![
            Err(status(429)),
            Err(status(500)),
            Err(status(502)),
            Err(status(504)),
            Ok("page"),
        ]);
        assert!(script.run(policy()).is_ok());
        assert_eq!(script.sleeps.borrow().len(), 4);
    }

    #[test]
    fn test_permanent_status_fails_without_sleep() {
        let script = Script::new(vec![Err(status(404)), Ok("unreachable")]);
        let err = script.run(policy()).unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(*script.calls.borrow(), 1);
        assert!(script.sleeps.borrow().is_empty());
    }

    #[test]
    fn test_retries_exhausted() {
        let outcomes = (0..7).map(|_| Err(status(502))).collect();
        let script = Script::new(outcomes);
        let err = script.run(policy()).unwrap_err();
        assert_eq!(err.status(), Some(502));
        // One initial attempt plus five retries
        assert_eq!(*script.calls.borrow(), 6);
        assert_eq!(script.sleeps.borrow().len(), 5);
        assert_eq!(script.sleeps.borrow()[4], Duration::from_millis(7500));
    }

    #[test]
    fn test_zero_retry_budget() {
        let script = Script::new(vec![Err(status(503)), Ok("unreachable")]);
        let err = script.run(RetryPolicy::new(0, Duration::from_secs(1))).unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert!(script.sleeps.borrow().is_empty());
    }
}
