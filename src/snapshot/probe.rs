//! Bounded polling.

use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Outcome of [`poll_until`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    Ready,
    TimedOut,
}

impl Poll {
    pub fn is_ready(self) -> bool {
        self == Self::Ready
    }
}

/// Call `check` every `interval` until it returns `true` or `timeout` passes.
///
/// `check` runs at least once. An error from `check` ends polling early.
pub async fn poll_until<F, Fut>(timeout: Duration, interval: Duration, mut check: F) -> Result<Poll>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if check().await? {
            return Ok(Poll::Ready);
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(Poll::TimedOut);
        }
        sleep(interval.min(deadline - now)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test(start_paused = true)]
    async fn test_ready_after_some_attempts() {
        let calls = Cell::new(0);
        let result = poll_until(Duration::from_secs(5), Duration::from_millis(250), || {
            calls.set(calls.get() + 1);
            let done = calls.get() >= 3;
            async move { Ok(done) }
        })
        .await
        .unwrap();

        assert_eq!(result, Poll::Ready);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out() {
        let calls = Cell::new(0);
        let started = Instant::now();
        let result = poll_until(Duration::from_secs(1), Duration::from_millis(250), || {
            calls.set(calls.get() + 1);
            async { Ok(false) }
        })
        .await
        .unwrap();

        assert_eq!(result, Poll::TimedOut);
        assert!(!result.is_ready());
        assert!(started.elapsed() >= Duration::from_secs(1));
        // t = 0, 250, 500, 750, 1000
        assert_eq!(calls.get(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_checks_once_with_zero_timeout() {
        let calls = Cell::new(0);
        let result = poll_until(Duration::ZERO, Duration::from_millis(250), || {
            calls.set(calls.get() + 1);
            async { Ok(false) }
        })
        .await
        .unwrap();
        assert_eq!(result, Poll::TimedOut);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_error_stops_polling() {
        let result = poll_until(Duration::from_secs(5), Duration::from_millis(10), || async {
            Err::<bool, _>(anyhow::anyhow!("server exited"))
        })
        .await;
        assert!(result.is_err());
    }
}
