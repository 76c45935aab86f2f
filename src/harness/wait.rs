use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{Instant, sleep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(1000),
            interval: Duration::from_millis(50),
        }
    }
}

impl WaitOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WaitError {
    #[error("timed out after {waited:?}: {last_error}")]
    Timeout { waited: Duration, last_error: String },
}

/// Re-run `check` until it succeeds or `options.timeout` has elapsed.
///
/// `check` always runs at least once. On timeout the last error it returned
/// is carried in [`WaitError::Timeout`].
pub async fn wait_for<T, E, F, Fut>(options: WaitOptions, mut check: F) -> Result<T, WaitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let started = Instant::now();
    let deadline = started + options.timeout;
    loop {
        let last_error = match check().await {
            Ok(value) => return Ok(value),
            Err(e) => e.to_string(),
        };
        let now = Instant::now();
        if now >= deadline {
            return Err(WaitError::Timeout {
                waited: now - started,
                last_error,
            });
        }
        sleep(options.interval.min(deadline - now)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_resolves_once_predicate_holds() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let value = wait_for(WaitOptions::default(), || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move { if n >= 2 { Ok(n) } else { Err("not yet") } }
        })
        .await
        .unwrap();
        assert_eq!(value, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_times_out_with_last_error() {
        let options = WaitOptions {
            timeout: Duration::from_millis(60),
            interval: Duration::from_millis(10),
        };
        let err = wait_for(options, || async { Err::<(), _>("still loading") })
            .await
            .unwrap_err();
        let WaitError::Timeout { waited, last_error } = err;
        assert!(waited >= Duration::from_millis(60));
        assert_eq!(last_error, "still loading");
    }
}
