use std::future::Future;
use std::time::Duration;

use exponential_backoff::Backoff;

use golembase_core::err::{DbError, Error, Result};

/// Bounded exponential backoff for read-only retries (spec §5/§7). Only
/// `Operational` errors are retried — an RPC timeout or connection drop is worth
/// another attempt, but a `Programming`/`Data`/`NotSupported` error will just recur.
/// Writes are never retried: a retried write could double-apply against the store.
#[derive(Debug, Clone)]
pub struct ReadRetry {
    max_retries: u32,
    min: Duration,
    max: Duration,
}

impl ReadRetry {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            min: Duration::from_millis(50),
            max: Duration::from_secs(5),
        }
    }

    pub async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let backoff = Backoff::new(self.max_retries, self.min, Some(self.max));
        let mut tries: u32 = 0;
        loop {
            match attempt().await {
                Ok(v) => return Ok(v),
                Err(err) => {
                    if !is_retryable(&err) {
                        return Err(err);
                    }
                    tries += 1;
                    match backoff.next(tries) {
                        Some(delay) => tokio::time::sleep(delay).await,
                        None => return Err(err),
                    }
                }
            }
        }
    }
}

impl Default for ReadRetry {
    fn default() -> Self {
        Self::new(3)
    }
}

fn is_retryable(err: &Error) -> bool {
    matches!(DbError::downcast(err), Some(DbError::Operational(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn retries_operational_errors_until_success() {
        let retry = ReadRetry::new(5);
        let calls = AtomicU32::new(0);
        let result = retry
            .run(|| async {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(DbError::operational("timed out"))
                } else {
                    Ok(42)
                }
            })
            .await
            .unwrap();
        assert_eq!(result, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_programming_errors() {
        let retry = ReadRetry::new(5);
        let calls = AtomicU32::new(0);
        let err = retry
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(DbError::programming("bad column"))
            })
            .await
            .unwrap_err();
        assert!(matches!(DbError::downcast(&err), Some(DbError::Programming(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let retry = ReadRetry::new(1);
        let calls = AtomicU32::new(0);
        let err = retry
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(DbError::operational("still down"))
            })
            .await
            .unwrap_err();
        assert!(matches!(DbError::downcast(&err), Some(DbError::Operational(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
