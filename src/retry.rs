use crate::error::StoreError;
use std::future::Future;
use std::time::Duration;

/// Backoff schedule for transient store failures.
///
/// The default matches the deployed behavior: up to 3 attempts with delays of
/// 1s and 2s between them (the 4s slot is only slept when the attempt cap is
/// raised). Schema mismatches and permanent failures are never retried.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub delays: Vec<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delays: vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4),
            ],
        }
    }
}

impl RetryPolicy {
    /// Delay slept after the given 1-based attempt fails, or `None` when the
    /// attempt is the last one (no delay after the final attempt).
    pub fn delay_after(&self, attempt: usize) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        self.delays.get(attempt - 1).copied()
    }

    /// Execute a store operation under this policy.
    ///
    /// The closure is invoked once per attempt. Transient failures are
    /// retried with the scheduled delay until the attempt cap is reached,
    /// then demoted to a permanent "max retries exceeded" failure. Schema
    /// mismatches and permanent failures abort immediately so the caller can
    /// react (the writer falls back to base columns on the former).
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        for attempt in 1..=self.max_attempts {
            match op().await {
                Ok(value) => return Ok(value),
                Err(StoreError::Transient(detail)) => {
                    if let Some(delay) = self.delay_after(attempt) {
                        tracing::warn!(
                            label,
                            attempt,
                            delay_secs = delay.as_secs_f64(),
                            detail = %truncate(&detail, 120),
                            "transient store failure, retrying"
                        );
                        tokio::time::sleep(delay).await;
                    } else {
                        return Err(StoreError::Permanent(format!(
                            "max retries exceeded after {} attempts: {}",
                            self.max_attempts, detail
                        )));
                    }
                }
                Err(other) => return Err(other),
            }
        }
        // Unreachable with max_attempts >= 1; kept for a zero-attempt policy.
        Err(StoreError::Permanent("max retries exceeded".to_string()))
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
