//! Retry handler for managing retry logic across operations

use std::future::Future;
use tokio::time::{sleep, Duration};

use crate::config::IndexerConfig;
use crate::utils::logging;

/// Exponential backoff: `base * 2^(attempt - 1)`, capped at `max_delay_ms`
#[derive(Debug, Clone)]
pub struct RetryHandler {
    max_retries: u32,
    base_delay_ms: u64,
    max_delay_ms: u64,
}

impl RetryHandler {
    pub fn new() -> Self {
        Self {
            max_retries: 5,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
        }
    }

    pub fn with_config(max_retries: u32, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            max_delay_ms,
        }
    }

    pub fn from_indexer_config(config: &IndexerConfig) -> Self {
        Self::with_config(5, config.retry_base_delay_ms, config.retry_max_delay_ms)
    }

    /// Execute an operation with retry logic and custom error handling
    pub async fn execute_with_retry_and_logging<F, Fut, T, E>(
        &self,
        operation: F,
        operation_name: &str,
        component: &str,
    ) -> Result<T, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut retry_count = 0;

        loop {
            match operation().await {
                Ok(result) => {
                    if retry_count > 0 {
                        logging::log_info(&format!(
                            "[{}] {} succeeded after {} retries",
                            component, operation_name, retry_count
                        ));
                    }
                    return Ok(result);
                }
                Err(e) => {
                    retry_count += 1;

                    if retry_count >= self.max_retries {
                        logging::log_error(&format!(
                            "[{}] {} failed after {} attempts: {}",
                            component, operation_name, self.max_retries, e
                        ));
                        return Err(e);
                    }

                    let delay = self.delay_for(retry_count);
                    logging::log_error(&format!(
                        "[{}] {} failed (attempt {}/{}): {}. Retrying in {}ms",
                        component,
                        operation_name,
                        retry_count,
                        self.max_retries,
                        e,
                        delay.as_millis()
                    ));

                    sleep(delay).await;
                }
            }
        }
    }

    /// Delay before retry `attempt` (1-based); zero when the base delay is zero
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2_u64
            .checked_pow(attempt.saturating_sub(1))
            .unwrap_or(u64::MAX);
        let delay = self
            .base_delay_ms
            .saturating_mul(factor)
            .min(self.max_delay_ms);
        Duration::from_millis(delay)
    }
}

impl Default for RetryHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_delay_doubles_and_caps() {
        let handler = RetryHandler::with_config(5, 500, 3000);
        assert_eq!(handler.delay_for(1), Duration::from_millis(500));
        assert_eq!(handler.delay_for(2), Duration::from_millis(1000));
        assert_eq!(handler.delay_for(3), Duration::from_millis(2000));
        assert_eq!(handler.delay_for(4), Duration::from_millis(3000));
        assert_eq!(handler.delay_for(80), Duration::from_millis(3000));
    }

    #[test]
    fn test_zero_base_disables_waiting() {
        let handler = RetryHandler::with_config(5, 0, 3000);
        assert_eq!(handler.delay_for(10), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_execute_gives_up_after_max_retries() {
        let handler = RetryHandler::with_config(3, 0, 0);
        let calls = AtomicU32::new(0);

        let result: Result<(), String> = handler
            .execute_with_retry_and_logging(
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("down".to_string())
                },
                "probe",
                "test",
            )
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
