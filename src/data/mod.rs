//! Model file acquisition
//!
//! Fetching and caching of the exported regression model.

pub mod source;

pub use source::{ModelFetcher, ModelSource};

use crate::{Result, ScoreError};

/// Retry an operation with exponential backoff
pub fn with_retry<T, F>(mut operation: F, max_attempts: u32) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    let mut last_error = None;
    for attempt in 0..max_attempts {
        match operation() {
            Ok(result) => return Ok(result),
            Err(e) => {
                log::warn!("Attempt {} failed: {}", attempt + 1, e);
                last_error = Some(e);
                if attempt + 1 < max_attempts {
                    std::thread::sleep(backoff_delay(attempt));
                }
            }
        }
    }
    Err(last_error
        .unwrap_or_else(|| ScoreError::Config("max_attempts must be at least 1".to_string())))
}

/// 100ms doubled per attempt, saturating for large attempt counts
pub fn backoff_delay(attempt: u32) -> std::time::Duration {
    std::time::Duration::from_millis(2u64.saturating_pow(attempt).saturating_mul(100))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_succeeds_after_failures() {
        let mut calls = 0;
        let result = with_retry(
            || {
                calls += 1;
                if calls < 2 {
                    Err(ScoreError::Parse("transient".to_string()))
                } else {
                    Ok(calls)
                }
            },
            3,
        );
        assert_eq!(result.unwrap(), 2);
    }

    #[test]
    fn test_retry_returns_last_error() {
        let mut calls = 0;
        let result: Result<()> = with_retry(
            || {
                calls += 1;
                Err(ScoreError::Parse(format!("attempt {}", calls)))
            },
            2,
        );
        assert_eq!(calls, 2);
        assert!(result.unwrap_err().to_string().contains("attempt 2"));
    }

    #[test]
    fn test_backoff_delay() {
        assert_eq!(backoff_delay(0).as_millis(), 100);
        assert_eq!(backoff_delay(3).as_millis(), 800);
        assert_eq!(backoff_delay(63).as_millis(), u64::MAX as u128);
        assert_eq!(backoff_delay(200).as_millis(), u64::MAX as u128);
    }

    #[test]
    fn test_retry_zero_attempts() {
        let result: Result<()> = with_retry(|| Ok(()), 0);
        assert!(matches!(result, Err(ScoreError::Config(_))));
    }
}
