use crate::api_client::{ApiError, PriceSeriesProvider};
use crate::models::PriceSeries;
use chrono::NaiveDate;
use std::time::Duration;
use tokio::time;
use tracing::{info, warn};

/// Timeout and retry budget for one price fetch
#[derive(Debug, Clone, Copy)]
pub struct FetchPolicy {
    pub timeout: Duration,
    /// Extra attempts after the first one
    pub retries: u32,
    /// Delay before retry n is `backoff * n`
    pub backoff: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            retries: 2,
            backoff: Duration::from_millis(500),
        }
    }
}

pub async fn fetch_with_retry<P: PriceSeriesProvider>(
    provider: &P,
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
    policy: &FetchPolicy,
) -> Result<PriceSeries, ApiError> {
    let mut attempt = 0;

    loop {
        attempt += 1;

        let outcome = match time::timeout(policy.timeout, provider.fetch_prices(ticker, start, end)).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout {
                millis: policy.timeout.as_millis() as u64,
            }),
        };

        match outcome {
            Ok(series) => {
                info!("Fetched {} daily closes for {} (attempt {})", series.len(), ticker, attempt);
                return Ok(series);
            }
            Err(e) if e.is_transient() && attempt <= policy.retries => {
                warn!("Price fetch for {} failed (attempt {}): {}, retrying", ticker, attempt, e);
                time::sleep(policy.backoff * attempt).await;
            }
            Err(e) => {
                warn!("Price fetch for {} failed after {} attempt(s): {}", ticker, attempt, e);
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::test_support::series_from_closes;
    use std::future::Future;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Provider that replays scripted outcomes, then serves `fallback`
    pub struct ScriptedProvider {
        pub calls: AtomicU32,
        pub script: Mutex<Vec<Result<PriceSeries, ApiError>>>,
        pub delay: Duration,
        pub fallback: Vec<f64>,
    }

    impl ScriptedProvider {
        pub fn new(script: Vec<Result<PriceSeries, ApiError>>) -> Self {
            Self {
                calls: AtomicU32::new(0),
                script: Mutex::new(script),
                delay: Duration::ZERO,
                fallback: vec![100.0, 101.0, 102.0],
            }
        }

        pub fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PriceSeriesProvider for ScriptedProvider {
        fn fetch_prices(
            &self,
            _ticker: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> impl Future<Output = Result<PriceSeries, ApiError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = {
                let mut script = self.script.lock().unwrap();
                if script.is_empty() {
                    None
                } else {
                    Some(script.remove(0))
                }
            };
            let delay = self.delay;
            let fallback = series_from_closes(&self.fallback);

            async move {
                if !delay.is_zero() {
                    time::sleep(delay).await;
                }
                next.unwrap_or(Ok(fallback))
            }
        }
    }

    fn fast_policy(retries: u32) -> FetchPolicy {
        FetchPolicy {
            timeout: Duration::from_millis(200),
            retries,
            backoff: Duration::ZERO,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[tokio::test]
    async fn test_retries_transient_failures() {
        let provider = ScriptedProvider::new(vec![
            Err(ApiError::RequestFailed("connection reset".into())),
            Err(ApiError::Status { status: 502 }),
        ]);

        let series = fetch_with_retry(&provider, "AAPL", day(1), day(20), &fast_policy(2))
            .await
            .unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_retry_budget() {
        let provider = ScriptedProvider::new(vec![
            Err(ApiError::RequestFailed("a".into())),
            Err(ApiError::RequestFailed("b".into())),
        ]);

        let err = fetch_with_retry(&provider, "AAPL", day(1), day(20), &fast_policy(1))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::RequestFailed(ref m) if m == "b"));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_no_data_is_not_retried() {
        let provider = ScriptedProvider::new(vec![Err(ApiError::NoData { ticker: "NOPE".into() })]);

        let err = fetch_with_retry(&provider, "NOPE", day(1), day(20), &fast_policy(3))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::NoData { .. }));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let mut provider = ScriptedProvider::new(vec![]);
        provider.delay = Duration::from_secs(5);

        let policy = FetchPolicy {
            timeout: Duration::from_millis(20),
            retries: 1,
            backoff: Duration::ZERO,
        };
        let err = fetch_with_retry(&provider, "SLOW", day(1), day(20), &policy)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Timeout { millis: 20 }));
        assert!(err.to_string().contains("20ms"));
        assert_eq!(provider.calls(), 2);
    }
}
