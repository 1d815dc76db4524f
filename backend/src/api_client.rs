use crate::models::{PricePoint, PriceSeries};
use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::Deserialize;
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Upstream returned HTTP {status}")]
    Status { status: u16 },
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("no price data for {ticker}")]
    NoData { ticker: String },
    #[error("price request timed out after {millis}ms")]
    Timeout { millis: u64 },
}

impl ApiError {
    /// Network-level failures are worth another attempt, bad symbols and bad payloads are not
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::RequestFailed(_) | ApiError::Timeout { .. } => true,
            ApiError::Status { status } => *status >= 500 || *status == 429,
            ApiError::ParseError(_) | ApiError::NoData { .. } => false,
        }
    }
}

/// Source of daily close prices
/// `end` is exclusive, matching how the date picker range is interpreted
pub trait PriceSeriesProvider: Send + Sync {
    fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = Result<PriceSeries, ApiError>> + Send;
}

#[derive(Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Deserialize)]
struct YahooResult {
    meta: YahooMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Deserialize)]
struct YahooMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Deserialize)]
struct YahooQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

pub struct YahooClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn chart_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> String {
        let period = |date: NaiveDate| date.and_time(NaiveTime::MIN).and_utc().timestamp();
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=history",
            self.base_url,
            ticker,
            period(start),
            period(end)
        )
    }
}

impl PriceSeriesProvider for YahooClient {
    fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = Result<PriceSeries, ApiError>> + Send {
        let url = self.chart_url(ticker, start, end);
        let ticker = ticker.to_string();

        async move {
            // Unresolved company names and anything path-like never reach the URL
            if !is_ticker(&ticker) {
                return Err(ApiError::NoData { ticker });
            }

            tracing::debug!("Requesting {}", url);

            let response = self
                .client
                .get(&url)
                .header("User-Agent", "stock-indicator-backend/0.1")
                .send()
                .await
                .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

            let status = response.status();
            // Yahoo answers unknown symbols with 404 and a JSON error body
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(ApiError::NoData { ticker });
            }
            if !status.is_success() {
                return Err(ApiError::Status { status: status.as_u16() });
            }

            let body = response
                .text()
                .await
                .map_err(|e| ApiError::ParseError(format!("Failed to get response text: {}", e)))?;

            let points = parse_chart_response(&body, &ticker)?;
            let points: Vec<PricePoint> = points
                .into_iter()
                .filter(|p| p.date >= start && p.date < end)
                .collect();

            PriceSeries::from_unsorted(points).map_err(|_| ApiError::NoData { ticker })
        }
    }
}

fn is_ticker(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 20
        && s.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '^' | '=' | '-'))
}

/// Turn a v8 chart payload into daily closes
/// Null closes (halted days) are skipped; dates are exchange-local via `gmtoffset`
fn parse_chart_response(body: &str, ticker: &str) -> Result<Vec<PricePoint>, ApiError> {
    let response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| ApiError::ParseError(format!("Failed to parse chart for {}: {}", ticker, e)))?;

    if let Some(err) = response.chart.error {
        if err.code.eq_ignore_ascii_case("Not Found") {
            return Err(ApiError::NoData { ticker: ticker.to_string() });
        }
        return Err(ApiError::ParseError(format!("{}: {}", err.code, err.description)));
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Err(ApiError::NoData { ticker: ticker.to_string() });
    };

    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    let mut points = Vec::with_capacity(result.timestamp.len());
    for (timestamp, close) in result.timestamp.iter().zip(closes) {
        let Some(close) = close.filter(|c| c.is_finite()) else {
            continue;
        };

        let local = DateTime::from_timestamp(timestamp + result.meta.gmtoffset, 0)
            .ok_or_else(|| ApiError::ParseError("Invalid timestamp conversion".to_string()))?;

        points.push(PricePoint::new(local.date_naive(), close));
    }

    if points.is_empty() {
        return Err(ApiError::NoData { ticker: ticker.to_string() });
    }

    Ok(points)
}
