use axum::{extract::{Query, State}, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{bad_request, chart::default_range, error_response, required_symbol, ApiResult};
use crate::api_client::PriceSeriesProvider;
use crate::error::ChartError;
use crate::indicators::{compute_macd, compute_rsi, MacdConfig, MacdPoint, DEFAULT_RSI_WINDOW};
use crate::models::Signal;
use crate::services::price_service::fetch_with_retry;
use crate::signals::detect_signals;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct IndicatorQuery {
    pub symbol: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub rsi_window: Option<usize>,
    pub lang: Option<String>,
}

#[derive(Serialize)]
pub struct IndicatorResponse {
    pub ticker: String,
    pub dates: Vec<NaiveDate>,
    pub closes: Vec<f64>,
    pub rsi_window: usize,
    pub rsi: Vec<Option<f64>>,
    pub macd: Vec<MacdPoint>,
    pub macd_settled_from: usize,
    pub signals: Vec<Signal>,
}

/// Raw indicator values for clients that draw their own charts
pub async fn get_indicators<P: PriceSeriesProvider>(
    State(state): State<AppState<P>>,
    Query(query): Query<IndicatorQuery>,
) -> ApiResult<IndicatorResponse> {
    let (_, texts) = state.texts.for_code(query.lang.as_deref());
    let symbol = required_symbol(query.symbol)?;

    let rsi_window = query.rsi_window.unwrap_or(DEFAULT_RSI_WINDOW);
    // Validate window
    if !(2..=200).contains(&rsi_window) {
        return Err(bad_request(
            "invalid_window",
            format!("rsi_window must be between 2 and 200, got {}", rsi_window),
        ));
    }

    let (start, end) = default_range(query.start, query.end);
    if start >= end {
        return Err(error_response(&ChartError::InvalidDateRange { start, end }, texts));
    }

    let ticker = state.lookup.resolve(&symbol);
    let series = fetch_with_retry(state.provider.as_ref(), &ticker, start, end, &state.fetch_policy)
        .await
        .map_err(|e| error_response(&e.into(), texts))?;

    let rsi = compute_rsi(&series, rsi_window).map_err(|e| error_response(&e.into(), texts))?;
    let macd = compute_macd(&series, MacdConfig::default()).map_err(|e| error_response(&e.into(), texts))?;
    let signals: Vec<Signal> = detect_signals(&series, &rsi).collect();

    Ok(Json(IndicatorResponse {
        ticker,
        dates: series.dates().collect(),
        closes: series.closes(),
        rsi_window,
        macd_settled_from: macd.settled_from(),
        macd: macd.points().to_vec(),
        rsi,
        signals,
    }))
}
