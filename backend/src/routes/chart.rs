use axum::extract::{Query, State};
use axum::Json;
use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{bad_request, error_response, required_symbol, ApiResult};
use crate::api_client::PriceSeriesProvider;
use crate::chart::ChartLayout;
use crate::i18n::Language;
use crate::models::IndicatorMode;
use crate::services::chart_service::{generate_chart, ChartRequest};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChartQuery {
    pub symbol: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub indicator: Option<String>, // "RSI", "MACD" or "RSI+MACD"
    pub lang: Option<String>,
}

#[derive(Serialize)]
pub struct ChartResponse {
    pub ticker: String,
    pub language: Language,
    pub x_axis_label: String,
    pub y_axis_label: String,
    pub layout: ChartLayout,
}

/// Default window when the picker is left empty: the year up to today
pub(crate) fn default_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> (NaiveDate, NaiveDate) {
    let end = end.unwrap_or_else(|| Utc::now().date_naive());
    let start = start.unwrap_or_else(|| end.checked_sub_days(Days::new(365)).unwrap_or(end));
    (start, end)
}

pub async fn get_chart<P: PriceSeriesProvider>(
    State(state): State<AppState<P>>,
    Query(query): Query<ChartQuery>,
) -> ApiResult<ChartResponse> {
    let (language, texts) = state.texts.for_code(query.lang.as_deref());
    let symbol = required_symbol(query.symbol)?;

    let mode = match query.indicator.as_deref() {
        Some(raw) => raw
            .parse::<IndicatorMode>()
            .map_err(|e| bad_request("invalid_indicator", e))?,
        None => IndicatorMode::default(),
    };

    let (start, end) = default_range(query.start, query.end);
    let request = ChartRequest {
        symbol,
        start,
        end,
        mode,
    };

    let chart = generate_chart(state.provider.as_ref(), &state.lookup, &state.fetch_policy, &request)
        .await
        .map_err(|e| error_response(&e, texts))?;

    let mut layout = chart.layout;
    layout.price_panel_mut().title = format!("{} {}", chart.ticker, texts.title);

    Ok(Json(ChartResponse {
        ticker: chart.ticker,
        language,
        x_axis_label: texts.xaxis.clone(),
        y_axis_label: texts.yaxis.clone(),
        layout,
    }))
}
