use axum::{http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use tracing::{error, warn};

use crate::api_client::{ApiError, PriceSeriesProvider};
use crate::error::{ChartError, SeriesError};
use crate::i18n::Texts;
use crate::state::AppState;

pub mod chart;
pub mod indicators;
pub mod meta;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub kind: String,
    pub error: String,
}

pub type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

/// Map a chart failure to a status code and localized message
pub fn error_response(err: &ChartError, texts: &Texts) -> (StatusCode, Json<ErrorResponse>) {
    let status = match err {
        ChartError::DataProvider(ApiError::NoData { .. }) => StatusCode::NOT_FOUND,
        ChartError::DataProvider(ApiError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
        ChartError::DataProvider(_) => StatusCode::BAD_GATEWAY,
        ChartError::Series(SeriesError::LengthMismatch { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
        ChartError::InvalidDateRange { .. } | ChartError::Series(_) => StatusCode::BAD_REQUEST,
    };

    if status.is_server_error() {
        error!("Chart request failed: {}", err);
    } else {
        warn!("Chart request rejected: {}", err);
    }

    (
        status,
        Json(ErrorResponse {
            kind: err.kind().to_string(),
            error: texts.error_message(err).to_string(),
        }),
    )
}

pub fn bad_request(kind: &str, message: String) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            kind: kind.to_string(),
            error: message,
        }),
    )
}

/// The `symbol` parameter, present and not blank
pub fn required_symbol(symbol: Option<String>) -> Result<String, (StatusCode, Json<ErrorResponse>)> {
    match symbol {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(bad_request("missing_symbol", "symbol is required".to_string())),
    }
}

pub fn api_router<P>() -> Router<AppState<P>>
where
    P: PriceSeriesProvider + 'static,
{
    Router::new()
        .route("/chart", get(chart::get_chart::<P>))
        .route("/indicators", get(indicators::get_indicators::<P>))
        .route("/symbols", get(meta::get_symbols::<P>))
        .route("/texts", get(meta::get_texts::<P>))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Language, LanguageTable};

    #[test]
    fn test_non_finite_close_is_a_bad_request() {
        let table = LanguageTable::builtin(Language::En);
        let err: ChartError = SeriesError::NonFiniteClose { index: 5 }.into();
        let (status, Json(body)) = error_response(&err, table.get(Language::En));

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.kind, "non_finite_close");
        assert_eq!(body.error, "❌ The price data contains invalid values.");
    }

    #[test]
    fn test_timeout_is_gateway_timeout() {
        let table = LanguageTable::builtin(Language::En);
        let err: ChartError = ApiError::Timeout { millis: 20 }.into();
        let (status, Json(body)) = error_response(&err, table.get(Language::En));

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body.kind, "provider_timeout");
    }
}
