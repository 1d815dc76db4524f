use chrono::NaiveDate;
use thiserror::Error;

use crate::api_client::ApiError;

/// Errors raised by the indicator core itself
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    #[error("price series is empty")]
    EmptySeries,

    #[error("price series dates must be strictly ascending (violated at index {index})")]
    NonAscendingDates { index: usize },

    #[error("close at index {index} is not a finite number")]
    NonFiniteClose { index: usize },

    #[error("{indicator} needs at least {required} points, series has {available}")]
    InsufficientHistory {
        indicator: &'static str,
        required: usize,
        available: usize,
    },

    #[error("{indicator} window must be at least 1")]
    InvalidWindow { indicator: &'static str },

    #[error("{indicator} has {actual} values for {expected} price points")]
    LengthMismatch {
        indicator: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Errors surfaced by the chart request path
/// Each kind is mapped to its own user-facing text at the route boundary
#[derive(Debug, Error)]
pub enum ChartError {
    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error(transparent)]
    DataProvider(#[from] ApiError),

    #[error("start date {start} must be before end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

impl ChartError {
    /// Stable machine-readable tag for JSON error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            ChartError::Series(SeriesError::EmptySeries) => "empty_series",
            ChartError::Series(SeriesError::NonAscendingDates { .. }) => "invalid_series",
            ChartError::Series(SeriesError::NonFiniteClose { .. }) => "non_finite_close",
            ChartError::Series(SeriesError::InsufficientHistory { .. }) => "insufficient_history",
            ChartError::Series(SeriesError::InvalidWindow { .. }) => "invalid_window",
            ChartError::Series(SeriesError::LengthMismatch { .. }) => "length_mismatch",
            ChartError::DataProvider(ApiError::NoData { .. }) => "no_data",
            ChartError::DataProvider(ApiError::Timeout { .. }) => "provider_timeout",
            ChartError::DataProvider(_) => "provider_error",
            ChartError::InvalidDateRange { .. } => "invalid_date_range",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_errors_keep_their_own_kind() {
        let no_data: ChartError = ApiError::NoData { ticker: "2330.TW".to_string() }.into();
        let network: ChartError = ApiError::RequestFailed("connection reset".to_string()).into();
        let empty: ChartError = SeriesError::EmptySeries.into();

        assert_eq!(no_data.kind(), "no_data");
        assert_eq!(network.kind(), "provider_error");
        assert_eq!(empty.kind(), "empty_series");
    }

    #[test]
    fn test_provider_message_passes_through() {
        let err: ChartError = ApiError::NoData { ticker: "ABC".to_string() }.into();
        assert_eq!(err.to_string(), "no price data for ABC");
    }

    #[test]
    fn test_non_finite_close_kind() {
        let err: ChartError = SeriesError::NonFiniteClose { index: 5 }.into();
        assert_eq!(err.kind(), "non_finite_close");
        assert_eq!(err.to_string(), "close at index 5 is not a finite number");
    }

    #[test]
    fn test_timeout_message_keeps_sub_second_budget() {
        let err: ChartError = ApiError::Timeout { millis: 20 }.into();
        assert_eq!(err.kind(), "provider_timeout");
        assert_eq!(err.to_string(), "price request timed out after 20ms");
    }
}
