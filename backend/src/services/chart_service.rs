use crate::api_client::PriceSeriesProvider;
use crate::chart::{build_chart, ChartLayout};
use crate::error::ChartError;
use crate::lookup::SymbolLookup;
use crate::models::IndicatorMode;
use crate::services::price_service::{fetch_with_retry, FetchPolicy};
use chrono::NaiveDate;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ChartRequest {
    /// Company name or ticker as typed by the user
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub mode: IndicatorMode,
}

#[derive(Debug, Clone)]
pub struct GeneratedChart {
    pub ticker: String,
    pub layout: ChartLayout,
}

/// Resolve the symbol, fetch daily closes and build the layout
/// Failures keep their kind so the route can pick the right message
pub async fn generate_chart<P: PriceSeriesProvider>(
    provider: &P,
    lookup: &SymbolLookup,
    policy: &FetchPolicy,
    request: &ChartRequest,
) -> Result<GeneratedChart, ChartError> {
    if request.start >= request.end {
        return Err(ChartError::InvalidDateRange {
            start: request.start,
            end: request.end,
        });
    }

    let ticker = lookup.resolve(&request.symbol);
    info!(
        "Generating {} chart for {} ({} .. {})",
        request.mode, ticker, request.start, request.end
    );

    let series = fetch_with_retry(provider, &ticker, request.start, request.end, policy).await?;
    let layout = build_chart(&series, request.mode)?;

    Ok(GeneratedChart { ticker, layout })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::ApiError;
    use crate::chart::PanelKind;
    use crate::services::price_service::tests::ScriptedProvider;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn request(symbol: &str, mode: IndicatorMode) -> ChartRequest {
        ChartRequest {
            symbol: symbol.to_string(),
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            mode,
        }
    }

    fn lookup() -> SymbolLookup {
        let mut entries = BTreeMap::new();
        entries.insert("台積電".to_string(), "2330.TW".to_string());
        SymbolLookup::new(entries)
    }

    fn policy() -> FetchPolicy {
        FetchPolicy {
            timeout: Duration::from_millis(200),
            retries: 0,
            backoff: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_generates_layout_for_resolved_ticker() {
        let mut provider = ScriptedProvider::new(vec![]);
        provider.fallback = (0..40).map(|i| 100.0 + (i % 7) as f64).collect();

        let chart = generate_chart(&provider, &lookup(), &policy(), &request("台積電", IndicatorMode::RsiMacd))
            .await
            .unwrap();

        assert_eq!(chart.ticker, "2330.TW");
        assert_eq!(chart.layout.panels.len(), 3);
        assert_eq!(chart.layout.panels[2].kind, PanelKind::Macd);
    }

    #[tokio::test]
    async fn test_rejects_inverted_date_range_without_fetching() {
        let provider = ScriptedProvider::new(vec![]);
        let mut req = request("AAPL", IndicatorMode::Rsi);
        std::mem::swap(&mut req.start, &mut req.end);

        let err = generate_chart(&provider, &lookup(), &policy(), &req).await.unwrap_err();

        assert!(matches!(err, ChartError::InvalidDateRange { .. }));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_error_surfaces_unchanged() {
        let provider = ScriptedProvider::new(vec![Err(ApiError::NoData { ticker: "ZZZ".into() })]);

        let err = generate_chart(&provider, &lookup(), &policy(), &request("ZZZ", IndicatorMode::Macd))
            .await
            .unwrap_err();

        assert!(matches!(err, ChartError::DataProvider(ApiError::NoData { ref ticker }) if ticker == "ZZZ"));
    }
}
