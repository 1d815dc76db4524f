use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SeriesError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Daily close prices, non-empty, finite and strictly ascending by date
/// Calendar gaps (weekends, holidays) are fine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        if points.is_empty() {
            return Err(SeriesError::EmptySeries);
        }

        if let Some(index) = points.iter().position(|p| !p.close.is_finite()) {
            return Err(SeriesError::NonFiniteClose { index });
        }

        if let Some(index) = points
            .windows(2)
            .position(|w| w[1].date <= w[0].date)
        {
            return Err(SeriesError::NonAscendingDates { index: index + 1 });
        }

        Ok(Self { points })
    }

    /// Sort by date and keep the last point seen for each date
    /// Providers hand back whatever order the upstream API used
    pub fn from_unsorted(mut points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        points.sort_by_key(|p| p.date);

        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }

        Self::new(deduped)
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.points[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.points[self.points.len() - 1].date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    Buy,
    Sell,
}

/// Threshold crossing event derived from the RSI series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Signal {
    pub date: NaiveDate,
    pub kind: SignalKind,
    pub price: f64,
}

/// Which indicator panels to show under the price panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IndicatorMode {
    #[serde(rename = "RSI")]
    Rsi,
    #[serde(rename = "MACD")]
    Macd,
    #[default]
    #[serde(rename = "RSI+MACD", alias = "RSI_MACD")]
    RsiMacd,
}

impl IndicatorMode {
    pub fn shows_rsi(self) -> bool {
        matches!(self, IndicatorMode::Rsi | IndicatorMode::RsiMacd)
    }

    pub fn shows_macd(self) -> bool {
        matches!(self, IndicatorMode::Macd | IndicatorMode::RsiMacd)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IndicatorMode::Rsi => "RSI",
            IndicatorMode::Macd => "MACD",
            IndicatorMode::RsiMacd => "RSI+MACD",
        }
    }
}

impl fmt::Display for IndicatorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndicatorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RSI" => Ok(IndicatorMode::Rsi),
            "MACD" => Ok(IndicatorMode::Macd),
            // "+" arrives as a space when the query string is not percent-encoded
            "RSI+MACD" | "RSI_MACD" | "RSI MACD" => Ok(IndicatorMode::RsiMacd),
            other => Err(format!("unknown indicator mode: {}", other)),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Build a series of consecutive calendar days starting 2024-01-01
    pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint::new(start + chrono::Days::new(i as u64), close))
            .collect();
        PriceSeries::new(points).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_empty_series_rejected() {
        assert_eq!(PriceSeries::new(vec![]), Err(SeriesError::EmptySeries));
    }

    #[test]
    fn test_non_ascending_dates_rejected() {
        let points = vec![
            PricePoint::new(day(1), 10.0),
            PricePoint::new(day(4), 11.0),
            PricePoint::new(day(4), 12.0),
        ];
        assert_eq!(
            PriceSeries::new(points),
            Err(SeriesError::NonAscendingDates { index: 2 })
        );
    }

    #[test]
    fn test_non_finite_close_rejected() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        closes[5] = f64::NAN;
        let points: Vec<PricePoint> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint::new(start + chrono::Days::new(i as u64), close))
            .collect();

        assert_eq!(
            PriceSeries::new(points.clone()),
            Err(SeriesError::NonFiniteClose { index: 5 })
        );
        assert_eq!(
            PriceSeries::from_unsorted(points),
            Err(SeriesError::NonFiniteClose { index: 5 })
        );
    }

    #[test]
    fn test_infinite_close_rejected() {
        let points = vec![
            PricePoint::new(day(1), 10.0),
            PricePoint::new(day(2), f64::INFINITY),
            PricePoint::new(day(3), f64::NEG_INFINITY),
        ];
        assert_eq!(
            PriceSeries::new(points),
            Err(SeriesError::NonFiniteClose { index: 1 })
        );
    }

    #[test]
    fn test_from_unsorted_sorts_and_keeps_last_duplicate() {
        let points = vec![
            PricePoint::new(day(5), 15.0),
            PricePoint::new(day(1), 10.0),
            PricePoint::new(day(5), 16.0),
            PricePoint::new(day(3), 13.0),
        ];
        let series = PriceSeries::from_unsorted(points).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.first_date(), day(1));
        assert_eq!(series.last_date(), day(5));
        assert_eq!(series.closes(), vec![10.0, 13.0, 16.0]);
    }

    #[test]
    fn test_indicator_mode_parsing() {
        assert_eq!("RSI".parse::<IndicatorMode>().unwrap(), IndicatorMode::Rsi);
        assert_eq!("macd".parse::<IndicatorMode>().unwrap(), IndicatorMode::Macd);
        assert_eq!("RSI+MACD".parse::<IndicatorMode>().unwrap(), IndicatorMode::RsiMacd);
        assert_eq!("RSI_MACD".parse::<IndicatorMode>().unwrap(), IndicatorMode::RsiMacd);
        assert!("BOLL".parse::<IndicatorMode>().is_err());
    }

    #[test]
    fn test_indicator_mode_serde_names() {
        let mode: IndicatorMode = serde_json::from_str("\"RSI_MACD\"").unwrap();
        assert_eq!(mode, IndicatorMode::RsiMacd);
        assert_eq!(serde_json::to_string(&IndicatorMode::RsiMacd).unwrap(), "\"RSI+MACD\"");
    }
}
