use serde::Serialize;

use super::moving_averages::Ema;
use crate::error::SeriesError;
use crate::models::PriceSeries;

/// MACD parameters (default 12 / 26 / 9)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacdConfig {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacdPoint {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// MACD values aligned with the price series, defined from index 0
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdSeries {
    points: Vec<MacdPoint>,
    #[serde(skip)]
    slow_period: usize,
}

impl MacdSeries {
    pub fn points(&self) -> &[MacdPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// First index where the slow EMA has a full period of history behind it
    /// Earlier values are still dominated by the first-close seed
    pub fn settled_from(&self) -> usize {
        self.slow_period.saturating_sub(1)
    }
}

/// Moving Average Convergence Divergence
pub struct Macd {
    config: MacdConfig,
}

impl Macd {
    pub fn new(config: MacdConfig) -> Self {
        Self { config }
    }

    pub fn calculate(&self, prices: &[f64]) -> MacdSeries {
        let fast_ema = Ema::new(self.config.fast_period).calculate(prices);
        let slow_ema = Ema::new(self.config.slow_period).calculate(prices);

        // MACD line = Fast EMA - Slow EMA
        let macd_line: Vec<f64> = fast_ema
            .iter()
            .zip(&slow_ema)
            .map(|(fast, slow)| fast - slow)
            .collect();

        // Signal line = EMA of the MACD line, seeded with macd[0]
        let signal_line = Ema::new(self.config.signal_period).calculate(&macd_line);

        let points = macd_line
            .into_iter()
            .zip(signal_line)
            .map(|(macd, signal)| MacdPoint {
                macd,
                signal,
                histogram: macd - signal,
            })
            .collect();

        MacdSeries {
            points,
            slow_period: self.config.slow_period,
        }
    }
}

pub fn compute_macd(series: &PriceSeries, config: MacdConfig) -> Result<MacdSeries, SeriesError> {
    if config.fast_period == 0 || config.slow_period == 0 || config.signal_period == 0 {
        return Err(SeriesError::InvalidWindow { indicator: "MACD" });
    }
    Ok(Macd::new(config).calculate(&series.closes()))
}
