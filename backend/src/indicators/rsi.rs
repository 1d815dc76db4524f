use super::moving_averages::Sma;
use crate::error::SeriesError;
use crate::models::PriceSeries;

/// RSI reported when the window saw no movement at all (avg gain = avg loss = 0)
pub const FLAT_PRICE_RSI: f64 = 50.0;

pub const DEFAULT_RSI_WINDOW: usize = 14;

/// One optional RSI value per price point
/// None marks the warmup region, never a computed zero
pub type IndicatorSeries = Vec<Option<f64>>;

/// Relative Strength Index (RSI)
/// Measures momentum by comparing magnitude of recent gains to recent losses
/// Returns values between 0-100:
/// - Below 30: Oversold (potentially undervalued)
/// - Above 70: Overbought (potentially overvalued)
pub struct Rsi {
    window: usize,
}

impl Rsi {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// Calculate RSI using simple moving averages of gains and losses
    /// Returns a vector of the same length as input
    /// First (window - 1) values are None; the first price contributes no gain or loss
    pub fn calculate(&self, prices: &[f64]) -> IndicatorSeries {
        if prices.is_empty() {
            return Vec::new();
        }

        // Price changes, aligned with the input (index 0 has no predecessor)
        let mut gains = Vec::with_capacity(prices.len());
        let mut losses = Vec::with_capacity(prices.len());
        gains.push(0.0);
        losses.push(0.0);

        for w in prices.windows(2) {
            let change = w[1] - w[0];
            gains.push(if change > 0.0 { change } else { 0.0 });
            losses.push(if change < 0.0 { -change } else { 0.0 });
        }

        let sma = Sma::new(self.window);
        let avg_gains = sma.calculate(&gains);
        let avg_losses = sma.calculate(&losses);

        avg_gains
            .into_iter()
            .zip(avg_losses)
            .map(|(gain, loss)| Some(rsi_from_averages(gain?, loss?)))
            .collect()
    }
}

/// RS = avg_gain / avg_loss, RSI = 100 - 100 / (1 + RS)
/// Zero average loss saturates at 100 instead of dividing by zero
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            return FLAT_PRICE_RSI;
        }
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

/// Compute RSI over the closes of a price series
pub fn compute_rsi(series: &PriceSeries, window: usize) -> Result<IndicatorSeries, SeriesError> {
    if window == 0 {
        return Err(SeriesError::InvalidWindow { indicator: "RSI" });
    }
    Ok(Rsi::new(window).calculate(&series.closes()))
}
