/// Simple Moving Average (SMA)
/// Calculates the arithmetic mean of the last N values
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Calculate SMA for a value series
    /// Returns a vector of the same length as input
    /// First (period - 1) values are None (warmup period)
    pub fn calculate(&self, values: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; values.len()];

        if self.period == 0 || values.len() < self.period {
            return result;
        }

        // Each window is summed from scratch so an all-zero window stays exactly 0.0
        for i in (self.period - 1)..values.len() {
            let window = &values[i + 1 - self.period..=i];
            let sum: f64 = window.iter().sum();
            result[i] = Some(sum / self.period as f64);
        }

        result
    }
}

/// Exponential Moving Average (EMA)
/// Gives more weight to recent values using exponential smoothing
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Smoothing factor (k) for EMA calculation
    /// k = 2 / (period + 1)
    fn smoothing_factor(&self) -> f64 {
        2.0 / (self.period as f64 + 1.0)
    }

    /// Calculate EMA for a value series
    /// Seeded with the first value, so every index is defined
    pub fn calculate(&self, values: &[f64]) -> Vec<f64> {
        let mut result = Vec::with_capacity(values.len());

        let Some(&first) = values.first() else {
            return result;
        };

        let k = self.smoothing_factor();
        result.push(first);

        // EMA(t) = Value(t) * k + EMA(t-1) * (1 - k)
        for &value in &values[1..] {
            let prev_ema = result[result.len() - 1];
            result.push(value * k + prev_ema * (1.0 - k));
        }

        result
    }
}
