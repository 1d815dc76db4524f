use crate::indicators::IndicatorSeries;
use crate::models::{PricePoint, PriceSeries, Signal, SignalKind};

/// RSI levels that trigger signals
/// Buy when RSI < oversold, Sell when RSI > overbought
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalThresholds {
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

impl SignalThresholds {
    fn classify(&self, rsi: f64) -> Option<SignalKind> {
        if rsi < self.oversold {
            Some(SignalKind::Buy)
        } else if rsi > self.overbought {
            Some(SignalKind::Sell)
        } else {
            None
        }
    }
}

/// Lazy iterator over threshold crossings, in date order
/// Clone it to walk the same series again
#[derive(Debug, Clone)]
pub struct Signals<'a> {
    points: std::iter::Zip<std::slice::Iter<'a, PricePoint>, std::slice::Iter<'a, Option<f64>>>,
    thresholds: SignalThresholds,
}

impl Iterator for Signals<'_> {
    type Item = Signal;

    fn next(&mut self) -> Option<Signal> {
        for (point, rsi) in self.points.by_ref() {
            let Some(rsi) = *rsi else {
                continue;
            };

            if let Some(kind) = self.thresholds.classify(rsi) {
                return Some(Signal {
                    date: point.date,
                    kind,
                    price: point.close,
                });
            }
        }
        None
    }
}

/// Signals from the default 30/70 thresholds
pub fn detect_signals<'a>(series: &'a PriceSeries, rsi: &'a IndicatorSeries) -> Signals<'a> {
    detect_signals_with(series, rsi, SignalThresholds::default())
}

pub fn detect_signals_with<'a>(
    series: &'a PriceSeries,
    rsi: &'a IndicatorSeries,
    thresholds: SignalThresholds,
) -> Signals<'a> {
    Signals {
        points: series.points().iter().zip(rsi.iter()),
        thresholds,
    }
}
