// Technical indicators module
// Provides calculation functions for RSI, MACD and the moving averages behind them

pub mod macd;
pub mod moving_averages;
pub mod rsi;

pub use macd::{compute_macd, MacdConfig, MacdPoint, MacdSeries};
pub use rsi::{compute_rsi, IndicatorSeries, DEFAULT_RSI_WINDOW};
