use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::error::SeriesError;
use crate::indicators::{compute_macd, compute_rsi, IndicatorSeries, MacdConfig, MacdSeries, DEFAULT_RSI_WINDOW};
use crate::models::{IndicatorMode, PriceSeries, Signal, SignalKind};
use crate::signals::detect_signals;

pub const OVERBOUGHT_LEVEL: f64 = 70.0;
pub const OVERSOLD_LEVEL: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    Price,
    Rsi,
    Macd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerShape {
    TriangleUp,
    TriangleDown,
}

/// Sign of a histogram bar, the renderer picks the colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarTone {
    Positive,
    Negative,
}

impl BarTone {
    fn of(value: f64) -> Self {
        if value >= 0.0 {
            BarTone::Positive
        } else {
            BarTone::Negative
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePoint {
    pub date: NaiveDate,
    /// None is a gap in the line (not yet computed), not a zero
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub tone: BarTone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlotData {
    Line { points: Vec<LinePoint> },
    Markers { shape: MarkerShape, points: Vec<LinePoint> },
    Bars { points: Vec<BarPoint> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSeries {
    pub name: String,
    #[serde(flatten)]
    pub data: PlotData,
}

impl PlotSeries {
    fn line(name: &str, points: Vec<LinePoint>) -> Self {
        Self {
            name: name.to_string(),
            data: PlotData::Line { points },
        }
    }

    fn markers(name: &str, shape: MarkerShape, points: Vec<LinePoint>) -> Self {
        Self {
            name: name.to_string(),
            data: PlotData::Markers { shape, points },
        }
    }

    fn bars(name: &str, points: Vec<BarPoint>) -> Self {
        Self {
            name: name.to_string(),
            data: PlotData::Bars { points },
        }
    }
}

/// Constant horizontal line drawn across the whole x domain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPanel {
    pub kind: PanelKind,
    pub title: String,
    pub series: Vec<PlotSeries>,
    pub reference_lines: Vec<ReferenceLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Panels stacked on one shared date axis: Price, then RSI, then MACD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub mode: IndicatorMode,
    pub x_domain: DateRange,
    pub panels: Vec<ChartPanel>,
    pub warnings: Vec<String>,
}

impl ChartLayout {
    pub fn price_panel_mut(&mut self) -> &mut ChartPanel {
        // assemble always puts the price panel first
        &mut self.panels[0]
    }
}

/// Compose the panels for `mode`; structural only, nothing is rendered here
/// Both indicator series must hold one value per price point
pub fn assemble(
    series: &PriceSeries,
    rsi: &IndicatorSeries,
    rsi_window: usize,
    macd: &MacdSeries,
    signals: &[Signal],
    mode: IndicatorMode,
) -> Result<ChartLayout, SeriesError> {
    for (indicator, actual) in [("RSI", rsi.len()), ("MACD", macd.len())] {
        if actual != series.len() {
            return Err(SeriesError::LengthMismatch {
                indicator,
                expected: series.len(),
                actual,
            });
        }
    }

    let mut panels = vec![price_panel(series, signals)];

    if mode.shows_rsi() {
        panels.push(rsi_panel(series, rsi, rsi_window));
    }
    if mode.shows_macd() {
        panels.push(macd_panel(series, macd));
    }

    Ok(ChartLayout {
        mode,
        x_domain: DateRange {
            start: series.first_date(),
            end: series.last_date(),
        },
        panels,
        warnings: Vec::new(),
    })
}

fn price_panel(series: &PriceSeries, signals: &[Signal]) -> ChartPanel {
    let price_line = series
        .points()
        .iter()
        .map(|p| LinePoint { date: p.date, value: Some(p.close) })
        .collect();

    let markers_for = |kind: SignalKind| -> Vec<LinePoint> {
        signals
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| LinePoint { date: s.date, value: Some(s.price) })
            .collect()
    };

    ChartPanel {
        kind: PanelKind::Price,
        title: "Price".to_string(),
        series: vec![
            PlotSeries::line("Price", price_line),
            PlotSeries::markers("Buy Signal", MarkerShape::TriangleUp, markers_for(SignalKind::Buy)),
            PlotSeries::markers("Sell Signal", MarkerShape::TriangleDown, markers_for(SignalKind::Sell)),
        ],
        reference_lines: Vec::new(),
    }
}

fn rsi_panel(series: &PriceSeries, rsi: &IndicatorSeries, window: usize) -> ChartPanel {
    let points = series
        .dates()
        .zip(rsi.iter())
        .map(|(date, value)| LinePoint { date, value: *value })
        .collect();

    ChartPanel {
        kind: PanelKind::Rsi,
        title: "RSI".to_string(),
        series: vec![PlotSeries::line(&format!("RSI ({})", window), points)],
        reference_lines: vec![
            ReferenceLine {
                name: "Overbought (70)".to_string(),
                value: OVERBOUGHT_LEVEL,
            },
            ReferenceLine {
                name: "Oversold (30)".to_string(),
                value: OVERSOLD_LEVEL,
            },
        ],
    }
}

fn macd_panel(series: &PriceSeries, macd: &MacdSeries) -> ChartPanel {
    let rows: Vec<_> = series.dates().zip(macd.points()).collect();

    let macd_line = rows
        .iter()
        .map(|(date, p)| LinePoint { date: *date, value: Some(p.macd) })
        .collect();
    let signal_line = rows
        .iter()
        .map(|(date, p)| LinePoint { date: *date, value: Some(p.signal) })
        .collect();
    let histogram = rows
        .iter()
        .map(|(date, p)| BarPoint {
            date: *date,
            value: p.histogram,
            tone: BarTone::of(p.histogram),
        })
        .collect();

    ChartPanel {
        kind: PanelKind::Macd,
        title: "MACD".to_string(),
        series: vec![
            PlotSeries::line("MACD", macd_line),
            PlotSeries::line("Signal Line", signal_line),
            PlotSeries::bars("Histogram", histogram),
        ],
        reference_lines: Vec::new(),
    }
}

/// Run RSI, MACD and signal detection with default parameters and lay out the result
/// Short series still produce a layout, with the affected indicators left undefined
pub fn build_chart(series: &PriceSeries, mode: IndicatorMode) -> Result<ChartLayout, SeriesError> {
    let macd_config = MacdConfig::default();
    let rsi = compute_rsi(series, DEFAULT_RSI_WINDOW)?;
    let macd = compute_macd(series, macd_config)?;
    let signals: Vec<Signal> = detect_signals(series, &rsi).collect();

    let mut layout = assemble(series, &rsi, DEFAULT_RSI_WINDOW, &macd, &signals, mode)?;

    let mut requirements = Vec::new();
    if mode.shows_rsi() {
        requirements.push(("RSI", DEFAULT_RSI_WINDOW));
    }
    if mode.shows_macd() {
        requirements.push(("MACD", macd_config.slow_period));
    }

    for (indicator, required) in requirements {
        if series.len() < required {
            let err = SeriesError::InsufficientHistory {
                indicator,
                required,
                available: series.len(),
            };
            warn!("{}", err);
            layout.warnings.push(err.to_string());
        }
    }

    Ok(layout)
}
