use crate::config::IndicatorConfig;
use crate::error::EvaluationError;
use crate::model::series::PriceSeries;

use super::atr::AverageTrueRange;
use super::ewma::Ewma;
use super::rolling::{RollingExtrema, RollingMean, RollingStd};

/// One synthesized OHLCV bar. Horus serves closes only: open is the previous
/// close, high/low are trailing extrema of close over the range window, and
/// volume is unavailable and fixed at zero.
#[derive(Debug, Clone, Copy)]
pub struct Bar {
    /// Epoch seconds.
    pub timestamp: i64,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: f64,
}

/// Trailing indicator values attached to one bar. `None` while the
/// corresponding window is still warming up.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorSet {
    /// Exponentially weighted mean of close, short span.
    pub short_ma: Option<f64>,
    /// Simple rolling mean of close, long window.
    pub long_ma: Option<f64>,
    /// Rolling sample standard deviation of close, short window.
    pub std_dev: Option<f64>,
    /// Long-window rolling std divided by long-window rolling mean: the
    /// asset's normalized volatility baseline.
    pub vol_ratio: Option<f64>,
    /// Average true range over the ATR window.
    pub atr: Option<f64>,
}

/// A price series annotated with per-sample indicators, aligned by index.
#[derive(Debug, Clone)]
pub struct EnrichedSeries {
    pub bars: Vec<Bar>,
    pub indicators: Vec<IndicatorSet>,
}

impl EnrichedSeries {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn latest(&self) -> (&Bar, &IndicatorSet) {
        let last = self.bars.len() - 1;
        (&self.bars[last], &self.indicators[last])
    }
}

/// Annotate a validated price series with the indicator set.
///
/// Pure function of its input: one forward pass, every statistic fed only
/// samples up to and including the current one, so no value can look ahead.
/// Fails when the series is shorter than the long-MA window; callers must
/// not evaluate a signal on less history than that.
pub fn annotate(
    series: &PriceSeries,
    params: &IndicatorConfig,
) -> Result<EnrichedSeries, EvaluationError> {
    if series.len() < params.long_window {
        return Err(EvaluationError::InsufficientHistory {
            got: series.len(),
            need: params.long_window,
        });
    }

    let mut short_ma = Ewma::new(params.short_window);
    let mut long_ma = RollingMean::new(params.long_window);
    let mut std_dev = RollingStd::new(params.short_window);
    let mut vol_std = RollingStd::new(params.vol_window);
    let mut vol_mean = RollingMean::new(params.vol_window);
    let mut extrema = RollingExtrema::new(params.range_window);
    let mut atr = AverageTrueRange::new(params.atr_window);

    let mut bars = Vec::with_capacity(series.len());
    let mut indicators = Vec::with_capacity(series.len());
    let mut prev_close: Option<f64> = None;

    for point in series.points() {
        let close = point.close;
        let (high, low) = match extrema.push(close) {
            Some((max, min)) => (Some(max), Some(min)),
            None => (None, None),
        };

        let vol_ratio = match (vol_std.push(close), vol_mean.push(close)) {
            (Some(s), Some(m)) if m != 0.0 => Some(s / m),
            _ => None,
        };

        indicators.push(IndicatorSet {
            short_ma: Some(short_ma.push(close)),
            long_ma: long_ma.push(close),
            std_dev: std_dev.push(close),
            vol_ratio,
            atr: atr.push(high, low, close),
        });
        bars.push(Bar {
            timestamp: point.timestamp,
            open: prev_close,
            high,
            low,
            close,
            volume: 0.0,
        });
        prev_close = Some(close);
    }

    Ok(EnrichedSeries { bars, indicators })
}
