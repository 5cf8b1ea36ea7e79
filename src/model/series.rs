use serde::Deserialize;

use crate::error::EvaluationError;

/// One close-price sample. Horus serves close prices only; OHLC fields are
/// synthesized later by the indicator engine.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PricePoint {
    /// Epoch seconds.
    pub timestamp: i64,
    #[serde(rename = "price")]
    pub close: f64,
}

/// Time-ordered close prices for one asset, strictly increasing timestamps.
/// Rebuilt fresh every decision cycle, never persisted.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Sorts the samples by timestamp and enforces the strictly-increasing
    /// invariant. Empty input and duplicate timestamps are rejected.
    pub fn new(mut points: Vec<PricePoint>) -> Result<Self, EvaluationError> {
        if points.is_empty() {
            return Err(EvaluationError::InvalidSeries("empty series".to_string()));
        }
        points.sort_by_key(|p| p.timestamp);
        for pair in points.windows(2) {
            if pair[1].timestamp == pair[0].timestamp {
                return Err(EvaluationError::InvalidSeries(format!(
                    "duplicate timestamp {}",
                    pair[0].timestamp
                )));
            }
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest_close(&self) -> f64 {
        self.points[self.points.len() - 1].close
    }
}
