use super::rolling::RollingMean;

/// Average true range: rolling mean of the per-sample true range, where the
/// true range is `max(high - low, |high - prev_close|, |low - prev_close|)`.
///
/// A bar without high/low (the synthesized extrema are still warming up)
/// contributes no true range, so the output stays `None` until `window`
/// consecutive complete bars have been seen.
#[derive(Debug, Clone)]
pub struct AverageTrueRange {
    mean: RollingMean,
    prev_close: Option<f64>,
}

impl AverageTrueRange {
    pub fn new(window: usize) -> Self {
        Self {
            mean: RollingMean::new(window),
            prev_close: None,
        }
    }

    pub fn push(&mut self, high: Option<f64>, low: Option<f64>, close: f64) -> Option<f64> {
        let out = match (high, low, self.prev_close) {
            (Some(h), Some(l), Some(pc)) => {
                let tr = (h - l).max((h - pc).abs()).max((l - pc).abs());
                self.mean.push(tr)
            }
            _ => self.mean.value(),
        };
        self.prev_close = Some(close);
        out
    }

    pub fn value(&self) -> Option<f64> {
        self.mean.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warms_up_only_on_complete_bars() {
        let mut atr = AverageTrueRange::new(2);
        // First bar: no previous close yet.
        assert_eq!(atr.push(Some(11.0), Some(9.0), 10.0), None);
        // Second bar: tr = max(2, |12-10|, |10-10|) = 2
        assert_eq!(atr.push(Some(12.0), Some(10.0), 11.0), None);
        // Third bar: tr = max(1, |13-11|, |12-11|) = 2 -> mean(2, 2) = 2
        let v = atr.push(Some(13.0), Some(12.0), 12.5).unwrap();
        assert!((v - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn incomplete_bars_do_not_feed_the_window() {
        let mut atr = AverageTrueRange::new(2);
        atr.push(None, None, 10.0);
        atr.push(None, None, 11.0);
        atr.push(None, None, 12.0);
        assert_eq!(atr.value(), None);
        assert_eq!(atr.push(Some(13.0), Some(11.0), 12.5), None);
        assert!(atr.push(Some(13.5), Some(12.0), 13.0).is_some());
    }

    #[test]
    fn gap_down_uses_distance_from_previous_close() {
        let mut atr = AverageTrueRange::new(1);
        atr.push(Some(101.0), Some(99.0), 100.0);
        // Gap down: |low - prev_close| = 12, wider than high - low = 2.
        let v = atr.push(Some(90.0), Some(88.0), 89.0).unwrap();
        assert!((v - 12.0).abs() < f64::EPSILON);
    }
}
