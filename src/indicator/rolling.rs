//! Fixed-window rolling statistics over a stream of samples. Each primitive
//! returns `None` until its window is full, matching trailing-window
//! semantics: the value at sample i depends on samples (i-window, i] only.

/// Rolling arithmetic mean over the last `window` samples.
#[derive(Debug, Clone)]
pub struct RollingMean {
    window: usize,
    buffer: Vec<f64>,
    next: usize,
    filled: usize,
    sum: f64,
}

impl RollingMean {
    pub fn new(window: usize) -> Self {
        assert!(window > 0, "rolling window must be > 0");
        Self {
            window,
            buffer: vec![0.0; window],
            next: 0,
            filled: 0,
            sum: 0.0,
        }
    }

    pub fn push(&mut self, value: f64) -> Option<f64> {
        if self.filled == self.window {
            self.sum -= self.buffer[self.next];
        } else {
            self.filled += 1;
        }
        self.buffer[self.next] = value;
        self.sum += value;
        self.next = (self.next + 1) % self.window;
        self.value()
    }

    pub fn value(&self) -> Option<f64> {
        (self.filled == self.window).then(|| self.sum / self.window as f64)
    }
}

/// Rolling sample standard deviation (ddof = 1) over the last `window`
/// samples. Requires a window of at least 2.
#[derive(Debug, Clone)]
pub struct RollingStd {
    window: usize,
    buffer: Vec<f64>,
    next: usize,
    filled: usize,
    sum: f64,
    sum_sq: f64,
}

impl RollingStd {
    pub fn new(window: usize) -> Self {
        assert!(window > 1, "std window must be > 1");
        Self {
            window,
            buffer: vec![0.0; window],
            next: 0,
            filled: 0,
            sum: 0.0,
            sum_sq: 0.0,
        }
    }

    pub fn push(&mut self, value: f64) -> Option<f64> {
        if self.filled == self.window {
            let old = self.buffer[self.next];
            self.sum -= old;
            self.sum_sq -= old * old;
        } else {
            self.filled += 1;
        }
        self.buffer[self.next] = value;
        self.sum += value;
        self.sum_sq += value * value;
        self.next = (self.next + 1) % self.window;
        self.value()
    }

    pub fn value(&self) -> Option<f64> {
        if self.filled < self.window {
            return None;
        }
        let n = self.window as f64;
        // Cancellation can push the numerator slightly negative.
        let variance = ((self.sum_sq - self.sum * self.sum / n) / (n - 1.0)).max(0.0);
        Some(variance.sqrt())
    }
}

/// Rolling max/min over the last `window` samples. Small windows only: each
/// push rescans the buffer.
#[derive(Debug, Clone)]
pub struct RollingExtrema {
    window: usize,
    buffer: Vec<f64>,
    next: usize,
    filled: usize,
}

impl RollingExtrema {
    pub fn new(window: usize) -> Self {
        assert!(window > 0, "extrema window must be > 0");
        Self {
            window,
            buffer: vec![0.0; window],
            next: 0,
            filled: 0,
        }
    }

    /// Push a sample, returning `(max, min)` once the window is full.
    pub fn push(&mut self, value: f64) -> Option<(f64, f64)> {
        self.buffer[self.next] = value;
        self.next = (self.next + 1) % self.window;
        if self.filled < self.window {
            self.filled += 1;
        }
        if self.filled < self.window {
            return None;
        }
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        for &v in &self.buffer {
            max = max.max(v);
            min = min.min(v);
        }
        Some((max, min))
    }
}
