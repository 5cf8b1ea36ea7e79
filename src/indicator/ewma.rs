/// Exponentially weighted moving average with adjusted weights: the value
/// after n samples is `sum((1-a)^i * x_{n-i}) / sum((1-a)^i)` with
/// `a = 2 / (span + 1)`. Defined from the first sample onward.
#[derive(Debug, Clone)]
pub struct Ewma {
    decay: f64,
    numerator: f64,
    denominator: f64,
    seen: bool,
}

impl Ewma {
    pub fn new(span: usize) -> Self {
        assert!(span > 0, "EWMA span must be > 0");
        let alpha = 2.0 / (span as f64 + 1.0);
        Self {
            decay: 1.0 - alpha,
            numerator: 0.0,
            denominator: 0.0,
            seen: false,
        }
    }

    pub fn push(&mut self, value: f64) -> f64 {
        self.numerator = value + self.decay * self.numerator;
        self.denominator = 1.0 + self.decay * self.denominator;
        self.seen = true;
        self.numerator / self.denominator
    }

    pub fn value(&self) -> Option<f64> {
        self.seen.then(|| self.numerator / self.denominator)
    }
}
