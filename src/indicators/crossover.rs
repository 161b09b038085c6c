use crate::series::Series;

/// Signed crossover of one series against another: +1.0 the bar the first
/// passes from below-or-equal to above the second, -1.0 on the opposite
/// transition, 0.0 otherwise. Undefined until both inputs are defined on
/// two consecutive bars.
#[derive(Debug, Default)]
pub struct CrossOver {
    prev: Option<(f64, f64)>,
    line: Series,
}

impl CrossOver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe one bar's pair of input values.
    pub fn push(&mut self, first: Option<f64>, second: Option<f64>) {
        let sign = match (first, second, self.prev) {
            (Some(a), Some(b), Some((pa, pb))) => {
                if pa <= pb && a > b {
                    1.0
                } else if pa >= pb && a < b {
                    -1.0
                } else {
                    0.0
                }
            }
            _ => f64::NAN,
        };
        self.line.push(sign);
        self.prev = match (first, second) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        };
    }

    pub fn line(&self) -> &Series {
        &self.line
    }

    /// Current-bar crossover sign, `None` while undefined.
    pub fn value(&self) -> Option<f64> {
        self.line.get(0)
    }
}
