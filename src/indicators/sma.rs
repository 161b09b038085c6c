use crate::series::Series;

/// Simple moving average over the last `period` inputs. Undefined until
/// `period` values have been pushed.
#[derive(Debug)]
pub struct Sma {
    period: usize,
    inputs: Vec<f64>,
    line: Series,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            inputs: Vec::new(),
            line: Series::new(),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn push(&mut self, value: f64) {
        self.inputs.push(value);
        let avg = if self.inputs.len() < self.period {
            f64::NAN
        } else {
            let window = &self.inputs[self.inputs.len() - self.period..];
            window.iter().copied().sum::<f64>() / self.period as f64
        };
        self.line.push(avg);
    }

    pub fn line(&self) -> &Series {
        &self.line
    }

    /// Current-bar average, `None` during warmup.
    pub fn value(&self) -> Option<f64> {
        self.line.get(0)
    }
}
