/// Bar-aligned numeric sequence with lookback by non-positive offset.
///
/// One value is pushed per bar. Warmup slots are stored as NaN and read
/// back as `None`, so callers must check availability before use.
#[derive(Debug, Clone, Default)]
pub struct Series {
    values: Vec<f64>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value `ago` bars back (0 = current bar, -1 = previous). `None` for
    /// positive offsets, offsets before the first bar, and warmup slots.
    pub fn get(&self, ago: i32) -> Option<f64> {
        if ago > 0 {
            return None;
        }
        let idx = self.values.len() as i64 - 1 + ago as i64;
        if idx < 0 {
            return None;
        }
        let value = self.values[idx as usize];
        (!value.is_nan()).then_some(value)
    }

    /// Mean of the `size` values ending `ago` bars back (inclusive), e.g.
    /// `mean(4, -1)` averages the four values preceding the current bar.
    /// `None` if the window reaches past available or defined history.
    pub fn mean(&self, size: usize, ago: i32) -> Option<f64> {
        if size == 0 || ago > 0 {
            return None;
        }
        let end = self.values.len() as i64 - 1 + ago as i64;
        let start = end + 1 - size as i64;
        if start < 0 || end < 0 {
            return None;
        }
        let window = &self.values[start as usize..=end as usize];
        if window.iter().any(|v| v.is_nan()) {
            return None;
        }
        Some(window.iter().sum::<f64>() / size as f64)
    }
}
