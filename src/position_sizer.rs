pub mod cash_value_sizer;
pub mod fixed_sizer;
pub mod percent_of_cash_sizer;

/// Converts point-in-time cash and price into a whole number of units.
/// Pure: identical inputs always yield the identical quantity, and
/// fractional units are never ordered.
pub trait PositionSizer: Send + Sync {
    fn size(&self, cash: f64, price: f64) -> u32;
}
