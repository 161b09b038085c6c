pub mod crossover;
pub mod sma;
pub mod wma;

pub use crossover::CrossOver;
pub use sma::Sma;
pub use wma::Wma;
