use crate::types::{OrderId, OrderIntent};
use async_trait::async_trait;
use thiserror::Error;

pub mod dummy;

/// The engine-side collaborator strategies trade against. Submission is
/// asynchronous: `submit` only hands the intent over; completion arrives
/// later as an `ExecutionNotification` delivered by the engine.
#[async_trait]
pub trait Broker: Send + Sync {
    fn name(&self) -> &str;

    async fn submit(&self, intent: &OrderIntent) -> Result<OrderId, BrokerError>;

    /// Available cash at this moment.
    async fn cash(&self) -> f64;

    /// Currently held units of `symbol`.
    async fn position(&self, symbol: &str) -> u32;

    /// Total account value: cash plus positions at market.
    async fn value(&self) -> f64;

    /// Inject cash outside of trading.
    async fn add_cash(&self, amount: f64);

    /// Enable fund accounting with the given starting unit value. Returns
    /// are then computed against fund units, independent of injections.
    async fn set_fund_mode(&self, start_value: f64);

    /// Current fund unit value; the starting value until fund mode moves.
    async fn fund_value(&self) -> f64;

    async fn fund_shares(&self) -> f64;
}

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("failed to submit order: {0}")]
    Submit(String),
}
