use crate::timer::TimerSchedule;
use crate::types::{Bar, ExecutionNotification, OrderIntent, OrderSide, OrderStatus, TradeNotification};
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::info;

pub mod dip_accumulator;
pub mod down_streak;
pub mod golden_cross;
pub mod monthly_contribution;
pub mod sma_cross;
pub mod wma_volume;

/// Lifecycle surface the external backtest engine drives, one callback at
/// a time: bars in, at most one order intent out per evaluation.
#[async_trait]
pub trait Strategy: Send + Sync {
    fn name(&self) -> &str;

    /// Recurring calendar event this strategy wants the engine to fire.
    fn timer(&self) -> Option<TimerSchedule> {
        None
    }

    async fn on_start(&mut self) {}

    /// Called once per decision bar, oldest first. Returning `Some` asks
    /// the engine to submit exactly that intent; the strategy must not
    /// emit again until a terminal execution notification arrives.
    async fn evaluate(&mut self, bar: &Bar) -> Option<OrderIntent>;

    /// Called when the engine completes a slower-timeframe bar (e.g. one
    /// aggregated week) for strategies that watch two timeframes.
    async fn on_aggregate_bar(&mut self, _bar: &Bar) {}

    async fn on_execution(&mut self, _notification: &ExecutionNotification) {}

    async fn on_trade_closed(&mut self, _trade: &TradeNotification) {}

    /// Fired by the engine for the schedule returned from `timer`.
    async fn on_timer(&mut self, _session: NaiveDate) -> Option<OrderIntent> {
        None
    }

    async fn on_stop(&mut self) {}
}

/// One log line per execution callback, shared by all strategies.
pub(crate) fn log_execution(strategy: &str, notification: &ExecutionNotification) {
    match notification.status {
        OrderStatus::Completed => {
            let action = match notification.side {
                OrderSide::Buy => "BUY EXECUTED",
                OrderSide::Sell => "SELL EXECUTED",
            };
            info!(
                "{strategy}: {action}, size {}, price {:.2}, cost {:.2}, comm {:.2}",
                notification.filled_qty,
                notification.filled_price,
                notification.cost,
                notification.commission
            );
        }
        OrderStatus::Canceled | OrderStatus::Margin | OrderStatus::Rejected => {
            info!("{strategy}: order canceled/margin/rejected");
        }
        OrderStatus::Submitted | OrderStatus::Accepted => {}
    }
}

pub(crate) fn log_trade(strategy: &str, trade: &TradeNotification) {
    info!(
        "{strategy}: OPERATION PROFIT, gross {:.2}, net {:.2}",
        trade.gross_pnl, trade.net_pnl
    );
}
