use super::{log_execution, log_trade, Strategy};
use crate::{
    broker::Broker,
    indicators::{CrossOver, Sma},
    position_sizer::{percent_of_cash_sizer::PercentOfCashSizer, PositionSizer},
    tracker::OrderTracker,
    types::{Bar, ExecutionNotification, OrderIntent, OrderSide, TradeNotification},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_GOLDEN_CROSS_FAST_PERIOD: usize = 50;
pub const DEFAULT_GOLDEN_CROSS_SLOW_PERIOD: usize = 200;
pub const DEFAULT_GOLDEN_CROSS_ORDER_PERCENTAGE: f64 = 0.95;

/// Classic golden/death cross: buys when the fast average crosses above
/// the slow one while flat, sells the position on the reverse crossing.
pub struct GoldenCrossStrategy {
    name: String,
    symbol: String,
    broker: Arc<dyn Broker>,
    sizer: PercentOfCashSizer,
    fast: Sma,
    slow: Sma,
    crossover: CrossOver,
    tracker: OrderTracker,
    bars_seen: usize,
}

impl GoldenCrossStrategy {
    pub fn new(
        name: String,
        symbol: String,
        broker: Arc<dyn Broker>,
        order_percentage: f64,
        fast_period: usize,
        slow_period: usize,
    ) -> Self {
        Self {
            name,
            symbol,
            broker,
            sizer: PercentOfCashSizer::new(order_percentage),
            fast: Sma::new(fast_period),
            slow: Sma::new(slow_period),
            crossover: CrossOver::new(),
            tracker: OrderTracker::new(),
            bars_seen: 0,
        }
    }
}

#[async_trait]
impl Strategy for GoldenCrossStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn evaluate(&mut self, bar: &Bar) -> Option<OrderIntent> {
        self.bars_seen += 1;
        self.fast.push(bar.close);
        self.slow.push(bar.close);
        self.crossover.push(self.fast.value(), self.slow.value());
        debug!("{}: close {:.2}", self.name, bar.close);

        if self.tracker.is_outstanding() {
            return None;
        }
        let sign = self.crossover.value()?;

        if !self.tracker.in_market() && sign > 0.0 {
            let cash = self.broker.cash().await;
            let qty = self.sizer.size(cash, bar.close);
            if qty == 0 {
                return None;
            }
            info!("{}: buy {} shares at {:.2}", self.name, qty, bar.close);
            self.tracker.mark_submitted();
            return Some(OrderIntent {
                symbol: self.symbol.clone(),
                side: OrderSide::Buy,
                qty,
            });
        }
        if self.tracker.in_market() && sign < 0.0 {
            let qty = self.tracker.position_qty();
            info!("{}: sell {} shares at {:.2}", self.name, qty, bar.close);
            self.tracker.mark_submitted();
            return Some(OrderIntent {
                symbol: self.symbol.clone(),
                side: OrderSide::Sell,
                qty,
            });
        }
        None
    }

    async fn on_execution(&mut self, notification: &ExecutionNotification) {
        self.tracker.apply_execution(notification, self.bars_seen);
        log_execution(&self.name, notification);
    }

    async fn on_trade_closed(&mut self, trade: &TradeNotification) {
        log_trade(&self.name, trade);
    }
}
