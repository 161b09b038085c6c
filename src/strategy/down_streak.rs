use super::{log_execution, log_trade, Strategy};
use crate::{
    broker::Broker,
    position_sizer::{percent_of_cash_sizer::PercentOfCashSizer, PositionSizer},
    series::Series,
    tracker::OrderTracker,
    types::{Bar, ExecutionNotification, OrderIntent, OrderSide, TradeNotification},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_DOWN_STREAK_EXIT_BARS: usize = 5;
pub const DEFAULT_DOWN_STREAK_ORDER_PERCENTAGE: f64 = 0.99;

/// Enters long after two consecutive strictly-decreasing closes and exits
/// unconditionally `exit_bars` bars after the entry, whatever the price.
pub struct DownStreakStrategy {
    name: String,
    symbol: String,
    broker: Arc<dyn Broker>,
    sizer: PercentOfCashSizer,
    exit_bars: usize,
    closes: Series,
    tracker: OrderTracker,
    bars_seen: usize,
}

impl DownStreakStrategy {
    pub fn new(
        name: String,
        symbol: String,
        broker: Arc<dyn Broker>,
        order_percentage: f64,
        exit_bars: usize,
    ) -> Self {
        Self {
            name,
            symbol,
            broker,
            sizer: PercentOfCashSizer::new(order_percentage),
            exit_bars,
            closes: Series::new(),
            tracker: OrderTracker::new(),
            bars_seen: 0,
        }
    }
}

#[async_trait]
impl Strategy for DownStreakStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn evaluate(&mut self, bar: &Bar) -> Option<OrderIntent> {
        self.bars_seen += 1;
        self.closes.push(bar.close);
        debug!("{}: close {:.2}", self.name, bar.close);

        if self.tracker.is_outstanding() {
            return None;
        }

        if !self.tracker.in_market() {
            let (Some(c0), Some(c1), Some(c2)) = (
                self.closes.get(0),
                self.closes.get(-1),
                self.closes.get(-2),
            ) else {
                return None;
            };
            if c0 < c1 && c1 < c2 {
                let cash = self.broker.cash().await;
                let qty = self.sizer.size(cash, c0);
                if qty == 0 {
                    return None;
                }
                info!("{}: BUY CREATE, {:.2}", self.name, c0);
                self.tracker.mark_submitted();
                return Some(OrderIntent {
                    symbol: self.symbol.clone(),
                    side: OrderSide::Buy,
                    qty,
                });
            }
        } else if let Some(entry_bar) = self.tracker.entry_bar() {
            if self.bars_seen >= entry_bar + self.exit_bars {
                info!("{}: SELL CREATE, {:.2}", self.name, bar.close);
                self.tracker.mark_submitted();
                return Some(OrderIntent {
                    symbol: self.symbol.clone(),
                    side: OrderSide::Sell,
                    qty: self.tracker.position_qty(),
                });
            }
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
