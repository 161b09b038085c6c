use super::{log_execution, log_trade, Strategy};
use crate::{
    broker::Broker,
    indicators::Sma,
    position_sizer::{percent_of_cash_sizer::PercentOfCashSizer, PositionSizer},
    tracker::OrderTracker,
    types::{Bar, ExecutionNotification, OrderIntent, OrderSide, TradeNotification},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_SMA_CROSS_PERIOD: usize = 15;
pub const DEFAULT_SMA_CROSS_ORDER_PERCENTAGE: f64 = 0.95;

const FUND_START_VALUE: f64 = 100.0;

/// Buys when the close rises above its simple moving average while flat,
/// sells the position when it falls back below. Runs in fund mode so the
/// reported return ignores external cash injections.
pub struct SmaCrossStrategy {
    name: String,
    symbol: String,
    broker: Arc<dyn Broker>,
    sizer: PercentOfCashSizer,
    sma: Sma,
    tracker: OrderTracker,
    bars_seen: usize,
}

impl SmaCrossStrategy {
    pub fn new(
        name: String,
        symbol: String,
        broker: Arc<dyn Broker>,
        order_percentage: f64,
        period: usize,
    ) -> Self {
        Self {
            name,
            symbol,
            broker,
            sizer: PercentOfCashSizer::new(order_percentage),
            sma: Sma::new(period),
            tracker: OrderTracker::new(),
            bars_seen: 0,
        }
    }
}

#[async_trait]
impl Strategy for SmaCrossStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn on_start(&mut self) {
        self.broker.set_fund_mode(FUND_START_VALUE).await;
    }

    async fn evaluate(&mut self, bar: &Bar) -> Option<OrderIntent> {
        self.bars_seen += 1;
        self.sma.push(bar.close);
        debug!("{}: close {:.2}", self.name, bar.close);

        if self.tracker.is_outstanding() {
            return None;
        }
        let avg = self.sma.value()?;

        if !self.tracker.in_market() {
            if bar.close > avg {
                let cash = self.broker.cash().await;
                let qty = self.sizer.size(cash, bar.close);
                if qty == 0 {
                    return None;
                }
                info!("{}: BUY CREATE, {:.2}", self.name, bar.close);
                self.tracker.mark_submitted();
                return Some(OrderIntent {
                    symbol: self.symbol.clone(),
                    side: OrderSide::Buy,
                    qty,
                });
            }
        } else if bar.close < avg {
            info!("{}: SELL CREATE, {:.2}", self.name, bar.close);
            self.tracker.mark_submitted();
            return Some(OrderIntent {
                symbol: self.symbol.clone(),
                side: OrderSide::Sell,
                qty: self.tracker.position_qty(),
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

    async fn on_stop(&mut self) {
        let fund_return = self.broker.fund_value().await - FUND_START_VALUE;
        info!("{}: fund value {:.2}%", self.name, fund_return);
    }
}
