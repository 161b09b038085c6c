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

pub const DEFAULT_DIP_SMA_PERIOD: usize = 9;
pub const DEFAULT_DIP_ORDER_PERCENTAGE: f64 = 0.95;
pub const DEFAULT_DIP_TOP_UP: f64 = 100.0;

const FUND_START_VALUE: f64 = 100.0;
const DIP_THRESHOLD: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DipPhase {
    Idle,
    /// A buy window was flagged; the buy fires on a later evaluation, once
    /// the moving average has settled again.
    Armed,
}

/// Accumulates on volatility dips: whenever the moving average has moved
/// by more than 1% over the last two bars, a buy window is armed. The buy
/// itself fires on the first bar where the average has settled — one
/// evaluation cycle behind its trigger — after topping the account up
/// with a fixed cash amount. Long-only and never sells.
pub struct DipAccumulatorStrategy {
    name: String,
    symbol: String,
    broker: Arc<dyn Broker>,
    sizer: PercentOfCashSizer,
    sma: Sma,
    phase: DipPhase,
    top_up: f64,
    tracker: OrderTracker,
    bars_seen: usize,
}

impl DipAccumulatorStrategy {
    pub fn new(
        name: String,
        symbol: String,
        broker: Arc<dyn Broker>,
        order_percentage: f64,
        period: usize,
        top_up: f64,
    ) -> Self {
        Self {
            name,
            symbol,
            broker,
            sizer: PercentOfCashSizer::new(order_percentage),
            sma: Sma::new(period),
            phase: DipPhase::Idle,
            top_up,
            tracker: OrderTracker::new(),
            bars_seen: 0,
        }
    }
}

#[async_trait]
impl Strategy for DipAccumulatorStrategy {
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

        if let (Some(current), Some(two_back)) =
            (self.sma.line().get(0), self.sma.line().get(-2))
        {
            if (two_back - current).abs() > DIP_THRESHOLD * two_back {
                self.phase = DipPhase::Armed;
                return None;
            }
        }

        if self.phase == DipPhase::Armed {
            self.phase = DipPhase::Idle;
            self.broker.add_cash(self.top_up).await;
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
