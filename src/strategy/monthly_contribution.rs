use super::{log_execution, Strategy};
use crate::{
    broker::Broker,
    position_sizer::{cash_value_sizer::CashValueSizer, PositionSizer},
    timer::TimerSchedule,
    tracker::OrderTracker,
    types::{Bar, ExecutionNotification, OrderIntent, OrderSide},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_MONTHLY_CASH: f64 = 100.0;

const FUND_START_VALUE: f64 = 100.0;

/// Buy-and-hold with a periodic contribution: on the first trading session
/// of each month (carried across holidays) it injects a fixed cash amount
/// and buys that amount's worth of units, so account value rises by
/// exactly the increment. Fund accounting keeps the reported return
/// independent of the injections.
pub struct MonthlyContributionStrategy {
    name: String,
    symbol: String,
    broker: Arc<dyn Broker>,
    sizer: CashValueSizer,
    monthly_cash: f64,
    last_close: Option<f64>,
    tracker: OrderTracker,
    bars_seen: usize,
}

impl MonthlyContributionStrategy {
    pub fn new(
        name: String,
        symbol: String,
        broker: Arc<dyn Broker>,
        monthly_cash: f64,
    ) -> Self {
        Self {
            name,
            symbol,
            broker,
            sizer: CashValueSizer::new(monthly_cash),
            monthly_cash,
            last_close: None,
            tracker: OrderTracker::new(),
            bars_seen: 0,
        }
    }
}

#[async_trait]
impl Strategy for MonthlyContributionStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn timer(&self) -> Option<TimerSchedule> {
        Some(TimerSchedule::monthly())
    }

    async fn on_start(&mut self) {
        self.broker.set_fund_mode(FUND_START_VALUE).await;
    }

    async fn evaluate(&mut self, bar: &Bar) -> Option<OrderIntent> {
        // Not bar-driven; just remember the price the next contribution
        // will execute against.
        self.bars_seen += 1;
        self.last_close = Some(bar.close);
        debug!("{}: close {:.2}", self.name, bar.close);
        None
    }

    async fn on_timer(&mut self, session: NaiveDate) -> Option<OrderIntent> {
        self.broker.add_cash(self.monthly_cash).await;
        let shares = self.broker.fund_shares().await;
        info!("{} {}: cash added, shares {}", session, self.name, shares.floor());

        if self.tracker.is_outstanding() {
            return None;
        }
        let Some(price) = self.last_close else {
            warn!("{}: timer fired before any session, skipping rebalance", self.name);
            return None;
        };
        let qty = self.sizer.size(self.broker.cash().await, price);
        if qty == 0 {
            return None;
        }
        self.tracker.mark_submitted();
        Some(OrderIntent {
            symbol: self.symbol.clone(),
            side: OrderSide::Buy,
            qty,
        })
    }

    async fn on_execution(&mut self, notification: &ExecutionNotification) {
        self.tracker.apply_execution(notification, self.bars_seen);
        log_execution(&self.name, notification);
    }

    async fn on_stop(&mut self) {
        let fund_return = self.broker.fund_value().await - FUND_START_VALUE;
        info!("{}: fund value {:.2}%", self.name, fund_return);
    }
}
