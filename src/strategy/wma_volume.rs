use super::{log_execution, log_trade, Strategy};
use crate::{
    broker::Broker,
    indicators::Wma,
    position_sizer::{percent_of_cash_sizer::PercentOfCashSizer, PositionSizer},
    series::Series,
    tracker::OrderTracker,
    types::{Bar, ExecutionNotification, OrderIntent, OrderSide, TradeNotification},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_WMA_PRICE_PERIOD: usize = 30;
pub const DEFAULT_WMA_VOLUME_PERIOD: usize = 4;
pub const DEFAULT_WMA_VOLUME_RATIO: f64 = 1.05;
pub const DEFAULT_WMA_ORDER_PERCENTAGE: f64 = 0.99;

const FUND_START_VALUE: f64 = 100.0;
const EXIT_BAND: f64 = 0.98;

/// Weinstein-style weighted-average strategy over two timeframes: the
/// signal comes from aggregated (weekly) bars, orders execute against the
/// daily bar. A period's volume must strictly exceed `volume_ratio` times
/// the mean of the preceding `volume_period` periods to confirm either
/// side of the trade.
pub struct WmaVolumeStrategy {
    name: String,
    symbol: String,
    broker: Arc<dyn Broker>,
    sizer: PercentOfCashSizer,
    wma: Wma,
    agg_closes: Series,
    agg_volumes: Series,
    volume_period: usize,
    volume_ratio: f64,
    tracker: OrderTracker,
    bars_seen: usize,
}

impl WmaVolumeStrategy {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        symbol: String,
        broker: Arc<dyn Broker>,
        order_percentage: f64,
        price_period: usize,
        volume_period: usize,
        volume_ratio: f64,
    ) -> Self {
        Self {
            name,
            symbol,
            broker,
            sizer: PercentOfCashSizer::new(order_percentage),
            wma: Wma::new(price_period),
            agg_closes: Series::new(),
            agg_volumes: Series::new(),
            volume_period,
            volume_ratio,
            tracker: OrderTracker::new(),
            bars_seen: 0,
        }
    }

    /// Strictly-greater volume confirmation; `None` counts as unconfirmed.
    fn volume_confirmed(&self) -> Option<bool> {
        let current = self.agg_volumes.get(0)?;
        let mean = self.agg_volumes.mean(self.volume_period, -1)?;
        Some(current / mean > self.volume_ratio)
    }
}

#[async_trait]
impl Strategy for WmaVolumeStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn on_start(&mut self) {
        self.broker.set_fund_mode(FUND_START_VALUE).await;
    }

    async fn on_aggregate_bar(&mut self, bar: &Bar) {
        self.wma.push(bar.close);
        self.agg_closes.push(bar.close);
        self.agg_volumes.push(bar.volume);
    }

    async fn evaluate(&mut self, bar: &Bar) -> Option<OrderIntent> {
        self.bars_seen += 1;
        debug!(
            "{}: close {:.2}, volume {:.2}",
            self.name, bar.close, bar.volume
        );

        if self.tracker.is_outstanding() {
            return None;
        }
        let confirmed = self.volume_confirmed().unwrap_or(false);
        let wma = self.wma.value()?;
        let agg_close = self.agg_closes.get(0)?;

        if !self.tracker.in_market() {
            if agg_close > wma && confirmed {
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
        } else if agg_close < EXIT_BAND * wma && confirmed {
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
