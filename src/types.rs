use chrono::NaiveDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
    Buy,
    Sell,
}

/// One OHLCV sample for a fixed time interval, immutable once produced.
#[derive(Debug, Clone)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// A strategy's decision to buy/sell, prior to execution by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderIntent {
    pub symbol: String,
    pub side: OrderSide,
    pub qty: u32,
}

/// Assigned by the engine at submission.
pub type OrderId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Submitted,
    Accepted,
    Completed,
    Canceled,
    Margin,
    Rejected,
}

impl OrderStatus {
    /// Terminal statuses clear the pending order on the strategy side.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Completed
                | OrderStatus::Canceled
                | OrderStatus::Margin
                | OrderStatus::Rejected
        )
    }
}

/// Delivered by the engine after order routing. Fill fields are only
/// meaningful when `status` is `Completed`.
#[derive(Debug, Clone)]
pub struct ExecutionNotification {
    pub order_id: OrderId,
    pub symbol: String,
    pub side: OrderSide,
    pub status: OrderStatus,
    pub filled_qty: u32,
    pub filled_price: f64,
    pub cost: f64,
    pub commission: f64,
}

/// Delivered by the engine when a position is fully closed.
#[derive(Debug, Clone)]
pub struct TradeNotification {
    pub symbol: String,
    pub gross_pnl: f64,
    pub net_pnl: f64,
}

/// Either kind of engine callback payload, in delivery order.
#[derive(Debug, Clone)]
pub enum Notification {
    Execution(ExecutionNotification),
    Trade(TradeNotification),
}
