use crate::types::{ExecutionNotification, OrderId, OrderSide, OrderStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackerState {
    Idle,
    /// An intent has been emitted and no terminal notification has arrived.
    /// The order id is unknown until the first notification carries it.
    Outstanding { order_id: Option<OrderId> },
}

/// Per-strategy record of the one order that may be in flight, plus the
/// entry bookkeeping the exit rules need.
///
/// Driven exclusively by intent emission (`mark_submitted`) and execution
/// notifications (`apply_execution`); never polls.
#[derive(Debug)]
pub struct OrderTracker {
    state: TrackerState,
    entry_bar: Option<usize>,
    position_qty: u32,
    last_buy_price: Option<f64>,
}

impl Default for OrderTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderTracker {
    pub fn new() -> Self {
        Self {
            state: TrackerState::Idle,
            entry_bar: None,
            position_qty: 0,
            last_buy_price: None,
        }
    }

    /// True while an emitted intent has not reached a terminal status.
    /// Evaluations must emit nothing while this holds.
    pub fn is_outstanding(&self) -> bool {
        matches!(self.state, TrackerState::Outstanding { .. })
    }

    pub fn pending_order(&self) -> Option<OrderId> {
        match self.state {
            TrackerState::Outstanding { order_id } => order_id,
            TrackerState::Idle => None,
        }
    }

    /// Bar count recorded when the current position was opened.
    pub fn entry_bar(&self) -> Option<usize> {
        self.entry_bar
    }

    pub fn position_qty(&self) -> u32 {
        self.position_qty
    }

    pub fn in_market(&self) -> bool {
        self.position_qty > 0
    }

    pub fn last_buy_price(&self) -> Option<f64> {
        self.last_buy_price
    }

    /// Record that an intent was just emitted for this evaluation cycle.
    pub fn mark_submitted(&mut self) {
        self.state = TrackerState::Outstanding { order_id: None };
    }

    /// Apply one execution notification. `bars_seen` is the number of bars
    /// evaluated so far; it becomes the entry bar on a completed buy.
    pub fn apply_execution(&mut self, notification: &ExecutionNotification, bars_seen: usize) {
        match notification.status {
            OrderStatus::Submitted | OrderStatus::Accepted => {
                if self.is_outstanding() {
                    self.state = TrackerState::Outstanding {
                        order_id: Some(notification.order_id),
                    };
                }
            }
            OrderStatus::Completed => {
                match notification.side {
                    OrderSide::Buy => {
                        self.position_qty += notification.filled_qty;
                        self.entry_bar = Some(bars_seen);
                        self.last_buy_price = Some(notification.filled_price);
                    }
                    OrderSide::Sell => {
                        self.position_qty = self.position_qty.saturating_sub(notification.filled_qty);
                        if self.position_qty == 0 {
                            self.entry_bar = None;
                            self.last_buy_price = None;
                        }
                    }
                }
                self.state = TrackerState::Idle;
            }
            OrderStatus::Canceled | OrderStatus::Margin | OrderStatus::Rejected => {
                // No retry; just clear the pending flag.
                self.state = TrackerState::Idle;
            }
        }
    }
}
