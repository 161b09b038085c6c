use crate::types::{
    ExecutionNotification, Notification, OrderId, OrderIntent, OrderSide, OrderStatus,
    TradeNotification,
};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::info;

use super::{Broker, BrokerError};

/// Simulated engine-side broker used by the integration tests: market
/// orders fill instantly at the last marked price and every callback the
/// real engine would deliver is queued for the driver to dispatch.
pub struct DummyBroker {
    name: String,
    account: Mutex<Account>,
}

#[derive(Debug)]
struct PositionEntry {
    qty: u32,
    avg_price: f64,
    // Commission accumulated while the position is open, charged against
    // the net PnL of the closing trade.
    open_commission: f64,
}

#[derive(Debug, Default)]
struct Account {
    cash: f64,
    commission_rate: f64,
    positions: HashMap<String, PositionEntry>,
    marks: HashMap<String, f64>,
    fund_shares: Option<f64>,
    next_order_id: OrderId,
    submissions: Vec<OrderIntent>,
    notifications: Vec<Notification>,
    hold_fills: bool,
    held: Vec<(OrderId, OrderIntent)>,
}

impl Account {
    fn value(&self) -> f64 {
        let positions: f64 = self
            .positions
            .iter()
            .map(|(symbol, p)| {
                let mark = self.marks.get(symbol).copied().unwrap_or(p.avg_price);
                p.qty as f64 * mark
            })
            .sum();
        self.cash + positions
    }

    fn notify(&mut self, order_id: OrderId, intent: &OrderIntent, status: OrderStatus) {
        self.notifications
            .push(Notification::Execution(ExecutionNotification {
                order_id,
                symbol: intent.symbol.clone(),
                side: intent.side,
                status,
                filled_qty: 0,
                filled_price: 0.0,
                cost: 0.0,
                commission: 0.0,
            }));
    }

    /// Fill a market order at the marked price, updating cash and the
    /// position the way the engine's accounting would.
    fn fill(&mut self, order_id: OrderId, intent: &OrderIntent) {
        let Some(price) = self.marks.get(&intent.symbol).copied() else {
            self.notify(order_id, intent, OrderStatus::Rejected);
            return;
        };
        let cost = intent.qty as f64 * price;
        let commission = self.commission_rate * cost;
        let mut closed_trade = None;
        match intent.side {
            OrderSide::Buy => {
                if self.cash < cost + commission {
                    self.notify(order_id, intent, OrderStatus::Margin);
                    return;
                }
                self.cash -= cost + commission;
                let position =
                    self.positions
                        .entry(intent.symbol.clone())
                        .or_insert(PositionEntry {
                            qty: 0,
                            avg_price: 0.0,
                            open_commission: 0.0,
                        });
                let new_qty = position.qty + intent.qty;
                let prev_value = position.qty as f64 * position.avg_price;
                position.avg_price = (prev_value + cost) / new_qty as f64;
                position.qty = new_qty;
                position.open_commission += commission;
            }
            OrderSide::Sell => {
                let Some(position) = self.positions.get_mut(&intent.symbol) else {
                    self.notify(order_id, intent, OrderStatus::Rejected);
                    return;
                };
                if position.qty < intent.qty {
                    self.notify(order_id, intent, OrderStatus::Rejected);
                    return;
                }
                self.cash += cost - commission;
                position.qty -= intent.qty;
                // avg_price stays: it is the cost basis of the remaining units.
                let gross_pnl = (price - position.avg_price) * intent.qty as f64;
                let net_pnl = gross_pnl - position.open_commission - commission;
                if position.qty == 0 {
                    self.positions.remove(&intent.symbol);
                    closed_trade = Some(TradeNotification {
                        symbol: intent.symbol.clone(),
                        gross_pnl,
                        net_pnl,
                    });
                }
            }
        }
        self.notifications
            .push(Notification::Execution(ExecutionNotification {
                order_id,
                symbol: intent.symbol.clone(),
                side: intent.side,
                status: OrderStatus::Completed,
                filled_qty: intent.qty,
                filled_price: price,
                cost,
                commission,
            }));
        if let Some(trade) = closed_trade {
            self.notifications.push(Notification::Trade(trade));
        }
    }
}

impl DummyBroker {
    pub fn new(name: String, starting_cash: f64) -> Self {
        Self {
            name,
            account: Mutex::new(Account {
                cash: starting_cash,
                ..Account::default()
            }),
        }
    }

    pub fn with_commission(mut self, rate: f64) -> Self {
        self.account.get_mut().commission_rate = rate;
        self
    }

    /// Mark the current market price; fills and valuation use it.
    pub async fn mark_price(&self, symbol: &str, price: f64) {
        self.account
            .lock()
            .await
            .marks
            .insert(symbol.to_string(), price);
    }

    /// Drain queued notifications in delivery order.
    pub async fn take_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut self.account.lock().await.notifications)
    }

    /// Every intent ever submitted, for test assertions.
    pub async fn submissions(&self) -> Vec<OrderIntent> {
        self.account.lock().await.submissions.clone()
    }

    /// While held, submitted orders stay `Submitted` until `release_fills`.
    pub async fn hold_fills(&self, hold: bool) {
        self.account.lock().await.hold_fills = hold;
    }

    pub async fn release_fills(&self) {
        let mut account = self.account.lock().await;
        let held = std::mem::take(&mut account.held);
        for (order_id, intent) in held {
            account.fill(order_id, &intent);
        }
    }
}

#[async_trait]
impl Broker for DummyBroker {
    fn name(&self) -> &str {
        &self.name
    }

    async fn submit(&self, intent: &OrderIntent) -> Result<OrderId, BrokerError> {
        let mut account = self.account.lock().await;
        account.next_order_id += 1;
        let order_id = account.next_order_id;
        account.submissions.push(intent.clone());
        if intent.qty == 0 {
            account.notify(order_id, intent, OrderStatus::Rejected);
            return Ok(order_id);
        }
        account.notify(order_id, intent, OrderStatus::Submitted);
        account.notify(order_id, intent, OrderStatus::Accepted);
        if account.hold_fills {
            account.held.push((order_id, intent.clone()));
        } else {
            account.fill(order_id, intent);
            info!(
                "{}: filled order {order_id}, cash now {:.2}",
                self.name, account.cash
            );
        }
        Ok(order_id)
    }

    async fn cash(&self) -> f64 {
        self.account.lock().await.cash
    }

    async fn position(&self, symbol: &str) -> u32 {
        self.account
            .lock()
            .await
            .positions
            .get(symbol)
            .map(|p| p.qty)
            .unwrap_or(0)
    }

    async fn value(&self) -> f64 {
        self.account.lock().await.value()
    }

    async fn add_cash(&self, amount: f64) {
        let mut account = self.account.lock().await;
        if let Some(shares) = account.fund_shares {
            // New shares are issued at the pre-injection unit value, so the
            // injection leaves the fund value untouched.
            let unit_value = account.value() / shares;
            account.fund_shares = Some(shares + amount / unit_value);
        }
        account.cash += amount;
    }

    async fn set_fund_mode(&self, start_value: f64) {
        let mut account = self.account.lock().await;
        let shares = account.value() / start_value;
        account.fund_shares = Some(shares);
    }

    /// Meaningful once fund mode is on; plain account value before that.
    async fn fund_value(&self) -> f64 {
        let account = self.account.lock().await;
        match account.fund_shares {
            Some(shares) => account.value() / shares,
            None => account.value(),
        }
    }

    async fn fund_shares(&self) -> f64 {
        self.account.lock().await.fund_shares.unwrap_or(0.0)
    }
}
