#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rusty_strategies::bar_feed::BarFeed;
use rusty_strategies::broker::dummy::DummyBroker;
use rusty_strategies::broker::Broker;
use rusty_strategies::strategy::Strategy;
use rusty_strategies::types::{Bar, Notification, OrderIntent};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

pub fn start_timestamp() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2023-01-02 16:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
}

/// One daily OHLCV row per close, fixed volume.
pub fn generate_ohlcv_csv(closes: &[f64]) -> NamedTempFile {
    let rows: Vec<(f64, f64)> = closes.iter().map(|&close| (close, 1500.0)).collect();
    generate_ohlcv_csv_rows(&rows)
}

/// One daily OHLCV row per (close, volume) pair.
pub fn generate_ohlcv_csv_rows(rows: &[(f64, f64)]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "timestamp,open,high,low,close,volume").unwrap();
    let start = start_timestamp();
    for (i, (close, volume)) in rows.iter().enumerate() {
        let ts = start + Duration::days(i as i64);
        writeln!(
            file,
            "{},{},{},{},{},{}",
            ts,
            close,
            close + 0.5,
            close - 0.5,
            close,
            volume
        )
        .unwrap();
    }
    file
}

/// 400 bars: uptrend then downtrend, the classic crossover fixture.
pub fn generate_trend_csv() -> NamedTempFile {
    let closes: Vec<f64> = (0..400)
        .map(|i| {
            if i < 200 {
                100.0 + i as f64 * 0.2
            } else {
                200.0 - (i as f64 - 200.0) * 0.3
            }
        })
        .collect();
    generate_ohlcv_csv(&closes)
}

/// Collapse a window of bars into one slower-timeframe bar.
pub fn aggregate_bars(bars: &[Bar]) -> Bar {
    Bar {
        timestamp: bars.last().unwrap().timestamp,
        open: bars.first().unwrap().open,
        high: bars.iter().map(|b| b.high).fold(f64::MIN, f64::max),
        low: bars.iter().map(|b| b.low).fold(f64::MAX, f64::min),
        close: bars.last().unwrap().close,
        volume: bars.iter().map(|b| b.volume).sum(),
    }
}

/// Hand one intent to the broker and dispatch the resulting callbacks,
/// the way the engine would.
pub async fn submit_and_dispatch(
    strategy: &mut dyn Strategy,
    broker: &Arc<DummyBroker>,
    intent: &OrderIntent,
) {
    broker.submit(intent).await.unwrap();
    dispatch_notifications(strategy, broker).await;
}

pub async fn dispatch_notifications(strategy: &mut dyn Strategy, broker: &Arc<DummyBroker>) {
    for notification in broker.take_notifications().await {
        match notification {
            Notification::Execution(execution) => strategy.on_execution(&execution).await,
            Notification::Trade(trade) => strategy.on_trade_closed(&trade).await,
        }
    }
}

/// Sequential backtest loop standing in for the external engine: mark the
/// price, deliver any completed aggregate bar, evaluate, execute the
/// intent, dispatch callbacks, then fire due timers at session end.
pub async fn run_backtest(
    strategy: &mut dyn Strategy,
    feed: &mut dyn BarFeed,
    broker: &Arc<DummyBroker>,
    aggregate_every: Option<usize>,
) {
    strategy.on_start().await;
    let timer = strategy.timer();
    let symbol = feed.symbol().to_string();
    let mut prev_session: Option<NaiveDate> = None;
    let mut window: Vec<Bar> = Vec::new();

    while let Some(bar) = feed.next_bar().await {
        broker.mark_price(&symbol, bar.close).await;
        if let Some(every) = aggregate_every {
            window.push(bar.clone());
            if window.len() == every {
                let aggregate = aggregate_bars(&window);
                strategy.on_aggregate_bar(&aggregate).await;
                window.clear();
            }
        }
        if let Some(intent) = strategy.evaluate(&bar).await {
            submit_and_dispatch(strategy, broker, &intent).await;
        }
        let session = bar.timestamp.date();
        if let Some(schedule) = timer {
            if schedule.due(prev_session, session) {
                if let Some(intent) = strategy.on_timer(session).await {
                    submit_and_dispatch(strategy, broker, &intent).await;
                }
            }
        }
        prev_session = Some(session);
    }
    strategy.on_stop().await;
}
