use chrono::NaiveDate;
use rusty_strategies::bar_feed::csv_bar_feed::CsvBarFeed;
use rusty_strategies::broker::dummy::DummyBroker;
use rusty_strategies::broker::Broker;
use rusty_strategies::strategy::monthly_contribution::MonthlyContributionStrategy;
use rusty_strategies::strategy::Strategy;
use rusty_strategies::types::{Bar, OrderSide};
use std::sync::Arc;

mod common;
use common::{generate_ohlcv_csv, run_backtest, start_timestamp, submit_and_dispatch};

#[tokio::test]
async fn test_contribution_on_first_session_of_each_month() {
    // Sixty daily sessions starting 2023-01-02: the schedule is due on the
    // feed's first session, then on Feb 1 and Mar 1.
    let closes = [50.0; 60];
    let csv_file = generate_ohlcv_csv(&closes);
    let path = csv_file.path().to_string_lossy().to_string();

    let mut feed = CsvBarFeed::new("backtest".to_string(), "KO".to_string(), path).unwrap();
    let broker = Arc::new(DummyBroker::new("Dummy".to_string(), 1000.0));
    let mut strat = MonthlyContributionStrategy::new(
        "TestMonthly".to_string(),
        "KO".to_string(),
        broker.clone(),
        100.0,
    );
    run_backtest(&mut strat, &mut feed, &broker, None).await;

    let orders = broker.submissions().await;
    assert_eq!(orders.len(), 3);
    for order in &orders {
        assert_eq!(order.side, OrderSide::Buy);
        // Each firing buys exactly the contribution's worth of units.
        assert_eq!(order.qty, 2);
    }
    // Every injected amount was spent on the rebalancing buys.
    assert!((broker.cash().await - 1000.0).abs() < 1e-9);
    assert_eq!(broker.position("KO").await, 6);
    // Injections mint shares instead of moving the fund value.
    assert!((broker.fund_value().await - 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_two_firings_inject_exactly_two_contributions() {
    let broker = Arc::new(DummyBroker::new("Dummy".to_string(), 1000.0));
    let mut strat = MonthlyContributionStrategy::new(
        "TestMonthly".to_string(),
        "KO".to_string(),
        broker.clone(),
        100.0,
    );
    strat.on_start().await;
    broker.mark_price("KO", 50.0).await;
    let session_bar = Bar {
        timestamp: start_timestamp(),
        open: 50.0,
        high: 50.5,
        low: 49.5,
        close: 50.0,
        volume: 1500.0,
    };
    assert!(strat.evaluate(&session_bar).await.is_none());

    for month in [2u32, 3u32] {
        let session = NaiveDate::from_ymd_opt(2023, month, 1).unwrap();
        let intent = strat.on_timer(session).await.unwrap();
        assert_eq!(intent.side, OrderSide::Buy);
        assert_eq!(intent.qty, 2);
        submit_and_dispatch(&mut strat, &broker, &intent).await;
    }

    assert_eq!(broker.submissions().await.len(), 2);
    // 200 in, 200 spent on 4 units at 50.
    assert!((broker.cash().await - 1000.0).abs() < 1e-9);
    assert_eq!(broker.position("KO").await, 4);
}

#[tokio::test]
async fn test_timer_before_any_session_only_injects() {
    let broker = Arc::new(DummyBroker::new("Dummy".to_string(), 1000.0));
    let mut strat = MonthlyContributionStrategy::new(
        "TestMonthly".to_string(),
        "KO".to_string(),
        broker.clone(),
        100.0,
    );
    strat.on_start().await;

    let session = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    // No close observed yet: the cash lands but no rebalance is possible.
    assert!(strat.on_timer(session).await.is_none());
    assert!((broker.cash().await - 1100.0).abs() < 1e-9);
    assert!(broker.submissions().await.is_empty());
}
