use rusty_strategies::bar_feed::csv_bar_feed::CsvBarFeed;
use rusty_strategies::broker::dummy::DummyBroker;
use rusty_strategies::broker::Broker;
use rusty_strategies::strategy::dip_accumulator::DipAccumulatorStrategy;
use rusty_strategies::types::OrderSide;
use std::sync::Arc;

mod common;
use common::{generate_ohlcv_csv, run_backtest};

#[tokio::test]
async fn test_buy_fires_one_bar_after_average_settles() {
    // A step from 100 to 110 moves the 3-bar average by well over 1%; the
    // buy window stays armed while the average is in motion and the buy
    // fires on the first bar after it settles, with the cash top-up first.
    let closes = [
        100.0, 100.0, 100.0, 100.0, 100.0, 110.0, 110.0, 110.0, 110.0, 110.0,
    ];
    let csv_file = generate_ohlcv_csv(&closes);
    let path = csv_file.path().to_string_lossy().to_string();

    let mut feed = CsvBarFeed::new("backtest".to_string(), "KO".to_string(), path).unwrap();
    let broker = Arc::new(DummyBroker::new("Dummy".to_string(), 1000.0));
    let mut strat = DipAccumulatorStrategy::new(
        "TestDip".to_string(),
        "KO".to_string(),
        broker.clone(),
        0.95,
        3,
        100.0,
    );
    run_backtest(&mut strat, &mut feed, &broker, None).await;

    let orders = broker.submissions().await;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].side, OrderSide::Buy);
    // Top-up first, then floor(0.95 * 1100 / 110).
    assert_eq!(orders[0].qty, 9);
    let expected_cash = 1000.0 + 100.0 - 9.0 * 110.0;
    assert!((broker.cash().await - expected_cash).abs() < 1e-9);
    assert_eq!(broker.position("KO").await, 9);
}

#[tokio::test]
async fn test_fund_value_unmoved_by_injection() {
    // Same run as above: the top-up mints new fund shares at the
    // pre-injection unit value, so the reported fund return stays 0.00%
    // (the position was bought at the marked price, no gain yet).
    let closes = [
        100.0, 100.0, 100.0, 100.0, 100.0, 110.0, 110.0, 110.0, 110.0, 110.0,
    ];
    let csv_file = generate_ohlcv_csv(&closes);
    let path = csv_file.path().to_string_lossy().to_string();

    let mut feed = CsvBarFeed::new("backtest".to_string(), "KO".to_string(), path).unwrap();
    let broker = Arc::new(DummyBroker::new("Dummy".to_string(), 1000.0));
    let mut strat = DipAccumulatorStrategy::new(
        "TestDip".to_string(),
        "KO".to_string(),
        broker.clone(),
        0.95,
        3,
        100.0,
    );
    run_backtest(&mut strat, &mut feed, &broker, None).await;

    assert!((broker.fund_value().await - 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_steady_average_never_buys() {
    let closes = [100.0; 12];
    let csv_file = generate_ohlcv_csv(&closes);
    let path = csv_file.path().to_string_lossy().to_string();

    let mut feed = CsvBarFeed::new("backtest".to_string(), "KO".to_string(), path).unwrap();
    let broker = Arc::new(DummyBroker::new("Dummy".to_string(), 1000.0));
    let mut strat = DipAccumulatorStrategy::new(
        "TestDip".to_string(),
        "KO".to_string(),
        broker.clone(),
        0.95,
        3,
        100.0,
    );
    run_backtest(&mut strat, &mut feed, &broker, None).await;

    assert!(broker.submissions().await.is_empty());
    assert!((broker.cash().await - 1000.0).abs() < 1e-9);
}
