use crate::{
    broker::Broker,
    config::{BotConfig, StrategyType},
    strategy::{
        dip_accumulator::{
            DipAccumulatorStrategy, DEFAULT_DIP_ORDER_PERCENTAGE, DEFAULT_DIP_SMA_PERIOD,
            DEFAULT_DIP_TOP_UP,
        },
        down_streak::{
            DownStreakStrategy, DEFAULT_DOWN_STREAK_EXIT_BARS,
            DEFAULT_DOWN_STREAK_ORDER_PERCENTAGE,
        },
        golden_cross::{
            GoldenCrossStrategy, DEFAULT_GOLDEN_CROSS_FAST_PERIOD,
            DEFAULT_GOLDEN_CROSS_ORDER_PERCENTAGE, DEFAULT_GOLDEN_CROSS_SLOW_PERIOD,
        },
        monthly_contribution::{MonthlyContributionStrategy, DEFAULT_MONTHLY_CASH},
        sma_cross::{SmaCrossStrategy, DEFAULT_SMA_CROSS_ORDER_PERCENTAGE, DEFAULT_SMA_CROSS_PERIOD},
        wma_volume::{
            WmaVolumeStrategy, DEFAULT_WMA_ORDER_PERCENTAGE, DEFAULT_WMA_PRICE_PERIOD,
            DEFAULT_WMA_VOLUME_PERIOD, DEFAULT_WMA_VOLUME_RATIO,
        },
        Strategy,
    },
};
use config::Value;
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;

/// Build the configured strategy set against engine-supplied broker
/// handles. Brokers are shared between strategies, which is why they stay
/// in `Arc`.
pub fn build_strategies(
    bot_config: BotConfig,
    brokers: &HashMap<String, Arc<dyn Broker>>,
) -> Result<Vec<Box<dyn Strategy>>, FactoryError> {
    let mut strategies = Vec::new();
    for config in bot_config.strategies {
        let broker = brokers
            .get(&config.broker)
            .cloned()
            .ok_or(FactoryError::UnknownBroker(config.broker))?;
        let params = config.params;
        let strategy: Box<dyn Strategy> = match config.r#type {
            StrategyType::DownStreakStrategy => Box::new(DownStreakStrategy::new(
                config.name,
                config.symbol,
                broker,
                get_f64_param(
                    &params,
                    "order_percentage",
                    DEFAULT_DOWN_STREAK_ORDER_PERCENTAGE,
                ),
                get_usize_param(&params, "exit_bars", DEFAULT_DOWN_STREAK_EXIT_BARS),
            )),
            StrategyType::SmaCrossStrategy => Box::new(SmaCrossStrategy::new(
                config.name,
                config.symbol,
                broker,
                get_f64_param(
                    &params,
                    "order_percentage",
                    DEFAULT_SMA_CROSS_ORDER_PERCENTAGE,
                ),
                get_usize_param(&params, "period", DEFAULT_SMA_CROSS_PERIOD),
            )),
            StrategyType::WmaVolumeStrategy => Box::new(WmaVolumeStrategy::new(
                config.name,
                config.symbol,
                broker,
                get_f64_param(&params, "order_percentage", DEFAULT_WMA_ORDER_PERCENTAGE),
                get_usize_param(&params, "price_period", DEFAULT_WMA_PRICE_PERIOD),
                get_usize_param(&params, "volume_period", DEFAULT_WMA_VOLUME_PERIOD),
                get_f64_param(&params, "volume_ratio", DEFAULT_WMA_VOLUME_RATIO),
            )),
            StrategyType::GoldenCrossStrategy => Box::new(GoldenCrossStrategy::new(
                config.name,
                config.symbol,
                broker,
                get_f64_param(
                    &params,
                    "order_percentage",
                    DEFAULT_GOLDEN_CROSS_ORDER_PERCENTAGE,
                ),
                get_usize_param(&params, "fast_period", DEFAULT_GOLDEN_CROSS_FAST_PERIOD),
                get_usize_param(&params, "slow_period", DEFAULT_GOLDEN_CROSS_SLOW_PERIOD),
            )),
            StrategyType::DipAccumulatorStrategy => Box::new(DipAccumulatorStrategy::new(
                config.name,
                config.symbol,
                broker,
                get_f64_param(&params, "order_percentage", DEFAULT_DIP_ORDER_PERCENTAGE),
                get_usize_param(&params, "period", DEFAULT_DIP_SMA_PERIOD),
                get_f64_param(&params, "top_up", DEFAULT_DIP_TOP_UP),
            )),
            StrategyType::MonthlyContributionStrategy => {
                Box::new(MonthlyContributionStrategy::new(
                    config.name,
                    config.symbol,
                    broker,
                    get_f64_param(&params, "monthly_cash", DEFAULT_MONTHLY_CASH),
                ))
            }
        };
        strategies.push(strategy);
    }
    Ok(strategies)
}

fn get_usize_param(params: &Option<HashMap<String, Value>>, key: &str, default: usize) -> usize {
    params
        .as_ref()
        .and_then(|p| p.get(key))
        .and_then(|v| v.clone().into_uint().ok())
        .and_then(|v| v.try_into().ok())
        .unwrap_or(default)
}

fn get_f64_param(params: &Option<HashMap<String, Value>>, key: &str, default: f64) -> f64 {
    params
        .as_ref()
        .and_then(|p| p.get(key))
        .and_then(|v| v.clone().into_float().ok())
        .unwrap_or(default)
}

#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("The broker `{0}` was not found in the config")]
    UnknownBroker(String),
}
