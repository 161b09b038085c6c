use std::collections::HashMap;

use anyhow::Result;
use config::Value;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct BotConfig {
    pub strategies: Vec<StrategyConfig>,
}

#[derive(Debug, Deserialize)]
pub struct StrategyConfig {
    /// The name of the strategy
    pub name: String,
    /// The type of the strategy
    pub r#type: StrategyType,
    /// The engine-supplied broker handle the strategy trades against
    pub broker: String,
    /// The instrument the strategy orders
    pub symbol: String,
    /// Extra optional parameters that might be needed for the specific strategy
    pub params: Option<HashMap<String, Value>>,
}

#[derive(Debug, Deserialize)]
pub enum StrategyType {
    DownStreakStrategy,
    SmaCrossStrategy,
    WmaVolumeStrategy,
    GoldenCrossStrategy,
    DipAccumulatorStrategy,
    MonthlyContributionStrategy,
}

impl BotConfig {
    pub fn deserialize_from_file(path: &str) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;
        let config = config.try_deserialize()?;
        Ok(config)
    }
}
