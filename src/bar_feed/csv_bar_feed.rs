use super::BarFeed;
use crate::types::Bar;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use std::{collections::VecDeque, fs::File};
use thiserror::Error;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Bar feed backed by a CSV file with
/// `timestamp,open,high,low,close,volume` rows.
pub struct CsvBarFeed {
    name: String,
    symbol: String,
    bars: VecDeque<Bar>,
}

impl CsvBarFeed {
    pub fn new(name: String, symbol: String, path: String) -> Result<Self, CsvBarFeedError> {
        let file = File::open(&path)
            .map_err(|err| CsvBarFeedError::FileOpen(path.clone(), err.to_string()))?;
        let mut rdr = ReaderBuilder::new().from_reader(file);
        let mut bars = VecDeque::new();
        for result in rdr.deserialize() {
            let record: (String, f64, f64, f64, f64, f64) =
                result.map_err(|err| CsvBarFeedError::Read(path.clone(), err.to_string()))?;
            let timestamp = NaiveDateTime::parse_from_str(&record.0, TIMESTAMP_FORMAT)
                .map_err(|err| CsvBarFeedError::Timestamp(record.0.clone(), err.to_string()))?;
            bars.push_back(Bar {
                timestamp,
                open: record.1,
                high: record.2,
                low: record.3,
                close: record.4,
                volume: record.5,
            });
        }
        Ok(Self {
            name,
            symbol,
            bars,
        })
    }
}

#[async_trait]
impl BarFeed for CsvBarFeed {
    fn name(&self) -> &str {
        &self.name
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    async fn next_bar(&mut self) -> Option<Bar> {
        self.bars.pop_front()
    }
}

#[derive(Debug, Error)]
pub enum CsvBarFeedError {
    #[error("Failed to open CSV file ({0}): {1}")]
    FileOpen(String, String),
    #[error("Failed to read CSV record from {0}: {1}")]
    Read(String, String),
    #[error("Invalid bar timestamp `{0}`: {1}")]
    Timestamp(String, String),
}
