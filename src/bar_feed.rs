use crate::types::Bar;
use async_trait::async_trait;

pub mod csv_bar_feed;

/// Ordered, replayable stream of bars for one instrument/timeframe,
/// oldest first.
#[async_trait]
pub trait BarFeed: Send + Sync {
    fn name(&self) -> &str;
    fn symbol(&self) -> &str;
    async fn next_bar(&mut self) -> Option<Bar>;
}
