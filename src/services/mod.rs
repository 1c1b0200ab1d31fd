//! External collaborators: where price bars come from.

pub mod delta;
pub mod market_data;

pub use delta::DeltaRestClient;
pub use market_data::{InMemoryMarketDataProvider, MarketDataProvider};
