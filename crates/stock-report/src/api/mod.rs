//! HTTP clients for the market data provider and the report endpoint

pub mod polygon;
pub mod report_client;

pub use polygon::{MarketDataSource, PolygonClient};
pub use report_client::ReportClient;

#[cfg(test)]
pub use polygon::MockMarketDataSource;
