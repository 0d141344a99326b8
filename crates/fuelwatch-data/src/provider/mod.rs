//! 외부 데이터 소스 Provider 모듈.

pub mod client;
pub mod exchange;
pub mod extract;
pub mod gogogs;
pub mod manager;
pub mod news;
pub mod scrape;

pub use client::{FetchClient, FetchError};
pub use exchange::{ExchangeRateFetcher, MockExchangeRateFetcher};
pub use extract::{extract_numeric, ExtractError};
pub use gogogs::{GogoGsScraper, PlausibleRange};
pub use manager::ScraperManager;
pub use news::{MockNewsFetcher, NewsFetcher};
pub use scrape::{MockFuelScraper, PriceScraper, ScrapeError};
