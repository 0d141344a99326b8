//! 데이터 수집 및 저장.
//!
//! 이 crate는 다음을 제공합니다:
//! - 단발성 HTTP fetch 클라이언트 (타임아웃 + 브라우저 헤더)
//! - 가격 텍스트 추출기 (HTML 노드 탐색 + 숫자 토큰 파싱)
//! - 소스별 스크레이퍼 및 순차 fallback 매니저
//! - 환율 / 뉴스 fetcher
//! - SQLite 저장소

pub mod error;
pub mod provider;
pub mod storage;

pub use error::{DataError, Result};

// Provider 재내보내기
pub use provider::client::{FetchClient, FetchError};
pub use provider::exchange::{ExchangeRateFetcher, MockExchangeRateFetcher};
pub use provider::extract::{extract_numeric, ExtractError};
pub use provider::gogogs::{GogoGsScraper, PlausibleRange};
pub use provider::manager::ScraperManager;
pub use provider::news::{MockNewsFetcher, NewsFetcher};
pub use provider::scrape::{MockFuelScraper, PriceScraper, ScrapeError};

// 저장소 재내보내기
pub use storage::sqlite::SqliteStore;
