//! # FuelWatch Core
//!
//! 연료 가격 / 환율 감시 시스템의 핵심 도메인 모델.
//!
//! 이 crate는 다음을 제공합니다:
//! - 수집 샘플 타입 (`FuelPriceSample`, `ExchangeRateSample`)
//! - 영속화 모델 (`FuelPrice`, `ExchangeRate`, `PriceChange`)
//! - 뉴스 타입 (`NewsArticle`, `AnalyzedNews`)
//! - 시계열 구분 (`Series`) 및 저장소 trait (`ObservationStore`)

pub mod change;
pub mod exchange;
pub mod fuel;
pub mod news;
pub mod series;
pub mod store;

pub use change::PriceChange;
pub use exchange::{ExchangeRate, ExchangeRateSample};
pub use fuel::{FuelPrice, FuelPriceSample};
pub use news::{AnalyzedNews, ImpactLevel, NewsArticle, Sentiment};
pub use series::Series;
pub use store::{ObservationStore, StoreError};
