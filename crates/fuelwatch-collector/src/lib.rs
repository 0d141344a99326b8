//! Standalone price collector for FuelWatch.
//!
//! 이 crate는 수집 파이프라인을 실행하는 바이너리를 제공합니다:
//! - 연료 가격 수집 (gogo.gs 스크레이핑, fallback 체인)
//! - 환율 수집 (exchangerate-api.com)
//! - 뉴스 수집/분석 (NewsAPI + Gemini/mock)
//! - 변동 감지 및 알림

pub mod config;
pub mod error;
pub mod modules;
pub mod stats;

pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use stats::CollectionStats;
