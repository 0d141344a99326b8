//! 에러 타입 정의.

use std::fmt;

/// Collector 에러 타입
#[derive(Debug)]
pub enum CollectorError {
    /// 저장소 에러
    Store(fuelwatch_core::StoreError),
    /// 데이터 소스 에러 (스크레이핑, 환율 API, NewsAPI)
    Data(fuelwatch_data::DataError),
    /// 스크레이퍼 체인 에러
    Scrape(fuelwatch_data::ScrapeError),
    /// 변동 감지 에러
    Detect(fuelwatch_detect::DetectError),
    /// 뉴스 분석 에러
    Analyzer(fuelwatch_detect::AnalyzerError),
    /// 설정 에러
    Config(String),
    /// 일반 에러
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for CollectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "Store error: {}", e),
            Self::Data(e) => write!(f, "Data source error: {}", e),
            Self::Scrape(e) => write!(f, "Scrape error: {}", e),
            Self::Detect(e) => write!(f, "Detection error: {}", e),
            Self::Analyzer(e) => write!(f, "Analyzer error: {}", e),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Other(e) => write!(f, "Error: {}", e),
        }
    }
}

impl std::error::Error for CollectorError {}

impl From<fuelwatch_core::StoreError> for CollectorError {
    fn from(err: fuelwatch_core::StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<fuelwatch_data::DataError> for CollectorError {
    fn from(err: fuelwatch_data::DataError) -> Self {
        Self::Data(err)
    }
}

impl From<fuelwatch_data::ScrapeError> for CollectorError {
    fn from(err: fuelwatch_data::ScrapeError) -> Self {
        Self::Scrape(err)
    }
}

impl From<fuelwatch_detect::DetectError> for CollectorError {
    fn from(err: fuelwatch_detect::DetectError) -> Self {
        Self::Detect(err)
    }
}

impl From<fuelwatch_detect::AnalyzerError> for CollectorError {
    fn from(err: fuelwatch_detect::AnalyzerError) -> Self {
        Self::Analyzer(err)
    }
}

impl From<std::env::VarError> for CollectorError {
    fn from(err: std::env::VarError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CollectorError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::Other(err)
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
