//! 스크레이퍼 trait 및 공통 오류 타입.

use crate::provider::client::FetchError;
use crate::provider::extract::ExtractError;
use async_trait::async_trait;
use chrono::Utc;
use fuelwatch_core::FuelPriceSample;
use thiserror::Error;
use tracing::info;

/// 스크레이핑 계층 오류.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// HTTP fetch 실패
    #[error("fetch 실패: {0}")]
    Fetch(#[from] FetchError),

    /// 숫자 추출 실패
    #[error("추출 실패: {0}")]
    Extract(#[from] ExtractError),

    /// 필터링 후 필요한 필드 수에 미달
    #[error("가격 정보 부족 (필요 {required}건, 발견 {found}건)")]
    InsufficientData { required: usize, found: usize },

    /// 순차 fallback 체인이 전부 소진됨
    #[error("모든 스크레이퍼가 실패했습니다 ({}개 소스)", .causes.len())]
    AllSourcesFailed { causes: Vec<(String, ScrapeError)> },
}

/// 연료 가격 스크레이퍼.
///
/// 구현체는 전역 상태를 변경하지 않으며 (네트워크 호출 외 부수효과 없음)
/// 처음부터 다시 시도해도 안전합니다.
#[async_trait]
pub trait PriceScraper: Send + Sync {
    /// 소스 식별용 이름
    fn name(&self) -> &str;

    /// 한 번의 관측 샘플을 수집합니다.
    ///
    /// 세 필드(regular/premium/diesel)가 모두 채워진 샘플만 반환하며,
    /// 부분 샘플은 절대 반환하지 않습니다.
    async fn scrape(&self) -> Result<FuelPriceSample, ScrapeError>;
}

/// 합성 샘플을 반환하는 mock 스크레이퍼.
///
/// 실제 소스가 전부 실패했을 때의 fallback, 그리고 오프라인 실행에 사용됩니다.
pub struct MockFuelScraper;

impl MockFuelScraper {
    /// 고정 합성 샘플 생성 (날짜는 오늘)
    pub fn sample() -> FuelPriceSample {
        FuelPriceSample {
            date: Utc::now().date_naive(),
            regular: 180.0,
            premium: 179.2,
            diesel: 148.8,
            region: "全国平均".to_string(),
        }
    }
}

#[async_trait]
impl PriceScraper for MockFuelScraper {
    fn name(&self) -> &str {
        "mock"
    }

    async fn scrape(&self) -> Result<FuelPriceSample, ScrapeError> {
        info!("mock 연료 가격 샘플 사용");
        Ok(Self::sample())
    }
}
