//! 스크레이퍼 순차 fallback 매니저.
//!
//! 등록된 스크레이퍼를 설정 순서대로 시도합니다. 순서가 곧 선호도이므로
//! 동시에 경쟁시키지 않으며, 첫 성공이 나머지를 건너뜁니다.
//! 개별 실패는 로그로 남기고 다음 소스로 넘어가며, 전체 소진만이
//! 상위로 전파됩니다.

use crate::provider::scrape::{MockFuelScraper, PriceScraper, ScrapeError};
use fuelwatch_core::FuelPriceSample;
use tracing::{info, warn};

/// 스크레이퍼 fallback 체인.
pub struct ScraperManager {
    scrapers: Vec<Box<dyn PriceScraper>>,
}

impl ScraperManager {
    /// 순서 있는 스크레이퍼 목록으로 생성합니다 (앞쪽이 선호 소스).
    pub fn new(scrapers: Vec<Box<dyn PriceScraper>>) -> Self {
        Self { scrapers }
    }

    /// fallback 체인을 실행합니다.
    ///
    /// 모든 소스가 실패하면:
    /// - `use_mock == true`: 합성 샘플로 대체 (호출자가 명시적으로 허용한
    ///   경우에만 — 조용한 기본값이 아님)
    /// - `use_mock == false`: 개별 원인을 모두 담은
    ///   `ScrapeError::AllSourcesFailed` 반환
    pub async fn scrape_with_fallback(
        &self,
        use_mock: bool,
    ) -> Result<FuelPriceSample, ScrapeError> {
        info!(sources = self.scrapers.len(), "스크레이핑 시작");

        let mut causes = Vec::new();

        for (index, scraper) in self.scrapers.iter().enumerate() {
            info!(index = index, source = scraper.name(), "스크레이퍼 시도");

            match scraper.scrape().await {
                Ok(sample) => {
                    info!(source = scraper.name(), "스크레이핑 성공");
                    return Ok(sample);
                }
                Err(err) => {
                    warn!(
                        index = index,
                        source = scraper.name(),
                        error = %err,
                        "스크레이핑 실패, 다음 소스로"
                    );
                    causes.push((scraper.name().to_string(), err));
                }
            }
        }

        if use_mock {
            warn!("모든 소스 실패, mock 데이터로 fallback");
            return Ok(MockFuelScraper::sample());
        }

        Err(ScrapeError::AllSourcesFailed { causes })
    }

    /// 모든 스크레이퍼를 실행하고 성공한 샘플을 전부 모읍니다.
    ///
    /// 성공 집합이 비어 있을 때만 실패합니다.
    pub async fn scrape_all(&self) -> Result<Vec<FuelPriceSample>, ScrapeError> {
        let mut results = Vec::new();
        let mut causes = Vec::new();

        for scraper in &self.scrapers {
            match scraper.scrape().await {
                Ok(sample) => results.push(sample),
                Err(err) => {
                    warn!(source = scraper.name(), error = %err, "스크레이핑 실패");
                    causes.push((scraper.name().to_string(), err));
                }
            }
        }

        if results.is_empty() {
            return Err(ScrapeError::AllSourcesFailed { causes });
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    /// 항상 실패하는 스텁
    struct FailingScraper {
        name: &'static str,
    }

    #[async_trait]
    impl PriceScraper for FailingScraper {
        fn name(&self) -> &str {
            self.name
        }

        async fn scrape(&self) -> Result<FuelPriceSample, ScrapeError> {
            Err(ScrapeError::InsufficientData {
                required: 3,
                found: 0,
            })
        }
    }

    /// 항상 성공하는 스텁
    struct FixedScraper {
        regular: f64,
    }

    #[async_trait]
    impl PriceScraper for FixedScraper {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn scrape(&self) -> Result<FuelPriceSample, ScrapeError> {
            Ok(FuelPriceSample {
                date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
                regular: self.regular,
                premium: 179.2,
                diesel: 148.8,
                region: "全国平均".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_first_failure_falls_through_to_next() {
        let manager = ScraperManager::new(vec![
            Box::new(FailingScraper { name: "a" }),
            Box::new(FixedScraper { regular: 168.5 }),
        ]);

        let sample = manager.scrape_with_fallback(false).await.unwrap();
        assert_eq!(sample.regular, 168.5);
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        // 앞선 소스가 성공하면 뒤쪽 값은 쓰이지 않아야 함
        let manager = ScraperManager::new(vec![
            Box::new(FixedScraper { regular: 160.0 }),
            Box::new(FixedScraper { regular: 999.0 }),
        ]);

        let sample = manager.scrape_with_fallback(false).await.unwrap();
        assert_eq!(sample.regular, 160.0);
    }

    #[tokio::test]
    async fn test_exhaustion_with_mock_enabled() {
        let manager = ScraperManager::new(vec![
            Box::new(FailingScraper { name: "a" }),
            Box::new(FailingScraper { name: "b" }),
        ]);

        let sample = manager.scrape_with_fallback(true).await.unwrap();
        assert_eq!(sample, MockFuelScraper::sample());
    }

    #[tokio::test]
    async fn test_exhaustion_without_mock_aggregates_causes() {
        let manager = ScraperManager::new(vec![
            Box::new(FailingScraper { name: "a" }),
            Box::new(FailingScraper { name: "b" }),
        ]);

        let err = manager.scrape_with_fallback(false).await.unwrap_err();
        match err {
            ScrapeError::AllSourcesFailed { causes } => {
                assert_eq!(causes.len(), 2);
                assert_eq!(causes[0].0, "a");
                assert_eq!(causes[1].0, "b");
            }
            other => panic!("AllSourcesFailed여야 함: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_scrape_all_collects_successes() {
        let manager = ScraperManager::new(vec![
            Box::new(FixedScraper { regular: 160.0 }),
            Box::new(FailingScraper { name: "a" }),
            Box::new(FixedScraper { regular: 170.0 }),
        ]);

        let samples = manager.scrape_all().await.unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].regular, 160.0);
        assert_eq!(samples[1].regular, 170.0);
    }

    #[tokio::test]
    async fn test_scrape_all_fails_only_when_empty() {
        let manager = ScraperManager::new(vec![Box::new(FailingScraper { name: "a" })]);
        let err = manager.scrape_all().await.unwrap_err();
        assert!(matches!(err, ScrapeError::AllSourcesFailed { .. }));
    }
}
