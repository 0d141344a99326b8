//! gogo.gs 연료 가격 스크레이퍼.
//!
//! 전국 평균 가격 페이지의 `div.price` 요소들에서 레귤러/하이옥탄/경유
//! 가격을 추출합니다.
//!
//! ## 필드 매핑
//! 1. 라벨 기반: 가격 요소 주변 텍스트에서 レギュラー/ハイオク/軽油
//!    라벨을 찾아 매핑 (우선 경로)
//! 2. 위치 기반 fallback: 라벨을 못 찾으면 문서 순서상 처음 세 개의
//!    유효 가격을 regular/premium/diesel로 간주
//!
//! 위치 기반 매핑은 사이트 레이아웃 변경에 취약합니다. 필드 순서가
//! 바뀌면 값이 조용히 뒤섞이므로 라벨 경로가 항상 먼저 시도됩니다.

use crate::provider::client::FetchClient;
use crate::provider::extract::{extract_numeric, text_content};
use crate::provider::scrape::{PriceScraper, ScrapeError};
use async_trait::async_trait;
use chrono::Utc;
use fuelwatch_core::FuelPriceSample;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info};

/// 타당한 가격 범위 (円/L). 범위 밖 후보는 버려집니다.
#[derive(Debug, Clone, Copy)]
pub struct PlausibleRange {
    pub min: f64,
    pub max: f64,
}

impl PlausibleRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for PlausibleRange {
    /// 일본 연료 가격 기준 100〜300円
    fn default() -> Self {
        Self {
            min: 100.0,
            max: 300.0,
        }
    }
}

/// 연료 종류별 라벨 (gogo.gs 표기)
const LABEL_REGULAR: &str = "レギュラー";
const LABEL_PREMIUM: &str = "ハイオク";
const LABEL_DIESEL: &str = "軽油";

/// 필요한 필드 수 (regular / premium / diesel)
const REQUIRED_FIELDS: usize = 3;

/// gogo.gs 스크레이퍼.
pub struct GogoGsScraper {
    client: FetchClient,
    base_url: String,
    range: PlausibleRange,
}

impl GogoGsScraper {
    /// 기본 설정으로 생성 (타임아웃 15초, 범위 100〜300)
    pub fn new() -> Result<Self, ScrapeError> {
        Self::with_config("https://gogo.gs/", Duration::from_secs(15), PlausibleRange::default())
    }

    /// 커스텀 설정으로 생성
    pub fn with_config(
        base_url: &str,
        timeout: Duration,
        range: PlausibleRange,
    ) -> Result<Self, ScrapeError> {
        Ok(Self {
            client: FetchClient::new(timeout)?,
            base_url: base_url.to_string(),
            range,
        })
    }

    /// HTML 본문에서 (regular, premium, diesel)을 추출합니다.
    fn extract_sample(&self, body: &str) -> Result<(f64, f64, f64), ScrapeError> {
        let document = Html::parse_document(body);

        // 1. 라벨 기반 매핑 시도
        if let Some(prices) = self.extract_labeled(&document) {
            debug!("라벨 기반 매핑 성공");
            return Ok(prices);
        }

        // 2. 위치 기반 fallback: 문서 순서상 처음 세 개의 유효 가격
        let candidates = self.extract_positional(&document);
        if candidates.len() < REQUIRED_FIELDS {
            return Err(ScrapeError::InsufficientData {
                required: REQUIRED_FIELDS,
                found: candidates.len(),
            });
        }

        debug!("위치 기반 매핑 사용 (라벨 없음)");
        Ok((candidates[0], candidates[1], candidates[2]))
    }

    /// 가격 요소 주변 텍스트의 연료 라벨로 필드를 매핑합니다.
    ///
    /// 세 라벨이 전부 매핑된 경우에만 결과를 반환합니다.
    fn extract_labeled(&self, document: &Html) -> Option<(f64, f64, f64)> {
        let selector = Selector::parse("div.price").ok()?;

        let mut regular = None;
        let mut premium = None;
        let mut diesel = None;

        for element in document.select(&selector) {
            let Some(value) = self.accept(element) else {
                continue;
            };

            // 부모 요소의 텍스트에서 연료 라벨 탐색
            let context = element
                .parent()
                .and_then(ElementRef::wrap)
                .map(|p| text_content(p))
                .unwrap_or_default();

            if context.contains(LABEL_REGULAR) && regular.is_none() {
                regular = Some(value);
            } else if context.contains(LABEL_PREMIUM) && premium.is_none() {
                premium = Some(value);
            } else if context.contains(LABEL_DIESEL) && diesel.is_none() {
                diesel = Some(value);
            }
        }

        match (regular, premium, diesel) {
            (Some(r), Some(p), Some(d)) => Some((r, p, d)),
            _ => None,
        }
    }

    /// 문서 순서대로 범위를 통과한 가격 후보를 모읍니다.
    fn extract_positional(&self, document: &Html) -> Vec<f64> {
        let Ok(selector) = Selector::parse("div.price") else {
            return Vec::new();
        };

        document
            .select(&selector)
            .filter_map(|el| self.accept(el))
            .collect()
    }

    /// 요소 텍스트를 숫자로 추출하고 타당 범위를 검증합니다.
    fn accept(&self, element: ElementRef<'_>) -> Option<f64> {
        let text = text_content(element);
        let value = extract_numeric(&text).ok()?;

        if !self.range.contains(value) {
            debug!(value = value, "범위 밖 가격 후보 제외");
            return None;
        }

        debug!(value = value, "가격 후보 발견");
        Some(value)
    }
}

#[async_trait]
impl PriceScraper for GogoGsScraper {
    fn name(&self) -> &str {
        "gogo.gs"
    }

    async fn scrape(&self) -> Result<FuelPriceSample, ScrapeError> {
        info!(url = %self.base_url, "gogo.gs 가격 수집 시작");

        let body = self.client.get(&self.base_url).await?;
        let (regular, premium, diesel) = self.extract_sample(&body)?;

        info!(
            regular = regular,
            premium = premium,
            diesel = diesel,
            "gogo.gs 가격 수집 완료"
        );

        Ok(FuelPriceSample {
            date: Utc::now().date_naive(),
            regular,
            premium,
            diesel,
            region: "全国平均".to_string(),
        })
    }
}
