//! 환율 모델.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 환율 fetcher가 생성하는 1회분 관측 샘플.
///
/// 모든 레이트는 JPY 건너 가격 (1 단위 외화 = X 円).
/// 환율 시계열에는 지역 키가 없으며, 통화 쌍 각각이 독립 필드입니다.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRateSample {
    /// 관측 날짜
    pub date: NaiveDate,
    pub usd_jpy: f64,
    pub eur_jpy: f64,
    pub gbp_jpy: f64,
    pub cny_jpy: f64,
}

/// 영속화되는 환율 레코드.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// 프라이머리 키 (YYYY-MM-DD)
    pub id: String,
    pub date: NaiveDate,
    pub usd_jpy: f64,
    pub eur_jpy: f64,
    pub gbp_jpy: f64,
    pub cny_jpy: f64,
    /// 데이터 출처
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExchangeRate {
    /// 수집 샘플에서 영속화 레코드를 생성합니다.
    pub fn from_sample(sample: &ExchangeRateSample, source: &str) -> Self {
        let now = Utc::now();
        Self {
            id: sample.date.to_string(),
            date: sample.date,
            usd_jpy: sample.usd_jpy,
            eur_jpy: sample.eur_jpy,
            gbp_jpy: sample.gbp_jpy,
            cny_jpy: sample.cny_jpy,
            source: source.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 필드 이름으로 값 조회
    pub fn field(&self, name: &str) -> Option<f64> {
        match name {
            "usd_jpy" => Some(self.usd_jpy),
            "eur_jpy" => Some(self.eur_jpy),
            "gbp_jpy" => Some(self.gbp_jpy),
            "cny_jpy" => Some(self.cny_jpy),
            _ => None,
        }
    }
}
