//! 연료 가격 모델.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 스크레이퍼가 생성하는 1회분 관측 샘플.
///
/// 생성 후 불변이며, 세 필드가 모두 채워진 상태로만 만들어집니다
/// (부분 샘플은 존재하지 않음).
#[derive(Debug, Clone, PartialEq)]
pub struct FuelPriceSample {
    /// 관측 날짜
    pub date: NaiveDate,
    /// 레귤러 가격 (円/L)
    pub regular: f64,
    /// 하이옥탄 가격 (円/L)
    pub premium: f64,
    /// 경유 가격 (円/L)
    pub diesel: f64,
    /// 지역 라벨 (비교 키)
    pub region: String,
}

/// 영속화되는 연료 가격 레코드.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelPrice {
    /// 프라이머리 키 (`{date}_{region}`)
    pub id: String,
    pub date: NaiveDate,
    pub regular: f64,
    pub premium: f64,
    pub diesel: f64,
    pub region: String,
    /// 데이터 출처 (스크레이퍼 이름)
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FuelPrice {
    /// 수집 샘플에서 영속화 레코드를 생성합니다.
    pub fn from_sample(sample: &FuelPriceSample, source: &str) -> Self {
        let now = Utc::now();
        Self {
            id: format!("{}_{}", sample.date, sample.region),
            date: sample.date,
            regular: sample.regular,
            premium: sample.premium,
            diesel: sample.diesel,
            region: sample.region.clone(),
            source: source.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 필드 이름으로 값 조회
    pub fn field(&self, name: &str) -> Option<f64> {
        match name {
            "regular" => Some(self.regular),
            "premium" => Some(self.premium),
            "diesel" => Some(self.diesel),
            _ => None,
        }
    }
}
