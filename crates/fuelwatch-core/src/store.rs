//! 관측값 저장소 trait.
//!
//! 변동 감지기가 의존하는 키 기반 읽기/쓰기 협력자 인터페이스입니다.
//! 실제 구현(SQLite)은 `fuelwatch-data`에, 테스트용 인메모리 구현은
//! `fuelwatch-detect`의 테스트에 있습니다.

use crate::{PriceChange, Series};
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

/// 저장소 오류.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 저장소 연결/오픈 오류 (런 전체에 치명적)
    #[error("Store connection error: {0}")]
    Connection(String),

    /// 쿼리 실행 오류
    #[error("Store query error: {0}")]
    Query(String),

    /// 레코드를 찾을 수 없음
    #[error("Record not found: {0}")]
    NotFound(String),
}

/// 시계열 관측값 저장소.
///
/// 감지기는 이 trait을 통해서만 저장소에 접근합니다.
/// 모든 쓰기는 "insert or replace" 의미를 가져야 같은 날짜에 대한
/// 재실행이 멱등이 됩니다.
#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// 해당 시계열의 서로 다른 관측 날짜를 내림차순으로 반환합니다.
    async fn distinct_dates(&self, series: Series) -> Result<Vec<NaiveDate>, StoreError>;

    /// 해당 시계열의 비교 키 집합을 반환합니다.
    ///
    /// 환율 시계열은 단일 전역 키(`JPY`) 하나만 반환합니다.
    async fn distinct_keys(&self, series: Series) -> Result<Vec<String>, StoreError>;

    /// `(key, date)` 관측의 특정 필드 값을 반환합니다.
    ///
    /// 관측 자체가 없거나 필드가 없으면 `Ok(None)` 입니다
    /// (부분 데이터는 정상 상황이므로 오류가 아님).
    async fn value_for(
        &self,
        series: Series,
        key: &str,
        date: NaiveDate,
        field: &str,
    ) -> Result<Option<f64>, StoreError>;

    /// 변동 레코드를 upsert 합니다. `(series, key, field, date_new)` 기준 멱등.
    async fn upsert_change(&self, record: &PriceChange) -> Result<(), StoreError>;
}
