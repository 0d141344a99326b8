//! 변동 감지기.
//!
//! 저장소의 최근 두 관측 날짜를 키/필드별로 비교해 변동 레코드를
//! 만들고, 임계값 이상의 변동은 플래그를 세워 알림으로 넘깁니다.
//!
//! 키 하나의 실패(값 누락, 쿼리 오류, 0 가드)는 해당 쌍만 건너뛰고
//! 런 전체는 계속됩니다. 날짜/키 목록 조회 실패만 런에 치명적입니다.

use crate::stats::DetectionStats;
use fuelwatch_core::{ObservationStore, PriceChange, Series, StoreError};
use fuelwatch_notification::NotificationSender;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// 변동 감지 오류.
///
/// 날짜/키 목록 조회처럼 런 전체를 진행할 수 없는 실패만 여기로
/// 올라옵니다. 개별 (key, field) 쌍의 실패는 `DetectionStats::skipped`로
/// 집계됩니다.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("저장소 오류: {0}")]
    Store(#[from] StoreError),
}

/// 최근 두 관측 날짜를 비교하는 변동 감지기.
pub struct ChangeDetector {
    /// 알림 플래그 임계값 (%, 절대값 비교)
    threshold_pct: f64,
}

impl ChangeDetector {
    /// 기본 임계값 (%).
    pub const DEFAULT_THRESHOLD_PCT: f64 = 2.0;

    /// 새 감지기를 생성합니다.
    pub fn new(threshold_pct: f64) -> Self {
        Self { threshold_pct }
    }

    /// 현재 임계값 (%)을 반환합니다.
    pub fn threshold_pct(&self) -> f64 {
        self.threshold_pct
    }

    /// 한 시계열에 대해 변동 감지를 실행합니다.
    ///
    /// 관측 날짜가 2개 미만이면 비교 대상이 없으므로 아무것도 하지
    /// 않고 빈 통계를 반환합니다 (초기 런에서 정상 상황).
    ///
    /// `notifier`가 주어지면 flagged 레코드마다 알림을 전송합니다.
    /// 알림 전송 실패는 로그로만 남기고 감지 런은 계속됩니다.
    pub async fn detect_series(
        &self,
        store: &dyn ObservationStore,
        series: Series,
        notifier: Option<&dyn NotificationSender>,
    ) -> Result<DetectionStats, DetectError> {
        let started = Instant::now();
        let mut stats = DetectionStats::default();

        let dates = store.distinct_dates(series).await?;
        if dates.len() < 2 {
            info!(
                series = %series,
                dates = dates.len(),
                "비교할 관측 날짜가 부족하여 감지 건너뜀"
            );
            stats.elapsed = started.elapsed();
            return Ok(stats);
        }

        // distinct_dates는 내림차순 계약: [0]이 최신, [1]이 직전
        let date_new = dates[0];
        let date_old = dates[1];
        debug!(series = %series, %date_new, %date_old, "비교 날짜 선정");

        let keys = store.distinct_keys(series).await?;

        for key in &keys {
            for field in series.fields() {
                stats.checked += 1;

                let price_new = match store.value_for(series, key, date_new, field).await {
                    Ok(Some(v)) => v,
                    Ok(None) => {
                        debug!(series = %series, key = %key, field, %date_new, "최신 관측값 없음, 건너뜀");
                        stats.skipped += 1;
                        continue;
                    }
                    Err(e) => {
                        warn!(series = %series, key = %key, field, error = %e, "최신 값 조회 실패, 건너뜀");
                        stats.skipped += 1;
                        continue;
                    }
                };

                let price_old = match store.value_for(series, key, date_old, field).await {
                    Ok(Some(v)) => v,
                    Ok(None) => {
                        debug!(series = %series, key = %key, field, %date_old, "직전 관측값 없음, 건너뜀");
                        stats.skipped += 1;
                        continue;
                    }
                    Err(e) => {
                        warn!(series = %series, key = %key, field, error = %e, "직전 값 조회 실패, 건너뜀");
                        stats.skipped += 1;
                        continue;
                    }
                };

                // price_old == 0.0 이면 변동률 미정의
                let Some(change) = PriceChange::new(
                    series,
                    key,
                    field,
                    date_new,
                    date_old,
                    price_old,
                    price_new,
                    self.threshold_pct,
                ) else {
                    warn!(series = %series, key = %key, field, "직전 값이 0, 변동률 계산 불가로 건너뜀");
                    stats.skipped += 1;
                    continue;
                };

                if let Err(e) = store.upsert_change(&change).await {
                    warn!(series = %series, key = %key, field, error = %e, "변동 레코드 저장 실패, 건너뜀");
                    stats.skipped += 1;
                    continue;
                }
                stats.recorded += 1;

                if change.flagged {
                    stats.flagged += 1;
                    warn!(
                        alert = true,
                        series = %series,
                        key = %key,
                        field,
                        price_old = change.price_old,
                        price_new = change.price_new,
                        pct_change = change.pct_change,
                        threshold_pct = self.threshold_pct,
                        "임계값 이상 가격 변동 감지"
                    );

                    if let Some(sender) = notifier {
                        if sender.is_enabled() {
                            if let Err(e) = sender.send_change_alert(&change).await {
                                warn!(
                                    sender = sender.name(),
                                    key = %key,
                                    field,
                                    error = %e,
                                    "변동 알림 전송 실패 (감지 런은 계속)"
                                );
                            }
                        }
                    }
                }
            }
        }

        stats.elapsed = started.elapsed();
        Ok(stats)
    }
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD_PCT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use fuelwatch_notification::{NotificationError, NotificationResult};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// 테스트용 인메모리 저장소.
    ///
    /// `fail_keys`에 등록된 키는 value_for 호출 시 쿼리 오류를 돌려줘
    /// 부분 실패 경로를 검증할 수 있습니다.
    #[derive(Default)]
    struct InMemoryStore {
        values: HashMap<(Series, String, NaiveDate, String), f64>,
        fail_keys: Vec<String>,
        changes: Mutex<HashMap<String, PriceChange>>,
    }

    impl InMemoryStore {
        fn insert(&mut self, series: Series, key: &str, date: &str, field: &str, value: f64) {
            self.values.insert(
                (series, key.to_string(), date.parse().unwrap(), field.to_string()),
                value,
            );
        }

        fn change_count(&self) -> usize {
            self.changes.lock().unwrap().len()
        }

        fn change(&self, id: &str) -> Option<PriceChange> {
            self.changes.lock().unwrap().get(id).cloned()
        }
    }

    #[async_trait]
    impl ObservationStore for InMemoryStore {
        async fn distinct_dates(&self, series: Series) -> Result<Vec<NaiveDate>, StoreError> {
            let mut dates: Vec<NaiveDate> = self
                .values
                .keys()
                .filter(|(s, ..)| *s == series)
                .map(|(_, _, d, _)| *d)
                .collect();
            dates.sort_unstable();
            dates.dedup();
            dates.reverse();
            Ok(dates)
        }

        async fn distinct_keys(&self, series: Series) -> Result<Vec<String>, StoreError> {
            let mut keys: Vec<String> = self
                .values
                .keys()
                .filter(|(s, ..)| *s == series)
                .map(|(_, k, ..)| k.clone())
                .collect();
            keys.sort_unstable();
            keys.dedup();
            Ok(keys)
        }

        async fn value_for(
            &self,
            series: Series,
            key: &str,
            date: NaiveDate,
            field: &str,
        ) -> Result<Option<f64>, StoreError> {
            if self.fail_keys.iter().any(|k| k == key) {
                return Err(StoreError::Query(format!("simulated failure for {key}")));
            }
            Ok(self
                .values
                .get(&(series, key.to_string(), date, field.to_string()))
                .copied())
        }

        async fn upsert_change(&self, record: &PriceChange) -> Result<(), StoreError> {
            self.changes
                .lock()
                .unwrap()
                .insert(record.id.clone(), record.clone());
            Ok(())
        }
    }

    /// 수신한 알림을 기록하는 스텁 전송기.
    #[derive(Default)]
    struct RecordingSender {
        received: Mutex<Vec<PriceChange>>,
        fail: bool,
    }

    #[async_trait]
    impl NotificationSender for RecordingSender {
        async fn send_change_alert(&self, change: &PriceChange) -> NotificationResult<()> {
            if self.fail {
                return Err(NotificationError::SendFailed("stub failure".to_string()));
            }
            self.received.lock().unwrap().push(change.clone());
            Ok(())
        }

        fn is_enabled(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn fuel_store_two_days() -> InMemoryStore {
        let mut store = InMemoryStore::default();
        store.insert(Series::Fuel, "全国平均", "2025-01-01", "regular", 160.0);
        store.insert(Series::Fuel, "全国平均", "2025-01-01", "premium", 171.0);
        store.insert(Series::Fuel, "全国平均", "2025-01-01", "diesel", 140.0);
        store.insert(Series::Fuel, "全国平均", "2025-01-02", "regular", 163.5);
        store.insert(Series::Fuel, "全国平均", "2025-01-02", "premium", 171.5);
        store.insert(Series::Fuel, "全国平均", "2025-01-02", "diesel", 140.2);
        store
    }

    #[tokio::test]
    async fn test_single_date_is_noop() {
        let mut store = InMemoryStore::default();
        store.insert(Series::Fuel, "全国平均", "2025-01-01", "regular", 160.0);

        let detector = ChangeDetector::new(2.0);
        let stats = detector
            .detect_series(&store, Series::Fuel, None)
            .await
            .unwrap();

        assert_eq!(stats.checked, 0);
        assert_eq!(stats.recorded, 0);
        assert_eq!(store.change_count(), 0);
    }

    #[tokio::test]
    async fn test_detects_and_flags_change_over_threshold() {
        let store = fuel_store_two_days();
        let detector = ChangeDetector::new(2.0);

        let stats = detector
            .detect_series(&store, Series::Fuel, None)
            .await
            .unwrap();

        assert_eq!(stats.checked, 3);
        assert_eq!(stats.recorded, 3);
        // regular만 +2.1875%로 임계값 초과
        assert_eq!(stats.flagged, 1);
        assert_eq!(stats.skipped, 0);

        let change = store.change("fuel_2025-01-02_全国平均_regular").unwrap();
        assert!((change.pct_change - 2.1875).abs() < 1e-9);
        assert!(change.flagged);
        assert_eq!(change.date_old, "2025-01-01".parse().unwrap());

        let premium = store.change("fuel_2025-01-02_全国平均_premium").unwrap();
        assert!(!premium.flagged);
    }

    #[tokio::test]
    async fn test_zero_old_value_is_skipped() {
        let mut store = InMemoryStore::default();
        store.insert(Series::Exchange, "JPY", "2025-01-01", "usd_jpy", 0.0);
        store.insert(Series::Exchange, "JPY", "2025-01-02", "usd_jpy", 150.0);

        let detector = ChangeDetector::new(2.0);
        let stats = detector
            .detect_series(&store, Series::Exchange, None)
            .await
            .unwrap();

        // usd_jpy는 0 가드로 건너뜀, 나머지 3개 필드는 값 자체가 없어 건너뜀
        assert_eq!(stats.checked, 4);
        assert_eq!(stats.recorded, 0);
        assert_eq!(stats.skipped, 4);
        assert_eq!(store.change_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_field_skips_only_that_pair() {
        let mut store = InMemoryStore::default();
        store.insert(Series::Fuel, "全国平均", "2025-01-01", "regular", 160.0);
        store.insert(Series::Fuel, "全国平均", "2025-01-02", "regular", 161.0);
        // premium/diesel은 양쪽 날짜 모두 누락

        let detector = ChangeDetector::new(2.0);
        let stats = detector
            .detect_series(&store, Series::Fuel, None)
            .await
            .unwrap();

        assert_eq!(stats.checked, 3);
        assert_eq!(stats.recorded, 1);
        assert_eq!(stats.skipped, 2);
    }

    #[tokio::test]
    async fn test_per_key_store_failure_does_not_abort_run() {
        let mut store = fuel_store_two_days();
        store.insert(Series::Fuel, "東京", "2025-01-01", "regular", 170.0);
        store.insert(Series::Fuel, "東京", "2025-01-02", "regular", 170.5);
        store.fail_keys.push("東京".to_string());

        let detector = ChangeDetector::new(2.0);
        let stats = detector
            .detect_series(&store, Series::Fuel, None)
            .await
            .unwrap();

        // 東京의 3개 필드는 쿼리 실패로 건너뛰고 全国平均은 정상 처리
        assert_eq!(stats.checked, 6);
        assert_eq!(stats.recorded, 3);
        assert_eq!(stats.skipped, 3);
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        let store = fuel_store_two_days();
        let detector = ChangeDetector::new(2.0);

        detector
            .detect_series(&store, Series::Fuel, None)
            .await
            .unwrap();
        let first = store.change_count();

        detector
            .detect_series(&store, Series::Fuel, None)
            .await
            .unwrap();

        assert_eq!(store.change_count(), first);
    }

    #[tokio::test]
    async fn test_notifier_receives_only_flagged_changes() {
        let store = fuel_store_two_days();
        let sender = RecordingSender::default();
        let detector = ChangeDetector::new(2.0);

        detector
            .detect_series(&store, Series::Fuel, Some(&sender))
            .await
            .unwrap();

        let received = sender.received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].field, "regular");
    }

    #[tokio::test]
    async fn test_notifier_failure_does_not_fail_run() {
        let store = fuel_store_two_days();
        let sender = RecordingSender {
            fail: true,
            ..Default::default()
        };
        let detector = ChangeDetector::new(2.0);

        let stats = detector
            .detect_series(&store, Series::Fuel, Some(&sender))
            .await
            .unwrap();

        assert_eq!(stats.recorded, 3);
        assert_eq!(stats.flagged, 1);
    }
}
