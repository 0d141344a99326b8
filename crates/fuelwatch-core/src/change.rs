//! 가격 변동 레코드.
//!
//! 서로 다른 두 날짜의 같은 키 관측값을 비교한 파생 레코드입니다.
//! 생성 이후 변경되지 않으며, `(series, key, field, date_new)` 조합으로
//! 멱등 upsert 됩니다.

use crate::Series;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 두 관측값 사이의 변동 비교 레코드.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceChange {
    /// 프라이머리 키 (`{series}_{date_new}_{key}_{field}`)
    pub id: String,
    /// 대상 시계열
    pub series: Series,
    /// 비교 키 (연료: 지역, 환율: "JPY")
    pub key: String,
    /// 필드 이름 (regular / usd_jpy 등)
    pub field: String,
    /// 최신 관측 날짜
    pub date_new: NaiveDate,
    /// 직전 관측 날짜
    pub date_old: NaiveDate,
    /// 직전 값
    pub price_old: f64,
    /// 최신 값
    pub price_new: f64,
    /// 변동률 (%)
    pub pct_change: f64,
    /// 알림 대상 여부 (|pct_change| >= 임계값)
    pub flagged: bool,
    pub created_at: DateTime<Utc>,
}

impl PriceChange {
    /// 두 관측값으로부터 변동 레코드를 생성합니다.
    ///
    /// `price_old == 0.0` 인 경우 변동률이 정의되지 않으므로 `None`을
    /// 반환합니다 (0으로 나누기 가드 — 호출자는 해당 키를 건너뜁니다).
    ///
    /// `flagged`는 변동률 절대값이 임계값 **이상**일 때 참입니다
    /// (정확히 임계값인 경우도 포함).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        series: Series,
        key: &str,
        field: &str,
        date_new: NaiveDate,
        date_old: NaiveDate,
        price_old: f64,
        price_new: f64,
        threshold_pct: f64,
    ) -> Option<Self> {
        if price_old == 0.0 {
            return None;
        }

        let pct_change = (price_new - price_old) / price_old * 100.0;
        let flagged = pct_change.abs() >= threshold_pct;

        Some(Self {
            id: format!("{}_{}_{}_{}", series, date_new, key, field),
            series,
            key: key.to_string(),
            field: field.to_string(),
            date_new,
            date_old,
            price_old,
            price_new,
            pct_change,
            flagged,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_pct_change_formula() {
        let change = PriceChange::new(
            Series::Fuel,
            "全国平均",
            "regular",
            date("2025-01-02"),
            date("2025-01-01"),
            160.0,
            163.5,
            2.0,
        )
        .unwrap();

        // (163.5 - 160.0) / 160.0 * 100 = 2.1875
        assert!((change.pct_change - 2.1875).abs() < 1e-9);
        assert!(change.flagged);

        // 레코드로부터 재계산한 값이 일치해야 함
        let recomputed = (change.price_new - change.price_old) / change.price_old * 100.0;
        assert!((change.pct_change - recomputed).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_boundary_inclusive() {
        // 정확히 임계값이면 flagged (>= 비교)
        let change = PriceChange::new(
            Series::Fuel,
            "全国平均",
            "regular",
            date("2025-01-02"),
            date("2025-01-01"),
            100.0,
            102.0,
            2.0,
        )
        .unwrap();
        assert!((change.pct_change - 2.0).abs() < 1e-9);
        assert!(change.flagged);

        // 임계값 미만이면 flagged 아님
        let change = PriceChange::new(
            Series::Fuel,
            "全国平均",
            "regular",
            date("2025-01-02"),
            date("2025-01-01"),
            100.0,
            101.9,
            2.0,
        )
        .unwrap();
        assert!(!change.flagged);
    }

    #[test]
    fn test_negative_change_flags_by_magnitude() {
        let change = PriceChange::new(
            Series::Exchange,
            "JPY",
            "usd_jpy",
            date("2025-01-02"),
            date("2025-01-01"),
            150.0,
            145.0,
            2.0,
        )
        .unwrap();
        assert!(change.pct_change < 0.0);
        assert!(change.flagged);
    }

    #[test]
    fn test_zero_old_price_guard() {
        let change = PriceChange::new(
            Series::Fuel,
            "全国平均",
            "regular",
            date("2025-01-02"),
            date("2025-01-01"),
            0.0,
            163.5,
            2.0,
        );
        assert!(change.is_none());
    }

    #[test]
    fn test_upsert_key_shape() {
        let change = PriceChange::new(
            Series::Exchange,
            "JPY",
            "usd_jpy",
            date("2025-01-02"),
            date("2025-01-01"),
            150.0,
            151.0,
            3.0,
        )
        .unwrap();
        assert_eq!(change.id, "exchange_2025-01-02_JPY_usd_jpy");
    }
}
