//! 변동 감지 실행 모듈.

use crate::{CollectorConfig, Result};
use fuelwatch_core::Series;
use fuelwatch_data::SqliteStore;
use fuelwatch_detect::{ChangeDetector, DetectionStats};
use fuelwatch_notification::NotificationSender;

/// 두 시계열 모두에 대해 변동 감지를 실행합니다.
///
/// 시계열 단위 순차 실행이며, 각 시계열의 요약이 로그로 남습니다.
pub async fn detect_changes(
    store: &SqliteStore,
    config: &CollectorConfig,
    notifier: Option<&dyn NotificationSender>,
) -> Result<Vec<(Series, DetectionStats)>> {
    let detector = ChangeDetector::new(config.detect.threshold_pct);
    let mut results = Vec::new();

    for series in [Series::Fuel, Series::Exchange] {
        let stats = detector.detect_series(store, series, notifier).await?;
        stats.log_summary(&series.to_string());
        results.push((series, stats));
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fuelwatch_core::{ExchangeRate, ExchangeRateSample, FuelPrice, FuelPriceSample};

    fn fuel_sample(date: &str, regular: f64) -> FuelPriceSample {
        FuelPriceSample {
            date: date.parse().unwrap(),
            regular,
            premium: 179.2,
            diesel: 148.8,
            region: "全国平均".to_string(),
        }
    }

    fn exchange_sample(date: &str, usd_jpy: f64) -> ExchangeRateSample {
        ExchangeRateSample {
            date: date.parse().unwrap(),
            usd_jpy,
            eur_jpy: 163.80,
            gbp_jpy: 190.50,
            cny_jpy: 20.85,
        }
    }

    #[tokio::test]
    async fn test_detect_both_series_end_to_end() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let mut config = CollectorConfig::from_env().unwrap();
        config.detect.threshold_pct = 2.0;

        for (date, regular) in [("2025-01-01", 160.0), ("2025-01-02", 163.5)] {
            let price = FuelPrice::from_sample(&fuel_sample(date, regular), "mock");
            store.save_fuel_price(&price).await.unwrap();
        }
        for (date, usd) in [("2025-01-01", 150.0), ("2025-01-02", 150.5)] {
            let rate = ExchangeRate::from_sample(&exchange_sample(date, usd), "mock");
            store.save_exchange_rate(&rate).await.unwrap();
        }

        let results = detect_changes(&store, &config, None).await.unwrap();
        assert_eq!(results.len(), 2);

        let (_, fuel_stats) = &results[0];
        assert_eq!(fuel_stats.checked, 3);
        assert_eq!(fuel_stats.flagged, 1);

        let (_, exchange_stats) = &results[1];
        assert_eq!(exchange_stats.checked, 4);
        assert_eq!(exchange_stats.flagged, 0);

        let changes = store.recent_changes(10).await.unwrap();
        assert_eq!(changes.len(), 7);
        assert!(changes.iter().any(|c| c.flagged));
    }

    #[tokio::test]
    async fn test_detect_with_single_observation_is_noop() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let config = CollectorConfig::from_env().unwrap();

        let price = FuelPrice::from_sample(&fuel_sample("2025-01-01", 160.0), "mock");
        store.save_fuel_price(&price).await.unwrap();

        let results = detect_changes(&store, &config, None).await.unwrap();
        for (_, stats) in &results {
            assert_eq!(stats.recorded, 0);
        }
        assert!(store.recent_changes(10).await.unwrap().is_empty());
    }
}
