//! 환율 수집 모듈.

use crate::{CollectorConfig, Result};
use fuelwatch_core::ExchangeRate;
use fuelwatch_data::{ExchangeRateFetcher, MockExchangeRateFetcher, SqliteStore};

/// 환율을 수집하고 저장합니다.
pub async fn fetch_exchange_rate(
    store: &SqliteStore,
    config: &CollectorConfig,
) -> Result<ExchangeRate> {
    tracing::info!("환율 수집 시작");

    let (sample, source) = if config.exchange.use_mock {
        (MockExchangeRateFetcher.fetch().await?, "mock")
    } else {
        let fetcher = ExchangeRateFetcher::new()?;
        (fetcher.fetch().await?, "exchangerate-api.com")
    };

    let rate = ExchangeRate::from_sample(&sample, source);
    store.save_exchange_rate(&rate).await?;

    tracing::info!(
        date = %rate.date,
        usd_jpy = rate.usd_jpy,
        eur_jpy = rate.eur_jpy,
        gbp_jpy = rate.gbp_jpy,
        cny_jpy = rate.cny_jpy,
        source = %rate.source,
        "환율 저장 완료"
    );

    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_mock_and_persist() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let mut config = CollectorConfig::from_env().unwrap();
        config.exchange.use_mock = true;

        let rate = fetch_exchange_rate(&store, &config).await.unwrap();
        assert_eq!(rate.source, "mock");
        assert!(rate.usd_jpy > 0.0);

        let latest = store.latest_exchange_rate().await.unwrap().unwrap();
        assert_eq!(latest.id, rate.id);
    }
}
