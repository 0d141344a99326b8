//! 연료 가격 수집 모듈.

use crate::{CollectorConfig, Result};
use chrono::NaiveDate;
use fuelwatch_core::FuelPrice;
use fuelwatch_data::{GogoGsScraper, MockFuelScraper, PriceScraper, ScraperManager, SqliteStore};

/// 연료 가격을 수집하고 저장합니다.
///
/// `mock_date`가 주어지면 샘플 날짜를 그 날짜로 대체합니다
/// (과거 날짜를 채워 감지 시나리오를 재현할 때 사용).
pub async fn fetch_fuel_price(
    store: &SqliteStore,
    config: &CollectorConfig,
    mock_date: Option<NaiveDate>,
) -> Result<FuelPrice> {
    tracing::info!("연료 가격 수집 시작");

    let (mut sample, source) = if config.fuel.use_scraping {
        let scraper = GogoGsScraper::with_config(
            &config.fuel.gogogs_url,
            config.fuel.timeout(),
            config.fuel.plausible_range(),
        )?;
        let manager = ScraperManager::new(vec![Box::new(scraper) as Box<dyn PriceScraper>]);
        let sample = manager
            .scrape_with_fallback(config.fuel.mock_fallback)
            .await?;
        (sample, "gogo.gs")
    } else {
        (MockFuelScraper.scrape().await?, "mock")
    };

    if let Some(date) = mock_date {
        tracing::debug!(%date, "샘플 날짜를 지정 날짜로 대체");
        sample.date = date;
    }

    let price = FuelPrice::from_sample(&sample, source);
    store.save_fuel_price(&price).await?;

    tracing::info!(
        date = %price.date,
        region = %price.region,
        regular = price.regular,
        premium = price.premium,
        diesel = price.diesel,
        source = %price.source,
        "연료 가격 저장 완료"
    );

    Ok(price)
}
