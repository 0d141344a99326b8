//! 환율 fetcher.
//!
//! exchangerate-api.com의 JPY 기준 레이트를 가져와 JPY 건너 가격으로
//! 뒤집습니다 (1 USD = X 円).

use crate::error::DataError;
use crate::provider::client::FetchClient;
use chrono::{NaiveDate, Utc};
use fuelwatch_core::ExchangeRateSample;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

/// exchangerate-api v4 응답 페이로드.
#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[allow(dead_code)]
    date: Option<String>,
    rates: HashMap<String, f64>,
}

/// 환율 fetcher.
pub struct ExchangeRateFetcher {
    client: FetchClient,
    base_url: String,
}

impl ExchangeRateFetcher {
    /// 기본 설정으로 생성 (타임아웃 10초)
    pub fn new() -> Result<Self, DataError> {
        Self::with_base_url("https://api.exchangerate-api.com/v4/latest/JPY")
    }

    /// 커스텀 엔드포인트로 생성 (테스트용)
    pub fn with_base_url(base_url: &str) -> Result<Self, DataError> {
        Ok(Self {
            client: FetchClient::new(Duration::from_secs(10))?,
            base_url: base_url.to_string(),
        })
    }

    /// 최신 환율 샘플을 가져옵니다.
    pub async fn fetch(&self) -> Result<ExchangeRateSample, DataError> {
        info!(url = %self.base_url, "환율 조회 시작");

        let body = self.client.get(&self.base_url).await?;
        let sample = parse_sample(&body, Utc::now().date_naive())?;

        info!(
            usd_jpy = sample.usd_jpy,
            eur_jpy = sample.eur_jpy,
            gbp_jpy = sample.gbp_jpy,
            cny_jpy = sample.cny_jpy,
            "환율 조회 완료"
        );

        Ok(sample)
    }
}

/// API 본문을 JPY 건너 샘플로 변환합니다.
///
/// 응답은 JPY 기준(1円 = X 외화)이므로 역수를 취합니다.
/// 레이트가 없거나 0 이하인 통화는 0.0으로 남기되 (감지기의
/// 0 가드가 걸러냄), 네 통화가 전부 없으면 오류입니다.
fn parse_sample(body: &str, date: NaiveDate) -> Result<ExchangeRateSample, DataError> {
    let response: RatesResponse = serde_json::from_str(body)?;

    let invert = |code: &str| -> Option<f64> {
        response
            .rates
            .get(code)
            .copied()
            .filter(|rate| *rate > 0.0)
            .map(|rate| 1.0 / rate)
    };

    let usd = invert("USD");
    let eur = invert("EUR");
    let gbp = invert("GBP");
    let cny = invert("CNY");

    if usd.is_none() && eur.is_none() && gbp.is_none() && cny.is_none() {
        return Err(DataError::InvalidData(
            "응답에 사용할 수 있는 환율이 없습니다".to_string(),
        ));
    }

    for (code, rate) in [("USD", usd), ("EUR", eur), ("GBP", gbp), ("CNY", cny)] {
        if rate.is_none() {
            warn!(currency = code, "환율 누락, 0.0으로 기록");
        }
    }

    Ok(ExchangeRateSample {
        date,
        usd_jpy: usd.unwrap_or(0.0),
        eur_jpy: eur.unwrap_or(0.0),
        gbp_jpy: gbp.unwrap_or(0.0),
        cny_jpy: cny.unwrap_or(0.0),
    })
}

/// 고정 환율 샘플을 반환하는 mock fetcher.
pub struct MockExchangeRateFetcher;

impl MockExchangeRateFetcher {
    pub async fn fetch(&self) -> Result<ExchangeRateSample, DataError> {
        info!("mock 환율 데이터 사용");
        Ok(ExchangeRateSample {
            date: Utc::now().date_naive(),
            usd_jpy: 150.25,
            eur_jpy: 163.80,
            gbp_jpy: 190.50,
            cny_jpy: 20.85,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
    }

    #[test]
    fn test_parse_inverts_jpy_based_rates() {
        let body = r#"{
            "date": "2025-01-02",
            "rates": { "USD": 0.0066666667, "EUR": 0.0061050061, "GBP": 0.0052493438, "CNY": 0.0479616307 }
        }"#;

        let sample = parse_sample(body, date()).unwrap();
        assert!((sample.usd_jpy - 150.0).abs() < 1e-6);
        assert!((sample.eur_jpy - 163.8).abs() < 1e-6);
        assert!((sample.gbp_jpy - 190.5).abs() < 1e-6);
        assert!((sample.cny_jpy - 20.85).abs() < 1e-6);
    }

    #[test]
    fn test_parse_missing_currency_defaults_to_zero() {
        let body = r#"{ "rates": { "USD": 0.00667 } }"#;
        let sample = parse_sample(body, date()).unwrap();
        assert!(sample.usd_jpy > 0.0);
        assert_eq!(sample.eur_jpy, 0.0);
    }

    #[test]
    fn test_parse_zero_rate_is_not_inverted() {
        // 0으로 나누기 방지: rate가 0이면 그대로 0.0
        let body = r#"{ "rates": { "USD": 0.0, "EUR": 0.00611 } }"#;
        let sample = parse_sample(body, date()).unwrap();
        assert_eq!(sample.usd_jpy, 0.0);
        assert!(sample.eur_jpy > 0.0);
    }

    #[test]
    fn test_parse_no_usable_rates_is_error() {
        let body = r#"{ "rates": { "KRW": 9.1 } }"#;
        assert!(parse_sample(body, date()).is_err());
    }

    #[test]
    fn test_parse_invalid_json_is_error() {
        assert!(parse_sample("not json", date()).is_err());
    }

    #[tokio::test]
    #[ignore] // 실제 네트워크 필요
    async fn test_live_fetch() {
        let fetcher = ExchangeRateFetcher::new().unwrap();
        let sample = fetcher.fetch().await.unwrap();
        assert!(sample.usd_jpy > 0.0);
    }
}
