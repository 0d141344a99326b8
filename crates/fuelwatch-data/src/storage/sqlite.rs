//! SQLite 저장소.
//!
//! 연료 가격 / 환율 / 변동 레코드 / 분석 뉴스를 보관합니다.
//! 모든 쓰기는 `INSERT ... ON CONFLICT DO UPDATE`로 같은 날짜 재실행이
//! 멱등이 되도록 합니다.

use crate::error::{DataError, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use fuelwatch_core::{
    AnalyzedNews, ExchangeRate, FuelPrice, ImpactLevel, ObservationStore, PriceChange, Sentiment,
    Series, StoreError,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::path::Path;
use tracing::info;

/// 연료 가격 DB 레코드.
#[derive(Debug, Clone, FromRow)]
struct FuelPriceRow {
    id: String,
    date: NaiveDate,
    regular: f64,
    premium: f64,
    diesel: f64,
    region: String,
    source: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl FuelPriceRow {
    fn into_model(self) -> FuelPrice {
        FuelPrice {
            id: self.id,
            date: self.date,
            regular: self.regular,
            premium: self.premium,
            diesel: self.diesel,
            region: self.region,
            source: self.source,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// 환율 DB 레코드.
#[derive(Debug, Clone, FromRow)]
struct ExchangeRateRow {
    id: String,
    date: NaiveDate,
    usd_jpy: f64,
    eur_jpy: f64,
    gbp_jpy: f64,
    cny_jpy: f64,
    source: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ExchangeRateRow {
    fn into_model(self) -> ExchangeRate {
        ExchangeRate {
            id: self.id,
            date: self.date,
            usd_jpy: self.usd_jpy,
            eur_jpy: self.eur_jpy,
            gbp_jpy: self.gbp_jpy,
            cny_jpy: self.cny_jpy,
            source: self.source,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// 변동 레코드 DB 행.
#[derive(Debug, Clone, FromRow)]
struct PriceChangeRow {
    id: String,
    series: String,
    key: String,
    field: String,
    date_new: NaiveDate,
    date_old: NaiveDate,
    price_old: f64,
    price_new: f64,
    pct_change: f64,
    flagged: bool,
    created_at: DateTime<Utc>,
}

impl PriceChangeRow {
    fn into_model(self) -> Result<PriceChange> {
        let series: Series = self
            .series
            .parse()
            .map_err(DataError::InvalidData)?;
        Ok(PriceChange {
            id: self.id,
            series,
            key: self.key,
            field: self.field,
            date_new: self.date_new,
            date_old: self.date_old,
            price_old: self.price_old,
            price_new: self.price_new,
            pct_change: self.pct_change,
            flagged: self.flagged,
            created_at: self.created_at,
        })
    }
}

/// 분석 뉴스 DB 행.
#[derive(Debug, Clone, FromRow)]
struct NewsRow {
    url: String,
    title: String,
    published_at: String,
    summary: String,
    sentiment: String,
    impact: String,
}

impl NewsRow {
    fn into_model(self) -> AnalyzedNews {
        AnalyzedNews {
            title: self.title,
            url: self.url,
            published_at: self.published_at,
            summary: self.summary,
            // 라벨 파서는 저장된 영문 라벨도 인식함
            sentiment: Sentiment::parse(&self.sentiment),
            impact: parse_impact_label(&self.impact),
        }
    }
}

fn parse_impact_label(s: &str) -> ImpactLevel {
    match s {
        "high" => ImpactLevel::High,
        "medium" => ImpactLevel::Medium,
        "low" => ImpactLevel::Low,
        _ => ImpactLevel::None,
    }
}

/// SQLite 저장소.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// 파일 경로로 저장소를 엽니다. 파일과 테이블은 없으면 생성합니다.
    pub async fn open(path: &str) -> Result<Self> {
        if let Some(dir) = Path::new(path).parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)
                    .map_err(|e| DataError::ConnectionError(e.to_string()))?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        let store = Self { pool };
        store.create_tables().await?;

        info!(path = path, "SQLite 저장소 연결");
        Ok(store)
    }

    /// 인메모리 저장소 (테스트용).
    ///
    /// 커넥션마다 별도 메모리 DB가 되지 않도록 커넥션을 1개로 제한합니다.
    pub async fn open_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::new().in_memory(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        let store = Self { pool };
        store.create_tables().await?;
        Ok(store)
    }

    async fn create_tables(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS fuel_prices (
                id TEXT PRIMARY KEY,
                date TEXT NOT NULL,
                regular REAL NOT NULL,
                premium REAL NOT NULL,
                diesel REAL NOT NULL,
                region TEXT NOT NULL,
                source TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS exchange_rates (
                id TEXT PRIMARY KEY,
                date TEXT NOT NULL,
                usd_jpy REAL NOT NULL,
                eur_jpy REAL NOT NULL,
                gbp_jpy REAL NOT NULL,
                cny_jpy REAL NOT NULL,
                source TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS price_changes (
                id TEXT PRIMARY KEY,
                series TEXT NOT NULL,
                key TEXT NOT NULL,
                field TEXT NOT NULL,
                date_new TEXT NOT NULL,
                date_old TEXT NOT NULL,
                price_old REAL NOT NULL,
                price_new REAL NOT NULL,
                pct_change REAL NOT NULL,
                flagged INTEGER NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS news (
                url TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                published_at TEXT NOT NULL,
                summary TEXT NOT NULL,
                sentiment TEXT NOT NULL,
                impact TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_fuel_prices_date ON fuel_prices(date)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_exchange_rates_date ON exchange_rates(date)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // ==================== 연료 가격 ====================

    /// 연료 가격 upsert (같은 id 재실행 멱등)
    pub async fn save_fuel_price(&self, price: &FuelPrice) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO fuel_prices
                (id, date, regular, premium, diesel, region, source, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                regular = excluded.regular,
                premium = excluded.premium,
                diesel = excluded.diesel,
                source = excluded.source,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&price.id)
        .bind(price.date)
        .bind(price.regular)
        .bind(price.premium)
        .bind(price.diesel)
        .bind(&price.region)
        .bind(&price.source)
        .bind(price.created_at)
        .bind(price.updated_at)
        .execute(&self.pool)
        .await?;

        info!(id = %price.id, "연료 가격 저장");
        Ok(())
    }

    /// 모든 연료 가격 (날짜 내림차순)
    pub async fn all_fuel_prices(&self) -> Result<Vec<FuelPrice>> {
        let rows: Vec<FuelPriceRow> =
            sqlx::query_as("SELECT * FROM fuel_prices ORDER BY date DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(FuelPriceRow::into_model).collect())
    }

    /// 가장 최근 연료 가격
    pub async fn latest_fuel_price(&self) -> Result<Option<FuelPrice>> {
        let row: Option<FuelPriceRow> =
            sqlx::query_as("SELECT * FROM fuel_prices ORDER BY date DESC LIMIT 1")
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(FuelPriceRow::into_model))
    }

    // ==================== 환율 ====================

    /// 환율 upsert
    pub async fn save_exchange_rate(&self, rate: &ExchangeRate) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO exchange_rates
                (id, date, usd_jpy, eur_jpy, gbp_jpy, cny_jpy, source, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                usd_jpy = excluded.usd_jpy,
                eur_jpy = excluded.eur_jpy,
                gbp_jpy = excluded.gbp_jpy,
                cny_jpy = excluded.cny_jpy,
                source = excluded.source,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&rate.id)
        .bind(rate.date)
        .bind(rate.usd_jpy)
        .bind(rate.eur_jpy)
        .bind(rate.gbp_jpy)
        .bind(rate.cny_jpy)
        .bind(&rate.source)
        .bind(rate.created_at)
        .bind(rate.updated_at)
        .execute(&self.pool)
        .await?;

        info!(id = %rate.id, "환율 저장");
        Ok(())
    }

    /// 모든 환율 (날짜 내림차순)
    pub async fn all_exchange_rates(&self) -> Result<Vec<ExchangeRate>> {
        let rows: Vec<ExchangeRateRow> =
            sqlx::query_as("SELECT * FROM exchange_rates ORDER BY date DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(ExchangeRateRow::into_model).collect())
    }

    /// 가장 최근 환율
    pub async fn latest_exchange_rate(&self) -> Result<Option<ExchangeRate>> {
        let row: Option<ExchangeRateRow> =
            sqlx::query_as("SELECT * FROM exchange_rates ORDER BY date DESC LIMIT 1")
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(ExchangeRateRow::into_model))
    }

    // ==================== 변동 레코드 ====================

    /// 최근 변동 레코드 조회 (최신 날짜 우선)
    pub async fn recent_changes(&self, limit: i64) -> Result<Vec<PriceChange>> {
        let rows: Vec<PriceChangeRow> = sqlx::query_as(
            "SELECT * FROM price_changes ORDER BY date_new DESC, series, key, field LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PriceChangeRow::into_model).collect()
    }

    // ==================== 뉴스 ====================

    /// 분석 뉴스 upsert (URL 기준 멱등)
    pub async fn save_news(&self, news: &AnalyzedNews) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO news (url, title, published_at, summary, sentiment, impact, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(url) DO UPDATE SET
                title = excluded.title,
                summary = excluded.summary,
                sentiment = excluded.sentiment,
                impact = excluded.impact
            "#,
        )
        .bind(&news.url)
        .bind(&news.title)
        .bind(&news.published_at)
        .bind(&news.summary)
        .bind(news.sentiment.to_string())
        .bind(news.impact.to_string())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        info!(url = %news.url, "분석 뉴스 저장");
        Ok(())
    }

    /// 최신 뉴스 조회
    pub async fn latest_news(&self, limit: i64) -> Result<Vec<AnalyzedNews>> {
        let rows: Vec<NewsRow> = sqlx::query_as(
            "SELECT url, title, published_at, summary, sentiment, impact
             FROM news ORDER BY published_at DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(NewsRow::into_model).collect())
    }
}

/// 환율 시계열의 단일 전역 비교 키.
const EXCHANGE_KEY: &str = "JPY";

#[async_trait]
impl ObservationStore for SqliteStore {
    async fn distinct_dates(&self, series: Series) -> std::result::Result<Vec<NaiveDate>, StoreError> {
        let query = format!(
            "SELECT DISTINCT date FROM {} ORDER BY date DESC",
            series.table()
        );

        sqlx::query_scalar::<_, NaiveDate>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))
    }

    async fn distinct_keys(&self, series: Series) -> std::result::Result<Vec<String>, StoreError> {
        match series {
            Series::Fuel => sqlx::query_scalar::<_, String>("SELECT DISTINCT region FROM fuel_prices")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| StoreError::Query(e.to_string())),
            // 환율에는 지역 키가 없으므로 단일 전역 키
            Series::Exchange => Ok(vec![EXCHANGE_KEY.to_string()]),
        }
    }

    async fn value_for(
        &self,
        series: Series,
        key: &str,
        date: NaiveDate,
        field: &str,
    ) -> std::result::Result<Option<f64>, StoreError> {
        match series {
            Series::Fuel => {
                let row: Option<FuelPriceRow> =
                    sqlx::query_as("SELECT * FROM fuel_prices WHERE date = ? AND region = ?")
                        .bind(date)
                        .bind(key)
                        .fetch_optional(&self.pool)
                        .await
                        .map_err(|e| StoreError::Query(e.to_string()))?;

                Ok(row.and_then(|r| r.into_model().field(field)))
            }
            Series::Exchange => {
                let row: Option<ExchangeRateRow> =
                    sqlx::query_as("SELECT * FROM exchange_rates WHERE date = ?")
                        .bind(date)
                        .fetch_optional(&self.pool)
                        .await
                        .map_err(|e| StoreError::Query(e.to_string()))?;

                Ok(row.and_then(|r| r.into_model().field(field)))
            }
        }
    }

    async fn upsert_change(&self, record: &PriceChange) -> std::result::Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO price_changes
                (id, series, key, field, date_new, date_old,
                 price_old, price_new, pct_change, flagged, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                date_old = excluded.date_old,
                price_old = excluded.price_old,
                price_new = excluded.price_new,
                pct_change = excluded.pct_change,
                flagged = excluded.flagged
            "#,
        )
        .bind(&record.id)
        .bind(record.series.to_string())
        .bind(&record.key)
        .bind(&record.field)
        .bind(record.date_new)
        .bind(record.date_old)
        .bind(record.price_old)
        .bind(record.price_new)
        .bind(record.pct_change)
        .bind(record.flagged)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(())
    }
}
