//! 환경변수 기반 설정 모듈.

use crate::Result;
use fuelwatch_data::PlausibleRange;
use std::time::Duration;

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// SQLite 데이터베이스 파일 경로
    pub db_path: String,
    /// 연료 가격 수집 설정
    pub fuel: FuelFetchConfig,
    /// 환율 수집 설정
    pub exchange: ExchangeFetchConfig,
    /// 뉴스 수집/분석 설정
    pub news: NewsFetchConfig,
    /// 변동 감지 설정
    pub detect: DetectConfig,
    /// 데몬 모드 설정
    pub daemon: DaemonConfig,
}

/// 연료 가격 수집 설정
#[derive(Debug, Clone)]
pub struct FuelFetchConfig {
    /// 실제 스크레이핑 사용 여부 (false면 mock 샘플만)
    pub use_scraping: bool,
    /// 모든 소스 실패 시 mock 데이터로 대체 허용
    pub mock_fallback: bool,
    /// gogo.gs 베이스 URL
    pub gogogs_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// 유효 가격 하한 (円/L)
    pub price_min: f64,
    /// 유효 가격 상한 (円/L)
    pub price_max: f64,
}

/// 환율 수집 설정
#[derive(Debug, Clone)]
pub struct ExchangeFetchConfig {
    /// mock 데이터 사용 여부
    pub use_mock: bool,
}

/// 뉴스 수집/분석 설정
#[derive(Debug, Clone)]
pub struct NewsFetchConfig {
    /// NewsAPI 키 (없으면 mock 뉴스만 사용 가능)
    pub api_key: Option<String>,
    /// 검색 쿼리
    pub query: String,
    /// mock 뉴스 사용 여부
    pub use_mock: bool,
    /// mock 분석기 사용 여부 (Gemini 대신)
    pub use_mock_analysis: bool,
    /// Gemini 호출 간 대기 시간 (초, 무료 쿼터 레이트 리밋 회피)
    pub analysis_delay_secs: u64,
}

/// 변동 감지 설정
#[derive(Debug, Clone)]
pub struct DetectConfig {
    /// 알림 플래그 임계값 (%)
    pub threshold_pct: f64,
    /// 수집 직후 자동 감지 실행 여부
    pub auto_detect: bool,
}

/// 데몬 모드 설정
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// 워크플로우 실행 주기 (분 단위)
    pub interval_minutes: u64,
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            db_path: std::env::var("FUELWATCH_DB_PATH")
                .unwrap_or_else(|_| "./data/fuelwatch.db".to_string()),
            fuel: FuelFetchConfig {
                use_scraping: env_var_bool("FUEL_USE_SCRAPING", true),
                mock_fallback: env_var_bool("FUEL_MOCK_FALLBACK", true),
                gogogs_url: std::env::var("GOGOGS_URL")
                    .unwrap_or_else(|_| "https://gogo.gs/".to_string()),
                timeout_secs: env_var_parse("FUEL_TIMEOUT_SECS", 15),
                price_min: env_var_parse("FUEL_PRICE_MIN", 100.0),
                price_max: env_var_parse("FUEL_PRICE_MAX", 300.0),
            },
            exchange: ExchangeFetchConfig {
                use_mock: env_var_bool("EXCHANGE_USE_MOCK", false),
            },
            news: NewsFetchConfig {
                api_key: std::env::var("NEWSAPI_KEY").ok(),
                query: std::env::var("NEWS_QUERY")
                    .unwrap_or_else(|_| "oil OR gasoline OR economy".to_string()),
                use_mock: env_var_bool("NEWS_USE_MOCK", true),
                use_mock_analysis: env_var_bool("NEWS_MOCK_ANALYSIS", true),
                analysis_delay_secs: env_var_parse("NEWS_ANALYSIS_DELAY_SECS", 10),
            },
            detect: DetectConfig {
                threshold_pct: env_var_parse("DETECT_THRESHOLD_PCT", 2.0),
                auto_detect: env_var_bool("DETECT_AUTO", true),
            },
            daemon: DaemonConfig {
                interval_minutes: env_var_parse("DAEMON_INTERVAL_MINUTES", 60),
            },
        })
    }
}

impl FuelFetchConfig {
    /// 요청 타임아웃을 Duration으로 반환
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 유효 가격 범위를 반환
    pub fn plausible_range(&self) -> PlausibleRange {
        PlausibleRange {
            min: self.price_min,
            max: self.price_max,
        }
    }
}

impl NewsFetchConfig {
    /// Gemini 호출 간 대기 시간을 Duration으로 반환
    pub fn analysis_delay(&self) -> Duration {
        Duration::from_secs(self.analysis_delay_secs)
    }
}

impl DaemonConfig {
    /// 워크플로우 실행 주기를 Duration으로 반환
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes * 60)
    }
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// 환경변수에서 bool 값 파싱
fn env_var_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(default)
}
