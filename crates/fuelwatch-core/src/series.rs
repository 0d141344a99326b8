//! 시계열 구분 타입.

use serde::{Deserialize, Serialize};

/// 변동 감지 대상 시계열.
///
/// 연료 가격은 지역(region)이 비교 키이고,
/// 환율은 단일 전역 키(`JPY`) 아래에 통화별 필드가 붙습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Series {
    /// 연료 가격 (regular / premium / diesel)
    Fuel,
    /// 환율 (usd_jpy / eur_jpy / gbp_jpy / cny_jpy)
    Exchange,
}

impl Series {
    /// 해당 시계열의 관측 테이블 이름
    pub fn table(&self) -> &'static str {
        match self {
            Self::Fuel => "fuel_prices",
            Self::Exchange => "exchange_rates",
        }
    }

    /// 해당 시계열이 갖는 필드 이름 목록
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::Fuel => &["regular", "premium", "diesel"],
            Self::Exchange => &["usd_jpy", "eur_jpy", "gbp_jpy", "cny_jpy"],
        }
    }
}

impl std::fmt::Display for Series {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fuel => write!(f, "fuel"),
            Self::Exchange => write!(f, "exchange"),
        }
    }
}

impl std::str::FromStr for Series {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fuel" => Ok(Self::Fuel),
            "exchange" => Ok(Self::Exchange),
            other => Err(format!("알 수 없는 시계열: {other}")),
        }
    }
}
