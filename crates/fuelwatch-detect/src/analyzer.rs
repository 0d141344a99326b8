//! 뉴스 분석기 trait.

use async_trait::async_trait;
use fuelwatch_core::{AnalyzedNews, NewsArticle};
use thiserror::Error;

/// 분석기 오류.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// API 키 미설정
    #[error("API 키가 설정되지 않았습니다: {0}")]
    MissingApiKey(String),

    /// 레이트 리밋 초과 (HTTP 429). 호출자는 잠시 후 재시도해야 합니다.
    #[error("분석 API 레이트 리밋 초과 (429)")]
    RateLimited,

    /// API가 오류 상태를 반환
    #[error("분석 API 오류: {0}")]
    Api(String),

    /// 응답이 비어 있거나 예상 형식이 아님
    #[error("분석 API 응답이 비어 있거나 형식이 올바르지 않습니다")]
    EmptyResponse,

    /// 네트워크 오류
    #[error("네트워크 오류: {0}")]
    Network(#[from] reqwest::Error),
}

/// 뉴스 기사 분석기.
///
/// 기사 하나를 받아 요약/감정/영향도를 산출하고, 가격 변동의 원인
/// 해설문을 생성합니다. 실제 구현은 Gemini REST(`GeminiAnalyzer`),
/// 오프라인 대체는 `MockAnalyzer` 입니다.
#[async_trait]
pub trait NewsAnalyzer: Send + Sync {
    /// 기사 하나를 분석합니다.
    async fn analyze_article(&self, article: &NewsArticle) -> Result<AnalyzedNews, AnalyzerError>;

    /// 가격 변동의 원인 해설문을 생성합니다.
    async fn explain_change(
        &self,
        price_old: f64,
        price_new: f64,
        articles: &[NewsArticle],
    ) -> Result<String, AnalyzerError>;

    /// 분석기 이름을 반환합니다.
    fn name(&self) -> &str;
}
