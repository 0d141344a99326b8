//! 뉴스 기사 및 분석 결과 타입.

use serde::{Deserialize, Serialize};

/// 외부 뉴스 소스에서 가져온 기사.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    /// 본문 요약 (NewsAPI description)
    pub content: String,
    pub url: String,
    /// 발행 시각 (소스 형식 그대로)
    pub published_at: String,
}

/// 감정 분석 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// 분석기 자유 텍스트에서 감정 라벨 추출.
    ///
    /// 분석기가 일본어/영어 어느 쪽으로 답해도 인식합니다.
    pub fn parse(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("ポジティブ") || lower.contains("positive") {
            Self::Positive
        } else if lower.contains("ネガティブ") || lower.contains("negative") {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Neutral => write!(f, "neutral"),
            Self::Negative => write!(f, "negative"),
        }
    }
}

/// 연료 가격에 미치는 영향도.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
    None,
}

impl ImpactLevel {
    /// 분석기 자유 텍스트에서 영향도 라벨 추출 (大/中/小/なし)
    pub fn parse(text: &str) -> Self {
        if text.contains('大') {
            Self::High
        } else if text.contains('中') {
            Self::Medium
        } else if text.contains('小') {
            Self::Low
        } else {
            Self::None
        }
    }
}

impl std::fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
            Self::None => write!(f, "none"),
        }
    }
}

/// 분석이 끝난 뉴스 기사.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedNews {
    pub title: String,
    pub url: String,
    pub published_at: String,
    /// 분석기가 생성한 요약 전문
    pub summary: String,
    pub sentiment: Sentiment,
    pub impact: ImpactLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_parse() {
        assert_eq!(Sentiment::parse("【感情分析】ポジティブ"), Sentiment::Positive);
        assert_eq!(Sentiment::parse("this is negative news"), Sentiment::Negative);
        assert_eq!(Sentiment::parse("no label here"), Sentiment::Neutral);
    }

    #[test]
    fn test_impact_parse() {
        assert_eq!(ImpactLevel::parse("影響: 大"), ImpactLevel::High);
        assert_eq!(ImpactLevel::parse("影響: 中"), ImpactLevel::Medium);
        assert_eq!(ImpactLevel::parse("影響: 小"), ImpactLevel::Low);
        assert_eq!(ImpactLevel::parse("影響なし"), ImpactLevel::None);
    }
}
