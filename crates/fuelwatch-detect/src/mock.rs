//! 오프라인 mock 뉴스 분석기.
//!
//! API 키 없이 파이프라인을 끝까지 돌려볼 때 사용합니다.
//! 제목 키워드로 감정을 결정하는 단순 규칙 기반입니다.

use crate::analyzer::{AnalyzerError, NewsAnalyzer};
use async_trait::async_trait;
use fuelwatch_core::{AnalyzedNews, ImpactLevel, NewsArticle, Sentiment};
use tracing::debug;

const NEGATIVE_KEYWORDS: &[&str] = &["上昇", "増加", "高騰", "緊張", "リスク"];
const POSITIVE_KEYWORDS: &[&str] = &["補助", "軽減", "普及", "好調"];

/// 규칙 기반 mock 분석기.
#[derive(Debug, Default)]
pub struct MockAnalyzer;

impl MockAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn classify(title: &str) -> Sentiment {
        if NEGATIVE_KEYWORDS.iter().any(|k| title.contains(k)) {
            Sentiment::Negative
        } else if POSITIVE_KEYWORDS.iter().any(|k| title.contains(k)) {
            Sentiment::Positive
        } else {
            Sentiment::Neutral
        }
    }
}

#[async_trait]
impl NewsAnalyzer for MockAnalyzer {
    async fn analyze_article(&self, article: &NewsArticle) -> Result<AnalyzedNews, AnalyzerError> {
        debug!(title = %article.title, "mock 뉴스 분석 사용");

        let sentiment = Self::classify(&article.title);
        let sentiment_label = match sentiment {
            Sentiment::Positive => "ポジティブ",
            Sentiment::Neutral => "ニュートラル",
            Sentiment::Negative => "ネガティブ",
        };
        let summary = format!(
            "【要約】\n{}\n\n【感情分析】\n{}\n\n【ガソリン価格への影響】\n中",
            article.content, sentiment_label
        );

        Ok(AnalyzedNews {
            title: article.title.clone(),
            url: article.url.clone(),
            published_at: article.published_at.clone(),
            summary,
            sentiment,
            impact: ImpactLevel::Medium,
        })
    }

    async fn explain_change(
        &self,
        price_old: f64,
        price_new: f64,
        articles: &[NewsArticle],
    ) -> Result<String, AnalyzerError> {
        let diff = price_new - price_old;
        Ok(format!(
            "ガソリン価格が {price_old:.1}円 から {price_new:.1}円 へ {diff:+.1}円 変動しました。\
             本日の関連ニュースは {count} 件です。（モック解説）",
            count = articles.len(),
        ))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
