//! Gemini REST 기반 뉴스 분석기.
//!
//! `generateContent` 엔드포인트를 직접 호출합니다.
//! 429는 `AnalyzerError::RateLimited`로 구분해 호출자가 재시도 정책을
//! 적용할 수 있게 합니다.

use crate::analyzer::{AnalyzerError, NewsAnalyzer};
use async_trait::async_trait;
use fuelwatch_core::{AnalyzedNews, ImpactLevel, NewsArticle, Sentiment};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const MODEL: &str = "gemini-2.0-flash-lite";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Gemini 분석기.
pub struct GeminiAnalyzer {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiAnalyzer {
    /// 새 분석기를 생성합니다.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// 베이스 URL을 지정해 생성합니다 (테스트용).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// `GEMINI_API_KEY` 환경 변수에서 분석기를 생성합니다.
    pub fn from_env() -> Result<Self, AnalyzerError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| AnalyzerError::MissingApiKey("GEMINI_API_KEY".to_string()))?;
        Ok(Self::new(api_key))
    }

    /// 프롬프트 하나를 전송하고 첫 번째 후보 텍스트를 반환합니다.
    async fn generate(&self, prompt: &str) -> Result<String, AnalyzerError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, MODEL, self.api_key
        );

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if status.as_u16() == 429 {
            return Err(AnalyzerError::RateLimited);
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AnalyzerError::Api(format!("status={status}: {detail}")));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|_| AnalyzerError::EmptyResponse)?;
        extract_text(parsed)
    }

    fn article_prompt(article: &NewsArticle) -> String {
        format!(
            "以下のニュース記事を分析してください。\n\n\
             タイトル: {title}\n\
             内容: {content}\n\n\
             以下の形式で回答してください：\n\
             【要約】\n\
             （3行以内で要約）\n\n\
             【感情分析】\n\
             （ポジティブ/ニュートラル/ネガティブ のいずれか1つのみ）\n\n\
             【ガソリン価格への影響】\n\
             （大/中/小/なし のいずれか1つ）",
            title = article.title,
            content = article.content,
        )
    }

    fn change_prompt(price_old: f64, price_new: f64, articles: &[NewsArticle]) -> String {
        let mut news_text = String::new();
        for (i, article) in articles.iter().enumerate() {
            news_text.push_str(&format!(
                "{}. {}\n   (URL: {})\n",
                i + 1,
                article.title,
                article.url
            ));
        }

        format!(
            "あなたはエネルギー市場のアナリストです。\n\
             日本のガソリン価格が以下のように変動しました。\n\
             提供されたニュース記事の中から、この価格変動の要因として考えられるものを特定し、その理由を解説してください。\n\n\
             【価格変動データ】\n\
             - 変動前: {old:.1}円\n\
             - 変動後: {new:.1}円\n\
             - 変動幅: {diff:+.1}円\n\n\
             【本日のニュース】\n\
             {news}\n\
             【分析依頼】\n\
             1. この価格変動に最も影響を与えたと思われるニュースを1つ以上挙げてください。\n\
             2. なぜそのニュースが価格に影響したのか、因果関係を論理的に説明してください。\n\
             3. もし関連するニュースがない場合は、「関連するニュースは見当たりませんでした」と回答してください。\n\n\
             回答は日本語で、一般のドライバーにも分かりやすく簡潔にお願いします。",
            old = price_old,
            new = price_new,
            diff = price_new - price_old,
            news = news_text,
        )
    }
}

/// 응답에서 첫 번째 후보 텍스트를 꺼냅니다.
fn extract_text(response: GenerateResponse) -> Result<String, AnalyzerError> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .filter(|t| !t.is_empty())
        .ok_or(AnalyzerError::EmptyResponse)
}

#[async_trait]
impl NewsAnalyzer for GeminiAnalyzer {
    async fn analyze_article(&self, article: &NewsArticle) -> Result<AnalyzedNews, AnalyzerError> {
        debug!(title = %article.title, "Gemini 뉴스 분석 요청");

        let summary = self.generate(&Self::article_prompt(article)).await?;
        let sentiment = Sentiment::parse(&summary);
        let impact = ImpactLevel::parse(&summary);

        info!(title = %article.title, sentiment = %sentiment, impact = %impact, "뉴스 분석 완료");

        Ok(AnalyzedNews {
            title: article.title.clone(),
            url: article.url.clone(),
            published_at: article.published_at.clone(),
            summary,
            sentiment,
            impact,
        })
    }

    async fn explain_change(
        &self,
        price_old: f64,
        price_new: f64,
        articles: &[NewsArticle],
    ) -> Result<String, AnalyzerError> {
        debug!(price_old, price_new, articles = articles.len(), "가격 변동 해설 요청");
        self.generate(&Self::change_prompt(price_old, price_new, articles))
            .await
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> NewsArticle {
        NewsArticle {
            title: "原油価格が上昇".to_string(),
            content: "中東情勢の緊張により原油価格が上昇しています。".to_string(),
            url: "https://example.com/news/1".to_string(),
            published_at: "2025-01-02T09:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_article_prompt_contains_title_and_format() {
        let prompt = GeminiAnalyzer::article_prompt(&article());
        assert!(prompt.contains("原油価格が上昇"));
        assert!(prompt.contains("【要約】"));
        assert!(prompt.contains("【感情分析】"));
        assert!(prompt.contains("【ガソリン価格への影響】"));
    }

    #[test]
    fn test_change_prompt_numbers_articles() {
        let prompt = GeminiAnalyzer::change_prompt(160.0, 163.5, &[article()]);
        assert!(prompt.contains("変動前: 160.0円"));
        assert!(prompt.contains("変動後: 163.5円"));
        assert!(prompt.contains("変動幅: +3.5円"));
        assert!(prompt.contains("1. 原油価格が上昇"));
    }

    #[test]
    fn test_extract_text_first_candidate() {
        let parsed: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"【感情分析】ネガティブ"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(parsed).unwrap(), "【感情分析】ネガティブ");
    }

    #[test]
    fn test_extract_text_empty_is_error() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(
            extract_text(parsed),
            Err(AnalyzerError::EmptyResponse)
        ));

        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[]}}]}"#).unwrap();
        assert!(matches!(
            extract_text(parsed),
            Err(AnalyzerError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn test_generate_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock(
                "POST",
                mockito::Matcher::Regex(r"^/v1beta/models/.*:generateContent".to_string()),
            )
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .with_body(r#"{"error":{"code":429}}"#)
            .create_async()
            .await;

        let analyzer = GeminiAnalyzer::with_base_url("test-key".to_string(), server.url());
        let result = analyzer.generate("prompt").await;
        assert!(matches!(result, Err(AnalyzerError::RateLimited)));
    }

    #[tokio::test]
    async fn test_analyze_article_parses_labels() {
        let mut server = mockito::Server::new_async().await;
        let body = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{
                        "text": "【要約】\n原油高で小売価格に上昇圧力。\n\n【感情分析】\nネガティブ\n\n【ガソリン価格への影響】\n大"
                    }]
                }
            }]
        });
        let _mock = server
            .mock(
                "POST",
                mockito::Matcher::Regex(r"^/v1beta/models/.*:generateContent".to_string()),
            )
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let analyzer = GeminiAnalyzer::with_base_url("test-key".to_string(), server.url());
        let analyzed = analyzer.analyze_article(&article()).await.unwrap();
        assert_eq!(analyzed.sentiment, Sentiment::Negative);
        assert_eq!(analyzed.impact, ImpactLevel::High);
        assert!(analyzed.summary.contains("原油高"));
    }

    #[test]
    fn test_from_env_missing_key() {
        std::env::remove_var("GEMINI_API_KEY");
        assert!(matches!(
            GeminiAnalyzer::from_env(),
            Err(AnalyzerError::MissingApiKey(_))
        ));
    }
}
