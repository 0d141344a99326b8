//! 뉴스 fetcher.
//!
//! NewsAPI `everything` 엔드포인트에서 연료/경제 관련 기사를 가져옵니다.
//! 분석 자체는 `fuelwatch-detect`의 analyzer 협력자가 담당하며,
//! 이 모듈은 페이지 단위 기사 소스일 뿐입니다.

use crate::error::DataError;
use crate::provider::client::FetchClient;
use fuelwatch_core::NewsArticle;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

/// NewsAPI 응답 페이로드.
#[derive(Debug, Deserialize)]
struct NewsResponse {
    status: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<ApiArticle>,
}

#[derive(Debug, Deserialize)]
struct ApiArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

/// NewsAPI fetcher.
pub struct NewsFetcher {
    client: FetchClient,
    base_url: String,
    api_key: String,
    /// 한 번에 가져올 기사 수
    page_size: usize,
}

impl NewsFetcher {
    pub fn new(api_key: &str) -> Result<Self, DataError> {
        Self::with_base_url(api_key, "https://newsapi.org/v2/everything")
    }

    /// 커스텀 엔드포인트로 생성 (테스트용)
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, DataError> {
        Ok(Self {
            client: FetchClient::new(Duration::from_secs(15))?,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            page_size: 3,
        })
    }

    /// 검색어로 최신 기사를 가져옵니다.
    pub async fn fetch_top_news(&self, query: &str) -> Result<Vec<NewsArticle>, DataError> {
        let url = format!(
            "{}?q={}&sortBy=publishedAt&pageSize={}&apiKey={}",
            self.base_url,
            urlencode(query),
            self.page_size,
            self.api_key
        );

        info!(query = query, "NewsAPI 조회 시작");

        let body = self.client.get(&url).await?;
        let articles = parse_articles(&body)?;

        info!(count = articles.len(), "뉴스 조회 완료");
        Ok(articles)
    }
}

/// NewsAPI 본문을 기사 목록으로 변환합니다.
///
/// HTTP 200이어도 `status == "error"`일 수 있으므로 API 레벨 오류를
/// 별도로 검사합니다.
fn parse_articles(body: &str) -> Result<Vec<NewsArticle>, DataError> {
    let response: NewsResponse = serde_json::from_str(body)?;

    if response.status == "error" {
        return Err(DataError::FetchError(format!(
            "NewsAPI 오류: [{}] {}",
            response.code.unwrap_or_default(),
            response.message.unwrap_or_default()
        )));
    }

    Ok(response
        .articles
        .into_iter()
        .filter_map(|a| {
            // 제목 없는 기사는 분석 의미가 없으므로 제외
            let title = a.title?;
            Some(NewsArticle {
                title,
                content: a.description.unwrap_or_default(),
                url: a.url.unwrap_or_default(),
                published_at: a.published_at.unwrap_or_default(),
            })
        })
        .collect())
}

/// 쿼리 문자열 최소 인코딩 (공백과 예약 문자)
fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            ' ' => out.push_str("%20"),
            '&' => out.push_str("%26"),
            '?' => out.push_str("%3F"),
            '=' => out.push_str("%3D"),
            '#' => out.push_str("%23"),
            '+' => out.push_str("%2B"),
            _ => out.push(c),
        }
    }
    out
}

/// 고정 기사 목록을 반환하는 mock fetcher.
pub struct MockNewsFetcher;

impl MockNewsFetcher {
    pub async fn fetch_top_news(&self, _query: &str) -> Result<Vec<NewsArticle>, DataError> {
        info!("mock 뉴스 데이터 사용");
        Ok(vec![
            NewsArticle {
                title: "原油価格が3週連続で上昇".to_string(),
                content: "OPECの減産継続を受け、原油先物価格が上昇している。".to_string(),
                url: "https://example.com/news/1".to_string(),
                published_at: "2025-01-02T09:00:00Z".to_string(),
            },
            NewsArticle {
                title: "円安進行でガソリン輸入コスト増".to_string(),
                content: "為替の円安傾向が続き、燃料の輸入コストが増加。".to_string(),
                url: "https://example.com/news/2".to_string(),
                published_at: "2025-01-02T08:30:00Z".to_string(),
            },
        ])
    }
}
