//! 단발성 HTTP fetch 클라이언트.
//!
//! 타임아웃이 걸린 GET 한 번으로 본문 문자열을 가져옵니다.
//! 재시도/fallback은 이 계층의 책임이 아니며 `ScraperManager`가 담당합니다.

use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// 봇 차단을 줄이기 위한 고정 브라우저 헤더.
///
/// 호출별로 바꿀 수 없는 고정 정책입니다.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "ja,en-US;q=0.9,en;q=0.8";

/// Fetch 계층 오류.
#[derive(Debug, Error)]
pub enum FetchError {
    /// 데드라인 초과 또는 취소
    #[error("요청 타임아웃: {url}")]
    Timeout { url: String },

    /// 연결 실패 등 전송 계층 오류
    #[error("전송 오류: {0}")]
    Transport(String),

    /// 2xx 이외의 응답
    #[error("HTTP 오류: status={code}")]
    Status { code: u16 },
}

/// 타임아웃이 걸린 단발성 GET 클라이언트.
pub struct FetchClient {
    client: reqwest::Client,
}

impl FetchClient {
    /// 지정한 타임아웃으로 클라이언트를 생성합니다.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self { client })
    }

    /// URL 본문을 문자열로 가져옵니다.
    ///
    /// 타임아웃은 `Timeout`, 연결 실패는 `Transport`, 2xx 이외 응답은
    /// `Status`로 구분됩니다. 이 계층에서는 재시도하지 않습니다.
    pub async fn get(&self, url: &str) -> Result<String, FetchError> {
        debug!(url = url, "HTTP GET");

        let response = self
            .client
            .get(url)
            .header("Accept", ACCEPT)
            .header("Accept-Language", ACCEPT_LANGUAGE)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                code: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| classify_reqwest_error(e, url))
    }
}

/// reqwest 오류를 fetch 오류 분류 체계로 변환.
fn classify_reqwest_error(err: reqwest::Error, url: &str) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport(err.to_string())
    }
}
