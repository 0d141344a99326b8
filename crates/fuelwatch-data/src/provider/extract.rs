//! 가격 텍스트 추출기.
//!
//! HTML 문서 탐색과 숫자 토큰 파싱을 담당합니다.
//! 어떤 소스에서 왔는지는 모르는 소스 중립 계층이므로,
//! 가격 범위 검증은 여기가 아니라 호출하는 스크레이퍼에서 합니다.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// 추출 계층 오류.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// 입력에 숫자 토큰이 없음
    #[error("숫자 토큰 없음: {input}")]
    NoNumericToken { input: String },

    /// 토큰을 f64로 변환 실패
    #[error("숫자 변환 실패: {token}")]
    NumericParse { token: String },
}

/// 텍스트에서 첫 번째 연속 십진수 토큰을 추출합니다.
///
/// 패턴: 숫자 1개 이상, 선택적 `.`, 이어지는 숫자. 예: `"168.5円"` → `168.5`.
pub fn extract_numeric(text: &str) -> Result<f64, ExtractError> {
    let start = text.char_indices().find(|(_, c)| c.is_ascii_digit());

    let Some((start, _)) = start else {
        return Err(ExtractError::NoNumericToken {
            input: text.to_string(),
        });
    };

    let mut token = String::new();
    let mut seen_dot = false;
    for c in text[start..].chars() {
        if c.is_ascii_digit() {
            token.push(c);
        } else if c == '.' && !seen_dot {
            seen_dot = true;
            token.push(c);
        } else {
            break;
        }
    }

    // "12." 같은 꼬리 점은 토큰에서 제외
    let token = token.trim_end_matches('.').to_string();

    token.parse::<f64>().map_err(|_| ExtractError::NumericParse {
        token: token.clone(),
    })
}

/// 클래스 이름으로 첫 번째 일치 요소를 찾습니다 (문서 순서 = pre-order).
pub fn find_by_class<'a>(document: &'a Html, class_name: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(&format!(".{}", class_name)).ok()?;
    document.select(&selector).next()
}

/// 태그 이름으로 모든 일치 요소를 문서 순서대로 반환합니다.
pub fn find_all_by_tag<'a>(document: &'a Html, tag: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(tag) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// 요소의 모든 하위 텍스트 노드를 이어 붙입니다.
///
/// 각 텍스트 조각은 앞뒤 공백을 제거한 뒤 이어 붙이고,
/// 단어 내부 공백은 그대로 유지합니다.
pub fn text_content(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<String>()
}
