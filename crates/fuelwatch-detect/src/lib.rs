//! 변동 감지 엔진.
//!
//! 이 crate는 다음을 제공합니다:
//! - `ChangeDetector`: 최근 두 관측 날짜를 키/필드별로 비교하고
//!   임계값 이상의 변동에 플래그를 세움
//! - `NewsAnalyzer`: 뉴스 기사 감정/영향 분석 협력자
//!   (Gemini REST 구현 + 오프라인 mock)

pub mod analyzer;
pub mod change_detector;
pub mod gemini;
pub mod mock;
pub mod stats;

pub use analyzer::{AnalyzerError, NewsAnalyzer};
pub use change_detector::{ChangeDetector, DetectError};
pub use gemini::GeminiAnalyzer;
pub use mock::MockAnalyzer;
pub use stats::DetectionStats;
