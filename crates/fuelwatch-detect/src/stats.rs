//! 감지 런 통계.

use std::time::Duration;
use tracing::info;

/// 한 시계열에 대한 감지 런 결과 요약.
#[derive(Debug, Clone, Default)]
pub struct DetectionStats {
    /// 검사한 (key, field) 쌍 수
    pub checked: usize,
    /// upsert 된 변동 레코드 수
    pub recorded: usize,
    /// 임계값 이상으로 플래그된 레코드 수
    pub flagged: usize,
    /// 값 누락/0 가드/쿼리 실패로 건너뛴 쌍 수
    pub skipped: usize,
    /// 런 소요 시간
    pub elapsed: Duration,
}

impl DetectionStats {
    /// 런 요약을 로그로 출력합니다.
    pub fn log_summary(&self, series: &str) {
        info!(
            series = series,
            checked = self.checked,
            recorded = self.recorded,
            flagged = self.flagged,
            skipped = self.skipped,
            elapsed_ms = self.elapsed.as_millis() as u64,
            "변동 감지 런 완료"
        );
    }
}
