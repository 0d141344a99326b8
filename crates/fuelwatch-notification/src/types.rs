//! 알림 타입 및 trait 정의.

use async_trait::async_trait;
use fuelwatch_core::PriceChange;

/// 알림 작업용 Result 타입.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// 알림 에러.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("알림 전송 실패: {0}")]
    SendFailed(String),

    #[error("잘못된 설정: {0}")]
    InvalidConfig(String),

    #[error("네트워크 에러: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// 알림 전송기 trait.
///
/// flagged 변동 레코드 하나를 받아 전달합니다.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// 변동 알림을 전송합니다.
    async fn send_change_alert(&self, change: &PriceChange) -> NotificationResult<()>;

    /// 전송기가 활성화되어 있는지 확인합니다.
    fn is_enabled(&self) -> bool;

    /// 전송기 이름을 반환합니다.
    fn name(&self) -> &str;
}
