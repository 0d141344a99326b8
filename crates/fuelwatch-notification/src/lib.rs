//! # FuelWatch Notification
//!
//! flagged 변동 레코드를 외부 채널로 전달합니다.
//! 감지기는 전달 여부만 위임하며, 전송 실패는 이 계층에서 로그로
//! 끝나고 감지 런을 실패시키지 않습니다.

pub mod telegram;
pub mod types;

pub use telegram::{TelegramConfig, TelegramSender};
pub use types::{NotificationError, NotificationResult, NotificationSender};
