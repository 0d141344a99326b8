//! 텔레그램 알림 전송기.
//!
//! Telegram Bot API `sendMessage`로 flagged 변동 알림을 전송합니다.

use crate::types::{NotificationError, NotificationResult, NotificationSender};
use async_trait::async_trait;
use fuelwatch_core::PriceChange;
use tracing::{debug, info};

/// 텔레그램 알림 전송 설정.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// @BotFather에서 받은 봇 토큰
    pub bot_token: String,
    /// 메시지를 보낼 채팅 ID
    pub chat_id: String,
    /// 전송 활성화 여부
    pub enabled: bool,
}

impl TelegramConfig {
    /// 새 텔레그램 설정을 생성합니다.
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            bot_token,
            chat_id,
            enabled: true,
        }
    }

    /// 환경 변수에서 설정을 생성합니다.
    ///
    /// `TELEGRAM_BOT_TOKEN` / `TELEGRAM_CHAT_ID`가 없으면 `None`.
    pub fn from_env() -> Option<Self> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN").ok()?;
        let chat_id = std::env::var("TELEGRAM_CHAT_ID").ok()?;
        let enabled = std::env::var("TELEGRAM_ENABLED")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(true);

        Some(Self {
            bot_token,
            chat_id,
            enabled,
        })
    }
}

/// 텔레그램 알림 전송기.
pub struct TelegramSender {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramSender {
    /// 새 텔레그램 전송기를 생성합니다.
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// 환경 변수에서 전송기를 생성합니다.
    pub fn from_env() -> Option<Self> {
        TelegramConfig::from_env().map(Self::new)
    }

    /// 변동 레코드를 텔레그램 메시지로 포맷합니다.
    fn format_message(change: &PriceChange) -> String {
        let direction = if change.pct_change >= 0.0 { "📈" } else { "📉" };
        format!(
            "🚨 <b>가격 변동 알림</b>\n\
             {direction} {series} / {key} / {field}\n\
             {old:.2} → {new:.2} ({pct:+.2}%)\n\
             비교 기간: {date_old} → {date_new}",
            series = change.series,
            key = change.key,
            field = change.field,
            old = change.price_old,
            new = change.price_new,
            pct = change.pct_change,
            date_old = change.date_old,
            date_new = change.date_new,
        )
    }
}

#[async_trait]
impl NotificationSender for TelegramSender {
    async fn send_change_alert(&self, change: &PriceChange) -> NotificationResult<()> {
        if !self.config.enabled {
            debug!("텔레그램 전송 비활성화 상태, 건너뜀");
            return Ok(());
        }

        let url = format!(
            "https://api.telegram.org/bot{}/sendMessage",
            self.config.bot_token
        );

        let body = serde_json::json!({
            "chat_id": self.config.chat_id,
            "text": Self::format_message(change),
            "parse_mode": "HTML",
        });

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(NotificationError::SendFailed(format!(
                "Telegram API status={}",
                response.status()
            )));
        }

        info!(
            key = %change.key,
            field = %change.field,
            pct_change = change.pct_change,
            "텔레그램 알림 전송 완료"
        );
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn name(&self) -> &str {
        "telegram"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fuelwatch_core::Series;

    #[test]
    fn test_format_message_contains_key_fields() {
        let change = PriceChange::new(
            Series::Fuel,
            "全国平均",
            "regular",
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            160.0,
            163.5,
            2.0,
        )
        .unwrap();

        let message = TelegramSender::format_message(&change);
        assert!(message.contains("全国平均"));
        assert!(message.contains("regular"));
        assert!(message.contains("+2.19%"));
        assert!(message.contains("160.00 → 163.50"));
    }

    #[test]
    fn test_disabled_config_from_env_flag() {
        let config = TelegramConfig {
            bot_token: "t".to_string(),
            chat_id: "c".to_string(),
            enabled: false,
        };
        let sender = TelegramSender::new(config);
        assert!(!sender.is_enabled());
    }
}
