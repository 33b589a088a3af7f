//! Telegram Bot API configuration

pub struct TelegramConfig {
    pub api_base_url: &'static str,
    pub timeout_secs: u64,
}

pub const TELEGRAM: TelegramConfig = TelegramConfig {
    api_base_url: "https://api.telegram.org",
    timeout_secs: 15,
};
