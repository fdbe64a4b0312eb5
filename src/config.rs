use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Threshold values for the four altseason triggers.
///
/// Each comparison direction is fixed: dominance fires strictly *below* its
/// threshold, the other three fire strictly *above*.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// BTC dominance must drop strictly below this percentage.
    pub btc_dominance_pct: f64,
    /// ETH/BTC ratio must rise strictly above this value.
    pub eth_btc_ratio: f64,
    /// Altcoin market cap (USD) must rise strictly above this value.
    pub alt_cap_usd: f64,
    /// Altcoin Season Index must rise strictly above this value (when present).
    pub altcoin_season_index: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            btc_dominance_pct: 55.0,
            eth_btc_ratio: 0.045,
            alt_cap_usd: 1.78e12,
            altcoin_season_index: 75.0,
        }
    }
}

/// Telegram bot credentials. Both values must be present for the notifier
/// to attempt a send.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub token: String,
    pub chat_id: String,
}

/// Process-wide configuration, read once at startup and passed explicitly
/// into the monitor.
#[derive(Debug, Clone, Default)]
pub struct MonitorConfig {
    pub thresholds: Thresholds,
    pub telegram: Option<TelegramConfig>,
}

impl MonitorConfig {
    /// Build configuration from environment variables.
    ///
    /// Missing or unparsable threshold values fall back to defaults with a
    /// warning. Missing Telegram credentials disable the notifier entirely.
    pub fn from_env() -> Self {
        let defaults = Thresholds::default();

        let thresholds = Thresholds {
            btc_dominance_pct: env_or("ALT_BTC_DOM_THR", defaults.btc_dominance_pct),
            eth_btc_ratio: env_or("ALT_ETH_BTC_THR", defaults.eth_btc_ratio),
            // Configured in trillions of USD, stored as raw USD
            alt_cap_usd: env_or("ALT_TOTAL2_THR_T", defaults.alt_cap_usd / 1e12) * 1e12,
            altcoin_season_index: env_or("ALT_ASI_THR", defaults.altcoin_season_index),
        };

        let telegram = match (non_empty_var("TELEGRAM_TOKEN"), non_empty_var("TELEGRAM_CHAT")) {
            (Some(token), Some(chat_id)) => Some(TelegramConfig { token, chat_id }),
            _ => None,
        };

        Self { thresholds, telegram }
    }
}

/// Read and parse an env var, falling back to `default` when unset or invalid.
fn env_or<T: FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Invalid {}={:?}, using default {}", name, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
