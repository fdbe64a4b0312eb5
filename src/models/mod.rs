use crate::config::Thresholds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One immutable set of market metrics as of a single timestamp.
///
/// All required fields come from the same fetch; `alt_cap_usd` is always
/// derived from this snapshot's own dominance and total-cap values so the
/// record stays internally consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// When the fetch started (UTC).
    pub captured_at: DateTime<Utc>,
    /// BTC share of total crypto market cap, in percent [0, 100].
    pub btc_dominance_pct: f64,
    /// Total crypto market capitalization in USD.
    pub total_market_cap_usd: f64,
    /// Non-BTC market cap: `total * (1 - dominance/100)`.
    pub alt_cap_usd: f64,
    /// Price of ETH expressed in BTC.
    pub eth_btc_ratio: f64,
    /// Altcoin Season Index in [0, 100]; `None` when the best-effort scrape
    /// failed or produced an out-of-range value.
    pub altcoin_season_index: Option<u8>,
}

impl MarketSnapshot {
    /// Altcoin market cap implied by a total cap and a dominance percentage.
    pub fn alt_cap_from(total_market_cap_usd: f64, btc_dominance_pct: f64) -> f64 {
        total_market_cap_usd * (1.0 - btc_dominance_pct / 100.0)
    }
}

/// Per-metric trigger flags. A trigger is true when its metric has crossed
/// the configured threshold in the altseason direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triggers {
    pub btc_dominance: bool,
    pub eth_btc: bool,
    pub alt_cap: bool,
    pub altcoin_season_index: bool,
}

impl Triggers {
    pub fn green_count(&self) -> u8 {
        u8::from(self.btc_dominance)
            + u8::from(self.eth_btc)
            + u8::from(self.alt_cap)
            + u8::from(self.altcoin_season_index)
    }
}

/// Threshold-evaluation result for one snapshot. Stateless and recomputed
/// from scratch on every check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    #[serde(flatten)]
    pub snapshot: MarketSnapshot,
    pub thresholds: Thresholds,
    pub triggers: Triggers,
    pub green_count: u8,
    /// True iff at least 2 of the 4 triggers are green.
    pub signal_active: bool,
}

impl SignalReport {
    /// Default notification line: `[Altseason] {asof} — Greens={n} — ALTSEASON_ON={YES|NO}`.
    pub fn summary_line(&self) -> String {
        format!(
            "[Altseason] {} — Greens={} — ALTSEASON_ON={}",
            self.snapshot.captured_at.format("%Y-%m-%dT%H:%M:%S%.6fZ"),
            self.green_count,
            if self.signal_active { "YES" } else { "NO" }
        )
    }
}

/// Result of a notify call: the report plus whether a send was attempted.
///
/// `notification_sent` is `None` when the transport is unconfigured or the
/// signal was inactive without `force`; otherwise `Some(success)`.
#[derive(Debug, Clone, Serialize)]
pub struct NotifyOutcome {
    pub report: SignalReport,
    pub notification_sent: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_alt_cap_identity() {
        let total = 3.2e12;
        let dominance = 52.5;
        let alt_cap = MarketSnapshot::alt_cap_from(total, dominance);
        assert_eq!(alt_cap, total * (1.0 - dominance / 100.0));
    }

    #[test]
    fn test_green_count() {
        let triggers = Triggers {
            btc_dominance: true,
            eth_btc: false,
            alt_cap: true,
            altcoin_season_index: true,
        };
        assert_eq!(triggers.green_count(), 3);
    }

    #[test]
    fn test_summary_line_format() {
        let captured_at = Utc.with_ymd_and_hms(2024, 11, 5, 12, 30, 0).unwrap();
        let snapshot = MarketSnapshot {
            captured_at,
            btc_dominance_pct: 50.0,
            total_market_cap_usd: 3.0e12,
            alt_cap_usd: 1.5e12,
            eth_btc_ratio: 0.05,
            altcoin_season_index: None,
        };
        let report = SignalReport {
            snapshot,
            thresholds: Thresholds::default(),
            triggers: Triggers {
                btc_dominance: true,
                eth_btc: true,
                alt_cap: false,
                altcoin_season_index: false,
            },
            green_count: 2,
            signal_active: true,
        };

        let line = report.summary_line();
        assert!(line.starts_with("[Altseason] 2024-11-05T12:30:00"));
        assert!(line.contains("Greens=2"));
        assert!(line.ends_with("ALTSEASON_ON=YES"));
    }
}
