use crate::api::{BlockchainCenterClient, CoinGeckoClient, TelegramClient};
use crate::config::{MonitorConfig, Thresholds};
use crate::error::UpstreamDataError;
use crate::models::{MarketSnapshot, NotifyOutcome, SignalReport, Triggers};
use chrono::Utc;

/// Apply the four threshold rules to a snapshot.
///
/// Pure and infallible: an absent season index degrades to a false trigger.
/// Comparisons are strict in fixed directions: dominance fires *below* its
/// threshold, the other three fire *above*. The composite signal is active
/// once at least 2 of the 4 triggers agree, with no weighting and no
/// ordering between them.
pub fn evaluate(snapshot: &MarketSnapshot, thresholds: &Thresholds) -> SignalReport {
    let triggers = Triggers {
        btc_dominance: snapshot.btc_dominance_pct < thresholds.btc_dominance_pct,
        eth_btc: snapshot.eth_btc_ratio > thresholds.eth_btc_ratio,
        alt_cap: snapshot.alt_cap_usd > thresholds.alt_cap_usd,
        altcoin_season_index: snapshot
            .altcoin_season_index
            .map(|v| f64::from(v) > thresholds.altcoin_season_index)
            .unwrap_or(false),
    };

    let green_count = triggers.green_count();

    SignalReport {
        snapshot: snapshot.clone(),
        thresholds: thresholds.clone(),
        triggers,
        green_count,
        signal_active: green_count >= 2,
    }
}

/// The market-condition monitor: fetches one snapshot per call, evaluates
/// it, and optionally pushes a notification. Holds no state across calls.
pub struct Monitor {
    thresholds: Thresholds,
    coingecko: CoinGeckoClient,
    blockchaincenter: BlockchainCenterClient,
    telegram: Option<TelegramClient>,
}

impl Monitor {
    pub fn new(config: MonitorConfig) -> anyhow::Result<Self> {
        let telegram = config.telegram.map(TelegramClient::new).transpose()?;
        Ok(Self {
            thresholds: config.thresholds,
            coingecko: CoinGeckoClient::new()?,
            blockchaincenter: BlockchainCenterClient::new()?,
            telegram,
        })
    }

    /// Build a monitor around pre-configured clients (used by tests to
    /// target mock servers).
    pub fn with_clients(
        thresholds: Thresholds,
        coingecko: CoinGeckoClient,
        blockchaincenter: BlockchainCenterClient,
        telegram: Option<TelegramClient>,
    ) -> Self {
        Self {
            thresholds,
            coingecko,
            blockchaincenter,
            telegram,
        }
    }

    /// Fetch a fresh snapshot from the upstream providers.
    ///
    /// The two CoinGecko calls are required: any failure aborts the fetch
    /// with no partial result. The season-index scrape is best-effort and
    /// collapses to `None`. `alt_cap_usd` is derived from this snapshot's
    /// own dominance and total-cap values, never fetched independently.
    pub async fn fetch_snapshot(&self) -> Result<MarketSnapshot, UpstreamDataError> {
        let captured_at = Utc::now();

        let global = self.coingecko.global_market().await?;
        let eth_btc_ratio = self.coingecko.eth_btc_ratio().await?;
        let altcoin_season_index = self.blockchaincenter.fetch_index().await;

        Ok(MarketSnapshot {
            captured_at,
            btc_dominance_pct: global.btc_dominance_pct,
            total_market_cap_usd: global.total_market_cap_usd,
            alt_cap_usd: MarketSnapshot::alt_cap_from(
                global.total_market_cap_usd,
                global.btc_dominance_pct,
            ),
            eth_btc_ratio,
            altcoin_season_index,
        })
    }

    /// Fetch + evaluate.
    pub async fn check(&self) -> Result<SignalReport, UpstreamDataError> {
        let snapshot = self.fetch_snapshot().await?;
        let report = evaluate(&snapshot, &self.thresholds);

        tracing::info!(
            "Check: greens={}/4 active={} (dominance={:.2}% eth_btc={:.5} alt_cap=${:.3e} index={:?})",
            report.green_count,
            report.signal_active,
            snapshot.btc_dominance_pct,
            snapshot.eth_btc_ratio,
            snapshot.alt_cap_usd,
            snapshot.altcoin_season_index,
        );

        Ok(report)
    }

    /// Fetch + evaluate, then push a notification when the signal is active
    /// or `force` is set.
    ///
    /// Transport failures are absorbed into `notification_sent = Some(false)`;
    /// an unconfigured transport (or no attempt) yields `None`. The report is
    /// returned either way.
    pub async fn notify(
        &self,
        force: bool,
        message: Option<String>,
    ) -> Result<NotifyOutcome, UpstreamDataError> {
        let report = self.check().await?;

        let mut notification_sent = None;
        if report.signal_active || force {
            match &self.telegram {
                Some(telegram) => {
                    let text = message.unwrap_or_else(|| report.summary_line());
                    notification_sent = Some(match telegram.send_message(&text).await {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            tracing::warn!("Notification failed: {}", e);
                            false
                        }
                    });
                }
                None => {
                    tracing::info!("Telegram not configured, skipping notification");
                }
            }
        }

        Ok(NotifyOutcome {
            report,
            notification_sent,
        })
    }
}
