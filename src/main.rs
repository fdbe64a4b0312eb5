use altwatch::monitor::Monitor;
use altwatch::MonitorConfig;
use clap::{Parser, Subcommand};
use tokio::time::{interval, Duration, MissedTickBehavior};

#[derive(Parser)]
#[command(name = "altwatch", about = "Altseason market-condition monitor")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch a market snapshot, evaluate it, and print the report as JSON
    Check,
    /// Fetch + evaluate, then push a Telegram message when the signal is
    /// active (or --force is set)
    Notify {
        /// Send the notification even when the signal is inactive
        #[arg(long)]
        force: bool,
        /// Message text; defaults to the templated summary line
        #[arg(long)]
        message: Option<String>,
    },
    /// Check periodically, notifying whenever the signal is active
    Watch {
        /// Minutes between checks
        #[arg(long, default_value_t = 60)]
        interval_minutes: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let cli = Cli::parse();
    let config = MonitorConfig::from_env();

    tracing::info!("🚀 AltWatch starting");
    tracing::info!("📊 Thresholds:");
    tracing::info!("  BTC dominance  < {:.2}%", config.thresholds.btc_dominance_pct);
    tracing::info!("  ETH/BTC        > {:.4}", config.thresholds.eth_btc_ratio);
    tracing::info!("  Alt market cap > ${:.2}T", config.thresholds.alt_cap_usd / 1e12);
    tracing::info!("  Season index   > {}", config.thresholds.altcoin_season_index);
    tracing::info!(
        "  Telegram: {}",
        if config.telegram.is_some() { "configured" } else { "not configured" }
    );

    let monitor = Monitor::new(config)?;

    match cli.command {
        Command::Check => {
            let report = monitor.check().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Notify { force, message } => {
            let outcome = monitor.notify(force, message).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::Watch { interval_minutes } => {
            watch_loop(&monitor, interval_minutes).await;
        }
    }

    Ok(())
}

/// Check on a fixed interval, forever. A failed check is logged and the loop
/// continues to the next tick; a transient provider outage must not kill the
/// daemon.
async fn watch_loop(monitor: &Monitor, interval_minutes: u64) {
    tracing::info!("🔄 Watching, checking every {} minute(s)", interval_minutes);

    let mut ticker = interval(Duration::from_secs(interval_minutes * 60));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        match monitor.notify(false, None).await {
            Ok(outcome) => {
                if outcome.report.snapshot.altcoin_season_index.is_none() {
                    tracing::debug!("Season index unavailable, signal bar is 2 of 3");
                }
                match outcome.notification_sent {
                    Some(true) => tracing::info!("📨 Notification sent"),
                    Some(false) => tracing::warn!("📭 Notification attempt failed"),
                    None => {}
                }
            }
            Err(e) => {
                tracing::error!("Check failed: {}", e);
            }
        }
    }
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "altwatch=info".into()),
        )
        .init();
}
