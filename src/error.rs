use thiserror::Error;

/// A required market-data provider call failed or returned malformed data.
///
/// This aborts the whole snapshot fetch: no retries, no cached fallback,
/// no partial snapshot. Only the best-effort season index may be missing,
/// and that path never produces this error.
#[derive(Debug, Error)]
pub enum UpstreamDataError {
    #[error("{provider} request failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned HTTP {status}")]
    Status {
        provider: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("{provider} returned malformed data: {reason}")]
    Malformed {
        provider: &'static str,
        reason: String,
    },
}

/// The push-message transport call failed.
///
/// Absorbed by the notifier into `notification_sent = Some(false)`; never
/// raised to the caller.
#[derive(Debug, Error)]
#[error("telegram sendMessage failed: {source}")]
pub struct NotificationError {
    #[source]
    pub source: reqwest::Error,
}
