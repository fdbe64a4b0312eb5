use crate::error::UpstreamDataError;
use anyhow::Context;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

const COINGECKO_API_BASE: &str = "https://api.coingecko.com/api/v3";
const REQUEST_TIMEOUT_SECS: u64 = 15;
const PROVIDER: &str = "coingecko";

/// Client for the CoinGecko public API.
///
/// Used for the two *required* market-data calls: global market stats and
/// the ETH/BTC price. Failures here abort the whole snapshot fetch; there
/// is no retry logic.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
}

/// Global market stats extracted from `/global`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalMarket {
    pub btc_dominance_pct: f64,
    pub total_market_cap_usd: f64,
}

/// Response from the `/global` endpoint (only the maps we read).
#[derive(Debug, Deserialize)]
struct GlobalResponse {
    data: GlobalData,
}

#[derive(Debug, Deserialize)]
struct GlobalData {
    total_market_cap: HashMap<String, f64>,
    market_cap_percentage: HashMap<String, f64>,
}

impl CoinGeckoClient {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_base_url(COINGECKO_API_BASE.to_string())
    }

    /// Point the client at an alternate base URL (used by tests to target a
    /// mock server).
    pub fn with_base_url(base_url: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, UpstreamDataError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| UpstreamDataError::Http { provider: PROVIDER, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamDataError::Status { provider: PROVIDER, status });
        }

        response
            .json()
            .await
            .map_err(|source| UpstreamDataError::Http { provider: PROVIDER, source })
    }

    /// Fetch BTC dominance and total market cap from `/global`.
    pub async fn global_market(&self) -> Result<GlobalMarket, UpstreamDataError> {
        let body: GlobalResponse = self.get_json("/global").await?;

        let total_market_cap_usd = *body.data.total_market_cap.get("usd").ok_or_else(|| {
            UpstreamDataError::Malformed {
                provider: PROVIDER,
                reason: "total_market_cap missing `usd` entry".to_string(),
            }
        })?;

        let btc_dominance_pct = *body.data.market_cap_percentage.get("btc").ok_or_else(|| {
            UpstreamDataError::Malformed {
                provider: PROVIDER,
                reason: "market_cap_percentage missing `btc` entry".to_string(),
            }
        })?;

        tracing::debug!(
            "CoinGecko global: dominance={:.2}% total_cap=${:.3e}",
            btc_dominance_pct,
            total_market_cap_usd
        );

        Ok(GlobalMarket { btc_dominance_pct, total_market_cap_usd })
    }

    /// Fetch the ETH price denominated in BTC from `/simple/price`.
    pub async fn eth_btc_ratio(&self) -> Result<f64, UpstreamDataError> {
        let body: HashMap<String, HashMap<String, f64>> = self
            .get_json("/simple/price?ids=ethereum&vs_currencies=btc")
            .await?;

        let ratio = body
            .get("ethereum")
            .and_then(|prices| prices.get("btc"))
            .copied()
            .ok_or_else(|| UpstreamDataError::Malformed {
                provider: PROVIDER,
                reason: "simple/price missing `ethereum.btc` entry".to_string(),
            })?;

        tracing::debug!("CoinGecko ETH/BTC: {:.5}", ratio);

        Ok(ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(CoinGeckoClient::new().is_ok());
    }

    #[tokio::test]
    async fn test_global_market_parses_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/global")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data":{"total_market_cap":{"usd":3.1e12,"eur":2.9e12},"market_cap_percentage":{"btc":53.2,"eth":12.1}}}"#,
            )
            .create_async()
            .await;

        let client = CoinGeckoClient::with_base_url(server.url()).unwrap();
        let global = client.global_market().await.unwrap();

        assert_eq!(global.btc_dominance_pct, 53.2);
        assert_eq!(global.total_market_cap_usd, 3.1e12);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_global_market_missing_btc_key_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/global")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":{"total_market_cap":{"usd":3.1e12},"market_cap_percentage":{}}}"#)
            .create_async()
            .await;

        let client = CoinGeckoClient::with_base_url(server.url()).unwrap();
        let err = client.global_market().await.unwrap_err();

        assert!(matches!(err, UpstreamDataError::Malformed { .. }));
        assert!(err.to_string().contains("btc"));
    }

    #[tokio::test]
    async fn test_global_market_server_error_propagates() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/global")
            .with_status(500)
            .create_async()
            .await;

        let client = CoinGeckoClient::with_base_url(server.url()).unwrap();
        let err = client.global_market().await.unwrap_err();

        assert!(matches!(err, UpstreamDataError::Status { .. }));
    }

    #[tokio::test]
    async fn test_eth_btc_ratio_parses() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/simple/price")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ethereum":{"btc":0.0521}}"#)
            .create_async()
            .await;

        let client = CoinGeckoClient::with_base_url(server.url()).unwrap();
        let ratio = client.eth_btc_ratio().await.unwrap();

        assert_eq!(ratio, 0.0521);
    }
}
