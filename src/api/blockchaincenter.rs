use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

const INDEX_PAGE_URL: &str = "https://www.blockchaincenter.net/altcoin-season-index/";
const REQUEST_TIMEOUT_SECS: u64 = 15;

const INDEX_MARKER: &str = "Altcoin Season Index";

/// Best-effort scraper for the blockchaincenter.net Altcoin Season Index.
///
/// The page layout is uncontrolled, so every failure mode here (network,
/// HTTP status, no parseable value, value out of range) collapses to
/// `None`. This client must never abort a snapshot fetch.
#[derive(Debug, Clone)]
pub struct BlockchainCenterClient {
    client: Client,
    page_url: String,
}

impl BlockchainCenterClient {
    pub fn new() -> Result<Self> {
        Self::with_page_url(INDEX_PAGE_URL.to_string())
    }

    /// Point the scraper at an alternate page URL (used by tests).
    pub fn with_page_url(page_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, page_url })
    }

    /// Fetch the current index value, or `None` if anything goes wrong.
    pub async fn fetch_index(&self) -> Option<u8> {
        match self.fetch_page().await {
            Ok(html) => {
                let index = extract_index(&html);
                if index.is_none() {
                    tracing::debug!("Altcoin Season Index page had no parseable value");
                }
                index
            }
            Err(e) => {
                tracing::debug!("Altcoin Season Index fetch failed: {:#}", e);
                None
            }
        }
    }

    async fn fetch_page(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.page_url)
            .send()
            .await
            .context("request failed")?
            .error_for_status()
            .context("bad status")?;

        response.text().await.context("body read failed")
    }
}

/// Extract the first 2-3 digit number following an `Altcoin Season Index`
/// marker. Values outside [0, 100] are discarded rather than clamped.
fn extract_index(text: &str) -> Option<u8> {
    let mut rest = text;
    while let Some(pos) = rest.find(INDEX_MARKER) {
        rest = &rest[pos + INDEX_MARKER.len()..];

        // Skip to the first digit run after the marker
        let digits_start = rest.find(|c: char| c.is_ascii_digit())?;
        let run: String = rest[digits_start..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .take(3)
            .collect();

        // A single digit is noise (page numbers, markup); require 2-3 digits
        if run.len() < 2 {
            continue;
        }

        return match run.parse::<u16>() {
            Ok(value) if value <= 100 => Some(value as u8),
            _ => None,
        };
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_index_from_page_text() {
        let html = "<h1>Altcoin Season Index</h1><p>It is Bitcoin Season: 37</p>";
        assert_eq!(extract_index(html), Some(37));
    }

    #[test]
    fn test_extract_index_skips_single_digit_runs() {
        let html = "Altcoin Season Index 7 ... Altcoin Season Index value 82";
        assert_eq!(extract_index(html), Some(82));
    }

    #[test]
    fn test_extract_index_out_of_range_discarded() {
        let html = "Altcoin Season Index 250";
        assert_eq!(extract_index(html), None);
    }

    #[test]
    fn test_extract_index_missing_marker() {
        assert_eq!(extract_index("<html><body>maintenance</body></html>"), None);
    }

    #[test]
    fn test_extract_index_boundary_values() {
        assert_eq!(extract_index("Altcoin Season Index: 100"), Some(100));
        assert_eq!(extract_index("Altcoin Season Index: 00"), Some(0));
    }

    #[tokio::test]
    async fn test_fetch_index_absorbs_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/altcoin-season-index/")
            .with_status(503)
            .create_async()
            .await;

        let client = BlockchainCenterClient::with_page_url(format!(
            "{}/altcoin-season-index/",
            server.url()
        ))
        .unwrap();
        assert_eq!(client.fetch_index().await, None);
    }

    #[tokio::test]
    async fn test_fetch_index_parses_live_shape() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/altcoin-season-index/")
            .with_status(200)
            .with_body("<html><div>Altcoin Season Index <span>61</span></div></html>")
            .create_async()
            .await;

        let client = BlockchainCenterClient::with_page_url(format!(
            "{}/altcoin-season-index/",
            server.url()
        ))
        .unwrap();
        assert_eq!(client.fetch_index().await, Some(61));
    }
}
