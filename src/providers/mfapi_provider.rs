use crate::core::error::FetchError;
use crate::core::fund::{FundDetail, FundDirectory, FundSummary, filter_funds};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Fund directory backed by the public mfapi.in endpoints. There is no
/// server-side search, so every search downloads the whole scheme list.
pub struct MfApiProvider {
    base_url: String,
}

impl MfApiProvider {
    pub fn new(base_url: &str) -> Self {
        MfApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("Requesting {}", url);

        let client = reqwest::Client::builder()
            .user_agent("fundwise/1.0")
            .build()?;
        let response = client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {url}"))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .with_context(|| format!("Failed to get response text from {url}"))?;

        if !status.is_success() {
            return Err(anyhow!("Request to {} failed with status {}", url, status));
        }
        if response_text.trim().is_empty() {
            return Err(anyhow!("Received empty response from {}", url));
        }

        serde_json::from_str(&response_text)
            .with_context(|| format!("Failed to parse response from {url}"))
    }
}

#[async_trait]
impl FundDirectory for MfApiProvider {
    async fn search_funds(&self, query: &str) -> Result<Vec<FundSummary>, FetchError> {
        let url = format!("{}/mf", self.base_url);
        let funds: Vec<FundSummary> = self.get_json(&url).await.map_err(FetchError::Search)?;
        debug!("Fetched {} schemes", funds.len());

        let results = filter_funds(funds, query);
        debug!("Search {:?} matched {} schemes", query, results.len());
        Ok(results)
    }

    async fn get_fund_details(&self, scheme_code: &str) -> Result<FundDetail, FetchError> {
        let url = format!("{}/mf/{}", self.base_url, scheme_code);
        let detail: FundDetail =
            self.get_json(&url)
                .await
                .map_err(|source| FetchError::Details {
                    scheme_code: scheme_code.to_string(),
                    source,
                })?;
        debug!(
            "Fetched details for scheme {} with {} NAV records",
            scheme_code,
            detail.data.len()
        );
        Ok(detail)
    }
}
