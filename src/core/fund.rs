//! Fund directory abstractions and core types

use crate::core::error::FetchError;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

/// Number of entries returned for a blank search.
pub const DEFAULT_RESULT_LIMIT: usize = 20;
/// Upper bound on entries returned for a non-blank search.
pub const SEARCH_RESULT_LIMIT: usize = 50;

/// Accepts a JSON string or number and yields its string form. mfapi.in
/// serves scheme codes as numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    })
}

/// Keeps strings and numbers, drops any other shape instead of failing.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundSummary {
    #[serde(deserialize_with = "string_or_number")]
    pub scheme_code: String,
    pub scheme_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundMeta {
    #[serde(default, deserialize_with = "lenient_string")]
    pub scheme_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub scheme_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub scheme_category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub scheme_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub scheme_start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub fund_house: Option<String>,
}

/// One NAV observation. The value stays a decimal string as served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavRecord {
    pub date: String,
    pub nav: String,
}

/// Detail record for one scheme. `data` is newest first as delivered
/// upstream and is never re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundDetail {
    #[serde(default)]
    pub meta: FundMeta,
    #[serde(default)]
    pub data: Vec<NavRecord>,
}

impl FundDetail {
    pub fn latest_nav(&self) -> Option<&NavRecord> {
        self.data.first()
    }
}

#[async_trait]
pub trait FundDirectory: Send + Sync {
    async fn search_funds(&self, query: &str) -> Result<Vec<FundSummary>, FetchError>;
    async fn get_fund_details(&self, scheme_code: &str) -> Result<FundDetail, FetchError>;
}

/// Applies the client-side search over the full upstream list.
///
/// A blank query keeps the first [`DEFAULT_RESULT_LIMIT`] entries. Otherwise
/// entries whose name contains `query` case-insensitively are kept, up to
/// [`SEARCH_RESULT_LIMIT`]. Upstream order is preserved either way.
pub fn filter_funds(funds: Vec<FundSummary>, query: &str) -> Vec<FundSummary> {
    if query.trim().is_empty() {
        return funds.into_iter().take(DEFAULT_RESULT_LIMIT).collect();
    }

    let needle = query.to_lowercase();
    funds
        .into_iter()
        .filter(|fund| fund.scheme_name.to_lowercase().contains(&needle))
        .take(SEARCH_RESULT_LIMIT)
        .collect()
}
