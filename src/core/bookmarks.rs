//! Saved-fund collection persisted as one JSON array.

use crate::core::fund::FundDetail;
use crate::core::storage::{SAVED_FUNDS_KEY, Storage};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

const NAV_UNAVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFund {
    pub scheme_code: String,
    pub scheme_name: String,
    pub fund_house: String,
    pub category: String,
    /// NAV at the time the fund was saved, `"N/A"` if there was none.
    pub current_nav: String,
    pub saved_at: DateTime<Utc>,
}

impl SavedFund {
    /// Captures `detail` as it looks right now. `scheme_code` is the code the
    /// detail was requested with, used when the payload lacks one.
    pub fn snapshot(scheme_code: &str, detail: &FundDetail) -> Self {
        let meta = &detail.meta;
        SavedFund {
            scheme_code: meta
                .scheme_code
                .clone()
                .unwrap_or_else(|| scheme_code.to_string()),
            scheme_name: meta.scheme_name.clone().unwrap_or_default(),
            fund_house: meta.fund_house.clone().unwrap_or_default(),
            category: meta.scheme_category.clone().unwrap_or_default(),
            current_nav: detail
                .latest_nav()
                .map_or_else(|| NAV_UNAVAILABLE.to_string(), |r| r.nav.clone()),
            saved_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    AlreadySaved,
}

/// Bookmark operations over a [`Storage`]. Callers are responsible for
/// checking the user is signed in first.
pub struct BookmarkStore {
    storage: Arc<dyn Storage>,
}

impl BookmarkStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Saved funds in insertion order.
    pub fn list(&self) -> Result<Vec<SavedFund>> {
        let Some(raw) = self
            .storage
            .get(SAVED_FUNDS_KEY)
            .context("Failed to read saved funds")?
        else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(funds) => Ok(funds),
            Err(e) => {
                warn!("Saved funds are not parsable, treating as empty: {}", e);
                Ok(Vec::new())
            }
        }
    }

    pub fn is_saved(&self, scheme_code: &str) -> Result<bool> {
        Ok(self
            .list()?
            .iter()
            .any(|fund| fund.scheme_code == scheme_code))
    }

    pub fn save(&self, fund: SavedFund) -> Result<SaveOutcome> {
        let mut funds = self.list()?;
        if funds.iter().any(|f| f.scheme_code == fund.scheme_code) {
            debug!("Fund {} already saved", fund.scheme_code);
            return Ok(SaveOutcome::AlreadySaved);
        }

        debug!("Saving fund {}", fund.scheme_code);
        funds.push(fund);
        self.write(&funds)?;
        Ok(SaveOutcome::Saved)
    }

    /// Returns whether an entry was removed.
    pub fn remove(&self, scheme_code: &str) -> Result<bool> {
        let mut funds = self.list()?;
        let before = funds.len();
        funds.retain(|f| f.scheme_code != scheme_code);
        if funds.len() == before {
            debug!("Fund {} not saved, nothing to remove", scheme_code);
            return Ok(false);
        }

        self.write(&funds)?;
        debug!("Removed fund {}", scheme_code);
        Ok(true)
    }

    fn write(&self, funds: &[SavedFund]) -> Result<()> {
        let raw = serde_json::to_string(funds).context("Failed to serialize saved funds")?;
        self.storage
            .set(SAVED_FUNDS_KEY, &raw)
            .context("Failed to store saved funds")
    }
}
