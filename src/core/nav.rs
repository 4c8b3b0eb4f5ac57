//! NAV change calculations for the fund detail view.

use crate::core::fund::NavRecord;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Rows shown in the NAV history table.
pub const HISTORY_WINDOW: usize = 10;

const DELTA_DP: u32 = 4;
const PERCENT_DP: u32 = 2;

fn parse_nav(record: &NavRecord) -> Option<Decimal> {
    Decimal::from_str(record.nav.trim()).ok()
}

fn round(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats with an explicit sign; zero counts as a gain.
fn signed(value: Decimal, dp: u32) -> String {
    let value = if value.is_zero() { Decimal::ZERO } else { value };
    let sign = if value.is_sign_negative() { "" } else { "+" };
    format!("{sign}{:.*}", dp as usize, value)
}

fn delta(newer: &NavRecord, older: &NavRecord) -> Option<Decimal> {
    Some(round(parse_nav(newer)? - parse_nav(older)?, DELTA_DP))
}

/// Movement between the latest NAV and the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavChange {
    pub delta: Decimal,
    /// `None` when the previous NAV is zero.
    pub percent: Option<Decimal>,
}

impl NavChange {
    pub fn is_gain(&self) -> bool {
        self.delta.is_zero() || self.delta.is_sign_positive()
    }

    pub fn delta_display(&self) -> String {
        signed(self.delta, DELTA_DP)
    }

    pub fn percent_display(&self) -> Option<String> {
        self.percent.map(|p| signed(p, PERCENT_DP))
    }
}

/// Compares record 0 with record 1. Returns `None` when there are fewer
/// than two records or either NAV does not parse.
pub fn nav_change(records: &[NavRecord]) -> Option<NavChange> {
    let [latest, previous, ..] = records else {
        return None;
    };

    let raw_delta = parse_nav(latest)? - parse_nav(previous)?;
    let percent = raw_delta
        .checked_div(parse_nav(previous)?)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|p| round(p, PERCENT_DP));

    Some(NavChange {
        delta: round(raw_delta, DELTA_DP),
        percent,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavHistoryRow {
    pub date: String,
    pub nav: String,
    /// Change versus the next-older row of the same window.
    pub change: Option<Decimal>,
}

impl NavHistoryRow {
    pub fn change_display(&self) -> Option<String> {
        self.change.map(|c| signed(c, DELTA_DP))
    }
}

/// The newest [`HISTORY_WINDOW`] records, each compared with its successor
/// inside the window. The oldest row has no change.
pub fn nav_history(records: &[NavRecord]) -> Vec<NavHistoryRow> {
    let window = &records[..records.len().min(HISTORY_WINDOW)];
    window
        .iter()
        .enumerate()
        .map(|(i, record)| NavHistoryRow {
            date: record.date.clone(),
            nav: record.nav.clone(),
            change: window.get(i + 1).and_then(|older| delta(record, older)),
        })
        .collect()
}

/// Percentage move from `old_nav` to `new_nav`, signed, at 2 decimals.
pub fn percent_change(old_nav: &str, new_nav: &str) -> Option<String> {
    let old = Decimal::from_str(old_nav.trim()).ok()?;
    let new = Decimal::from_str(new_nav.trim()).ok()?;
    let percent = (new - old)
        .checked_div(old)?
        .checked_mul(Decimal::ONE_HUNDRED)?;
    Some(signed(round(percent, PERCENT_DP), PERCENT_DP))
}
