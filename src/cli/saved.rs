use super::ui;
use crate::controller::Controller;
use crate::core::bookmarks::SavedFund;
use crate::core::fund::FundDirectory;
use crate::core::nav::percent_change;
use anyhow::Result;
use comfy_table::Cell;
use futures::future::join_all;
use std::collections::HashMap;

/// Latest NAV per scheme code; `None` when the refresh failed.
type LatestNavs = HashMap<String, Option<String>>;

pub fn format_saved_funds(funds: &[SavedFund], latest: Option<&LatestNavs>) -> String {
    if funds.is_empty() {
        return ui::style_text(
            "No saved funds yet. Use `fundwise save <scheme code>` to add one.",
            ui::StyleType::Subtle,
        );
    }

    let mut table = ui::new_styled_table();
    let mut header = vec![
        ui::header_cell("Scheme Code"),
        ui::header_cell("Scheme Name"),
        ui::header_cell("Fund House"),
        ui::header_cell("Category"),
        ui::header_cell("NAV at Save (₹)"),
        ui::header_cell("Saved On"),
    ];
    if latest.is_some() {
        header.push(ui::header_cell("Latest NAV (₹)"));
        header.push(ui::header_cell("Since Saved (%)"));
    }
    table.set_header(header);

    for fund in funds {
        let mut row = vec![
            Cell::new(&fund.scheme_code),
            Cell::new(&fund.scheme_name),
            Cell::new(&fund.fund_house),
            Cell::new(&fund.category),
            ui::number_cell(&fund.current_nav),
            Cell::new(fund.saved_at.format("%Y-%m-%d")),
        ];
        if let Some(latest) = latest {
            match latest.get(&fund.scheme_code).cloned().flatten() {
                Some(nav) => {
                    let change = percent_change(&fund.current_nav, &nav);
                    row.push(ui::number_cell(&nav));
                    row.push(ui::change_cell(change.as_deref()));
                }
                None => {
                    row.push(ui::number_cell("N/A"));
                    row.push(ui::change_cell(None));
                }
            }
        }
        table.add_row(row);
    }

    format!(
        "{}\n\n{}\n\n{}: {}",
        ui::style_text("Saved Funds", ui::StyleType::Title),
        table,
        ui::style_text("Total Saved", ui::StyleType::Label),
        funds.len()
    )
}

/// Fetches the newest NAV of every saved fund concurrently.
async fn fetch_latest_navs(
    directory: &dyn FundDirectory,
    funds: &[SavedFund],
) -> LatestNavs {
    let pb = ui::new_progress_bar(funds.len() as u64);
    pb.set_message("Refreshing NAVs...");

    let futures = funds.iter().map(|fund| {
        let pb_clone = pb.clone();
        async move {
            let latest = match directory.get_fund_details(&fund.scheme_code).await {
                Ok(detail) => detail.latest_nav().map(|r| r.nav.clone()),
                Err(e) => {
                    tracing::warn!("Refresh failed for {}: {:?}", fund.scheme_code, e);
                    None
                }
            };
            pb_clone.inc(1);
            (fund.scheme_code.clone(), latest)
        }
    });

    let latest = join_all(futures).await.into_iter().collect();
    pb.finish_and_clear();
    latest
}

pub async fn run(controller: &mut Controller, refresh: bool) -> Result<()> {
    let funds = match controller.saved_funds() {
        Ok(funds) => funds,
        Err(notification) => {
            ui::print_notification(&notification);
            return Ok(());
        }
    };

    let latest = if refresh && !funds.is_empty() {
        Some(fetch_latest_navs(controller.directory(), &funds).await)
    } else {
        None
    };

    println!("{}", format_saved_funds(&funds, latest.as_ref()));
    Ok(())
}
