use super::ui;
use crate::controller::{Controller, FundView};
use crate::core::fund::FundSummary;
use anyhow::Result;
use comfy_table::Cell;

pub fn format_search_results(query: &str, funds: &[FundSummary]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Scheme Code"), ui::header_cell("Scheme Name")]);
    for fund in funds {
        table.add_row(vec![
            Cell::new(&fund.scheme_code),
            Cell::new(&fund.scheme_name),
        ]);
    }

    let heading = if query.trim().is_empty() {
        "Popular Funds".to_string()
    } else {
        format!("Results for \"{query}\"")
    };
    format!(
        "{}\n\n{}\n\n{} funds found",
        ui::style_text(&heading, ui::StyleType::Title),
        table,
        funds.len()
    )
}

pub async fn search(controller: &Controller, query: &str) -> Result<()> {
    match ui::with_spinner("Searching funds...", controller.search(query)).await {
        Ok(funds) => println!("{}", format_search_results(query, &funds)),
        Err(notification) => ui::print_notification(&notification),
    }
    Ok(())
}

impl FundView {
    pub fn display(&self) -> String {
        let meta = &self.detail.meta;
        let na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());

        let name = meta
            .scheme_name
            .clone()
            .unwrap_or_else(|| format!("Scheme {}", self.scheme_code));
        let saved_marker = if self.is_saved { " ★ Saved" } else { "" };
        let mut output = format!(
            "{}{}\n\n",
            ui::style_text(&name, ui::StyleType::Title),
            ui::style_text(saved_marker, ui::StyleType::Success)
        );

        let mut info = ui::new_styled_table();
        info.add_row(vec!["Scheme Code".to_string(), self.scheme_code.clone()]);
        info.add_row(vec!["Fund House".to_string(), na(&meta.fund_house)]);
        info.add_row(vec!["Category".to_string(), na(&meta.scheme_category)]);
        info.add_row(vec!["Type".to_string(), na(&meta.scheme_type)]);
        info.add_row(vec!["Inception".to_string(), na(&meta.scheme_start_date)]);
        output.push_str(&info.to_string());

        match self.detail.latest_nav() {
            Some(latest) => {
                output.push_str(&format!(
                    "\n\n{} ₹{} {}",
                    ui::style_text("Current NAV:", ui::StyleType::Label),
                    latest.nav,
                    ui::style_text(&format!("as on {}", latest.date), ui::StyleType::Subtle)
                ));
                if let Some(change) = &self.change {
                    let text = match change.percent_display() {
                        Some(p) => format!("{} ({p}%)", change.delta_display()),
                        None => change.delta_display(),
                    };
                    let style = if change.is_gain() {
                        ui::StyleType::Success
                    } else {
                        ui::StyleType::Error
                    };
                    output.push_str(&format!("  {}", ui::style_text(&text, style)));
                }
            }
            None => output.push_str(&format!(
                "\n\n{} N/A",
                ui::style_text("Current NAV:", ui::StyleType::Label)
            )),
        }

        if !self.history.is_empty() {
            let mut history = ui::new_styled_table();
            history.set_header(vec![
                ui::header_cell("Date"),
                ui::header_cell("NAV (₹)"),
                ui::header_cell("Change"),
            ]);
            for row in &self.history {
                history.add_row(vec![
                    Cell::new(&row.date),
                    ui::number_cell(&row.nav),
                    ui::change_cell(row.change_display().as_deref()),
                ]);
            }
            output.push_str(&format!(
                "\n\n{}\n{}",
                ui::style_text("Recent NAV History", ui::StyleType::Label),
                history
            ));
        }

        output
    }
}

pub async fn show(controller: &Controller, scheme_code: &str) -> Result<()> {
    match ui::with_spinner("Loading fund details...", controller.open_fund(scheme_code)).await {
        Ok(view) => println!("{}", view.display()),
        Err(notification) => ui::print_notification(&notification),
    }
    Ok(())
}

pub async fn save(controller: &mut Controller, scheme_code: &str) -> Result<()> {
    let notification =
        ui::with_spinner("Saving fund...", controller.save_fund_by_code(scheme_code)).await;
    ui::print_notification(&notification);
    Ok(())
}

pub fn remove(controller: &mut Controller, scheme_code: &str) {
    let notification = controller.remove_fund(scheme_code);
    ui::print_notification(&notification);
}
