use crate::controller::{Notification, NotificationKind};
use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::{Term, style};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Label,
    Success,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Label => style(text).bold(),
        StyleType::Success => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned cell for a numeric value kept as text.
pub fn number_cell(text: &str) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Colors a signed change: green for gains, red for losses, dim "-" when absent.
pub fn change_cell(change: Option<&str>) -> Cell {
    match change {
        Some(text) if text.starts_with('-') => Cell::new(text)
            .fg(Color::Red)
            .set_alignment(CellAlignment::Right),
        Some(text) => Cell::new(text)
            .fg(Color::Green)
            .set_alignment(CellAlignment::Right),
        None => Cell::new("-")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
    }
}

/// Renders a notification as a single styled line.
pub fn format_notification(notification: &Notification) -> String {
    let title = match notification.kind {
        NotificationKind::Success => style(&notification.title).green().bold(),
        NotificationKind::Info => style(&notification.title).cyan().bold(),
        NotificationKind::Error => style(&notification.title).red().bold(),
    };
    format!("{title} {}", notification.description)
}

pub fn print_notification(notification: &Notification) {
    if notification.is_error() {
        eprintln!("{}", format_notification(notification));
    } else {
        println!("{}", format_notification(notification));
    }
}

/// Creates a new `indicatif::ProgressBar` with standard styling.
pub fn new_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

/// Shows a spinner with `message` while `fut` runs.
pub async fn with_spinner<F: Future>(message: &str, fut: F) -> F::Output {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    let output = fut.await;
    pb.finish_and_clear();
    output
}

/// Returns `value` or asks for it on the terminal.
pub fn prompt_or(value: Option<String>, label: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => prompt(label),
    }
}

pub fn prompt(label: &str) -> Result<String> {
    let term = Term::stderr();
    term.write_str(&format!("{label}: "))?;
    let line = term
        .read_line()
        .with_context(|| format!("Failed to read {label}"))?;
    Ok(line.trim().to_string())
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Returns `value` when given, otherwise asks a yes/no question (default no).
pub fn confirm_or(value: Option<bool>, question: &str) -> Result<bool> {
    match value {
        Some(v) => Ok(v),
        None => Ok(is_yes(&prompt(&format!("{question} [y/N]"))?)),
    }
}

/// Reads a value without echoing it.
pub fn prompt_secret_or(value: Option<String>, label: &str) -> Result<String> {
    if let Some(v) = value {
        return Ok(v);
    }
    let term = Term::stderr();
    term.write_str(&format!("{label}: "))?;
    term.read_secure_line()
        .with_context(|| format!("Failed to read {label}"))
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}
