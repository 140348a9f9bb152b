use crate::core::Slice;
use crate::core::models::{BudgetStatus, TransactionKind};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
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

pub fn format_money(amount: Decimal, currency: &str) -> String {
    format!("{amount:.2} {currency}")
}

/// Right-aligned amount, red when negative.
pub fn money_cell(amount: Decimal, currency: &str) -> Cell {
    let cell = Cell::new(format_money(amount, currency)).set_alignment(CellAlignment::Right);
    if amount.is_sign_negative() && !amount.is_zero() {
        cell.fg(Color::Red)
    } else {
        cell
    }
}

/// Signed amount for a transaction: incoming green, outgoing red.
pub fn transaction_amount_cell(amount: Decimal, currency: &str, kind: TransactionKind) -> Cell {
    let (text, color) = match kind {
        TransactionKind::Income => (format!("+{}", format_money(amount, currency)), Color::Green),
        TransactionKind::Expense => (format!("-{}", format_money(amount, currency)), Color::Red),
        TransactionKind::Transfer => (format_money(amount, currency), Color::Blue),
    };
    Cell::new(text).fg(color).set_alignment(CellAlignment::Right)
}

/// Parses a `#RRGGBB` display token.
pub fn parse_hex_color(token: &str) -> Option<Color> {
    let hex = token.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some(Color::Rgb {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
    })
}

/// A cell tinted with a category's display color, plain if the token is not a
/// hex color.
pub fn color_token_cell(text: &str, token: &str) -> Cell {
    match parse_hex_color(token) {
        Some(color) => Cell::new(text).fg(color),
        None => Cell::new(text),
    }
}

pub fn status_cell(status: &BudgetStatus, label: &str) -> Cell {
    let color = match status {
        BudgetStatus::OnTrack => Color::Green,
        BudgetStatus::Warning => Color::Yellow,
        BudgetStatus::Exceeded => Color::Red,
        BudgetStatus::Unrecognized(_) => Color::DarkGrey,
    };
    Cell::new(label).fg(color).add_attribute(Attribute::Bold)
}

/// Formats a usage percentage in `[0, 100]`.
pub fn percentage_cell(percent: Decimal) -> Cell {
    Cell::new(format!("{percent:.0}%")).set_alignment(CellAlignment::Right)
}

/// Line shown in place of a slice that has no value to display yet, or a
/// warning above a stale one.
pub fn slice_notice<T>(what: &str, slice: &Slice<T>) -> Option<String> {
    match slice {
        Slice::Pending => Some(style_text(&format!("Loading {what}..."), StyleType::Subtle)),
        Slice::Loaded(_) => None,
        Slice::Failed { error, stale } => {
            let suffix = if stale.is_some() {
                " (showing last known data)"
            } else {
                ""
            };
            Some(style_text(
                &format!("Failed to load {what}: {error}{suffix}"),
                StyleType::Error,
            ))
        }
    }
}

/// Creates a new `indicatif::ProgressBar` with standard styling.
pub fn new_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(progress_style) = ProgressStyle::default_bar()
        .template("{spinner:.green} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
    {
        pb.set_style(progress_style.progress_chars("#>-"));
    }
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_hex_color("#10B981"),
            Some(Color::Rgb {
                r: 0x10,
                g: 0xB9,
                b: 0x81
            })
        );
        assert_eq!(parse_hex_color("10B981"), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#GG0000"), None);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(Decimal::from(750), "EUR"), "750.00 EUR");
        assert_eq!(format_money(Decimal::new(-125, 1), "USD"), "-12.50 USD");
    }

    #[test]
    fn test_slice_notice() {
        let loaded: Slice<u8> = Slice::Loaded(1);
        assert!(slice_notice("accounts", &loaded).is_none());

        let pending: Slice<u8> = Slice::Pending;
        assert!(slice_notice("accounts", &pending).unwrap().contains("Loading accounts"));

        let failed: Slice<u8> = Slice::Failed {
            error: "timeout".to_string(),
            stale: Some(1),
        };
        let notice = slice_notice("budgets", &failed).unwrap();
        assert!(notice.contains("Failed to load budgets: timeout"));
        assert!(notice.contains("last known data"));
    }
}
