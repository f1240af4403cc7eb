//! Money helpers - decimal arithmetic with a fixed display currency.

use rust_decimal::Decimal;

use super::order::LineItem;

/// Fixed display currency symbol. All amounts are rendered in INR.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Sum of line-item totals; zero for an empty list.
#[must_use]
pub fn line_items_total(items: &[LineItem]) -> Decimal {
    items.iter().map(|item| item.total).sum()
}

/// Fixed two-decimal rendering with the currency symbol ("₹12.50").
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    format!("{CURRENCY_SYMBOL}{amount:.2}")
}
