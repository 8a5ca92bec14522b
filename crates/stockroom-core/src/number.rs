//! Tolerant numeric parsing for spreadsheet cells.
//!
//! Upstream cells carry prices and stock counts as free text: `"$1,299.50"`,
//! `"12 units"`, `""`, or a bare JSON number. Every such value goes through
//! [`parse_tolerant_number`] so the catalog never fails on a dirty cell.
//!
//! | Input           | Result    |
//! |-----------------|-----------|
//! | `"$1,299.50"`   | `1299.50` |
//! | `"12 units"`    | `12`      |
//! | `"-4"`          | `-4`      |
//! | `""`, `"N/A"`   | `0`       |
//! | `"1.2.3"`, `"-"`| `0`       |
//!
//! Comma decimal separators (`"1,5"`) are read as thousands separators.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Keeps only ASCII digits, `.` and `-`, then parses the remainder as a
/// decimal. Anything unparsable normalizes to zero.
#[must_use]
pub fn parse_tolerant_number(raw: &str) -> Decimal {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if !cleaned.bytes().any(|b| b.is_ascii_digit()) {
        return Decimal::ZERO;
    }

    Decimal::from_str(&cleaned).unwrap_or(Decimal::ZERO)
}
