//! Price cleaning for spreadsheet exports.
//!
//! Exported price cells arrive in three shapes: real numbers, text with a
//! leading apostrophe (the spreadsheet "store as text" artifact), and text
//! with thousands separators. Anything that still fails to parse after
//! cleaning is `None` — ineligible for selection, never an error.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a price cell into a `Decimal`, stripping export artifacts.
///
/// Returns `None` for empty, sentinel ("Sold Out", "N/A") or otherwise
/// unparseable values.
pub fn clean_price(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim().trim_start_matches('\'').trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized: String = trimmed.chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&normalized).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn plain_number() {
        assert_eq!(clean_price("123.45"), Some(dec!(123.45)));
    }

    #[test]
    fn leading_apostrophe_stripped() {
        assert_eq!(clean_price("'2500"), Some(dec!(2500)));
        assert_eq!(clean_price("'  1200.5"), Some(dec!(1200.5)));
    }

    #[test]
    fn thousands_separators_stripped() {
        assert_eq!(clean_price("1,234.00"), Some(dec!(1234.00)));
    }

    #[test]
    fn sentinels_and_garbage_are_none() {
        assert_eq!(clean_price("Sold Out"), None);
        assert_eq!(clean_price("N/A"), None);
        assert_eq!(clean_price(""), None);
        assert_eq!(clean_price("   "), None);
        assert_eq!(clean_price("'"), None);
    }
}
