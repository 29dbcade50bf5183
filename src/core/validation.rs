//! Field-level validation shared by every ledger entry point.
//!
//! Everything here is pure and runs before a database transaction is opened, so a
//! rejected record never causes a write.

use crate::errors::{Error, Result};
use chrono::{NaiveDate, Utc};

/// Longest accepted purchase source name or earning name
pub const MAX_NAME_LEN: usize = 100;
/// Longest accepted spending item name
pub const MAX_ITEM_NAME_LEN: usize = 200;
/// Smallest accepted real-money amount
pub const MIN_MONEY_AMOUNT: f64 = 0.01;
/// Largest accepted V-Bucks amount on a single record
pub const MAX_VBUCKS_AMOUNT: i64 = 2_147_483_647;

/// Today's date in UTC, the reference point for future-date checks.
#[must_use]
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Rejects dates after today.
pub fn ensure_not_future(date: NaiveDate) -> Result<()> {
    if date > today() {
        return Err(Error::FutureDate { date });
    }
    Ok(())
}

// The amount only feeds the error message.
#[allow(clippy::cast_precision_loss)]
fn invalid_vbucks(amount: i64) -> Error {
    Error::InvalidAmount {
        amount: amount as f64,
    }
}

/// Rejects zero, negative or oversized V-Bucks amounts.
pub fn ensure_positive(amount: i64) -> Result<()> {
    if !(1..=MAX_VBUCKS_AMOUNT).contains(&amount) {
        return Err(invalid_vbucks(amount));
    }
    Ok(())
}

/// Rejects negative or oversized V-Bucks amounts; zero is allowed.
pub fn ensure_non_negative(amount: i64) -> Result<()> {
    if !(0..=MAX_VBUCKS_AMOUNT).contains(&amount) {
        return Err(invalid_vbucks(amount));
    }
    Ok(())
}

/// Rejects money amounts that are not finite, below one cent, or finer than a cent.
pub fn ensure_money(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < MIN_MONEY_AMOUNT {
        return Err(Error::InvalidAmount { amount });
    }
    let cents = amount * 100.0;
    if (cents - cents.round()).abs() > 1e-6 {
        return Err(Error::validation(format!(
            "Amount {amount} has more than two decimal places"
        )));
    }
    Ok(())
}

/// Rounds a money total to whole cents.
#[must_use]
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Trims a required name and checks its length.
pub fn required_name(field: &str, value: &str, max_len: usize) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{field} cannot be empty")));
    }
    if trimmed.chars().count() > max_len {
        return Err(Error::validation(format!(
            "{field} cannot be longer than {max_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional name; blank becomes `None`.
pub fn optional_name(field: &str, value: Option<&str>, max_len: usize) -> Result<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => required_name(field, v, max_len).map(Some),
    }
}

/// Normalizes a three-letter currency code to upper case.
pub fn currency_code(value: &str) -> Result<String> {
    let code = value.trim().to_ascii_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::validation(format!(
            "Currency '{value}' must be a three-letter code"
        )));
    }
    Ok(code)
}

/// Checks an account identifier: letters, digits and underscores only.
pub fn identifier(field: &str, value: &str) -> Result<String> {
    let trimmed = required_name(field, value, MAX_NAME_LEN)?;
    if !trimmed.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(Error::validation(format!(
            "{field} should contain only letters, numbers and underscores"
        )));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_future_date_rejected() {
        let tomorrow = today() + Duration::days(1);
        assert!(matches!(
            ensure_not_future(tomorrow),
            Err(Error::FutureDate { date }) if date == tomorrow
        ));
        assert!(ensure_not_future(today()).is_ok());
        assert!(ensure_not_future(today() - Duration::days(30)).is_ok());
    }

    #[test]
    fn test_amount_checks() {
        assert!(ensure_positive(1).is_ok());
        assert!(ensure_positive(0).is_err());
        assert!(ensure_positive(-5).is_err());
        assert!(ensure_non_negative(0).is_ok());
        assert!(ensure_non_negative(-1).is_err());
    }

    #[test]
    fn test_oversized_vbucks_rejected() {
        assert!(ensure_positive(MAX_VBUCKS_AMOUNT).is_ok());
        assert!(ensure_non_negative(MAX_VBUCKS_AMOUNT).is_ok());
        assert!(matches!(
            ensure_positive(MAX_VBUCKS_AMOUNT + 1),
            Err(Error::InvalidAmount { .. })
        ));
        assert!(ensure_positive(i64::MAX).is_err());
        assert!(ensure_non_negative(i64::MAX).is_err());
    }

    #[test]
    fn test_money_checks() {
        assert!(ensure_money(10.99).is_ok());
        assert!(ensure_money(0.01).is_ok());
        assert!(ensure_money(0.0).is_err());
        assert!(ensure_money(-3.0).is_err());
        assert!(ensure_money(f64::NAN).is_err());
        assert!(ensure_money(f64::INFINITY).is_err());
    }

    #[test]
    fn test_money_limited_to_cents() {
        assert!(ensure_money(24.99).is_ok());
        assert!(ensure_money(0.1 + 0.2).is_ok());
        assert!(matches!(ensure_money(0.015), Err(Error::Validation { .. })));
        assert!(ensure_money(9.999).is_err());
        assert_eq!(round_cents(0.1 + 0.2), 0.3);
    }

    #[test]
    fn test_required_name() {
        assert_eq!(required_name("Name", "  Pass ", 10).unwrap(), "Pass");
        assert!(required_name("Name", "   ", 10).is_err());
        assert!(required_name("Name", "abcdefghijk", 10).is_err());
    }

    #[test]
    fn test_optional_name() {
        assert_eq!(optional_name("Name", None, 10).unwrap(), None);
        assert_eq!(optional_name("Name", Some("  "), 10).unwrap(), None);
        assert_eq!(
            optional_name("Name", Some(" Quest "), 10).unwrap(),
            Some("Quest".to_string())
        );
    }

    #[test]
    fn test_currency_code() {
        assert_eq!(currency_code("usd").unwrap(), "USD");
        assert!(currency_code("US").is_err());
        assert!(currency_code("U5D").is_err());
    }

    #[test]
    fn test_identifier() {
        assert_eq!(identifier("Epic name", "test_epic123").unwrap(), "test_epic123");
        assert!(identifier("Epic name", "invalid!name").is_err());
    }
}
