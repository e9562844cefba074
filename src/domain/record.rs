//! The single expense record and its input validation.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use crate::domain::category::Category;
use crate::errors::{LedgerError, Result};

/// Canonical on-disk and input date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Amounts are held to cents.
pub const AMOUNT_SCALE: u32 = 2;

/// Largest accepted amount, in whole units. Keeps every sum a ledger can hold
/// far inside `Decimal`'s range.
pub const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000_000;

pub fn max_amount() -> Decimal {
    Decimal::from(MAX_AMOUNT_UNITS)
}

/// One accepted expense. Fields are private so a record cannot change once
/// it has entered the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    date: NaiveDate,
    amount: Decimal,
    category: Category,
}

impl Record {
    /// Builds a record from already-typed values. The amount is rounded to
    /// cents; negative amounts and amounts above [`max_amount`] are rejected.
    pub fn new(date: NaiveDate, amount: Decimal, category: Category) -> Result<Self> {
        let amount = checked_amount(amount)
            .ok_or_else(|| LedgerError::InvalidAmount(amount.to_string()))?;
        Ok(Self {
            date,
            amount,
            category,
        })
    }

    /// Validates raw text input. The amount is checked before the date so a
    /// submission with both fields wrong reports the amount first.
    pub fn parse(date: &str, amount: &str, category: &str) -> Result<Self> {
        let amount = parse_amount(amount)?;
        let date = parse_date(date)?;
        Record::new(date, amount, Category::from(category.trim()))
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Date rendered in the canonical `YYYY-MM-DD` form.
    pub fn date_label(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Amount rendered with exactly two decimals, as written to disk.
    pub fn amount_label(&self) -> String {
        format!("{:.2}", self.amount)
    }
}

/// Parses a non-negative decimal amount no larger than [`max_amount`].
/// Plain (`12.5`) and scientific (`1.25e1`) notation are both accepted.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
        .and_then(checked_amount)
        .ok_or_else(|| LedgerError::InvalidAmount(raw.to_string()))
}

/// Applies the sign and size limits and rounds to cents.
fn checked_amount(value: Decimal) -> Option<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return None;
    }
    let amount = normalize_amount(value);
    (amount <= max_amount()).then_some(amount)
}

/// Parses a calendar date in the canonical format.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| LedgerError::InvalidDate(raw.to_string()))
}

fn normalize_amount(value: Decimal) -> Decimal {
    if value.is_zero() {
        return Decimal::ZERO;
    }
    let mut rounded =
        value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(AMOUNT_SCALE);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn parse_accepts_well_formed_input() {
        let record = Record::parse("2023-08-23", "50.00", "Food").expect("valid record");
        assert_eq!(record.date(), NaiveDate::from_ymd_opt(2023, 8, 23).unwrap());
        assert_eq!(record.amount(), Decimal::new(5000, 2));
        assert_eq!(record.category(), &Category::Food);
        assert_eq!(record.amount_label(), "50.00");
        assert_eq!(record.date_label(), "2023-08-23");
    }

    #[test]
    fn amount_is_rounded_to_cents() {
        assert_eq!(parse_amount("10.005").unwrap(), Decimal::new(1001, 2));
        assert_eq!(parse_amount("7").unwrap().to_string(), "7.00");
        assert_eq!(parse_amount(" 1e2 ").unwrap(), Decimal::new(10000, 2));
    }

    #[test]
    fn rejects_negative_and_non_numeric_amounts() {
        for raw in ["-1", "not_a_number", "", "inf", "NaN", "12,50"] {
            let err = parse_amount(raw).expect_err("amount must be rejected");
            assert!(
                matches!(err, LedgerError::InvalidAmount(ref text) if text == raw),
                "unexpected error for {raw:?}: {err:?}"
            );
        }
    }

    #[test]
    fn amounts_above_the_limit_are_rejected() {
        assert_eq!(parse_amount("1000000000000000").unwrap(), max_amount());
        for raw in ["1000000000000000.01", "50000000000000000000000000000", "1e20"] {
            assert!(
                matches!(parse_amount(raw), Err(LedgerError::InvalidAmount(_))),
                "{raw} should be rejected"
            );
        }
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err = Record::new(date, max_amount() + Decimal::ONE, Category::Food).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn zero_is_a_valid_amount() {
        assert_eq!(parse_amount("0").unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount("-0.00").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn rejects_non_canonical_dates() {
        for raw in ["invalid_date", "23/08/2023", "2023-02-30", ""] {
            assert!(matches!(parse_date(raw), Err(LedgerError::InvalidDate(_))));
        }
    }

    #[test]
    fn amount_is_validated_before_date() {
        let err = Record::parse("invalid_date", "not_a_number", "Food").unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
    }
}
