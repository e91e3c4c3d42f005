//! Turning form text into numbers.
//!
//! Amounts accept an optional leading `$` and `,` thousands separators.
//! Optional numeric fields are forgiving: anything that does not parse counts
//! as zero (or no priority) instead of failing the whole form.

use crate::debt::Debt;
use crate::error::{ParseError, ValidationError};
use log::debug;
use serde::{Deserialize, Serialize};

pub fn parse_amount(raw: &str) -> Result<f64, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    let cleaned: String = trimmed
        .strip_prefix('$')
        .unwrap_or(trimmed)
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let value: f64 = cleaned
        .trim()
        .parse()
        .map_err(|_| ParseError::NotANumber(raw.to_string()))?;
    if !value.is_finite() {
        return Err(ParseError::NotFinite(raw.to_string()));
    }
    Ok(value)
}

/// Parses an amount, defaulting to 0 when the text is empty or not a number.
pub fn parse_amount_or_zero(raw: &str) -> f64 {
    parse_amount(raw).unwrap_or_else(|err| {
        debug!("treating {:?} as 0: {}", raw, err);
        0.
    })
}

pub fn parse_priority(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse() {
        Ok(priority) => Some(priority),
        Err(err) => {
            debug!("ignoring priority {:?}: {}", raw, err);
            None
        }
    }
}

/// A debt exactly as typed into a form.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct DebtForm {
    pub account_name: String,
    pub balance: String,
    pub annual_rate_percent: String,
    pub minimum_payment: String,
    pub priority_order: String,
}

impl DebtForm {
    /// Builds a [`Debt`], requiring only a name. Numbers fall back to 0, priority to none.
    pub fn into_debt(self) -> Result<Debt, ValidationError> {
        let account_name = self.account_name.trim().to_string();
        if account_name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let debt = Debt {
            account_name,
            balance: parse_amount_or_zero(&self.balance),
            annual_rate_percent: parse_amount_or_zero(&self.annual_rate_percent),
            minimum_payment: parse_amount_or_zero(&self.minimum_payment),
            priority_order: parse_priority(&self.priority_order),
        };
        debt.validate()?;
        Ok(debt)
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_amount, parse_amount_or_zero, parse_priority, DebtForm};
    use crate::debt::Debt;
    use crate::error::{ParseError, ValidationError};
    use test_log::test;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1250.50"), Ok(1250.5));
        assert_eq!(parse_amount(" $1,250.50 "), Ok(1250.5));
        assert_eq!(parse_amount("$ 75"), Ok(75.));
        assert_eq!(parse_amount("-3"), Ok(-3.));
        assert_eq!(parse_amount(""), Err(ParseError::Empty));
        assert_eq!(parse_amount("   "), Err(ParseError::Empty));
        assert_eq!(
            parse_amount("abc"),
            Err(ParseError::NotANumber("abc".to_string()))
        );
        assert_eq!(
            parse_amount("inf"),
            Err(ParseError::NotFinite("inf".to_string()))
        );
    }

    #[test]
    fn test_parse_amount_or_zero() {
        assert_eq!(parse_amount_or_zero("abc"), 0.);
        assert_eq!(parse_amount_or_zero(""), 0.);
        assert_eq!(parse_amount_or_zero("19.99"), 19.99);
    }

    #[test]
    fn test_parse_priority() {
        assert_eq!(parse_priority("3"), Some(3));
        assert_eq!(parse_priority(" -1 "), Some(-1));
        assert_eq!(parse_priority(""), None);
        assert_eq!(parse_priority("first"), None);
    }

    #[test]
    fn test_form_into_debt() {
        let form = DebtForm {
            account_name: " Visa ".to_string(),
            balance: "$2,500".to_string(),
            annual_rate_percent: "22.9".to_string(),
            minimum_payment: "".to_string(),
            priority_order: "x".to_string(),
        };
        assert_eq!(form.into_debt(), Ok(Debt::new("Visa", 2500., 22.9, 0.)));
    }

    #[test]
    fn test_form_requires_name() {
        let form = DebtForm {
            balance: "100".to_string(),
            ..Default::default()
        };
        assert_eq!(form.into_debt(), Err(ValidationError::EmptyName));
    }

    #[test]
    fn test_form_rejects_negative_amounts() {
        let form = DebtForm {
            account_name: "Visa".to_string(),
            balance: "-100".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            form.into_debt(),
            Err(ValidationError::Negative { field: "balance", .. })
        ));
    }
}
