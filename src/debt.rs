use crate::amortization::monthly_rate;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One owed obligation as entered by the user.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Debt {
    pub account_name: String,
    pub balance: f64,
    pub annual_rate_percent: f64,
    pub minimum_payment: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_order: Option<i32>,
}

impl Debt {
    pub fn new(
        account_name: impl Into<String>,
        balance: f64,
        annual_rate_percent: f64,
        minimum_payment: f64,
    ) -> Self {
        Self {
            account_name: account_name.into(),
            balance,
            annual_rate_percent,
            minimum_payment,
            priority_order: None,
        }
    }

    pub fn with_priority(mut self, priority_order: i32) -> Self {
        self.priority_order = Some(priority_order);
        self
    }

    pub fn monthly_rate(&self) -> f64 {
        monthly_rate(self.annual_rate_percent)
    }

    /// Priority used by the custom strategy; a missing value sorts as 0.
    pub fn priority(&self) -> i32 {
        self.priority_order.unwrap_or(0)
    }

    fn amounts(&self) -> [(&'static str, f64); 3] {
        [
            ("balance", self.balance),
            ("annual rate", self.annual_rate_percent),
            ("minimum payment", self.minimum_payment),
        ]
    }

    /// Rejects NaN and infinite amounts; the simulator accepts anything else.
    pub fn check_finite(&self) -> Result<(), ValidationError> {
        match self.amounts().into_iter().find(|(_, value)| !value.is_finite()) {
            Some((field, _)) => Err(ValidationError::NotFinite { field }),
            None => Ok(()),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.account_name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        self.check_finite()?;
        if let Some((field, value)) = self.amounts().into_iter().find(|(_, value)| *value < 0.) {
            return Err(ValidationError::Negative { field, value });
        }
        Ok(())
    }
}

impl fmt::Display for Debt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: balance ${:.2}, rate {:.2}%, minimum payment ${:.2}",
            self.account_name, self.balance, self.annual_rate_percent, self.minimum_payment
        )?;
        if let Some(priority) = self.priority_order {
            write!(f, ", priority {}", priority)?;
        }
        Ok(())
    }
}

/// A debt as kept in a record store, owned by one user.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct DebtRecord {
    pub id: u64,
    pub user_id: String,
    #[serde(flatten)]
    pub debt: Debt,
}

impl fmt::Display for DebtRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.debt)
    }
}
