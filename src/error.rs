use thiserror::Error;

/// Failures turning user-entered text into numbers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("no value entered")]
    Empty,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("'{0}' is not a finite amount")]
    NotFinite(String),
}

/// A debt that cannot be stored as entered.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("account name must not be empty")]
    EmptyName,

    #[error("{field} must be zero or more, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
}

/// Errors from the payoff calculations themselves.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PayoffError {
    #[error("there are no debts to simulate")]
    NoDebts,

    #[error("{field} must be a non-negative finite amount, got {value}")]
    InvalidAmount { field: &'static str, value: f64 },

    #[error("invalid debt: {0}")]
    Invalid(#[from] ValidationError),
}

/// Record store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("debt record {0} not found")]
    NotFound(u64),

    #[error("invalid debt: {0}")]
    Invalid(#[from] ValidationError),

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store data is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
