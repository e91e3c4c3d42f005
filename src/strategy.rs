use crate::debt::Debt;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Order in which extra money is thrown at debts.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Highest interest rate first.
    #[default]
    Avalanche,
    /// Smallest balance first.
    Snowball,
    /// User-assigned priority, lowest number first.
    Custom,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Avalanche => "avalanche",
            Strategy::Snowball => "snowball",
            Strategy::Custom => "custom",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "avalanche" => Ok(Strategy::Avalanche),
            "snowball" => Ok(Strategy::Snowball),
            "custom" => Ok(Strategy::Custom),
            other => Err(format!("unknown strategy '{}'", other)),
        }
    }
}

/// Returns the debts in simulation order. The sort is stable, so ties keep input order.
pub fn order_debts(debts: &[Debt], strategy: Strategy) -> Vec<Debt> {
    let mut ordered = debts.to_vec();
    match strategy {
        Strategy::Avalanche => {
            ordered.sort_by(|a, b| b.annual_rate_percent.total_cmp(&a.annual_rate_percent))
        }
        Strategy::Snowball => ordered.sort_by(|a, b| a.balance.total_cmp(&b.balance)),
        Strategy::Custom => ordered.sort_by_key(Debt::priority),
    }
    ordered
}
