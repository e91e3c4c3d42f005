pub mod amortization;
pub mod debt;
pub mod error;
pub mod input;
pub mod report;
pub mod simulator;
pub mod store;
pub mod strategy;

pub use debt::{Debt, DebtRecord};
pub use error::{ParseError, PayoffError, StoreError, ValidationError};
pub use simulator::{
    compare_strategies, simulate, simulate_from_today, PayoffRecord, SimulationInput,
    SimulationResult, SimulationStatus, StrategyComparison,
};
pub use strategy::{order_debts, Strategy};
