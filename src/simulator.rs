//! Month-by-month payoff simulation across a set of debts.
//!
//! Every unpaid debt receives its minimum payment each month. The whole extra
//! payment goes to the first unpaid debt in strategy order, so exactly one debt
//! is targeted per month. The run stops once every balance reaches zero or
//! after [`MAX_MONTHS`], whichever comes first.

use crate::debt::Debt;
use crate::error::PayoffError;
use crate::strategy::{order_debts, Strategy};
use chrono::{Days, Local, NaiveDate};
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};

/// Safety cap: 50 years of monthly payments.
pub const MAX_MONTHS: u32 = 600;

/// Days added per simulated month when projecting the debt-free date.
pub const DAYS_PER_MONTH: u64 = 30;

/// Balances under half a cent count as paid off.
pub const PAID_OFF_THRESHOLD: f64 = 0.005;

fn settle(balance: f64) -> f64 {
    if balance < PAID_OFF_THRESHOLD {
        0.
    } else {
        balance
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SimulationInput {
    pub debts: Vec<Debt>,
    pub strategy: Strategy,
    pub extra_monthly_payment: f64,
}

impl SimulationInput {
    pub fn new(debts: Vec<Debt>, strategy: Strategy, extra_monthly_payment: f64) -> Self {
        Self {
            debts,
            strategy,
            extra_monthly_payment,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStatus {
    /// Every balance reached zero.
    DebtFree,
    /// The month cap was hit with money still owed.
    DidNotConverge,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct PayoffRecord {
    pub name: String,
    pub payoff_month: u32,
    /// Original balance plus all interest accrued on this debt.
    pub total_paid: f64,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SimulationResult {
    pub status: SimulationStatus,
    pub payoff_months: u32,
    pub total_interest_paid: f64,
    pub total_paid: f64,
    pub debt_free_date: Option<NaiveDate>,
    pub details: Vec<PayoffRecord>,
}

impl SimulationResult {
    pub fn converged(&self) -> bool {
        self.status == SimulationStatus::DebtFree
    }

    pub fn payoff_of(&self, name: &str) -> Option<&PayoffRecord> {
        self.details.iter().find(|r| r.name == name)
    }
}

// running state of one debt during a simulation
struct Tracker<'a> {
    debt: &'a Debt,
    rate: f64,
    balance: f64,
    interest: f64,
}

impl Tracker<'_> {
    fn balance_at_start(&self) -> f64 {
        settle(self.debt.balance)
    }
}

/// Runs the payoff simulation starting at `start`. Pure: identical inputs give identical results.
pub fn simulate(input: &SimulationInput, start: NaiveDate) -> Result<SimulationResult, PayoffError> {
    if input.debts.is_empty() {
        return Err(PayoffError::NoDebts);
    }
    let extra = input.extra_monthly_payment;
    if !extra.is_finite() || extra < 0. {
        return Err(PayoffError::InvalidAmount {
            field: "extra monthly payment",
            value: extra,
        });
    }

    for debt in &input.debts {
        debt.check_finite()?;
    }

    let ordered = order_debts(&input.debts, input.strategy);
    let mut trackers: Vec<Tracker> = ordered
        .iter()
        .map(|debt| Tracker {
            debt,
            rate: debt.monthly_rate(),
            balance: settle(debt.balance),
            interest: 0.,
        })
        .collect();

    let mut details = Vec::new();
    let mut total_interest = 0.;
    let mut month = 0;

    while trackers.iter().any(|t| t.balance > 0.) && month < MAX_MONTHS {
        month += 1;
        let mut extra_pool = extra;

        for tracker in trackers.iter_mut().filter(|t| t.balance > 0.) {
            let interest = tracker.balance * tracker.rate;
            total_interest += interest;
            tracker.interest += interest;

            // the pool only survives until the first unpaid debt takes it
            let payment = tracker.debt.minimum_payment + extra_pool;
            extra_pool = 0.;

            let principal_reduction = payment - interest;
            tracker.balance = settle(tracker.balance - principal_reduction);
            trace!(
                "month {} {}: interest {:.2}, payment {:.2}, balance {:.2}",
                month,
                tracker.debt.account_name,
                interest,
                payment,
                tracker.balance
            );

            if tracker.balance == 0. {
                debug!("{} paid off in month {}", tracker.debt.account_name, month);
                details.push(PayoffRecord {
                    name: tracker.debt.account_name.clone(),
                    payoff_month: month,
                    total_paid: tracker.debt.balance + tracker.interest,
                });
            }
        }
    }

    let original_total: f64 = trackers.iter().map(|t| t.balance_at_start()).sum();
    let converged = trackers.iter().all(|t| t.balance == 0.);

    let (status, debt_free_date) = if converged {
        let date = start.checked_add_days(Days::new(month as u64 * DAYS_PER_MONTH));
        (SimulationStatus::DebtFree, date)
    } else {
        warn!(
            "{} strategy did not pay off all debts within {} months",
            input.strategy, MAX_MONTHS
        );
        (SimulationStatus::DidNotConverge, None)
    };

    info!(
        "{} strategy: {} months, interest {:.2}",
        input.strategy, month, total_interest
    );

    Ok(SimulationResult {
        status,
        payoff_months: month,
        total_interest_paid: total_interest,
        total_paid: original_total + total_interest,
        debt_free_date,
        details,
    })
}

/// [`simulate`] anchored at the local calendar date.
pub fn simulate_from_today(input: &SimulationInput) -> Result<SimulationResult, PayoffError> {
    simulate(input, Local::now().date_naive())
}

/// Avalanche and snowball results for the same debts and extra payment.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct StrategyComparison {
    pub extra_monthly_payment: f64,
    pub avalanche: SimulationResult,
    pub snowball: SimulationResult,
}

impl StrategyComparison {
    /// Interest avoided by choosing avalanche over snowball.
    pub fn interest_saved(&self) -> f64 {
        self.snowball.total_interest_paid - self.avalanche.total_interest_paid
    }

    /// Months gained by choosing avalanche over snowball; negative if snowball finishes first.
    pub fn months_saved(&self) -> i64 {
        self.snowball.payoff_months as i64 - self.avalanche.payoff_months as i64
    }
}

pub fn compare_strategies(
    debts: &[Debt],
    extra_monthly_payment: f64,
    start: NaiveDate,
) -> Result<StrategyComparison, PayoffError> {
    let run = |strategy| {
        simulate(
            &SimulationInput::new(debts.to_vec(), strategy, extra_monthly_payment),
            start,
        )
    };
    Ok(StrategyComparison {
        extra_monthly_payment,
        avalanche: run(Strategy::Avalanche)?,
        snowball: run(Strategy::Snowball)?,
    })
}

#[cfg(test)]
mod tests {
    use super::{
        compare_strategies, simulate, simulate_from_today, SimulationInput, SimulationStatus,
        DAYS_PER_MONTH, MAX_MONTHS,
    };
    use crate::debt::Debt;
    use crate::error::{PayoffError, ValidationError};
    use chrono::{Days, Local};
    use crate::strategy::Strategy;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;
    use test_log::test;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn two_debts() -> Vec<Debt> {
        vec![
            Debt::new("Debt A", 1000., 20., 50.),
            Debt::new("Debt B", 500., 10., 50.),
        ]
    }

    #[test]
    fn test_zero_rate_single_debt() {
        let input = SimulationInput::new(
            vec![Debt::new("Loan", 1000., 0., 100.)],
            Strategy::Avalanche,
            0.,
        );
        let result = simulate(&input, start()).unwrap();

        assert_eq!(result.status, SimulationStatus::DebtFree);
        assert_eq!(result.payoff_months, 10);
        assert_eq!(result.total_interest_paid, 0.);
        assert_eq!(result.total_paid, 1000.);
        assert_eq!(
            result.debt_free_date,
            NaiveDate::from_ymd_opt(2024, 10, 27)
        );
        assert_eq!(result.details.len(), 1);
        assert_eq!(result.details[0].payoff_month, 10);
        assert_eq!(result.details[0].total_paid, 1000.);
    }

    #[test]
    fn test_first_month_interest_and_extra_target() {
        // one month is enough when the extra payment clears the targeted debt
        let input = SimulationInput::new(
            vec![
                Debt::new("Small", 100., 12., 10.),
                Debt::new("Large", 1000., 12., 10.),
            ],
            Strategy::Snowball,
            100.,
        );
        let result = simulate(&input, start()).unwrap();
        let small = result.payoff_of("Small").unwrap();
        assert_eq!(small.payoff_month, 1);
        assert_abs_diff_eq!(small.total_paid, 101., epsilon = 1e-9);
    }

    #[test]
    fn test_avalanche_targets_highest_rate() {
        let input = SimulationInput::new(two_debts(), Strategy::Avalanche, 100.);
        let result = simulate(&input, start()).unwrap();

        assert!(result.converged());
        let a = result.payoff_of("Debt A").unwrap();
        let b = result.payoff_of("Debt B").unwrap();
        assert!(a.payoff_month < b.payoff_month);
        assert_eq!(result.details[0].name, "Debt A");
    }

    #[test]
    fn test_snowball_targets_smallest_balance() {
        let input = SimulationInput::new(two_debts(), Strategy::Snowball, 100.);
        let result = simulate(&input, start()).unwrap();

        assert!(result.converged());
        let a = result.payoff_of("Debt A").unwrap();
        let b = result.payoff_of("Debt B").unwrap();
        assert!(b.payoff_month < a.payoff_month);
        assert_eq!(result.details[0].name, "Debt B");
    }

    #[test]
    fn test_custom_follows_priority() {
        let debts = vec![
            Debt::new("Debt A", 1000., 20., 50.).with_priority(2),
            Debt::new("Debt B", 500., 10., 50.).with_priority(1),
        ];
        let input = SimulationInput::new(debts, Strategy::Custom, 100.);
        let result = simulate(&input, start()).unwrap();
        assert_eq!(result.details[0].name, "Debt B");
    }

    #[test]
    fn test_totals_are_consistent() {
        let input = SimulationInput::new(two_debts(), Strategy::Avalanche, 100.);
        let result = simulate(&input, start()).unwrap();

        assert!(result.total_interest_paid > 0.);
        assert_abs_diff_eq!(
            result.total_paid,
            1500. + result.total_interest_paid,
            epsilon = 1e-9
        );
        let per_debt: f64 = result.details.iter().map(|r| r.total_paid).sum();
        assert_abs_diff_eq!(per_debt, result.total_paid, epsilon = 1e-9);
    }

    #[test]
    fn test_non_convergence_is_reported() {
        let input = SimulationInput::new(
            vec![Debt::new("Hopeless", 100000., 30., 1.)],
            Strategy::Avalanche,
            0.,
        );
        let result = simulate(&input, start()).unwrap();

        assert_eq!(result.status, SimulationStatus::DidNotConverge);
        assert_eq!(result.payoff_months, MAX_MONTHS);
        assert!(result.debt_free_date.is_none());
        assert!(result.details.is_empty());
    }

    #[test]
    fn test_zero_balance_debt_is_ignored() {
        let input = SimulationInput::new(
            vec![
                Debt::new("Closed", 0., 18., 25.),
                Debt::new("Open", 200., 0., 100.),
            ],
            Strategy::Avalanche,
            0.,
        );
        let result = simulate(&input, start()).unwrap();
        assert_eq!(result.payoff_months, 2);
        assert_eq!(result.details.len(), 1);
        assert_eq!(result.details[0].name, "Open");
    }

    #[test]
    fn test_all_paid_already() {
        let input = SimulationInput::new(
            vec![Debt::new("Closed", 0., 18., 25.)],
            Strategy::Avalanche,
            0.,
        );
        let result = simulate(&input, start()).unwrap();
        assert_eq!(result.status, SimulationStatus::DebtFree);
        assert_eq!(result.payoff_months, 0);
        assert_eq!(result.debt_free_date, Some(start()));
    }

    #[test]
    fn test_rejects_bad_input() {
        let empty = SimulationInput::new(Vec::new(), Strategy::Avalanche, 0.);
        assert_eq!(simulate(&empty, start()), Err(PayoffError::NoDebts));

        let negative = SimulationInput::new(two_debts(), Strategy::Avalanche, -5.);
        assert!(matches!(
            simulate(&negative, start()),
            Err(PayoffError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_cent_amounts_pay_off_on_schedule() {
        for (balance, minimum, months) in [
            (100.20, 10.02, 10),
            (30.03, 10.01, 3),
            (70.07, 10.01, 7),
        ] {
            let input = SimulationInput::new(
                vec![Debt::new("Card", balance, 0., minimum)],
                Strategy::Avalanche,
                0.,
            );
            let result = simulate(&input, start()).unwrap();
            assert_eq!(result.payoff_months, months, "balance {}", balance);
            assert_eq!(result.details[0].payoff_month, months);
        }
    }

    #[test]
    fn test_rejects_non_finite_debts() {
        for debt in [
            Debt::new("Bad balance", f64::NAN, 10., 50.),
            Debt::new("Bad rate", 500., f64::INFINITY, 50.),
            Debt::new("Bad minimum", 500., 10., f64::NAN),
        ] {
            let input = SimulationInput::new(vec![debt], Strategy::Avalanche, 0.);
            assert!(matches!(
                simulate(&input, start()),
                Err(PayoffError::Invalid(ValidationError::NotFinite { .. }))
            ));
        }
    }

    #[test]
    fn test_simulate_from_today() {
        let input = SimulationInput::new(
            vec![Debt::new("Loan", 1000., 0., 100.)],
            Strategy::Avalanche,
            0.,
        );
        let before = Local::now().date_naive();
        let result = simulate_from_today(&input).unwrap();
        let after = Local::now().date_naive();

        let offset = Days::new(10 * DAYS_PER_MONTH);
        let date = result.debt_free_date.unwrap();
        assert!(date >= before.checked_add_days(offset).unwrap());
        assert!(date <= after.checked_add_days(offset).unwrap());
    }

    #[test]
    fn test_compare_strategies() {
        let comparison = compare_strategies(&two_debts(), 100., start()).unwrap();
        assert!(comparison.interest_saved() > 0.);
        assert!(comparison.months_saved() >= 0);
    }
}
