use crate::amortization::{round, Loan};
use crate::simulator::{SimulationResult, SimulationStatus, StrategyComparison, MAX_MONTHS};
use crate::strategy::Strategy;
use serde::Serialize;
use std::{fmt, io};

/// Plain-text payoff plan, one line per paid-off debt.
pub struct TextReport<'a> {
    pub result: &'a SimulationResult,
    pub strategy: Strategy,
    pub extra: f64,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        writeln!(f, "Debt payoff plan ({} strategy)", self.strategy)?;
        writeln!(f, "Extra monthly payment: ${:.2}", self.extra)?;
        match result.status {
            SimulationStatus::DebtFree => {
                writeln!(f, "Months to debt free: {}", result.payoff_months)?;
                if let Some(date) = result.debt_free_date {
                    writeln!(f, "Projected debt-free date: {}", date)?;
                }
            }
            SimulationStatus::DidNotConverge => writeln!(
                f,
                "Did not converge: debts remain after {} months. Raise the payments.",
                MAX_MONTHS
            )?,
        }
        writeln!(f, "Total interest paid: ${:.2}", result.total_interest_paid)?;
        writeln!(f, "Total paid: ${:.2}", result.total_paid)?;
        if !result.details.is_empty() {
            writeln!(f)?;
            for record in &result.details {
                writeln!(
                    f,
                    "{}: paid off in month {}, total paid ${:.2}",
                    record.name, record.payoff_month, record.total_paid
                )?;
            }
        }
        Ok(())
    }
}

pub fn format_text(result: &SimulationResult, strategy: Strategy, extra: f64) -> String {
    TextReport {
        result,
        strategy,
        extra,
    }
    .to_string()
}

#[derive(Serialize)]
struct CsvRow<'a> {
    name: &'a str,
    payoff_month: u32,
    total_paid: f64,
}

/// Writes `name,payoff_month,total_paid` rows, amounts rounded to cents.
pub fn write_csv<W: io::Write>(result: &SimulationResult, writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in &result.details {
        wtr.serialize(CsvRow {
            name: &record.name,
            payoff_month: record.payoff_month,
            total_paid: round(record.total_paid, 2),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

pub struct ComparisonReport<'a>(pub &'a StrategyComparison);

impl fmt::Display for ComparisonReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let comparison = self.0;
        writeln!(
            f,
            "Extra monthly payment: ${:.2}",
            comparison.extra_monthly_payment
        )?;
        for (strategy, result) in [
            (Strategy::Avalanche, &comparison.avalanche),
            (Strategy::Snowball, &comparison.snowball),
        ] {
            let months = if result.converged() {
                result.payoff_months.to_string()
            } else {
                format!("over {}", MAX_MONTHS)
            };
            writeln!(
                f,
                "{:<10} {} months, interest ${:.2}",
                strategy.name(),
                months,
                result.total_interest_paid
            )?;
        }
        writeln!(
            f,
            "Avalanche saves ${:.2} in interest",
            comparison.interest_saved()
        )
    }
}

pub fn format_comparison(comparison: &StrategyComparison) -> String {
    ComparisonReport(comparison).to_string()
}

/// Amortization schedule of a loan, one line per payment.
pub struct ScheduleReport<'a>(pub &'a Loan);

impl fmt::Display for ScheduleReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loan = self.0;
        writeln!(
            f,
            "Loan ${:.2} over {} months at {:.2}%: payment ${:.2}",
            loan.principal,
            loan.term_months,
            loan.annual_rate_percent,
            loan.payment_amount()
        )?;
        for pmt in loan.schedule() {
            writeln!(f, "{}", pmt)?;
        }
        writeln!(f, "Total interest: ${:.2}", loan.total_interest())
    }
}

pub fn format_schedule(loan: &Loan) -> String {
    ScheduleReport(loan).to_string()
}
