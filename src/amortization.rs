use chrono::{Months, NaiveDate};
use log::{trace, warn};
use serde::Serialize;
use std::fmt;

/// Longest schedule generated for a single loan (50 years of monthly payments).
pub const MAX_PAYMENTS: u32 = 600;

/// Converts an APR given as a percentage (i.e., 7.0, 19.99) to a monthly rate.
pub fn monthly_rate(annual_rate_percent: f64) -> f64 {
    (annual_rate_percent / 100.) / 12.
}

/// Fixed payment that retires `principal` in `months` equal payments at `rate` per month.
pub fn monthly_payment(principal: f64, rate: f64, months: u32) -> f64 {
    if months == 0 {
        return principal;
    }
    if rate == 0. {
        return principal / months as f64;
    }
    let factor = (1. + rate).powi(months as i32);
    (principal * rate * factor) / (factor - 1.)
}

pub(crate) fn round(amt: f64, dec: i32) -> f64 {
    if amt == 0. {
        0.
    } else {
        (amt * 10_f64.powi(dec)).round() / 10_f64.powi(dec)
    }
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct ScheduledPayment {
    pub number: u32,
    pub date: NaiveDate,
    pub amount: f64,
    pub interest: f64,
    pub end_balance: f64,
}

impl fmt::Display for ScheduledPayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "payment {}, date {}, amount ${:.2}, interest ${:.2}, ending balance ${:.2}",
            self.number, self.date, self.amount, self.interest, self.end_balance
        )
    }
}

/// A fixed-rate loan repaid monthly, with its amortization schedule.
#[derive(PartialEq, Debug)]
pub struct Loan {
    pub principal: f64,
    pub term_months: u32,
    pub annual_rate_percent: f64,
    pub first_pmt_date: NaiveDate,
    pub dec_places: i32,
    pmt_amount: f64,
    scheduled_pmts: Vec<ScheduledPayment>,
}

impl Loan {
    pub fn new(
        principal: f64,
        term_months: u32,
        annual_rate_percent: f64,
        first_pmt_date: NaiveDate,
        dec_places: i32,
    ) -> Self {
        let rate = monthly_rate(annual_rate_percent);
        let pmt_amount = round(monthly_payment(principal, rate, term_months), dec_places);
        Self {
            principal,
            term_months,
            annual_rate_percent,
            first_pmt_date,
            dec_places,
            pmt_amount,
            scheduled_pmts: build_schedule(principal, rate, first_pmt_date, dec_places, pmt_amount),
        }
    }

    pub fn payment_amount(&self) -> f64 {
        self.pmt_amount
    }

    pub fn payment_count(&self) -> usize {
        self.scheduled_pmts.len()
    }

    /// Payment by its 1-based number.
    pub fn payment(&self, number: usize) -> Option<&ScheduledPayment> {
        number
            .checked_sub(1)
            .and_then(|idx| self.scheduled_pmts.get(idx))
    }

    pub fn schedule(&self) -> &[ScheduledPayment] {
        &self.scheduled_pmts
    }

    pub fn total_interest(&self) -> f64 {
        round(
            self.scheduled_pmts.iter().map(|p| p.interest).sum(),
            self.dec_places,
        )
    }

    pub fn total_paid(&self) -> f64 {
        round(
            self.scheduled_pmts.iter().map(|p| p.amount).sum(),
            self.dec_places,
        )
    }
}

fn build_schedule(
    principal: f64,
    rate: f64,
    first_pmt_date: NaiveDate,
    dec_places: i32,
    pmt_amount: f64,
) -> Vec<ScheduledPayment> {
    let mut sched_pmt: Vec<ScheduledPayment> = Vec::new();

    // balances under half a unit of the last decimal place count as paid off
    let dust = 0.5 * 10_f64.powi(-dec_places);

    let mut end_balance = principal;
    let mut begin_balance;
    let mut pmt_number = 0;
    let mut pmt_amt = pmt_amount;
    let mut interest;

    while end_balance > dust && pmt_number < MAX_PAYMENTS {
        begin_balance = end_balance;
        pmt_number += 1;

        interest = begin_balance * rate;

        if pmt_amt <= begin_balance {
            end_balance = begin_balance - (pmt_amt - interest);
        } else {
            pmt_amt = begin_balance + interest;
            end_balance = 0.;
        }
        if end_balance <= dust {
            end_balance = 0.;
        }
        trace!(
            "pmt # {}, interest {}, end bal {}",
            pmt_number,
            interest,
            end_balance
        );

        let Some(date) = first_pmt_date.checked_add_months(Months::new(pmt_number - 1)) else {
            warn!("payment {} falls outside the calendar range, schedule truncated", pmt_number);
            break;
        };

        sched_pmt.push(ScheduledPayment {
            number: pmt_number,
            date,
            amount: round(pmt_amt, dec_places),
            interest: round(interest, dec_places),
            end_balance: round(end_balance, dec_places),
        });
    }
    if end_balance > dust {
        warn!(
            "loan of {} not retired within {} payments",
            principal, MAX_PAYMENTS
        );
    }
    sched_pmt
}
