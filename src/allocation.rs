use std::collections::HashSet;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::adjustment::{Adjustment, AdjustmentPolicy};
use crate::config::EngineConfig;
use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::loan::{Loan, LoanInstallment};
use crate::types::LoanStatus;

/// one installment the plan settles, with its assessed adjustment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub installment_number: u32,
    pub scheduled_amount: Money,
    pub due_date: NaiveDate,
    pub adjustment: Adjustment,
}

/// allocation computed over a snapshot of a loan's unpaid installments
///
/// Planning is pure; applying the plan to the loan is a separate,
/// atomic step. Funds not consumed by a whole installment stay in
/// `remaining_unapplied`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationPlan {
    pub payment_amount: Money,
    pub payment_date: NaiveDate,
    pub entries: Vec<AllocationEntry>,
    pub remaining_unapplied: Money,
}

impl AllocationPlan {
    pub fn total_allocated(&self) -> Money {
        self.payment_amount - self.remaining_unapplied
    }
}

/// plans payment allocation under the banking rules:
/// earliest-due-first, whole installments only, bounded payable window
pub struct AllocationPlanner {
    policy: AdjustmentPolicy,
    payable_window_months: u32,
}

impl AllocationPlanner {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            policy: AdjustmentPolicy::from_config(config),
            payable_window_months: config.payable_window_months,
        }
    }

    /// compute an allocation plan without mutating the loan
    ///
    /// `selection`, when present and non-empty, restricts allocation to
    /// the named installment numbers; each must belong to the loan and
    /// be unpaid.
    pub fn plan(
        &self,
        loan: &Loan,
        amount: Money,
        payment_date: NaiveDate,
        today: NaiveDate,
        selection: Option<&[u32]>,
    ) -> Result<AllocationPlan> {
        // cancelled loans reject payments outright; a fully-paid loan
        // falls through to the empty-candidates case below
        if loan.status == LoanStatus::Cancelled {
            return Err(LoanError::LoanNotActive { status: loan.status });
        }
        if !amount.is_positive() {
            return Err(LoanError::InvalidPaymentAmount { amount });
        }
        if amount.currency() != loan.currency() {
            return Err(LoanError::IncompatibleUnits {
                left: amount.currency(),
                right: loan.currency(),
            });
        }

        let selected = validate_selection(loan, selection)?;
        let horizon = payable_horizon(today, self.payable_window_months)?;

        // snapshot of payable candidates, earliest due first
        let mut candidates: Vec<&LoanInstallment> = loan
            .installments()
            .iter()
            .filter(|i| !i.is_paid())
            .filter(|i| selected.as_ref().map_or(true, |s| s.contains(&i.number)))
            .filter(|i| i.due_date <= horizon)
            .collect();
        candidates.sort_by_key(|i| (i.due_date, i.number));

        if candidates.is_empty() {
            return Err(LoanError::NoEligibleInstallments);
        }

        let mut remaining = amount;
        let mut entries = Vec::new();

        for installment in candidates {
            let adjustment = self
                .policy
                .assess(installment.amount, installment.due_date, payment_date);

            // whole installments only: stop at the first one funds
            // cannot fully cover
            if remaining < adjustment.amount_due {
                break;
            }

            remaining -= adjustment.amount_due;
            entries.push(AllocationEntry {
                installment_number: installment.number,
                scheduled_amount: installment.amount,
                due_date: installment.due_date,
                adjustment,
            });
        }

        Ok(AllocationPlan {
            payment_amount: amount,
            payment_date,
            entries,
            remaining_unapplied: remaining,
        })
    }
}

fn validate_selection(loan: &Loan, selection: Option<&[u32]>) -> Result<Option<HashSet<u32>>> {
    let Some(numbers) = selection.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let mut selected = HashSet::new();
    for &number in numbers {
        let Some(installment) = loan.installments().iter().find(|i| i.number == number) else {
            return Err(LoanError::InvalidInstallmentSelection {
                number,
                reason: "not part of this loan".to_string(),
            });
        };
        if installment.is_paid() {
            return Err(LoanError::InvalidInstallmentSelection {
                number,
                reason: "already paid".to_string(),
            });
        }
        selected.insert(number);
    }

    Ok(Some(selected))
}

/// latest due date still payable as of `today`
fn payable_horizon(today: NaiveDate, months: u32) -> Result<NaiveDate> {
    today
        .checked_add_months(Months::new(months))
        .ok_or_else(|| LoanError::InvalidDate {
            message: format!("cannot add {} months to {}", months, today),
        })
}
