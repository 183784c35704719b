use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::allocation::AllocationPlan;
use crate::decimal::{Currency, Money, Rate};
use crate::types::{CustomerId, InstallmentId, InstallmentStatus, LoanId, LoanStatus, PaymentResult};

/// single scheduled repayment of a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInstallment {
    pub id: InstallmentId,
    pub loan_id: LoanId,
    /// 1-based position in the schedule
    pub number: u32,
    /// scheduled due amount
    pub amount: Money,
    /// amount actually collected; differs from `amount` under discount/penalty
    pub paid_amount: Money,
    pub due_date: NaiveDate,
    /// set once, when the installment is settled
    pub payment_date: Option<NaiveDate>,
    pub status: InstallmentStatus,
}

impl LoanInstallment {
    pub fn new(loan_id: LoanId, number: u32, amount: Money, due_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            loan_id,
            number,
            amount,
            paid_amount: Money::zero(amount.currency()),
            due_date,
            payment_date: None,
            status: InstallmentStatus::Pending,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == InstallmentStatus::Paid
    }

    /// mark fully paid; `Pending -> Paid` is terminal
    pub(crate) fn settle(&mut self, amount_due: Money, payment_date: NaiveDate) {
        debug_assert_eq!(self.status, InstallmentStatus::Pending);
        self.paid_amount = amount_due;
        self.payment_date = Some(payment_date);
        self.status = InstallmentStatus::Paid;
    }
}

/// loan aggregate
///
/// Installments are fixed at origination; only their paid state mutates
/// afterwards. Callers serialize concurrent payments per loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub customer_id: CustomerId,
    pub principal: Money,
    /// monthly nominal rate
    pub interest_rate: Rate,
    pub installment_count: u32,
    pub create_date: NaiveDate,
    pub status: LoanStatus,
    installments: Vec<LoanInstallment>,
}

impl Loan {
    pub fn new(
        id: LoanId,
        customer_id: CustomerId,
        principal: Money,
        interest_rate: Rate,
        create_date: NaiveDate,
        installments: Vec<LoanInstallment>,
    ) -> Self {
        Self {
            id,
            customer_id,
            principal,
            interest_rate,
            installment_count: installments.len() as u32,
            create_date,
            status: LoanStatus::Active,
            installments,
        }
    }

    pub fn currency(&self) -> Currency {
        self.principal.currency()
    }

    pub fn installments(&self) -> &[LoanInstallment] {
        &self.installments
    }

    pub fn is_fully_paid(&self) -> bool {
        self.installments.iter().all(LoanInstallment::is_paid)
    }

    /// principal plus interest across the whole schedule
    pub fn total_amount(&self) -> Money {
        self.installments
            .iter()
            .map(|i| i.amount)
            .fold(Money::zero(self.currency()), |acc, x| acc + x)
    }

    /// scheduled amount still unpaid
    pub fn remaining_amount(&self) -> Money {
        self.installments
            .iter()
            .filter(|i| !i.is_paid())
            .map(|i| i.amount)
            .fold(Money::zero(self.currency()), |acc, x| acc + x)
    }

    pub fn remaining_installments(&self) -> u32 {
        self.installments.iter().filter(|i| !i.is_paid()).count() as u32
    }

    pub fn overdue_installments(&self, today: NaiveDate) -> Vec<&LoanInstallment> {
        self.installments
            .iter()
            .filter(|i| !i.is_paid() && i.due_date < today)
            .collect()
    }

    /// cancel an active loan so its reservation can be released
    pub fn cancel(&mut self) {
        debug_assert_eq!(self.status, LoanStatus::Active);
        self.status = LoanStatus::Cancelled;
    }

    /// apply an allocation plan computed over this loan's snapshot
    ///
    /// The plan is the pure half of payment processing; this is the
    /// atomic mutation half.
    pub(crate) fn apply(&mut self, plan: &AllocationPlan) -> PaymentResult {
        let mut total_applied = Money::zero(self.currency());

        for entry in &plan.entries {
            if let Some(installment) = self
                .installments
                .iter_mut()
                .find(|i| i.number == entry.installment_number)
            {
                installment.settle(entry.adjustment.amount_due, plan.payment_date);
                total_applied += entry.adjustment.amount_due;
            }
        }

        let is_loan_fully_paid = self.is_fully_paid();
        if is_loan_fully_paid {
            self.status = LoanStatus::FullyPaid;
        }

        debug_assert_eq!(
            total_applied + plan.remaining_unapplied,
            plan.payment_amount
        );

        PaymentResult {
            installments_paid: plan.entries.len() as u32,
            total_amount_applied: total_applied,
            remaining_unapplied: plan.remaining_unapplied,
            is_loan_fully_paid,
        }
    }
}

/// serializable view of a loan's state
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub customer_id: CustomerId,
    pub status: LoanStatus,
    pub create_date: NaiveDate,
    pub principal: Money,
    pub interest_rate: Rate,
    pub total_amount: Money,
    pub remaining_amount: Money,
    pub remaining_installments: u32,
    pub installments: Vec<InstallmentView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InstallmentView {
    pub number: u32,
    pub amount: Money,
    pub paid_amount: Money,
    pub due_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub status: InstallmentStatus,
}

impl LoanView {
    pub fn from_loan(loan: &Loan) -> Self {
        LoanView {
            id: loan.id,
            customer_id: loan.customer_id,
            status: loan.status,
            create_date: loan.create_date,
            principal: loan.principal,
            interest_rate: loan.interest_rate,
            total_amount: loan.total_amount(),
            remaining_amount: loan.remaining_amount(),
            remaining_installments: loan.remaining_installments(),
            installments: loan
                .installments
                .iter()
                .map(|i| InstallmentView {
                    number: i.number,
                    amount: i.amount,
                    paid_amount: i.paid_amount,
                    due_date: i.due_date,
                    payment_date: i.payment_date,
                    status: i.status,
                })
                .collect(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
