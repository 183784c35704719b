use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;

/// unique identifier for a customer
pub type CustomerId = Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for a single installment
pub type InstallmentId = Uuid;

/// loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    /// loan originated, installments outstanding
    Active,
    /// every installment settled
    FullyPaid,
    /// origination rolled back, credit released
    Cancelled,
}

impl LoanStatus {
    pub fn can_accept_payments(&self) -> bool {
        matches!(self, LoanStatus::Active)
    }
}

/// installment status; `Pending -> Paid` is the only transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallmentStatus {
    Pending,
    Paid,
}

/// outcome of applying a payment against a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResult {
    /// installments settled by this payment
    pub installments_paid: u32,
    /// funds actually consumed, adjustments included
    pub total_amount_applied: Money,
    /// funds that could not cover a whole installment, returned unapplied
    pub remaining_unapplied: Money,
    /// true iff every installment of the loan is now paid
    pub is_loan_fully_paid: bool,
}
