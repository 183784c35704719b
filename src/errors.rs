use thiserror::Error;

use crate::decimal::{Currency, Money};
use crate::types::LoanStatus;

#[derive(Error, Debug)]
pub enum LoanError {
    #[error("incompatible units: {left} vs {right}")]
    IncompatibleUnits {
        left: Currency,
        right: Currency,
    },

    #[error("invalid loan terms: {field}: {message}")]
    InvalidLoanTerms {
        field: &'static str,
        message: String,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("invalid credit amount: {amount}")]
    InvalidCreditAmount {
        amount: Money,
    },

    #[error("insufficient credit: available {available}, requested {requested}")]
    InsufficientCredit {
        available: Money,
        requested: Money,
    },

    #[error("invalid installment selection: installment {number}: {reason}")]
    InvalidInstallmentSelection {
        number: u32,
        reason: String,
    },

    #[error("no eligible installments within the payable window")]
    NoEligibleInstallments,

    #[error("loan not active: current status is {status:?}")]
    LoanNotActive {
        status: LoanStatus,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, LoanError>;
