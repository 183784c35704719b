use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Currency, Money};
use crate::errors::{LoanError, Result};
use crate::types::CustomerId;

/// customer credit-ledger aggregate
///
/// `used_credit_limit` is mutated only through `reserve` and `release`;
/// both uphold `0 <= used_credit_limit <= credit_limit`. Callers are
/// responsible for serializing concurrent access per customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub surname: String,
    pub credit_limit: Money,
    pub used_credit_limit: Money,
}

impl Customer {
    /// create a customer with an unused credit limit
    pub fn new(name: impl Into<String>, surname: impl Into<String>, credit_limit: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            surname: surname.into(),
            used_credit_limit: Money::zero(credit_limit.currency()),
            credit_limit,
        }
    }

    pub fn currency(&self) -> Currency {
        self.credit_limit.currency()
    }

    pub fn available_credit(&self) -> Money {
        self.credit_limit - self.used_credit_limit
    }

    /// reserve credit for a new loan
    ///
    /// Atomic: on failure the ledger is untouched.
    pub fn reserve(&mut self, amount: Money) -> Result<()> {
        if !amount.is_positive() {
            return Err(LoanError::InvalidCreditAmount { amount });
        }

        let available = self.available_credit();
        if available.try_sub(amount)?.is_negative() {
            return Err(LoanError::InsufficientCredit {
                available,
                requested: amount,
            });
        }

        self.used_credit_limit += amount;
        debug_assert!(self.used_credit_limit <= self.credit_limit);
        Ok(())
    }

    /// release reserved credit on payoff or cancellation, clamped at zero
    pub fn release(&mut self, amount: Money) -> Result<()> {
        if !amount.is_positive() {
            return Err(LoanError::InvalidCreditAmount { amount });
        }

        self.used_credit_limit = self
            .used_credit_limit
            .try_sub(amount)?
            .max(Money::zero(self.currency()));
        Ok(())
    }
}
