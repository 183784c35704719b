use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{CustomerId, LoanId};

/// all events that can be emitted by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // credit ledger events
    CreditReserved {
        customer_id: CustomerId,
        amount: Money,
        used_after: Money,
        timestamp: DateTime<Utc>,
    },
    CreditReleased {
        customer_id: CustomerId,
        amount: Money,
        used_after: Money,
        timestamp: DateTime<Utc>,
    },

    // lifecycle events
    LoanOriginated {
        loan_id: LoanId,
        customer_id: CustomerId,
        principal: Money,
        total_payable: Money,
        installment_count: u32,
        timestamp: DateTime<Utc>,
    },
    LoanCancelled {
        loan_id: LoanId,
        customer_id: CustomerId,
        timestamp: DateTime<Utc>,
    },
    LoanFullyPaid {
        loan_id: LoanId,
        customer_id: CustomerId,
        timestamp: DateTime<Utc>,
    },

    // payment events
    InstallmentSettled {
        loan_id: LoanId,
        installment_number: u32,
        scheduled_amount: Money,
        amount_paid: Money,
        discount: Money,
        penalty: Money,
        payment_date: NaiveDate,
        timestamp: DateTime<Utc>,
    },
    PaymentApplied {
        loan_id: LoanId,
        amount: Money,
        amount_applied: Money,
        amount_unapplied: Money,
        installments_paid: u32,
        payment_date: NaiveDate,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
