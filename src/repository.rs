use std::collections::HashMap;

use crate::ledger::Customer;
use crate::loan::Loan;
use crate::types::{CustomerId, LoanId};

/// customer persistence boundary
pub trait CustomerRepository {
    fn find(&self, id: CustomerId) -> Option<Customer>;
    fn save(&mut self, customer: Customer);
}

/// loan persistence boundary
pub trait LoanRepository {
    fn find(&self, id: LoanId) -> Option<Loan>;
    fn find_by_customer(&self, customer_id: CustomerId) -> Vec<Loan>;
    fn save(&mut self, loan: Loan);
}

/// in-memory store backing both repositories; the default for tests
/// and single-process embedding
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    customers: HashMap<CustomerId, Customer>,
    loans: HashMap<LoanId, Loan>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loan_count(&self) -> usize {
        self.loans.len()
    }
}

impl CustomerRepository for InMemoryRepository {
    fn find(&self, id: CustomerId) -> Option<Customer> {
        self.customers.get(&id).cloned()
    }

    fn save(&mut self, customer: Customer) {
        self.customers.insert(customer.id, customer);
    }
}

impl LoanRepository for InMemoryRepository {
    fn find(&self, id: LoanId) -> Option<Loan> {
        self.loans.get(&id).cloned()
    }

    fn find_by_customer(&self, customer_id: CustomerId) -> Vec<Loan> {
        let mut loans: Vec<Loan> = self
            .loans
            .values()
            .filter(|l| l.customer_id == customer_id)
            .cloned()
            .collect();
        loans.sort_by_key(|l| l.create_date);
        loans
    }

    fn save(&mut self, loan: Loan) {
        self.loans.insert(loan.id, loan);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::decimal::{Currency, Money, Rate};
    use crate::engine::LoanEngine;
    use crate::schedule::LoanTerms;
    use chrono::{NaiveDate, TimeZone, Utc};
    use hourglass_rs::{SafeTimeProvider, TimeSource};
    use rust_decimal_macros::dec;

    fn usd(n: i64) -> Money {
        Money::from_major(n, Currency::Usd)
    }

    fn test_clock(y: i32, m: u32, d: u32) -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap(),
        ))
    }

    #[test]
    fn test_originate_persist_reload_pay() {
        let mut engine = LoanEngine::new(EngineConfig::default());
        let mut store = InMemoryRepository::new();
        let time = test_clock(2025, 1, 15);

        let mut customer = Customer::new("Jane", "Doe", usd(50_000));
        let terms = LoanTerms::new(usd(6_000), Rate::from_decimal(dec!(0.1)), 6);
        let loan = engine.originate(&mut customer, terms, &time).unwrap();
        let loan_id = loan.id;
        let customer_id = customer.id;

        CustomerRepository::save(&mut store, customer);
        LoanRepository::save(&mut store, loan);

        // reload and pay the first installment on its due date
        let mut loan = LoanRepository::find(&store, loan_id).unwrap();
        let time = test_clock(2025, 2, 1);
        let payment_date = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let result = engine
            .apply_payment(&mut loan, usd(1_100), payment_date, None, &time)
            .unwrap();
        assert_eq!(result.installments_paid, 1);
        LoanRepository::save(&mut store, loan);

        let reloaded = LoanRepository::find(&store, loan_id).unwrap();
        assert_eq!(reloaded.remaining_installments(), 5);
        assert!(reloaded.installments()[0].is_paid());

        let by_customer = store.find_by_customer(customer_id);
        assert_eq!(by_customer.len(), 1);
        assert_eq!(by_customer[0].id, loan_id);
    }

    #[test]
    fn test_missing_ids_return_none() {
        let store = InMemoryRepository::new();
        assert!(LoanRepository::find(&store, uuid::Uuid::new_v4()).is_none());
        assert!(CustomerRepository::find(&store, uuid::Uuid::new_v4()).is_none());
    }
}
