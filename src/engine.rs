use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use uuid::Uuid;

use crate::adjustment::{Adjustment, AdjustmentPolicy};
use crate::allocation::AllocationPlanner;
use crate::config::EngineConfig;
use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::events::{Event, EventStore};
use crate::ledger::Customer;
use crate::loan::{Loan, LoanInstallment};
use crate::schedule::{self, LoanTerms};
use crate::types::PaymentResult;

/// loan engine facade
///
/// Exposes the in-process operations consumed by origination and
/// payment collaborators. Every call is synchronous, CPU-bound and
/// deterministic given its inputs and the supplied time provider;
/// serializing access per customer and per loan is the caller's job,
/// as is idempotency of replayed payments.
pub struct LoanEngine {
    pub config: EngineConfig,
    pub events: EventStore,
}

impl LoanEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            events: EventStore::new(),
        }
    }

    /// generate a standalone schedule preview for the given terms
    pub fn generate_schedule(
        &self,
        terms: &LoanTerms,
        origination: NaiveDate,
    ) -> Result<Vec<LoanInstallment>> {
        schedule::generate(&self.config, Uuid::new_v4(), terms, origination)
    }

    /// reserve credit against a customer's limit
    pub fn reserve(
        &mut self,
        customer: &mut Customer,
        amount: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        customer.reserve(amount)?;

        self.events.emit(Event::CreditReserved {
            customer_id: customer.id,
            amount,
            used_after: customer.used_credit_limit,
            timestamp: time_provider.now(),
        });

        Ok(())
    }

    /// release reserved credit after payoff or cancellation
    pub fn release(
        &mut self,
        customer: &mut Customer,
        amount: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        customer.release(amount)?;

        self.events.emit(Event::CreditReleased {
            customer_id: customer.id,
            amount,
            used_after: customer.used_credit_limit,
            timestamp: time_provider.now(),
        });

        Ok(())
    }

    /// originate a loan: validate terms, reserve credit, build the
    /// schedule and the aggregate
    ///
    /// Fails atomically: a failed origination leaves no reservation
    /// behind. The schedule is generated before the reservation so the
    /// only fallible step after `reserve` is none at all.
    pub fn originate(
        &mut self,
        customer: &mut Customer,
        terms: LoanTerms,
        time_provider: &SafeTimeProvider,
    ) -> Result<Loan> {
        let loan_id = Uuid::new_v4();
        let create_date = time_provider.now().date_naive();

        let installments = schedule::generate(&self.config, loan_id, &terms, create_date)?;
        self.reserve(customer, terms.principal, time_provider)?;

        let loan = Loan::new(
            loan_id,
            customer.id,
            terms.principal,
            terms.interest_rate,
            create_date,
            installments,
        );

        self.events.emit(Event::LoanOriginated {
            loan_id,
            customer_id: customer.id,
            principal: terms.principal,
            total_payable: loan.total_amount(),
            installment_count: loan.installment_count,
            timestamp: time_provider.now(),
        });

        Ok(loan)
    }

    /// cancel an active loan and release its reserved principal
    pub fn cancel_loan(
        &mut self,
        customer: &mut Customer,
        loan: &mut Loan,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        if !loan.status.can_accept_payments() {
            return Err(LoanError::LoanNotActive { status: loan.status });
        }

        loan.cancel();
        self.release(customer, loan.principal, time_provider)?;

        self.events.emit(Event::LoanCancelled {
            loan_id: loan.id,
            customer_id: customer.id,
            timestamp: time_provider.now(),
        });

        Ok(())
    }

    /// apply a payment against a loan's unpaid installments
    ///
    /// Allocation is planned over a snapshot, then applied atomically.
    /// A full payoff is only signalled through the result; releasing
    /// the credit reservation is the caller's move.
    pub fn apply_payment(
        &mut self,
        loan: &mut Loan,
        amount: Money,
        payment_date: NaiveDate,
        selection: Option<&[u32]>,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentResult> {
        let today = time_provider.now().date_naive();

        let planner = AllocationPlanner::new(&self.config);
        let plan = planner.plan(loan, amount, payment_date, today, selection)?;
        let result = loan.apply(&plan);

        let now = time_provider.now();
        for entry in &plan.entries {
            self.events.emit(Event::InstallmentSettled {
                loan_id: loan.id,
                installment_number: entry.installment_number,
                scheduled_amount: entry.scheduled_amount,
                amount_paid: entry.adjustment.amount_due,
                discount: entry.adjustment.discount,
                penalty: entry.adjustment.penalty,
                payment_date,
                timestamp: now,
            });
        }

        self.events.emit(Event::PaymentApplied {
            loan_id: loan.id,
            amount,
            amount_applied: result.total_amount_applied,
            amount_unapplied: result.remaining_unapplied,
            installments_paid: result.installments_paid,
            payment_date,
            timestamp: now,
        });

        if result.is_loan_fully_paid {
            self.events.emit(Event::LoanFullyPaid {
                loan_id: loan.id,
                customer_id: loan.customer_id,
                timestamp: now,
            });
        }

        Ok(result)
    }

    /// preview the discount/penalty for settling an installment on a
    /// given date; pure, touches no state
    pub fn simulate_adjustment(&self, installment: &LoanInstallment, date: NaiveDate) -> Adjustment {
        AdjustmentPolicy::from_config(&self.config).assess(
            installment.amount,
            installment.due_date,
            date,
        )
    }

    /// drain events collected by prior operations
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }
}

impl Default for LoanEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
