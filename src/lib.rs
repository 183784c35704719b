pub mod adjustment;
pub mod allocation;
pub mod config;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod loan;
pub mod repository;
pub mod schedule;
pub mod types;

// re-export key types
pub use adjustment::{Adjustment, AdjustmentPolicy};
pub use allocation::{AllocationEntry, AllocationPlan, AllocationPlanner};
pub use config::{EngineConfig, RemainderPlacement};
pub use decimal::{Currency, Money, Rate};
pub use engine::LoanEngine;
pub use errors::{LoanError, Result};
pub use events::{Event, EventStore};
pub use ledger::Customer;
pub use loan::{InstallmentView, Loan, LoanInstallment, LoanView};
pub use repository::{CustomerRepository, InMemoryRepository, LoanRepository};
pub use schedule::LoanTerms;
pub use types::{
    CustomerId, InstallmentId, InstallmentStatus, LoanId, LoanStatus, PaymentResult,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
