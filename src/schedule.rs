use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, RemainderPlacement};
use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::loan::LoanInstallment;
use crate::types::LoanId;

/// terms a loan is originated with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// monthly nominal rate
    pub interest_rate: Rate,
    pub installment_count: u32,
}

impl LoanTerms {
    pub fn new(principal: Money, interest_rate: Rate, installment_count: u32) -> Self {
        Self {
            principal,
            interest_rate,
            installment_count,
        }
    }

    /// validate against the configured bounds, naming the offending field
    pub fn validate(&self, config: &EngineConfig) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(LoanError::InvalidLoanTerms {
                field: "principal",
                message: format!("must be positive, got {}", self.principal),
            });
        }

        let rate = self.interest_rate.as_decimal();
        if rate < config.min_monthly_rate || rate > config.max_monthly_rate {
            return Err(LoanError::InvalidLoanTerms {
                field: "interest_rate",
                message: format!(
                    "must be between {} and {}, got {}",
                    config.min_monthly_rate, config.max_monthly_rate, rate
                ),
            });
        }

        if !config.allowed_installment_counts.contains(&self.installment_count) {
            return Err(LoanError::InvalidLoanTerms {
                field: "installment_count",
                message: format!(
                    "must be one of {:?}, got {}",
                    config.allowed_installment_counts, self.installment_count
                ),
            });
        }

        Ok(())
    }

    /// total payable: principal x (1 + rate), rounded at the final step
    pub fn total_payable(&self) -> Money {
        (self.principal * (Decimal::ONE + self.interest_rate.as_decimal())).rounded()
    }
}

/// generate the installment schedule for a loan
///
/// Installment `i` (1-based) falls due on the first day of the month
/// `i` months after the origination month. The generated amounts sum
/// exactly to `principal x (1 + rate)`.
pub fn generate(
    config: &EngineConfig,
    loan_id: LoanId,
    terms: &LoanTerms,
    origination: NaiveDate,
) -> Result<Vec<LoanInstallment>> {
    terms.validate(config)?;

    let total = terms.total_payable();
    let mut shares = total.divide_evenly(terms.installment_count);
    if config.remainder_placement == RemainderPlacement::FirstInstallment {
        shares.reverse();
    }

    let mut installments = Vec::with_capacity(shares.len());
    for (i, amount) in shares.into_iter().enumerate() {
        let due_date = month_start_after(origination, i as u32 + 1)?;
        installments.push(LoanInstallment::new(loan_id, i as u32 + 1, amount, due_date));
    }

    debug_assert_eq!(
        installments
            .iter()
            .map(|i| i.amount)
            .fold(Money::zero(total.currency()), |acc, x| acc + x),
        total
    );

    Ok(installments)
}

/// first day of the month `months` after the month containing `date`
fn month_start_after(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.with_day(1)
        .and_then(|d| d.checked_add_months(Months::new(months)))
        .ok_or_else(|| LoanError::InvalidDate {
            message: format!("cannot add {} months to {}", months, date),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Currency;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn terms(principal: i64, rate: Decimal, count: u32) -> LoanTerms {
        LoanTerms::new(
            Money::from_major(principal, Currency::Usd),
            Rate::from_decimal(rate),
            count,
        )
    }

    #[test]
    fn test_even_schedule() {
        // $10,000 at 0.2 over 12 -> total $12,000, 12 x $1,000.00
        let config = EngineConfig::default();
        let schedule = generate(
            &config,
            Uuid::new_v4(),
            &terms(10_000, dec!(0.2), 12),
            date(2025, 1, 15),
        )
        .unwrap();

        assert_eq!(schedule.len(), 12);
        for installment in &schedule {
            assert_eq!(installment.amount, Money::from_major(1_000, Currency::Usd));
            assert!(!installment.is_paid());
            assert!(installment.paid_amount.is_zero());
        }
    }

    #[test]
    fn test_sum_equals_total_with_remainder() {
        let config = EngineConfig::default();
        let t = terms(10_000, dec!(0.1), 6);
        // total 11,000 / 6 = 1,833.33... -> remainder lands on the last share
        let schedule = generate(&config, Uuid::new_v4(), &t, date(2025, 1, 15)).unwrap();

        let sum = schedule
            .iter()
            .map(|i| i.amount)
            .fold(Money::zero(Currency::Usd), |acc, x| acc + x);
        assert_eq!(sum, t.total_payable());

        assert_eq!(schedule[0].amount.as_decimal(), dec!(1833.33));
        assert_eq!(schedule[5].amount.as_decimal(), dec!(1833.35));
    }

    #[test]
    fn test_remainder_on_first_installment() {
        let config = EngineConfig {
            remainder_placement: RemainderPlacement::FirstInstallment,
            ..EngineConfig::default()
        };
        let t = terms(10_000, dec!(0.1), 6);
        let schedule = generate(&config, Uuid::new_v4(), &t, date(2025, 1, 15)).unwrap();

        assert_eq!(schedule[0].amount.as_decimal(), dec!(1833.35));
        assert_eq!(schedule[5].amount.as_decimal(), dec!(1833.33));

        let sum = schedule
            .iter()
            .map(|i| i.amount)
            .fold(Money::zero(Currency::Usd), |acc, x| acc + x);
        assert_eq!(sum, t.total_payable());
    }

    #[test]
    fn test_due_dates_first_of_each_following_month() {
        let config = EngineConfig::default();
        let schedule = generate(
            &config,
            Uuid::new_v4(),
            &terms(6_000, dec!(0.2), 6),
            date(2024, 11, 20),
        )
        .unwrap();

        assert_eq!(schedule[0].due_date, date(2024, 12, 1));
        assert_eq!(schedule[1].due_date, date(2025, 1, 1));
        assert_eq!(schedule[5].due_date, date(2025, 5, 1));

        // strictly ascending, one calendar month apart
        for pair in schedule.windows(2) {
            assert!(pair[0].due_date < pair[1].due_date);
            assert_eq!(
                month_start_after(pair[0].due_date, 1).unwrap(),
                pair[1].due_date
            );
        }
    }

    #[test]
    fn test_rejects_non_positive_principal() {
        let config = EngineConfig::default();
        let err = generate(
            &config,
            Uuid::new_v4(),
            &terms(0, dec!(0.2), 12),
            date(2025, 1, 1),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            LoanError::InvalidLoanTerms { field: "principal", .. }
        ));
    }

    #[test]
    fn test_rejects_rate_out_of_bounds() {
        let config = EngineConfig::default();

        for rate in [dec!(0.05), dec!(0.51)] {
            let err = terms(10_000, rate, 12).validate(&config).unwrap_err();
            assert!(matches!(
                err,
                LoanError::InvalidLoanTerms { field: "interest_rate", .. }
            ));
        }

        // bounds are inclusive
        assert!(terms(10_000, dec!(0.1), 12).validate(&config).is_ok());
        assert!(terms(10_000, dec!(0.5), 12).validate(&config).is_ok());
    }

    #[test]
    fn test_rejects_disallowed_installment_count() {
        let config = EngineConfig::default();

        for count in [0, 5, 10, 36] {
            let err = terms(10_000, dec!(0.2), count).validate(&config).unwrap_err();
            assert!(matches!(
                err,
                LoanError::InvalidLoanTerms { field: "installment_count", .. }
            ));
        }

        for count in [6, 9, 12, 24] {
            assert!(terms(10_000, dec!(0.2), count).validate(&config).is_ok());
        }
    }
}
