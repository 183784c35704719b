use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::decimal::Money;

/// result of assessing an installment against a candidate payment date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    /// due date minus payment date in days; positive = early, negative = late
    pub days_delta: i64,
    pub discount: Money,
    pub penalty: Money,
    /// scheduled amount minus discount plus penalty
    pub amount_due: Money,
}

/// early-payment discount / late-payment penalty policy
///
/// Pure: assessing an installment never mutates anything, so the same
/// policy backs both settlement and payment previews.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentPolicy {
    daily_rate: Decimal,
}

impl AdjustmentPolicy {
    pub fn new(daily_rate: Decimal) -> Self {
        Self { daily_rate }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.adjustment_daily_rate)
    }

    pub fn daily_rate(&self) -> Decimal {
        self.daily_rate
    }

    /// compute the adjusted charge for settling `amount` due on
    /// `due_date` on `payment_date`
    ///
    /// The per-day adjustment is rounded half-up exactly once, at the
    /// point the final charge is computed.
    pub fn assess(&self, amount: Money, due_date: NaiveDate, payment_date: NaiveDate) -> Adjustment {
        let days_delta = (due_date - payment_date).num_days();
        let zero = Money::zero(amount.currency());

        let (discount, penalty) = if days_delta > 0 {
            let discount = (amount * (self.daily_rate * Decimal::from(days_delta))).rounded();
            (discount, zero)
        } else if days_delta < 0 {
            let penalty = (amount * (self.daily_rate * Decimal::from(-days_delta))).rounded();
            (zero, penalty)
        } else {
            (zero, zero)
        };

        Adjustment {
            days_delta,
            discount,
            penalty,
            amount_due: amount - discount + penalty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Currency;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn policy() -> AdjustmentPolicy {
        AdjustmentPolicy::new(dec!(0.001))
    }

    #[test]
    fn test_early_payment_discount() {
        // $1,000 due 2025-03-01, paid 5 days early -> $5.00 off
        let amount = Money::from_major(1_000, Currency::Usd);
        let adjustment = policy().assess(amount, date(2025, 3, 1), date(2025, 2, 24));

        assert_eq!(adjustment.days_delta, 5);
        assert_eq!(adjustment.discount, Money::from_str_exact("5.00", Currency::Usd).unwrap());
        assert!(adjustment.penalty.is_zero());
        assert_eq!(adjustment.amount_due, Money::from_str_exact("995.00", Currency::Usd).unwrap());
    }

    #[test]
    fn test_late_payment_penalty() {
        // same installment paid 5 days late -> $5.00 on top
        let amount = Money::from_major(1_000, Currency::Usd);
        let adjustment = policy().assess(amount, date(2025, 3, 1), date(2025, 3, 6));

        assert_eq!(adjustment.days_delta, -5);
        assert!(adjustment.discount.is_zero());
        assert_eq!(adjustment.penalty, Money::from_str_exact("5.00", Currency::Usd).unwrap());
        assert_eq!(adjustment.amount_due, Money::from_str_exact("1005.00", Currency::Usd).unwrap());
    }

    #[test]
    fn test_on_time_payment_unchanged() {
        let amount = Money::from_major(1_000, Currency::Usd);
        let adjustment = policy().assess(amount, date(2025, 3, 1), date(2025, 3, 1));

        assert_eq!(adjustment.days_delta, 0);
        assert!(adjustment.discount.is_zero());
        assert!(adjustment.penalty.is_zero());
        assert_eq!(adjustment.amount_due, amount);
    }

    #[test]
    fn test_rounding_applied_once_at_final_charge() {
        // 333.33 x 0.001 x 1 = 0.33333 -> rounds half-up to 0.33
        let amount = Money::from_str_exact("333.33", Currency::Usd).unwrap();
        let adjustment = policy().assess(amount, date(2025, 3, 2), date(2025, 3, 1));

        assert_eq!(adjustment.discount, Money::from_str_exact("0.33", Currency::Usd).unwrap());
        assert_eq!(adjustment.amount_due, Money::from_str_exact("333.00", Currency::Usd).unwrap());
    }

    #[test]
    fn test_assess_is_idempotent() {
        let amount = Money::from_major(1_000, Currency::Usd);
        let first = policy().assess(amount, date(2025, 3, 1), date(2025, 2, 15));
        let second = policy().assess(amount, date(2025, 3, 1), date(2025, 2, 15));

        assert_eq!(first, second);
    }

    #[test]
    fn test_configured_daily_rate() {
        let config = EngineConfig {
            adjustment_daily_rate: dec!(0.002),
            ..EngineConfig::default()
        };
        let policy = AdjustmentPolicy::from_config(&config);

        let amount = Money::from_major(1_000, Currency::Usd);
        let adjustment = policy.assess(amount, date(2025, 3, 1), date(2025, 2, 24));
        assert_eq!(adjustment.discount, Money::from_str_exact("10.00", Currency::Usd).unwrap());
    }
}
