use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// where residual cents land when a total does not divide evenly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RemainderPlacement {
    /// last installment absorbs the remainder
    #[default]
    LastInstallment,
    /// first installment absorbs the remainder
    FirstInstallment,
}

/// engine configuration
///
/// Policy constants live here rather than at call sites: the daily
/// adjustment rate and the payable window are business parameters,
/// not hardcoded logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// daily discount/penalty rate applied per day early or late
    pub adjustment_daily_rate: Decimal,
    /// forward horizon within which an unpaid installment is payable
    pub payable_window_months: u32,
    /// permitted installment counts for new loans
    pub allowed_installment_counts: Vec<u32>,
    /// inclusive lower bound on the monthly nominal rate
    pub min_monthly_rate: Decimal,
    /// inclusive upper bound on the monthly nominal rate
    pub max_monthly_rate: Decimal,
    pub remainder_placement: RemainderPlacement,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            adjustment_daily_rate: dec!(0.001),
            payable_window_months: 3,
            allowed_installment_counts: vec![6, 9, 12, 24],
            min_monthly_rate: dec!(0.1),
            max_monthly_rate: dec!(0.5),
            remainder_placement: RemainderPlacement::LastInstallment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();

        assert_eq!(config.adjustment_daily_rate, dec!(0.001));
        assert_eq!(config.payable_window_months, 3);
        assert_eq!(config.allowed_installment_counts, vec![6, 9, 12, 24]);
        assert_eq!(config.remainder_placement, RemainderPlacement::LastInstallment);
    }
}
