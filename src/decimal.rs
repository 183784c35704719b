use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

use crate::errors::{LoanError, Result};

/// number of fractional digits carried by settled amounts
pub const MONEY_SCALE: u32 = 2;

/// currency tag carried by every amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Try,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Try => "TRY",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Money type with a fixed two-decimal scale and half-up rounding.
///
/// Arithmetic is exact; rounding is applied once at the end of a
/// computation chain via `rounded()`, never on intermediate values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Money {
    currency: Currency,
    amount: Decimal,
}

impl Money {
    /// create from decimal, rounded to the declared scale
    pub fn from_decimal(d: Decimal, currency: Currency) -> Self {
        Money {
            currency,
            amount: round_half_up(d),
        }
    }

    /// create from whole units (dollars, euros, etc)
    pub fn from_major(amount: i64, currency: Currency) -> Self {
        Money {
            currency,
            amount: Decimal::from(amount),
        }
    }

    /// create from minor units (cents)
    pub fn from_minor(amount: i64, currency: Currency) -> Self {
        Money {
            currency,
            amount: Decimal::new(amount, MONEY_SCALE),
        }
    }

    /// create from string with exact parsing
    pub fn from_str_exact(
        s: &str,
        currency: Currency,
    ) -> std::result::Result<Self, rust_decimal::Error> {
        Ok(Money {
            currency,
            amount: round_half_up(Decimal::from_str(s)?),
        })
    }

    /// zero in the given currency
    pub fn zero(currency: Currency) -> Self {
        Money {
            currency,
            amount: Decimal::ZERO,
        }
    }

    pub fn as_decimal(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// round half-up at the declared scale; the final step of a chain
    pub fn rounded(&self) -> Self {
        Money {
            currency: self.currency,
            amount: round_half_up(self.amount),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Money {
            currency: self.currency,
            amount: self.amount.abs(),
        }
    }

    pub fn min(self, other: Self) -> Self {
        assert_eq!(self.currency, other.currency, "currency mismatch");
        if self.amount <= other.amount {
            self
        } else {
            other
        }
    }

    pub fn max(self, other: Self) -> Self {
        assert_eq!(self.currency, other.currency, "currency mismatch");
        if self.amount >= other.amount {
            self
        } else {
            other
        }
    }

    /// checked addition across possibly mixed currencies
    pub fn try_add(self, other: Self) -> Result<Self> {
        self.check_units(other)?;
        Ok(self + other)
    }

    /// checked subtraction across possibly mixed currencies
    pub fn try_sub(self, other: Self) -> Result<Self> {
        self.check_units(other)?;
        Ok(self - other)
    }

    fn check_units(&self, other: Self) -> Result<()> {
        if self.currency != other.currency {
            return Err(LoanError::IncompatibleUnits {
                left: self.currency,
                right: other.currency,
            });
        }
        Ok(())
    }

    /// split into `count` shares that sum exactly to this amount
    ///
    /// All shares are equal except the last, which absorbs any residual
    /// cents left over by rounding. The returned shares always sum to
    /// the source amount.
    pub fn divide_evenly(&self, count: u32) -> Vec<Money> {
        if count == 0 {
            return Vec::new();
        }

        let base = Money {
            currency: self.currency,
            amount: (self.amount / Decimal::from(count))
                .round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::ToZero),
        };

        let mut shares = vec![base; count as usize - 1];
        let allocated = base.amount * Decimal::from(count - 1);
        shares.push(Money {
            currency: self.currency,
            amount: self.amount - allocated,
        });

        shares
    }
}

fn round_half_up(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

// ordering is defined only within a currency; mixed currencies have
// no order
impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        if self.currency != other.currency {
            return None;
        }
        self.amount.partial_cmp(&other.amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        assert_eq!(self.currency, other.currency, "currency mismatch");
        Money {
            currency: self.currency,
            amount: self.amount + other.amount,
        }
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        assert_eq!(self.currency, other.currency, "currency mismatch");
        Money {
            currency: self.currency,
            amount: self.amount - other.amount,
        }
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        *self = *self - other;
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, scalar: Decimal) -> Money {
        Money {
            currency: self.currency,
            amount: self.amount * scalar,
        }
    }
}

/// rate type for interest rates and ratios
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from decimal (e.g., 0.2 for a 0.2 monthly nominal rate)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::from(100)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}
