use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::from(cents) / Decimal::from(100))
    }

    pub fn to_cents(self) -> i64 {
        (self.0 * Decimal::from(100)).round().to_i64().unwrap_or(0)
    }

    /// Rounds to two decimal places; sign is preserved.
    pub fn from_decimal(decimal: Decimal) -> Self {
        Money(decimal.round_dp(2))
    }

    pub fn to_decimal(self) -> Decimal {
        self.0
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R$ {:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Money(self.0 - rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn cents_round_trip() {
        assert_eq!(Money::from_cents(123456).to_cents(), 123456);
        assert_eq!(Money::from_cents(-5000).to_cents(), -5000);
        assert_eq!(Money::from_cents(0).to_cents(), 0);
    }

    #[test]
    fn from_decimal_rounds_to_two_places() {
        let m = Money::from_decimal(Decimal::from_str("10.005").unwrap());
        assert_eq!(m.to_cents(), 1000);
    }

    #[test]
    fn display_uses_currency_prefix() {
        assert_eq!(Money::from_cents(123456).to_string(), "R$ 1234.56");
    }

    #[test]
    fn ordering_follows_magnitude() {
        assert!(Money::from_cents(80100) > Money::from_cents(80000));
        assert!(Money::from_cents(9900) < Money::from_cents(10000));
    }

    #[test]
    fn add_and_sub() {
        let a = Money::from_cents(150);
        let b = Money::from_cents(50);
        assert_eq!((a + b).to_cents(), 200);
        assert_eq!((a - b).to_cents(), 100);
    }
}
