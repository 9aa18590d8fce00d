use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use tsify_next::Tsify;

use crate::error::BookingError;

pub const CENTS_PER_EURO: u64 = 100;

// ============================================================================
// Money - exact two-component EUR amount
// ============================================================================

/// Amount of money in EUR, in canonical form: whole euros plus 0..=99 cents.
///
/// Single amounts (offers, thresholds) are bounded by `u64` euros at every
/// constructor; the `u128` field leaves headroom so that sums of any number
/// of them stay exact.
///
/// Ordering compares the combined magnitude (`euros * 100 + cents`); since
/// `cents` is always normalized the derived field order gives the same result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Tsify)]
pub struct Money {
    euros: u128,
    cents: u8,
}

/// Wire shape accepted before validation (negative parts must be rejected,
/// not wrapped). `i128` so that serialized totals read back.
#[derive(Deserialize)]
struct RawMoney {
    euros: i128,
    cents: i64,
}

impl Money {
    /// Build a validated amount. Fails on negative parts or `cents >= 100`.
    pub fn new(euros: i64, cents: i64) -> Result<Self, BookingError> {
        Self::from_parts(euros as i128, cents)
    }

    fn from_parts(euros: i128, cents: i64) -> Result<Self, BookingError> {
        if euros < 0 {
            return Err(BookingError::invalid_amount(format!(
                "negative euros: {euros}"
            )));
        }
        if cents < 0 {
            return Err(BookingError::invalid_amount(format!(
                "negative cents: {cents}"
            )));
        }
        if cents >= CENTS_PER_EURO as i64 {
            return Err(BookingError::invalid_amount(format!(
                "cents out of range: {cents}"
            )));
        }
        Ok(Self {
            euros: euros as u128,
            cents: cents as u8,
        })
    }

    pub const fn zero() -> Self {
        Self { euros: 0, cents: 0 }
    }

    /// Whole euros, no cents. Infallible since `u64` is never negative.
    pub const fn from_euros(euros: u64) -> Self {
        Self {
            euros: euros as u128,
            cents: 0,
        }
    }

    /// Split a total count of cents into canonical form.
    pub const fn from_cents(total: u64) -> Self {
        Self {
            euros: (total / CENTS_PER_EURO) as u128,
            cents: (total % CENTS_PER_EURO) as u8,
        }
    }

    /// Convert a client-supplied decimal price.
    ///
    /// The integer part becomes euros; the fractional part is rounded half-up
    /// to whole cents, carrying into euros when it rounds to 100.
    pub fn from_decimal(value: f64) -> Result<Self, BookingError> {
        if !value.is_finite() {
            return Err(BookingError::invalid_amount(format!(
                "not a finite number: {value}"
            )));
        }
        if value < 0.0 {
            return Err(BookingError::invalid_amount(format!(
                "negative amount: {value}"
            )));
        }

        let whole = value.trunc();
        // u64::MAX as f64 rounds up to 2^64, so `>=` rejects everything unrepresentable
        if whole >= u64::MAX as f64 {
            return Err(BookingError::invalid_amount(format!(
                "amount too large: {value}"
            )));
        }
        let euros = whole as u64;
        let cents = ((value - whole) * CENTS_PER_EURO as f64).round() as u64;

        if cents >= CENTS_PER_EURO {
            let euros = euros
                .checked_add(1)
                .ok_or_else(|| BookingError::invalid_amount(format!("amount too large: {value}")))?;
            return Ok(Self::from_euros(euros));
        }
        Ok(Self {
            euros: euros as u128,
            cents: cents as u8,
        })
    }

    pub const fn euros(&self) -> u128 {
        self.euros
    }

    pub const fn cents(&self) -> u8 {
        self.cents
    }

    /// Combined magnitude in cents. Saturates past `u128::MAX`, which no sum
    /// of `u64`-euro amounts reaches.
    pub const fn cents_total(&self) -> u128 {
        self.euros
            .saturating_mul(CENTS_PER_EURO as u128)
            .saturating_add(self.cents as u128)
    }

    pub fn is_zero(&self) -> bool {
        self.euros == 0 && self.cents == 0
    }

    /// Addition that reports `u128` euro overflow instead of panicking.
    pub fn checked_add(self, other: Money) -> Option<Money> {
        let cents = self.cents as u64 + other.cents as u64;
        let euros = self
            .euros
            .checked_add(other.euros)?
            .checked_add((cents / CENTS_PER_EURO) as u128)?;
        Some(Self {
            euros,
            cents: (cents % CENTS_PER_EURO) as u8,
        })
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        let cents = self.cents as u64 + other.cents as u64;
        Money {
            euros: self.euros + other.euros + (cents / CENTS_PER_EURO) as u128,
            cents: (cents % CENTS_PER_EURO) as u8,
        }
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        *self = *self + other;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.euros, self.cents)
    }
}

/// Parses `123`, `123.4` or `123.45` exactly. No signs, no exponents, at most
/// two fractional digits.
impl FromStr for Money {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, Some(frac)),
            None => (s, None),
        };

        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) {
            return Err(BookingError::invalid_amount(format!("malformed amount: {s:?}")));
        }
        let euros: u64 = whole
            .parse()
            .map_err(|_| BookingError::invalid_amount(format!("amount too large: {s:?}")))?;

        let cents = match frac {
            None => 0,
            Some(frac) if all_digits(frac) && frac.len() <= 2 => {
                // "5" means 50 cents, "05" means 5
                let value: u8 = frac
                    .parse()
                    .map_err(|_| BookingError::invalid_amount(format!("malformed amount: {s:?}")))?;
                if frac.len() == 1 { value * 10 } else { value }
            }
            Some(_) => {
                return Err(BookingError::invalid_amount(format!(
                    "expected at most two fractional digits: {s:?}"
                )));
            }
        };

        Ok(Self {
            euros: euros as u128,
            cents,
        })
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawMoney::deserialize(deserializer)?;
        Money::from_parts(raw.euros, raw.cents).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eur(euros: i64, cents: i64) -> Money {
        Money::new(euros, cents).unwrap()
    }

    #[test]
    fn rejects_malformed_components() {
        assert!(matches!(
            Money::new(-1, 0),
            Err(BookingError::InvalidAmount { .. })
        ));
        assert!(matches!(
            Money::new(0, -1),
            Err(BookingError::InvalidAmount { .. })
        ));
        assert!(matches!(
            Money::new(5, 100),
            Err(BookingError::InvalidAmount { .. })
        ));
        assert_eq!(eur(5, 99).cents(), 99);
    }

    #[test]
    fn addition_carries_cents() {
        let sum = eur(99, 99) + eur(45, 0) + eur(23, 0);
        assert_eq!(sum, eur(167, 99));

        let carried = eur(0, 60) + eur(1, 55);
        assert_eq!(carried, eur(2, 15));
    }

    #[test]
    fn sum_of_empty_is_zero() {
        let total: Money = Vec::<Money>::new().into_iter().sum();
        assert!(total.is_zero());
        assert_eq!(total, Money::zero());
    }

    #[test]
    fn ordering_uses_combined_magnitude() {
        assert!(eur(99, 99) < eur(100, 0));
        assert!(eur(100, 1) > eur(100, 0));
        assert!(eur(1, 0) > eur(0, 99));
        assert_eq!(eur(12, 34).cents_total(), 1234);
    }

    #[test]
    fn sums_past_u64_euros_stay_exact() {
        let max = Money::from_euros(u64::MAX);
        let sum = max + max + eur(0, 99) + eur(0, 2);

        assert_eq!(sum.euros(), 2 * u64::MAX as u128 + 1);
        assert_eq!(sum.cents(), 1);
        assert!(sum > max);
        assert_eq!(sum.cents_total(), (2 * u64::MAX as u128 + 1) * 100 + 1);

        let total: Money = std::iter::repeat_n(max, 1000).sum();
        assert_eq!(total.euros(), 1000 * u64::MAX as u128);
    }

    #[test]
    fn checked_add_reports_overflow() {
        let max = Money {
            euros: u128::MAX,
            cents: 0,
        };
        let topped = max.checked_add(eur(0, 99)).unwrap();
        assert_eq!((topped.euros(), topped.cents()), (u128::MAX, 99));

        assert_eq!(max.checked_add(eur(1, 0)), None);
        assert_eq!(topped.checked_add(eur(0, 1)), None);
        assert_eq!(eur(1, 50).checked_add(eur(2, 50)), Some(eur(4, 0)));
    }

    #[test]
    fn from_decimal_rounds_to_nearest_cent() {
        assert_eq!(Money::from_decimal(99.99).unwrap(), eur(99, 99));
        assert_eq!(Money::from_decimal(23.0).unwrap(), eur(23, 0));
        assert_eq!(Money::from_decimal(0.1).unwrap(), eur(0, 10));
        assert_eq!(Money::from_decimal(10.004).unwrap(), eur(10, 0));
        assert_eq!(Money::from_decimal(10.006).unwrap(), eur(10, 1));
        // carries when the fraction rounds up to a whole euro
        assert_eq!(Money::from_decimal(4.999).unwrap(), eur(5, 0));
    }

    #[test]
    fn from_decimal_rounds_exact_halves_up() {
        // binary-exact halves of a cent
        assert_eq!(Money::from_decimal(0.125).unwrap(), eur(0, 13));
        assert_eq!(Money::from_decimal(2.375).unwrap(), eur(2, 38));
        assert_eq!(Money::from_decimal(7.625).unwrap(), eur(7, 63));
    }

    #[test]
    fn serde_reads_back_totals_above_u64() {
        let total = Money::from_euros(u64::MAX) + Money::from_euros(u64::MAX);
        let json = serde_json::to_string(&total).unwrap();
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, total);
    }

    #[test]
    fn from_decimal_rejects_unrepresentable_values() {
        assert!(Money::from_decimal(-0.5).is_err());
        assert!(Money::from_decimal(f64::NAN).is_err());
        assert!(Money::from_decimal(f64::INFINITY).is_err());
        assert!(Money::from_decimal(1e30).is_err());
    }

    #[test]
    fn display_and_parse() {
        assert_eq!(eur(738, 0).to_string(), "738.00");
        assert_eq!(eur(0, 5).to_string(), "0.05");

        assert_eq!("167.99".parse::<Money>().unwrap(), eur(167, 99));
        assert_eq!("3.5".parse::<Money>().unwrap(), eur(3, 50));
        assert_eq!("3.05".parse::<Money>().unwrap(), eur(3, 5));
        assert_eq!("42".parse::<Money>().unwrap(), eur(42, 0));

        for bad in ["", ".5", "1.", "1.234", "-1", "+1", "1e3", "a.00"] {
            assert!(bad.parse::<Money>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn serde_uses_two_components_and_validates() {
        let json = serde_json::to_string(&eur(189, 99)).unwrap();
        assert_eq!(json, r#"{"euros":189,"cents":99}"#);

        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, eur(189, 99));

        assert!(serde_json::from_str::<Money>(r#"{"euros":1,"cents":100}"#).is_err());
        assert!(serde_json::from_str::<Money>(r#"{"euros":-1,"cents":0}"#).is_err());
    }
}
