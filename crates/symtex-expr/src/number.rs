//! Exact numeric literals.

use std::fmt;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::{Serialize, Serializer};

/// Largest decimal exponent a scientific literal may carry. The value is
/// built exactly, so the exponent bounds the size of the integer.
pub const MAX_EXPONENT: u64 = 4096;

/// Why a numeric literal was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    Malformed,
    ExponentTooLarge { exponent: String },
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralError::Malformed => write!(f, "Malformed number literal"),
            LiteralError::ExponentTooLarge { exponent } => write!(
                f,
                "Exponent {exponent} is out of range (at most {MAX_EXPONENT} in magnitude)"
            ),
        }
    }
}

impl std::error::Error for LiteralError {}

/// An exact rational number.
///
/// Decimal and scientific literals are kept exactly, so `0.1` is the rational
/// `1/10` and prints back as `0.1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Number(BigRational);

impl Number {
    pub fn from_integer(value: i64) -> Self {
        Number(BigRational::from_integer(BigInt::from(value)))
    }

    pub fn from_ratio(numer: i64, denom: i64) -> Self {
        Number(BigRational::new(BigInt::from(numer), BigInt::from(denom)))
    }

    pub fn from_rational(value: BigRational) -> Self {
        Number(value)
    }

    pub fn zero() -> Self {
        Number(BigRational::zero())
    }

    pub fn one() -> Self {
        Number(BigRational::one())
    }

    /// Parse a numeric literal: `12`, `3.25`, `.5`, `1.5E-3`, with an optional sign.
    ///
    /// Grouping separators must already be stripped.
    pub fn parse_literal(text: &str) -> Option<Number> {
        Number::try_parse_literal(text).ok()
    }

    /// [`Number::parse_literal`] that says why a literal was rejected.
    pub fn try_parse_literal(text: &str) -> Result<Number, LiteralError> {
        let text = text.trim();
        let (negative, body) = match text.as_bytes().first().ok_or(LiteralError::Malformed)? {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };

        let (mantissa, exponent) = match body.find(['E', 'e']) {
            Some(idx) => (&body[..idx], Some(&body[idx + 1..])),
            None => (body, None),
        };

        let (int_part, frac_part) = match mantissa.find('.') {
            Some(idx) => (&mantissa[..idx], &mantissa[idx + 1..]),
            None => (mantissa, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(LiteralError::Malformed);
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(LiteralError::Malformed);
        }

        let digits = format!("{int_part}{frac_part}");
        let numer: BigInt = if digits.is_empty() {
            BigInt::zero()
        } else {
            digits.parse().map_err(|_| LiteralError::Malformed)?
        };
        let mut value = BigRational::new(numer, pow10(frac_part.len()));

        if let Some(exp) = exponent {
            let magnitude = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            if magnitude.is_empty() || !magnitude.bytes().all(|b| b.is_ascii_digit()) {
                return Err(LiteralError::Malformed);
            }
            // Digit strings too long for i64 are out of range as well.
            let shift = exp.parse::<i64>().unwrap_or(i64::MAX);
            if shift.unsigned_abs() > MAX_EXPONENT {
                return Err(LiteralError::ExponentTooLarge {
                    exponent: exp.to_string(),
                });
            }
            let scale = BigRational::from_integer(pow10(shift.unsigned_abs() as usize));
            if shift >= 0 {
                value *= scale;
            } else {
                value /= scale;
            }
        }

        if negative {
            value = -value;
        }
        Ok(Number(value))
    }

    pub fn value(&self) -> &BigRational {
        &self.0
    }

    pub fn into_value(self) -> BigRational {
        self.0
    }

    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn is_minus_one(&self) -> bool {
        self.0 == -BigRational::one()
    }

    /// The value as an `i64`, when it is an integer that fits.
    pub fn to_i64(&self) -> Option<i64> {
        if self.0.is_integer() {
            self.0.to_integer().to_i64()
        } else {
            None
        }
    }

    /// The value as a non-negative index, when it is a small integer.
    pub fn to_usize(&self) -> Option<usize> {
        self.to_i64().and_then(|v| usize::try_from(v).ok())
    }

    pub fn neg(&self) -> Number {
        Number(-self.0.clone())
    }

    pub fn abs(&self) -> Number {
        Number(self.0.abs())
    }

    /// `1 / self`, or `None` for zero.
    pub fn recip(&self) -> Option<Number> {
        if self.0.is_zero() {
            None
        } else {
            Some(Number(self.0.recip()))
        }
    }

    pub fn add(&self, other: &Number) -> Number {
        Number(&self.0 + &other.0)
    }

    pub fn mul(&self, other: &Number) -> Number {
        Number(&self.0 * &other.0)
    }

    /// Integer power; negative exponents of zero yield `None`.
    pub fn powi(&self, exp: i32) -> Option<Number> {
        if exp < 0 && self.0.is_zero() {
            return None;
        }
        Some(Number(self.0.pow(exp)))
    }
}

/// Greatest common divisor of rationals: `gcd(a/b, c/d) = gcd(a, c) / lcm(b, d)`.
pub fn gcd_all(values: &[Number]) -> Option<Number> {
    let mut iter = values.iter();
    let first = iter.next()?.0.abs();
    let out = iter.fold(first, |acc, n| {
        let v = n.0.abs();
        BigRational::new(
            acc.numer().gcd(v.numer()),
            acc.denom().lcm(v.denom()),
        )
    });
    Some(Number(out))
}

/// Least common multiple of rationals: `lcm(a/b, c/d) = lcm(a, c) / gcd(b, d)`.
pub fn lcm_all(values: &[Number]) -> Option<Number> {
    let mut iter = values.iter();
    let first = iter.next()?.0.abs();
    let out = iter.fold(first, |acc, n| {
        let v = n.0.abs();
        if acc.is_zero() || v.is_zero() {
            return BigRational::zero();
        }
        BigRational::new(
            acc.numer().lcm(v.numer()),
            acc.denom().gcd(v.denom()),
        )
    });
    Some(Number(out))
}

fn pow10(n: usize) -> BigInt {
    num_traits::pow(BigInt::from(10u8), n)
}

/// Decimal expansion for denominators of the form `2^a * 5^b`.
fn terminating_decimal(value: &BigRational) -> Option<String> {
    let mut denom = value.denom().clone();
    let two = BigInt::from(2u8);
    let five = BigInt::from(5u8);
    let (mut twos, mut fives) = (0usize, 0usize);
    while denom.is_even() {
        denom /= &two;
        twos += 1;
    }
    while (&denom % &five).is_zero() {
        denom /= &five;
        fives += 1;
    }
    if !denom.is_one() {
        return None;
    }

    let places = twos.max(fives);
    let scaled = (value.numer().abs() * pow10(places)) / value.denom();
    let mut digits = scaled.to_string();
    if digits.len() <= places {
        digits = format!("{}{}", "0".repeat(places + 1 - digits.len()), digits);
    }
    let split = digits.len() - places;
    let sign = if value.is_negative() { "-" } else { "" };
    Some(format!("{sign}{}.{}", &digits[..split], &digits[split..]))
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_integer() {
            return write!(f, "{}", self.0.numer());
        }
        match terminating_decimal(&self.0) {
            Some(text) => f.write_str(&text),
            None => write!(f, "{}/{}", self.0.numer(), self.0.denom()),
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::from_integer(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_integer_literal() {
        let n = Number::parse_literal("0042").unwrap();
        assert_eq!(n, Number::from_integer(42));
        assert_eq!(n.to_string(), "42");
    }

    #[test]
    fn test_decimal_literal_is_exact() {
        let n = Number::parse_literal("0.1").unwrap();
        assert_eq!(n, Number::from_ratio(1, 10));
        assert_eq!(n.to_string(), "0.1");
        assert_eq!(Number::parse_literal(".5").unwrap().to_string(), "0.5");
    }

    #[test]
    fn test_scientific_literal() {
        let n = Number::parse_literal("1.5E-3").unwrap();
        assert_eq!(n, Number::from_ratio(3, 2000));
        assert_eq!(n.to_string(), "0.0015");
        assert_eq!(
            Number::parse_literal("2E3").unwrap(),
            Number::from_integer(2000)
        );
    }

    #[test]
    fn test_huge_exponents_are_rejected() {
        assert!(Number::parse_literal("1E4096").is_some());
        assert_eq!(
            Number::try_parse_literal("1E2000000000"),
            Err(LiteralError::ExponentTooLarge {
                exponent: "2000000000".to_string()
            })
        );
        assert_eq!(
            Number::try_parse_literal("1E-99999999999999999999"),
            Err(LiteralError::ExponentTooLarge {
                exponent: "-99999999999999999999".to_string()
            })
        );
        assert_eq!(Number::try_parse_literal("1E"), Err(LiteralError::Malformed));
    }

    #[test]
    fn test_printed_form_reparses_to_same_value() {
        for text in ["7", "-3", "12.125", "0.0005", "1/3", "-2/7"] {
            let n = if let Some((p, q)) = text.split_once('/') {
                Number::from_ratio(p.parse().unwrap(), q.parse().unwrap())
            } else {
                Number::parse_literal(text).unwrap()
            };
            assert_eq!(n.to_string(), text);
        }
    }

    #[test]
    fn test_invalid_literals() {
        assert!(Number::parse_literal("").is_none());
        assert!(Number::parse_literal(".").is_none());
        assert!(Number::parse_literal("1.2.3").is_none());
        assert!(Number::parse_literal("abc").is_none());
    }

    #[test]
    fn test_gcd_and_lcm() {
        let values = [Number::from_integer(12), Number::from_integer(18)];
        assert_eq!(gcd_all(&values), Some(Number::from_integer(6)));
        assert_eq!(lcm_all(&values), Some(Number::from_integer(36)));

        let halves = [Number::from_ratio(1, 2), Number::from_ratio(1, 3)];
        assert_eq!(gcd_all(&halves), Some(Number::from_ratio(1, 6)));
        assert_eq!(lcm_all(&halves), Some(Number::from_integer(1)));
    }
}
