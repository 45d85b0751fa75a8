//! Mixed exact-integer / floating numeric model.
//!
//! Metric values arrive from upstream collectors either as 64-bit integers
//! (counters, byte sizes) or as floating values (ratios, averages). Folding
//! both into `f64` silently loses precision above 2^53, so every datapoint is
//! a [`Number`] that remembers which representation it holds and promotes to
//! floating only when an operand forces it.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::iter::{Product, Sum};
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

/// Largest integer magnitude at which every `i64` is exactly an `f64`.
const MAX_EXACT_F64_INT: i64 = 1 << 53;

/// 2^63, the first `f64` above `i64::MAX`.
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

/// A datapoint value: either an exact 64-bit integer or a 64-bit float.
///
/// Arithmetic between two integers stays integral (promoting to floating
/// only on overflow); any floating operand makes the result floating.
/// Equality and ordering are numeric, so `Int(5) == Float(5.0)`.
///
/// # Examples
///
/// ```
/// use vigil_common::number::Number;
///
/// let n = Number::parse_constant("5").unwrap();
/// assert!(n.is_integer());
/// assert!((n + Number::Float(0.5)).is_float());
/// assert_eq!(Number::Int(5), Number::Float(5.0));
/// assert!(Number::Int(3) < Number::Float(3.25));
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub const ZERO: Number = Number::Int(0);
    pub const ONE: Number = Number::Int(1);

    /// Parses a transform constant: exact-integer first, then floating.
    ///
    /// Surrounding whitespace is ignored. Non-finite literals (`NaN`, `inf`)
    /// are rejected so that every parsed constant is comparable.
    pub fn parse_constant(text: &str) -> Result<Number> {
        let trimmed = text.trim();
        if let Ok(value) = trimmed.parse::<i64>() {
            return Ok(Number::Int(value));
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Number::Float(value)),
            _ => Err(EngineError::Parse(text.to_string())),
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Int(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    pub fn is_zero(&self) -> bool {
        match *self {
            Number::Int(v) => v == 0,
            Number::Float(v) => v == 0.0,
        }
    }

    /// Lossy conversion, for arithmetic that has already promoted to floating.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }

    /// The floating value, only if this number is exactly representable as one.
    pub fn to_exact_f64(&self) -> Option<f64> {
        match *self {
            Number::Int(v) if (-MAX_EXACT_F64_INT..=MAX_EXACT_F64_INT).contains(&v) => {
                Some(v as f64)
            }
            Number::Int(_) => None,
            Number::Float(v) => Some(v),
        }
    }

    /// Divides by `divisor`.
    ///
    /// Two exact-integers that divide evenly give an exact-integer; every
    /// other combination gives a floating result. A zero divisor is an
    /// error rather than an infinity.
    pub fn divide(self, divisor: Number) -> Result<Number> {
        if divisor.is_zero() {
            return Err(EngineError::invalid_argument(format!(
                "cannot divide {self} by zero"
            )));
        }
        match (self, divisor) {
            // checked_rem is None for i64::MIN / -1, which then falls through to floating
            (Number::Int(a), Number::Int(b)) if a.checked_rem(b) == Some(0) => {
                Ok(Number::Int(a / b))
            }
            (a, b) => Ok(Number::Float(a.as_f64() / b.as_f64())),
        }
    }

    /// The smaller of the two, keeping the operand's own representation.
    pub fn min(self, other: Number) -> Number {
        if other < self { other } else { self }
    }

    /// The larger of the two, keeping the operand's own representation.
    pub fn max(self, other: Number) -> Number {
        if other > self { other } else { self }
    }
}

fn compare_int_float(int: i64, float: f64) -> Option<Ordering> {
    if float.is_nan() {
        return None;
    }
    if float >= TWO_POW_63 {
        return Some(Ordering::Less);
    }
    if float < -TWO_POW_63 {
        return Some(Ordering::Greater);
    }
    let whole = float.trunc();
    // In range, so the cast is exact
    match int.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(float - whole)),
        unequal => Some(unequal),
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (*self, *other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (Number::Float(a), Number::Float(b)) => a.partial_cmp(&b),
            (Number::Int(a), Number::Float(b)) => compare_int_float(a, b),
            (Number::Float(a), Number::Int(b)) => compare_int_float(b, a).map(Ordering::reverse),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl Add for Number {
    type Output = Number;

    fn add(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_add(b)
                .map_or(Number::Float(a as f64 + b as f64), Number::Int),
            (a, b) => Number::Float(a.as_f64() + b.as_f64()),
        }
    }
}

impl Sub for Number {
    type Output = Number;

    fn sub(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_sub(b)
                .map_or(Number::Float(a as f64 - b as f64), Number::Int),
            (a, b) => Number::Float(a.as_f64() - b.as_f64()),
        }
    }
}

impl Mul for Number {
    type Output = Number;

    fn mul(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_mul(b)
                .map_or(Number::Float(a as f64 * b as f64), Number::Int),
            (a, b) => Number::Float(a.as_f64() * b.as_f64()),
        }
    }
}

impl Sum for Number {
    fn sum<I: Iterator<Item = Number>>(iter: I) -> Number {
        iter.fold(Number::ZERO, |acc, value| acc + value)
    }
}

impl<'a> Sum<&'a Number> for Number {
    fn sum<I: Iterator<Item = &'a Number>>(iter: I) -> Number {
        iter.copied().sum()
    }
}

impl Product for Number {
    fn product<I: Iterator<Item = Number>>(iter: I) -> Number {
        iter.fold(Number::ONE, |acc, value| acc * value)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Int(value)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Int(value.into())
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl FromStr for Number {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Number::parse_constant(s)
    }
}

/// Renders in a form `parse_constant` reads back with the same
/// representation: `2` for an integer, `2.0` for a float.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{v}"),
            Number::Float(v) => write!(f, "{v:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_arithmetic_stays_exact() {
        let a = Number::Int(7);
        let b = Number::Int(3);
        assert!(matches!(a + b, Number::Int(10)));
        assert!(matches!(a - b, Number::Int(4)));
        assert!(matches!(a * b, Number::Int(21)));
    }

    #[test]
    fn floating_operand_promotes_result() {
        let a = Number::Int(7);
        let b = Number::Float(0.5);
        assert!((a + b).is_float());
        assert!((a - b).is_float());
        assert!((b * a).is_float());
        assert_eq!(a * b, Number::Float(3.5));
    }

    #[test]
    fn overflow_promotes_instead_of_wrapping() {
        let big = Number::Int(i64::MAX);
        let sum = big + Number::Int(1);
        assert!(sum.is_float());
        assert!(sum > big);
        assert!((Number::Int(i64::MIN) - Number::Int(1)).is_float());
        assert!((big * Number::Int(2)).is_float());
    }

    #[test]
    fn divide_keeps_even_integer_division_exact() {
        assert!(matches!(Number::Int(6).divide(Number::Int(3)), Ok(Number::Int(2))));
        let uneven = Number::Int(7).divide(Number::Int(2)).unwrap();
        assert!(uneven.is_float());
        assert_eq!(uneven, Number::Float(3.5));
        assert!(Number::Float(6.0).divide(Number::Int(3)).unwrap().is_float());
        assert!(Number::Int(i64::MIN).divide(Number::Int(-1)).unwrap().is_float());
    }

    #[test]
    fn divide_by_zero_is_rejected() {
        assert!(matches!(
            Number::Int(1).divide(Number::Int(0)),
            Err(EngineError::InvalidArgument(_))
        ));
        assert!(Number::Float(1.0).divide(Number::Float(0.0)).is_err());
    }

    #[test]
    fn parse_constant_prefers_integer() {
        assert!(matches!(Number::parse_constant("5"), Ok(Number::Int(5))));
        assert!(matches!(Number::parse_constant(" -12 "), Ok(Number::Int(-12))));
        let float = Number::parse_constant("5.0").unwrap();
        assert!(float.is_float());
        assert_eq!(float, Number::Float(5.0));
        assert!(Number::parse_constant("1e3").unwrap().is_float());
    }

    #[test]
    fn parse_constant_rejects_garbage() {
        assert_eq!(
            Number::parse_constant("abc"),
            Err(EngineError::Parse("abc".to_string()))
        );
        assert!(Number::parse_constant("").is_err());
        assert!(Number::parse_constant("NaN").is_err());
        assert!(Number::parse_constant("inf").is_err());
    }

    #[test]
    fn comparison_across_representations_is_exact() {
        assert_eq!(Number::Int(5), Number::Float(5.0));
        assert!(Number::Int(3) < Number::Float(3.5));
        assert!(Number::Float(-2.5) < Number::Int(-2));
        assert!(Number::Int(-2) > Number::Float(-2.5));
        assert!(Number::Float(2.0) >= Number::Int(2));
        assert!(Number::Int(2) <= Number::Float(2.0));
        assert_ne!(Number::Int(2), Number::Float(2.5));

        // 2^53 + 1 is not an f64; rounding it first would make these equal
        let odd = Number::Int(MAX_EXACT_F64_INT + 1);
        let rounded = Number::Float(MAX_EXACT_F64_INT as f64);
        assert!(odd > rounded);
        assert!(Number::Int(i64::MAX) < Number::Float(TWO_POW_63));
    }

    #[test]
    fn nan_never_compares() {
        let nan = Number::Float(f64::NAN);
        assert!(!(nan < Number::Int(1)));
        assert!(!(nan >= Number::Int(1)));
        assert_ne!(nan, nan);
    }

    #[test]
    fn min_and_max_keep_representation() {
        let min = Number::Int(2).min(Number::Float(2.5));
        assert!(matches!(min, Number::Int(2)));
        let max = Number::Int(2).max(Number::Float(2.5));
        assert!(matches!(max, Number::Float(_)));
    }

    #[test]
    fn sum_of_integers_is_integer() {
        let values = [Number::Int(1), Number::Int(2), Number::Int(3)];
        assert!(matches!(values.iter().sum::<Number>(), Number::Int(6)));
        let mixed = [Number::Int(1), Number::Int(2), Number::Float(3.0)];
        let total: Number = mixed.iter().sum();
        assert!(total.is_float());
        assert_eq!(total, Number::Int(6));
        assert!(matches!(std::iter::empty::<Number>().sum::<Number>(), Number::Int(0)));
    }

    #[test]
    fn display_round_trips_representation() {
        for n in [Number::Int(2), Number::Float(2.0), Number::Float(0.25), Number::Int(-9)] {
            let parsed = Number::parse_constant(&n.to_string()).unwrap();
            assert_eq!(parsed.is_integer(), n.is_integer());
            assert_eq!(parsed, n);
        }
    }

    #[test]
    fn exact_f64_rejects_large_integers() {
        assert_eq!(Number::Int(42).to_exact_f64(), Some(42.0));
        assert_eq!(Number::Int(MAX_EXACT_F64_INT + 1).to_exact_f64(), None);
        assert_eq!(Number::Float(1.5).to_exact_f64(), Some(1.5));
    }

    #[test]
    fn serde_is_untagged() {
        let int: Number = serde_json::from_str("5").unwrap();
        assert!(int.is_integer());
        let float: Number = serde_json::from_str("5.0").unwrap();
        assert!(float.is_float());
        assert_eq!(serde_json::to_string(&Number::Int(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&Number::Float(7.5)).unwrap(), "7.5");
    }
}
