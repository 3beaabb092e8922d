//! Exact rational amounts
//!
//! Every price, volume, fill and fee exchanged with the API is an [`Amount`].
//! Values are kept as reduced fractions of arbitrary magnitude, so the sum of
//! an order's fills always matches the ordered amount to the last digit and
//! `"1.50"` is the same value as `"1.5"`.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use rust_decimal::Decimal;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Largest accepted decimal exponent in scientific notation (`1e-8`).
const MAX_EXPONENT: u64 = 4096;

/// Map key serde_json uses to hand over a number's literal text when built
/// with `arbitrary_precision`.
const JSON_NUMBER_TOKEN: &str = "$serde_json::private::Number";

/// Exact arbitrary-precision rational number for financial values
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount {
    value: BigRational,
}

/// Amount parsing and conversion errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Empty amount")]
    Empty,
    #[error("Invalid amount: {0}")]
    InvalidValue(String),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Exponent out of range (max: {MAX_EXPONENT})")]
    ExponentOutOfRange,
    #[error("Amount {0} is not representable as a decimal")]
    NotRepresentable(String),
}

impl Amount {
    /// Zero value
    pub fn zero() -> Self {
        Self {
            value: BigRational::zero(),
        }
    }

    /// One value
    pub fn one() -> Self {
        Self {
            value: BigRational::one(),
        }
    }

    /// Create an amount from an integer
    pub fn from_i64(value: i64) -> Self {
        Self {
            value: BigRational::from_integer(BigInt::from(value)),
        }
    }

    /// Create an amount from a numerator/denominator pair
    pub fn from_fraction(numer: i64, denom: i64) -> Result<Self, AmountError> {
        if denom == 0 {
            return Err(AmountError::DivisionByZero);
        }
        Ok(Self {
            value: BigRational::new(BigInt::from(numer), BigInt::from(denom)),
        })
    }

    /// Create an amount from a decimal (`"0.0015"`, `"-2"`, `"1e-8"`) or a
    /// fraction (`"1/3"`) string
    pub fn from_str_exact(s: &str) -> Result<Self, AmountError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AmountError::Empty);
        }

        if let Some((numer, denom)) = s.split_once('/') {
            let numer = parse_integer(numer, s)?;
            let denom = parse_integer(denom, s)?;
            if denom.is_zero() {
                return Err(AmountError::DivisionByZero);
            }
            return Ok(Self {
                value: BigRational::new(numer, denom),
            });
        }

        parse_decimal(s).map(|value| Self { value })
    }

    /// Numerator of the reduced fraction
    pub fn numer(&self) -> &BigInt {
        self.value.numer()
    }

    /// Denominator of the reduced fraction, always positive
    pub fn denom(&self) -> &BigInt {
        self.value.denom()
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Has a finite decimal expansion, i.e. renders without a `/`
    pub fn is_terminating(&self) -> bool {
        decimal_scale(self.value.denom()).is_some()
    }

    /// Strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.value.is_positive()
    }

    /// Strictly less than zero
    pub fn is_negative(&self) -> bool {
        self.value.is_negative()
    }

    pub fn is_less_or_equal(&self, other: &Amount) -> bool {
        self <= other
    }

    pub fn is_greater_than(&self, other: &Amount) -> bool {
        self > other
    }

    pub fn abs(&self) -> Self {
        Self {
            value: self.value.abs(),
        }
    }

    /// Exact division, `None` when dividing by zero
    pub fn checked_div(&self, rhs: &Amount) -> Option<Amount> {
        if rhs.is_zero() {
            return None;
        }
        Some(Self {
            value: &self.value / &rhs.value,
        })
    }

    /// Convert to a `Decimal`, failing instead of rounding
    pub fn to_decimal(&self) -> Result<Decimal, AmountError> {
        let rendered = self.to_string();
        if rendered.contains('/') {
            return Err(AmountError::NotRepresentable(rendered));
        }
        Decimal::from_str_exact(&rendered).map_err(|_| AmountError::NotRepresentable(rendered))
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

fn parse_integer(digits: &str, original: &str) -> Result<BigInt, AmountError> {
    let digits = digits.trim();
    let unsigned = digits.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(digits);
    if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::InvalidValue(original.to_string()));
    }
    BigInt::from_str(digits).map_err(|_| AmountError::InvalidValue(original.to_string()))
}

fn parse_decimal(s: &str) -> Result<BigRational, AmountError> {
    let invalid = || AmountError::InvalidValue(s.to_string());

    let (mantissa, exponent) = match s.find(|c: char| c == 'e' || c == 'E') {
        Some(idx) => {
            let exponent: i64 = s[idx + 1..].parse().map_err(|_| invalid())?;
            if exponent.unsigned_abs() > MAX_EXPONENT {
                return Err(AmountError::ExponentOutOfRange);
            }
            (&s[..idx], exponent)
        }
        None => (s, 0),
    };

    let (negative, unsigned) = match mantissa.as_bytes().first() {
        Some(b'-') => (true, &mantissa[1..]),
        Some(b'+') => (false, &mantissa[1..]),
        _ => (false, mantissa),
    };

    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let mut numer = BigInt::parse_bytes(format!("{int_part}{frac_part}").as_bytes(), 10)
        .ok_or_else(invalid)?;
    if negative {
        numer = -numer;
    }

    let scale = frac_part.len() as i64 - exponent;
    let ten = BigInt::from(10u32);
    if scale >= 0 {
        let denom = num_traits::pow(ten, scale as usize);
        Ok(BigRational::new(numer, denom))
    } else {
        let factor = num_traits::pow(ten, (-scale) as usize);
        Ok(BigRational::from_integer(numer * factor))
    }
}

/// For a denominator of the form 2^a·5^b returns `(scale, factor)` such that
/// `denom * factor == 10^scale`.
fn decimal_scale(denom: &BigInt) -> Option<(usize, BigInt)> {
    let two = BigInt::from(2u32);
    let five = BigInt::from(5u32);

    let mut rest = denom.clone();
    let mut twos = 0usize;
    let mut fives = 0usize;
    while rest.is_even() && !rest.is_zero() {
        rest /= &two;
        twos += 1;
    }
    while (&rest % &five).is_zero() && !rest.is_zero() {
        rest /= &five;
        fives += 1;
    }
    if !rest.is_one() {
        return None;
    }

    let scale = twos.max(fives);
    let factor = num_traits::pow(two, scale - twos) * num_traits::pow(five, scale - fives);
    Some((scale, factor))
}

impl Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let numer = self.value.numer();
        let denom = self.value.denom();

        if denom.is_one() {
            return write!(f, "{numer}");
        }

        let Some((scale, factor)) = decimal_scale(denom) else {
            return write!(f, "{numer}/{denom}");
        };

        let digits = (numer.abs() * factor).to_string();
        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale - digits.len() + 1), digits)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        let sign = if numer.is_negative() { "-" } else { "" };

        write!(f, "{sign}{int_part}.{}", frac_part.trim_end_matches('0'))
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_exact(s)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        let numer = BigInt::from(value.mantissa());
        let denom = num_traits::pow(BigInt::from(10u32), value.scale() as usize);
        Self {
            value: BigRational::new(numer, denom),
        }
    }
}

impl TryFrom<&Amount> for Decimal {
    type Error = AmountError;

    fn try_from(amount: &Amount) -> Result<Self, Self::Error> {
        amount.to_decimal()
    }
}

// Arithmetic implementations
impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount {
            value: self.value + rhs.value,
        }
    }
}

impl<'a> Add<&'a Amount> for &'a Amount {
    type Output = Amount;

    fn add(self, rhs: &'a Amount) -> Self::Output {
        Amount {
            value: &self.value + &rhs.value,
        }
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount {
            value: self.value - rhs.value,
        }
    }
}

impl<'a> Sub<&'a Amount> for &'a Amount {
    type Output = Amount;

    fn sub(self, rhs: &'a Amount) -> Self::Output {
        Amount {
            value: &self.value - &rhs.value,
        }
    }
}

impl Mul for Amount {
    type Output = Amount;

    fn mul(self, rhs: Self) -> Self::Output {
        Amount {
            value: self.value * rhs.value,
        }
    }
}

impl<'a> Mul<&'a Amount> for &'a Amount {
    type Output = Amount;

    fn mul(self, rhs: &'a Amount) -> Self::Output {
        Amount {
            value: &self.value * &rhs.value,
        }
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        Amount { value: -self.value }
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.value += rhs.value;
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        self.value -= rhs.value;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.fold(Amount::zero(), |acc, x| &acc + x)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::from_str_exact(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        Ok(Amount::from_i64(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount {
            value: BigRational::from_integer(BigInt::from(v)),
        })
    }

    // serde_json only hands out an f64 when it renders back to the literal
    // on the wire; everything else arrives through `visit_map`.
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        if !v.is_finite() {
            return Err(E::custom(AmountError::InvalidValue(v.to_string())));
        }
        Amount::from_str_exact(&v.to_string()).map_err(E::custom)
    }

    /// Exact JSON number text
    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Amount, A::Error> {
        match map.next_key::<String>()? {
            Some(key) if key == JSON_NUMBER_TOKEN => {
                let literal: String = map.next_value()?;
                Amount::from_str_exact(&literal).map_err(de::Error::custom)
            }
            _ => Err(de::Error::invalid_type(de::Unexpected::Map, &self)),
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

/// Convenience macro for creating Amount values from string literals
#[macro_export]
macro_rules! amount {
    ($value:literal) => {
        $crate::amount::Amount::from_str_exact($value).expect("invalid amount literal")
    };
}
