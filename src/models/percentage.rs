//! Split percentages stored as hundredths of a percent

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Add;

use super::money::{round_div, Money};

/// A percentage with two decimal places of precision (`70` is 7000)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Percentage(i64);

impl Percentage {
    pub const HUNDRED: Percentage = Percentage(10_000);
    pub const HALF: Percentage = Percentage(5_000);

    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    pub const fn whole(percent: i64) -> Self {
        Self(percent * 100)
    }

    pub const fn hundredths(&self) -> i64 {
        self.0
    }

    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Some(Self((value * 100.0).round() as i64))
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// This percentage of `total`, rounded half away from zero to the cent
    pub fn share_of(&self, total: Money) -> Money {
        Money::from_cents(round_div(total.cents() as i128 * self.0 as i128, 10_000) as i64)
    }

    /// `part` as a percentage of `whole`; zero when `whole` is zero
    pub fn ratio(part: Money, whole: Money) -> Self {
        if whole.is_zero() {
            return Self(0);
        }
        Self(round_div(part.cents() as i128 * 10_000, whole.cents() as i128) as i64)
    }

    /// Whether `self` is within one hundredth of a percent of `other`
    pub fn approx_eq(&self, other: Percentage) -> bool {
        (self.0 - other.0).abs() <= 1
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().trim_end_matches('%').trim();
        s.parse::<f64>().ok().and_then(Self::from_f64)
    }
}

impl Add for Percentage {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl std::iter::Sum for Percentage {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Percentage::default(), |acc, p| acc + p)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        if abs % 100 == 0 {
            write!(f, "{}{}%", sign, abs / 100)
        } else {
            write!(f, "{}{}.{:02}%", sign, abs / 100, abs % 100)
        }
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 100 == 0 {
            serializer.serialize_i64(self.0 / 100)
        } else {
            serializer.serialize_f64(self.as_f64())
        }
    }
}

struct PercentageVisitor;

impl<'de> Visitor<'de> for PercentageVisitor {
    type Value = Percentage;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a percentage as a number or string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Percentage, E> {
        v.checked_mul(100)
            .map(Percentage)
            .ok_or_else(|| E::custom(format!("percentage out of range: {}", v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Percentage, E> {
        i64::try_from(v)
            .ok()
            .and_then(|v| v.checked_mul(100))
            .map(Percentage)
            .ok_or_else(|| E::custom(format!("percentage out of range: {}", v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Percentage, E> {
        Percentage::from_f64(v).ok_or_else(|| E::custom(format!("invalid percentage: {}", v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Percentage, E> {
        Percentage::parse(v).ok_or_else(|| E::custom(format!("invalid percentage: {}", v)))
    }
}

impl<'de> Deserialize<'de> for Percentage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PercentageVisitor)
    }
}
