//! Dollar amounts for display.
//!
//! Records carry money as unsigned minor units (cents). `Dollars` wraps
//! `rust_decimal::Decimal` at a fixed scale of 2 so reports never go through
//! floating point.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;

/// A dollar amount with exactly 2 decimal places.
///
/// # Examples
///
/// ```
/// use ach_engine::Dollars;
///
/// assert_eq!(Dollars::from_cents(10500).to_string(), "105.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Dollars(Decimal);

impl Dollars {
    pub const SCALE: u32 = 2;

    pub fn from_cents(cents: u64) -> Self {
        Dollars(Decimal::from_i128_with_scale(i128::from(cents), Self::SCALE))
    }
}

impl fmt::Display for Dollars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Dollars {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
