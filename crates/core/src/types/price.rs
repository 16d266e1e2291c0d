//! Type-safe price representation using decimal arithmetic.
//!
//! Prices on the storefront are quoted in "synapses", the store's only
//! currency. The remote service sends them as plain JSON numbers and uses
//! `null` for items that cannot be bought.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Label shown for an item without a price.
pub const PRICELESS: &str = "Priceless";

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative amount of synapses.
///
/// Serializes as a JSON number: whole amounts as integers, fractional
/// amounts as floats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of synapses.
    #[must_use]
    pub fn from_units(units: u64) -> Self {
        Self(Decimal::from(units))
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format an optional price for display.
    ///
    /// ```
    /// use web_larek_core::Price;
    ///
    /// assert_eq!(Price::display_optional(Some(Price::from_units(750))), "750 synapses");
    /// assert_eq!(Price::display_optional(None), "Priceless");
    /// ```
    #[must_use]
    pub fn display_optional(price: Option<Self>) -> String {
        price.map_or_else(|| PRICELESS.to_string(), |p| p.to_string())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let amount = self.0.normalize();
        if amount == Decimal::ONE {
            write!(f, "{amount} synapse")
        } else {
            write!(f, "{amount} synapses")
        }
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Whole amounts go out as JSON integers, which is what the service sends.
        let amount = self.0.normalize();
        if amount.scale() == 0
            && let Ok(units) = i64::try_from(amount)
        {
            return serializer.serialize_i64(units);
        }
        match amount.to_f64() {
            Some(value) => serializer.serialize_f64(value),
            None => Serialize::serialize(&amount, serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}
