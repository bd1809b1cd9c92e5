//! [`Percent`]-related definitions.

use derive_more::Display;

use crate::Money;

/// Floating-point percentage.
///
/// Values outside of `0..=100` are representable and applied as is.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, PartialOrd)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(transparent)
)]
pub struct Percent(f64);

impl Percent {
    /// Creates a new [`Percent`] of the provided value.
    #[must_use]
    pub const fn new(val: f64) -> Self {
        Self(val)
    }

    /// Calculates this [`Percent`] share of the provided [`Money`] amount.
    #[must_use]
    pub fn of(self, money: Money) -> Money {
        Money::new(money.amount() * self.0 / 100.0)
    }
}
