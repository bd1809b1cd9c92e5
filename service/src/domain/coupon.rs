//! [`Coupon`] definitions.

use common::{unit, DateTime, DateTimeOf, Money, Percent};
use derive_more::{AsRef, Display, From, Into};
use serde::{Deserialize, Serialize};

/// Discount coupon redeemable once.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Coupon {
    /// [`Code`] of this [`Coupon`].
    pub code: Code,

    /// Discount granted by this [`Coupon`].
    pub discount: Percent,

    /// Minimum purchase amount this [`Coupon`] applies to.
    pub min_purchase: Money,

    /// [`DateTime`] after which this [`Coupon`] cannot be redeemed.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub expires_at: ExpirationDateTime,

    /// Indicator whether this [`Coupon`] has been redeemed already.
    pub used: bool,
}

impl Coupon {
    /// Checks whether this [`Coupon`] is expired at the provided moment.
    ///
    /// The exact [`Coupon::expires_at`] moment is not considered expired.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime) -> bool {
        now > self.expires_at.coerce()
    }

    /// Checks whether the provided `purchase` is below the
    /// [`Coupon::min_purchase`].
    #[must_use]
    pub fn is_below_minimum(&self, purchase: Money) -> bool {
        purchase < self.min_purchase
    }

    /// Calculates the price of the provided `purchase` after applying the
    /// [`Coupon::discount`].
    #[must_use]
    pub fn discounted(&self, purchase: Money) -> Money {
        purchase - self.discount.of(purchase)
    }
}

/// Code identifying a [`Coupon`].
///
/// Comparison is exact and case-sensitive.
#[derive(
    AsRef,
    Clone,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[as_ref(str, String)]
#[from(&str, String)]
#[serde(transparent)]
pub struct Code(String);

/// [`DateTime`] when a [`Coupon`] expires.
pub type ExpirationDateTime = DateTimeOf<(Coupon, unit::Expiration)>;

/// Price breakdown of a successful [`Coupon`] redemption.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Redemption {
    /// Purchase amount before the discount.
    pub original_price: Money,

    /// Discount applied.
    pub discount: Percent,

    /// Purchase amount after the discount.
    pub final_price: Money,
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{DateTime, Money, Percent};

    use super::{Code, Coupon};

    fn coupon() -> Coupon {
        Coupon {
            code: Code::from("SAVE20"),
            discount: Percent::new(20.0),
            min_purchase: Money::new(100.0),
            expires_at: DateTime::from_rfc3339("2024-03-01T12:00:00Z")
                .unwrap()
                .coerce(),
            used: false,
        }
    }

    #[test]
    fn expiration_is_exclusive() {
        let c = coupon();
        let at: DateTime = c.expires_at.coerce();

        assert!(!c.is_expired_at(at - Duration::from_secs(1)));
        assert!(!c.is_expired_at(at));
        assert!(c.is_expired_at(at + Duration::from_secs(1)));
    }

    #[test]
    fn minimum_is_inclusive() {
        let c = coupon();

        assert!(c.is_below_minimum(Money::new(99.99)));
        assert!(!c.is_below_minimum(Money::new(100.0)));
        assert!(!c.is_below_minimum(Money::new(100.01)));
    }

    #[test]
    fn discounted() {
        let c = coupon();

        assert_eq!(c.discounted(Money::new(200.0)), Money::new(160.0));
        assert_eq!(c.discounted(Money::ZERO), Money::ZERO);
    }

    #[test]
    fn code_is_case_sensitive() {
        assert_eq!(Code::from("SAVE20"), Code::from("SAVE20".to_owned()));
        assert_ne!(Code::from("SAVE20"), Code::from("save20"));
    }
}
