//! Fixed data the [`Service`] starts with.
//!
//! [`Service`]: crate::Service

use std::time::Duration;

use common::{DateTime, Money, Percent};

use crate::domain::{coupon, user, Coupon, User};

/// Single day.
const DAY: Duration = Duration::from_secs(60 * 60 * 24);

/// Returns the [`Coupon`]s available from the provided startup moment.
///
/// `SAVE20` lasts one calendar month, `FIRST10` a week, and `EXPIRED` has
/// already expired five days ago.
#[must_use]
pub fn coupons(now: DateTime) -> Vec<Coupon> {
    vec![
        Coupon {
            code: coupon::Code::from("SAVE20"),
            discount: Percent::new(20.0),
            min_purchase: Money::new(100.0),
            expires_at: now.saturating_add_months(1).coerce(),
            used: false,
        },
        Coupon {
            code: coupon::Code::from("FIRST10"),
            discount: Percent::new(10.0),
            min_purchase: Money::ZERO,
            expires_at: (now + DAY * 7).coerce(),
            used: false,
        },
        Coupon {
            code: coupon::Code::from("EXPIRED"),
            discount: Percent::new(50.0),
            min_purchase: Money::new(50.0),
            expires_at: (now - DAY * 5).coerce(),
            used: false,
        },
    ]
}

/// Returns the registered [`User`]s.
#[must_use]
pub fn users() -> Vec<User> {
    [("Alice", 25), ("Bob", 30), ("Charlie", 22)]
        .into_iter()
        .enumerate()
        .map(|(id, (name, age))| User {
            id: user::Id::from(id),
            name: user::Name::from(name),
            age,
        })
        .collect()
}
