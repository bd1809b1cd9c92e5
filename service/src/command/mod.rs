//! [`Command`] definition.

pub mod redeem_coupon;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::redeem_coupon::RedeemCoupon;
