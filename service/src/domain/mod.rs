//! Domain definitions.

pub mod coupon;
pub mod user;

pub use self::{coupon::Coupon, user::User};
