//! [`Query`] collection related to the multiple [`Coupon`]s.

use common::operations::By;

use crate::domain::Coupon;
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the [`Coupon`]s, used ones included.
pub type List = DatabaseQuery<By<Vec<Coupon>, ()>>;
