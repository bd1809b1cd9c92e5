//! In-memory [`Database`] implementation.
//!
//! Holds the [`Coupon`]s and [`User`]s for the whole process lifetime. No
//! data survives a restart.

pub mod client;
mod impls;

use std::collections::HashSet;

use derive_more::{Deref, Display, Error as StdError};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{coupon, Coupon, User},
    infra::database,
};
#[cfg(doc)]
use crate::infra::Database;

pub use self::client::{NonTx, Tx};

/// In-memory [`Database`] client.
#[derive(Clone, Debug, Deref)]
pub struct Memory<C = NonTx>(C);

impl Memory {
    /// Creates a new [`Memory`] client seeded with the provided [`Coupon`]s
    /// and [`User`]s.
    ///
    /// # Errors
    ///
    /// If the provided [`Coupon`]s contain duplicate [`coupon::Code`]s.
    pub fn new(
        coupons: Vec<Coupon>,
        users: Vec<User>,
    ) -> Result<Self, Traced<database::Error>> {
        let mut codes = HashSet::with_capacity(coupons.len());
        if let Some(dup) = coupons.iter().find(|c| !codes.insert(&c.code)) {
            return Err(tracerr::new!(database::Error::from(
                Error::DuplicateCouponCode(dup.code.clone()),
            )));
        }

        log::debug!(
            "seeded `Memory` with {} coupons and {} users",
            coupons.len(),
            users.len(),
        );

        Ok(Self(NonTx::new(coupons, users)))
    }
}

/// In-memory database [`Error`].
#[derive(Debug, Display, StdError)]
pub enum Error {
    /// [`Coupon`] with the same [`coupon::Code`] is seeded more than once.
    #[display("`Coupon(code: {_0})` is defined more than once")]
    DuplicateCouponCode(#[error(not(source))] coupon::Code),

    /// [`Coupon`] to be updated does not exist.
    #[display("`Coupon(code: {_0})` does not exist")]
    CouponNotExists(#[error(not(source))] coupon::Code),

    /// [`Tx`] is used after being committed.
    #[display("`Tx` is already committed")]
    TxFinished,
}

#[cfg(test)]
mod spec {
    use common::{DateTime, Money, Percent};

    use crate::{
        domain::{coupon, Coupon},
        infra::database,
    };

    use super::{Error, Memory};

    fn coupon(code: &str) -> Coupon {
        Coupon {
            code: coupon::Code::from(code),
            discount: Percent::new(10.0),
            min_purchase: Money::ZERO,
            expires_at: DateTime::now().coerce(),
            used: false,
        }
    }

    #[test]
    fn rejects_duplicate_codes() {
        let err = Memory::new(
            vec![coupon("A"), coupon("B"), coupon("A")],
            Vec::new(),
        )
        .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            database::Error::Memory(Error::DuplicateCouponCode(code))
                if *code == coupon::Code::from("A"),
        ));
    }

    #[test]
    fn accepts_codes_differing_in_case() {
        let memory = Memory::new(vec![coupon("a"), coupon("A")], Vec::new());
        assert!(memory.is_ok());
    }
}
