//! In-memory database client definitions.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, OwnedMutexGuard};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{coupon, Coupon, User},
    infra::database::{self, memory},
};

/// Non-transactional in-memory database client.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// Ordered sequence of all the [`Coupon`]s.
    coupons: Arc<Mutex<Vec<Coupon>>>,

    /// Ordered sequence of all the [`User`]s.
    users: Arc<[User]>,
}

impl NonTx {
    /// Creates a new [`NonTx`] client owning the provided collections.
    pub(super) fn new(coupons: Vec<Coupon>, users: Vec<User>) -> Self {
        Self {
            coupons: Arc::new(Mutex::new(coupons)),
            users: users.into(),
        }
    }

    /// Locks the [`Coupon`]s of this [`NonTx`] client for reading.
    ///
    /// Waits for any [`Tx`] in progress to finish.
    pub async fn coupons(&self) -> MutexGuard<'_, Vec<Coupon>> {
        self.coupons.lock().await
    }

    /// Returns the [`User`]s of this [`NonTx`] client.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }
}

/// Transactional in-memory database client.
///
/// Holds exclusive access to the [`Coupon`]s from its creation until it's
/// committed or dropped. Updates are staged and become visible to other
/// clients only on [`Tx::commit()`].
#[derive(Clone, Debug)]
pub struct Tx {
    /// Inner state, [`None`] once committed.
    inner: Arc<Mutex<Option<Inner>>>,
}

/// Inner state of a [`Tx`] client.
#[derive(Debug)]
struct Inner {
    /// Exclusively locked [`Coupon`]s.
    coupons: OwnedMutexGuard<Vec<Coupon>>,

    /// [`Coupon`]s updated within the [`Tx`], not applied yet.
    staged: Vec<Coupon>,
}

impl Tx {
    /// Creates a new [`Tx`] client locking the [`Coupon`]s of the provided
    /// [`NonTx`] client.
    pub async fn from_non_tx(client: &NonTx) -> Self {
        let coupons = Arc::clone(&client.coupons).lock_owned().await;
        Self {
            inner: Arc::new(Mutex::new(Some(Inner {
                coupons,
                staged: Vec::new(),
            }))),
        }
    }

    /// Finds the [`Coupon`] with the provided [`coupon::Code`], taking
    /// staged updates into account.
    ///
    /// # Errors
    ///
    /// If this [`Tx`] is committed already.
    pub async fn find(
        &self,
        code: &coupon::Code,
    ) -> Result<Option<Coupon>, Traced<database::Error>> {
        let inner = self.inner.lock().await;
        let Inner { coupons, staged } = inner
            .as_ref()
            .ok_or_else(|| tracerr::new!(memory::Error::TxFinished))
            .map_err(tracerr::map_from)?;

        Ok(staged
            .iter()
            .find(|c| &c.code == code)
            .or_else(|| find(coupons, code))
            .cloned())
    }

    /// Stages the provided [`Coupon`] to replace the stored one with the same
    /// [`coupon::Code`] on commit.
    ///
    /// # Errors
    ///
    /// If:
    /// - this [`Tx`] is committed already;
    /// - there is no stored [`Coupon`] to replace.
    pub async fn stage(
        &self,
        coupon: Coupon,
    ) -> Result<(), Traced<database::Error>> {
        use memory::Error as E;

        let mut inner = self.inner.lock().await;
        let Inner { coupons, staged } = inner
            .as_mut()
            .ok_or_else(|| tracerr::new!(E::TxFinished))
            .map_err(tracerr::map_from)?;

        if find(coupons, &coupon.code).is_none() {
            return Err(tracerr::new!(E::CouponNotExists(coupon.code)))
                .map_err(tracerr::map_from);
        }

        if let Some(existing) = staged.iter_mut().find(|c| c.code == coupon.code)
        {
            *existing = coupon;
        } else {
            staged.push(coupon);
        }
        Ok(())
    }

    /// Applies all the staged updates and releases the [`Coupon`]s.
    ///
    /// # Errors
    ///
    /// If this [`Tx`] is committed already.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let Inner {
            mut coupons,
            staged,
        } = self
            .inner
            .lock()
            .await
            .take()
            .ok_or_else(|| tracerr::new!(memory::Error::TxFinished))
            .map_err(tracerr::map_from)?;

        let count = staged.len();
        for update in staged {
            // Presence is checked on staging and nothing removes `Coupon`s.
            if let Some(slot) = coupons.iter_mut().find(|c| c.code == update.code)
            {
                *slot = update;
            }
        }
        drop(coupons);

        log::debug!("committed {count} `Coupon` updates");
        Ok(())
    }
}

/// Finds the first [`Coupon`] with the provided [`coupon::Code`].
pub(super) fn find<'c>(
    coupons: &'c [Coupon],
    code: &coupon::Code,
) -> Option<&'c Coupon> {
    coupons.iter().find(|c| &c.code == code)
}
