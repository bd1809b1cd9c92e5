//! [`Command`] for redeeming a [`Coupon`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        coupon::{self, Redemption},
        Coupon,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for redeeming a [`Coupon`] against a purchase.
#[derive(Clone, Debug)]
pub struct RedeemCoupon {
    /// [`coupon::Code`] of the [`Coupon`] to redeem.
    pub code: coupon::Code,

    /// Purchase amount to apply the [`Coupon`] to.
    pub purchase: Money,

    /// Moment of the redemption.
    pub at: DateTime,
}

impl<Db> Command<RedeemCoupon> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Coupon>, coupon::Code>>,
            Ok = Option<Coupon>,
            Err = Traced<database::Error>,
        > + Database<Update<Coupon>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Redemption;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RedeemCoupon,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RedeemCoupon { code, purchase, at } = cmd;

        // Checks and marking must not interleave with other redemptions.
        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut coupon = tx
            .execute(Select(By::<Option<Coupon>, _>::new(code.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CouponNotExists(code))
            .map_err(tracerr::wrap!())?;

        if coupon.used {
            return Err(tracerr::new!(E::AlreadyUsed(coupon.code)));
        }
        if coupon.is_expired_at(at) {
            return Err(tracerr::new!(E::Expired(coupon.code)));
        }
        if coupon.is_below_minimum(purchase) {
            return Err(tracerr::new!(E::BelowMinimum {
                code: coupon.code,
                purchase,
                min_purchase: coupon.min_purchase,
            }));
        }

        coupon.used = true;
        let redemption = Redemption {
            original_price: purchase,
            discount: coupon.discount,
            final_price: coupon.discounted(purchase),
        };

        tx.execute(Update(coupon))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(redemption)
    }
}

/// Error of [`RedeemCoupon`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Coupon`] has been redeemed already.
    #[display("`Coupon(code: {_0})` is already used")]
    #[from(ignore)]
    AlreadyUsed(#[error(not(source))] coupon::Code),

    /// Purchase amount is below the [`Coupon`] minimum.
    #[display(
        "Purchase of {purchase} is below `Coupon(code: {code})` minimum of \
         {min_purchase}"
    )]
    #[from(ignore)]
    BelowMinimum {
        /// [`coupon::Code`] of the [`Coupon`].
        code: coupon::Code,

        /// Requested purchase amount.
        purchase: Money,

        /// Minimum purchase amount of the [`Coupon`].
        min_purchase: Money,
    },

    /// [`Coupon`] with the provided [`coupon::Code`] does not exist.
    #[display("`Coupon(code: {_0})` does not exist")]
    #[from(ignore)]
    CouponNotExists(#[error(not(source))] coupon::Code),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Coupon`] is expired.
    #[display("`Coupon(code: {_0})` is expired")]
    #[from(ignore)]
    Expired(#[error(not(source))] coupon::Code),
}

#[cfg(test)]
mod spec {
    use std::{sync::Arc, time::Duration};

    use common::{
        operations::{By, Select},
        DateTime, Money, Percent,
    };
    use futures::future;

    use crate::{
        command::Command as _,
        domain::{
            coupon::{self, Redemption},
            Coupon,
        },
        infra::{Database as _, Memory},
        seed, Service,
    };

    use super::{ExecutionError, RedeemCoupon};

    fn service(now: DateTime) -> Service<Memory> {
        Service::new(Memory::new(seed::coupons(now), seed::users()).unwrap())
    }

    fn redeem(code: &str, purchase: f64, at: DateTime) -> RedeemCoupon {
        RedeemCoupon {
            code: coupon::Code::from(code),
            purchase: Money::new(purchase),
            at,
        }
    }

    async fn coupon(svc: &Service<Memory>, code: &str) -> Coupon {
        svc.database()
            .execute(Select(By::<Option<Coupon>, _>::new(coupon::Code::from(
                code,
            ))))
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn redeems_once() {
        let now = DateTime::now();
        let svc = service(now);

        let redemption = svc.execute(redeem("SAVE20", 200.0, now)).await.unwrap();
        assert_eq!(
            redemption,
            Redemption {
                original_price: Money::new(200.0),
                discount: Percent::new(20.0),
                final_price: Money::new(160.0),
            },
        );
        assert!(coupon(&svc, "SAVE20").await.used);

        let err = svc
            .execute(redeem("SAVE20", 150.0, now))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::AlreadyUsed(_)));
    }

    #[tokio::test]
    async fn rejects_expired() {
        let now = DateTime::now();
        let svc = service(now);

        let err = svc
            .execute(redeem("EXPIRED", 60.0, now))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::Expired(_)));
        assert!(!coupon(&svc, "EXPIRED").await.used);
    }

    #[tokio::test]
    async fn accepts_zero_purchase_with_zero_minimum() {
        let now = DateTime::now();
        let svc = service(now);

        let redemption = svc.execute(redeem("FIRST10", 0.0, now)).await.unwrap();
        assert_eq!(redemption.final_price, Money::ZERO);
        assert_eq!(redemption.discount, Percent::new(10.0));
    }

    #[tokio::test]
    async fn redeemable_exactly_at_expiration() {
        let now = DateTime::now();
        let svc = service(now);
        let expires_at = coupon(&svc, "FIRST10").await.expires_at;

        let err = svc
            .execute(redeem(
                "FIRST10",
                10.0,
                expires_at.coerce::<()>() + Duration::from_secs(1),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::Expired(_)));

        assert!(svc
            .execute(redeem("FIRST10", 10.0, expires_at.coerce()))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn minimum_purchase_is_inclusive() {
        let now = DateTime::now();
        let svc = service(now);

        let err = svc
            .execute(redeem("SAVE20", 99.99, now))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::BelowMinimum { .. }));
        assert!(!coupon(&svc, "SAVE20").await.used);

        let redemption =
            svc.execute(redeem("SAVE20", 100.0, now)).await.unwrap();
        assert_eq!(redemption.final_price, Money::new(80.0));
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let now = DateTime::now();
        let svc = service(now);

        for purchase in [0.0, 60.0, 1_000_000.0, -5.0] {
            for code in ["NOPE", "save20", "", " SAVE20"] {
                let err = svc
                    .execute(redeem(code, purchase, now))
                    .await
                    .unwrap_err();
                assert!(
                    matches!(err.as_ref(), ExecutionError::CouponNotExists(_)),
                    "`{code}` with {purchase}",
                );
            }
        }
    }

    #[tokio::test]
    async fn reports_first_failed_check() {
        let now = DateTime::now();
        let svc = service(now);

        // Expired and below minimum at once.
        let err = svc
            .execute(redeem("EXPIRED", 10.0, now))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::Expired(_)));

        svc.execute(redeem("SAVE20", 100.0, now)).await.unwrap();

        // Used, expired and below minimum at once.
        let err = svc
            .execute(redeem(
                "SAVE20",
                1.0,
                now + Duration::from_secs(60 * 60 * 24 * 365),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::AlreadyUsed(_)));
    }

    #[tokio::test]
    async fn failures_leave_coupon_untouched() {
        let now = DateTime::now();
        let svc = service(now);
        let before = coupon(&svc, "SAVE20").await;

        _ = svc.execute(redeem("SAVE20", 50.0, now)).await.unwrap_err();
        _ = svc
            .execute(redeem(
                "SAVE20",
                500.0,
                now + Duration::from_secs(60 * 60 * 24 * 60),
            ))
            .await
            .unwrap_err();

        assert_eq!(coupon(&svc, "SAVE20").await, before);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_redemptions_succeed_once() {
        let now = DateTime::now();
        let svc = Arc::new(service(now));

        let results = future::join_all((0..32).map(|_| {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move {
                svc.execute(redeem("SAVE20", 200.0, now)).await
            })
        }))
        .await;

        let (ok, failed): (Vec<_>, Vec<_>) = results
            .into_iter()
            .map(|r| r.unwrap())
            .partition(Result::is_ok);
        assert_eq!(ok.len(), 1);
        assert!(failed.iter().all(|r| matches!(
            r,
            Err(e) if matches!(e.as_ref(), ExecutionError::AlreadyUsed(_)),
        )));
    }
}
