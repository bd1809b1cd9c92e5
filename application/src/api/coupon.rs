//! [`Coupon`]-related handlers.

use axum::{Extension, Json};
use common::{DateTime, Money};
use serde::Deserialize;
use service::{
    command::{self, redeem_coupon},
    domain::{
        coupon::{self, Redemption},
        Coupon,
    },
    query, Command as _,
};
use tracing as log;

use crate::{api::Payload, define_error, AsError, Error, Service};

/// Name of the [`tracing::Span`] for the coupon handlers.
const SPAN_NAME: &str = "coupon API";

/// Request to apply a [`Coupon`] to a purchase.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApplyRequest {
    /// [`coupon::Code`] of the [`Coupon`] to apply.
    pub code: coupon::Code,

    /// Purchase amount to apply the [`Coupon`] to.
    pub purchase: Money,
}

/// Lists all the [`Coupon`]s, used ones included.
///
/// # Errors
///
/// If the [`Coupon`]s cannot be read.
#[tracing::instrument(skip_all, fields(otel.name = SPAN_NAME))]
pub async fn list(
    Extension(service): Extension<Service>,
) -> Result<Json<Vec<Coupon>>, Error> {
    service
        .execute(query::coupons::List::by(()))
        .await
        .map(Json)
        .map_err(AsError::into_error)
}

/// Applies a [`Coupon`] to a purchase, consuming the [`Coupon`].
///
/// # Errors
///
/// Possible errors:
/// - `400 Invalid request` - malformed request body;
/// - `404 Coupon not found` - no [`Coupon`] with the provided code;
/// - `400 Coupon already used` - the [`Coupon`] is redeemed already;
/// - `400 Coupon expired` - the [`Coupon`] is expired;
/// - `400 Purchase below minimum` - the purchase is too small for the
///   [`Coupon`].
#[tracing::instrument(skip_all, fields(otel.name = SPAN_NAME))]
pub async fn apply(
    Extension(service): Extension<Service>,
    Payload(req): Payload<ApplyRequest>,
) -> Result<Json<Redemption>, Error> {
    let ApplyRequest { code, purchase } = req;

    let redemption = service
        .execute(command::RedeemCoupon {
            code: code.clone(),
            purchase,
            at: DateTime::now(),
        })
        .await
        .map_err(AsError::into_error)?;

    log::info!(
        "applied coupon {code}: {} -> {}",
        redemption.original_price,
        redemption.final_price,
    );

    Ok(Json(redemption))
}

impl AsError for redeem_coupon::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "COUPON_NOT_FOUND"]
                #[status = NOT_FOUND]
                #[message = "Coupon not found"]
                NotFound,

                #[code = "COUPON_ALREADY_USED"]
                #[status = BAD_REQUEST]
                #[message = "Coupon already used"]
                AlreadyUsed,

                #[code = "COUPON_EXPIRED"]
                #[status = BAD_REQUEST]
                #[message = "Coupon expired"]
                Expired,

                #[code = "PURCHASE_BELOW_MINIMUM"]
                #[status = BAD_REQUEST]
                #[message = "Purchase below minimum"]
                BelowMinimum,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::CouponNotExists(_) => Some(Error::NotFound.into()),
            Self::AlreadyUsed(_) => Some(Error::AlreadyUsed.into()),
            Self::Expired(_) => Some(Error::Expired.into()),
            Self::BelowMinimum { .. } => Some(Error::BelowMinimum.into()),
        }
    }
}
