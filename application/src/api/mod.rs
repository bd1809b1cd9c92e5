//! HTTP API definitions.

pub mod coupon;
pub mod user;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use tracing as log;

use crate::{define_error, Error};

/// JSON request body.
///
/// Unlike [`axum::Json`], doesn't require any `Content-Type` header and reads
/// only the first JSON value of the body, ignoring anything after it.
#[derive(Clone, Copy, Debug)]
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Error;

    async fn from_request(
        req: Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await.map_err(|e| {
            log::debug!("failed to read request body: {e}");
            RequestError::InvalidRequest
        })?;

        serde_json::Deserializer::from_slice(&body)
            .into_iter::<T>()
            .next()
            .ok_or(RequestError::InvalidRequest)?
            .map(Self)
            .map_err(|e| {
                log::debug!("failed to decode request body: {e}");
                RequestError::InvalidRequest.into()
            })
    }
}

define_error! {
    enum RequestError {
        #[code = "INVALID_REQUEST"]
        #[status = BAD_REQUEST]
        #[message = "Invalid request"]
        InvalidRequest,

        #[code = "METHOD_NOT_ALLOWED"]
        #[status = METHOD_NOT_ALLOWED]
        #[message = "method not allowed"]
        MethodNotAllowed,
    }
}

/// Fallback handler for unsupported HTTP methods on known routes.
#[expect(clippy::unused_async, reason = "`async` is required by `axum`")]
pub async fn method_not_allowed() -> RequestError {
    RequestError::MethodNotAllowed
}
