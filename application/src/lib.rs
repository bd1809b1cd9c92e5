//! Application provides HTTP API for interacting with the [`Service`].

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod api;
pub mod args;
pub mod config;
pub mod error;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use derive_more::Display;
use http::{
    header::{self, HeaderValue, InvalidHeaderValue},
    Method,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
};
// Used in binary.
use axum_client_ip as _;
use futures as _;
use tokio as _;
use tracing_subscriber as _;

pub use self::{
    args::Args,
    config::Config,
    error::{AsError, Error},
};

/// [`Service`] with filled infrastructure dependencies.
///
/// [`Service`]: service::Service
pub type Service = service::Service<service::infra::Memory>;

/// Creates a [`Router`] of the coupon HTTP API.
#[must_use]
pub fn coupons(service: Service) -> Router {
    Router::new()
        .route("/coupons", get(api::coupon::list))
        .route("/coupons/apply", post(api::coupon::apply))
        .layer(Extension(service))
        .layer(json_content_type())
}

/// Creates a [`Router`] of the user HTTP API.
#[must_use]
pub fn users(service: Service) -> Router {
    Router::new()
        .route(
            "/users",
            get(api::user::list).fallback(api::method_not_allowed),
        )
        .route(
            "/user",
            get(api::user::get).fallback(api::method_not_allowed),
        )
        .layer(Extension(service))
        .layer(json_content_type())
}

/// Creates a [`CorsLayer`] allowing requests from the provided `origins`.
///
/// A `*` among the `origins` allows any origin.
///
/// # Errors
///
/// If any of the `origins` is not a valid header value.
pub fn cors<'o>(
    origins: impl IntoIterator<Item = &'o str>,
) -> Result<CorsLayer, InvalidOrigin> {
    let origins = origins
        .into_iter()
        .map(|origin| {
            origin.parse::<HeaderValue>().map_err(|source| InvalidOrigin {
                origin: origin.to_owned(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let allowed = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(allowed))
}

/// Error of an origin not being representable as an HTTP header value.
#[derive(Debug, Display, derive_more::Error)]
#[display("`{origin}` is not a valid CORS origin: {source}")]
pub struct InvalidOrigin {
    /// Rejected origin.
    pub origin: String,

    /// Reason of the rejection.
    pub source: InvalidHeaderValue,
}

/// Creates a layer marking every response as a JSON one.
fn json_content_type() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    )
}
