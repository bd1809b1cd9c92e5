//! [`User`]-related handlers.

use axum::{extract::Query, Extension, Json};
use serde::Deserialize;
use service::{
    domain::{user, User},
    query, Query as _,
};

use crate::{define_error, AsError, Error, Service};

/// Name of the [`tracing::Span`] for the user handlers.
const SPAN_NAME: &str = "user API";

/// Query parameters of the [`get()`] handler.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GetParams {
    /// Raw ID of the [`User`] to get.
    pub id: String,
}

/// Lists all the [`User`]s.
///
/// # Errors
///
/// If the [`User`]s cannot be read.
#[tracing::instrument(skip_all, fields(otel.name = SPAN_NAME))]
pub async fn list(
    Extension(service): Extension<Service>,
) -> Result<Json<Vec<User>>, Error> {
    service
        .execute(query::users::List::by(()))
        .await
        .map(Json)
        .map_err(AsError::into_error)
}

/// Returns the [`User`] with the provided ID.
///
/// # Errors
///
/// With `404 user not found` if the ID is missing, is not a non-negative
/// integer or doesn't match any [`User`].
#[tracing::instrument(skip_all, fields(otel.name = SPAN_NAME))]
pub async fn get(
    Extension(service): Extension<Service>,
    Query(params): Query<GetParams>,
) -> Result<Json<User>, Error> {
    let id = params
        .id
        .parse::<usize>()
        .map_err(|_| UserError::NotFound)?;

    service
        .execute(query::user::ById::by(user::Id::from(id)))
        .await
        .map_err(AsError::into_error)?
        .map(Json)
        .ok_or_else(|| UserError::NotFound.into())
}

define_error! {
    enum UserError {
        #[code = "USER_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "user not found"]
        NotFound,
    }
}

#[cfg(test)]
mod spec {
    use axum::{body::Body, Router};
    use http_body_util::BodyExt as _;
    use serde_json::{json, Value};
    use service::{infra::Memory, seed};
    use tower::ServiceExt as _;

    fn app() -> Router {
        let db = Memory::new(Vec::new(), seed::users()).unwrap();
        crate::users(crate::Service::new(db))
    }

    async fn call(
        method: http::Method,
        uri: &str,
    ) -> (http::StatusCode, String) {
        let resp = app()
            .oneshot(
                http::Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        assert_eq!(
            resp.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "application/json",
        );
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn lists_users() {
        let (status, body) = call(http::Method::GET, "/users").await;

        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(
            serde_json::from_str::<Value>(&body).unwrap(),
            json!([
                {"id": 0, "name": "Alice", "age": 25},
                {"id": 1, "name": "Bob", "age": 30},
                {"id": 2, "name": "Charlie", "age": 22},
            ]),
        );
    }

    #[tokio::test]
    async fn gets_user_by_id() {
        let (status, body) = call(http::Method::GET, "/user?id=1").await;

        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(
            serde_json::from_str::<Value>(&body).unwrap(),
            json!({"id": 1, "name": "Bob", "age": 30}),
        );
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        for uri in ["/user?id=3", "/user?id=-1", "/user?id=x", "/user"] {
            let (status, body) = call(http::Method::GET, uri).await;

            assert_eq!(status, http::StatusCode::NOT_FOUND, "`{uri}`");
            assert_eq!(body, "user not found", "`{uri}`");
        }
    }

    #[tokio::test]
    async fn rejects_other_methods() {
        for uri in ["/users", "/user?id=0"] {
            let (status, body) = call(http::Method::POST, uri).await;

            assert_eq!(status, http::StatusCode::METHOD_NOT_ALLOWED, "`{uri}`");
            assert_eq!(body, "method not allowed", "`{uri}`");
        }
    }
}
