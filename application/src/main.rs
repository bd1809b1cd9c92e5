use std::{future::IntoFuture as _, io, sync::OnceLock, time};

use application::{config, Args, Config, Service};
use axum::{body::Body, extract::MatchedPath, Router};
use axum_client_ip::InsecureClientIp;
use common::DateTime;
use futures::{future, TryFutureExt as _};
use service::{infra::Memory, seed};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (!STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .init();

    _ = start().await;
}

async fn start() -> Result<(), ()> {
    let Args { config } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let Config { server, log } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let memory = Memory::new(seed::coupons(DateTime::now()), seed::users())
        .map_err(|e| {
            log::error!("failed to initialize `Memory` database: {e}");
        })?;
    let service = Service::new(memory);

    let cors =
        application::cors(server.cors.origins.iter().map(String::as_str))
            .map_err(|e| log::error!("failed to configure CORS: {e}"))?;

    let with_layers = |app: Router| {
        app.layer(cors.clone()).layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span)
                .on_response(on_response),
        )
    };

    let coupons = serve(
        "coupon API",
        &server.coupons,
        with_layers(application::coupons(service.clone())),
    );
    let users = serve(
        "user API",
        &server.users,
        with_layers(application::users(service)),
    );

    future::try_join(coupons, users).await.map(drop)
}

/// Binds the provided `app` to the provided `listener` and serves it.
async fn serve(
    name: &str,
    listener: &config::Listener,
    app: Router,
) -> Result<(), ()> {
    let config::Listener { host, port } = listener;

    let tcp = TcpListener::bind((host.as_str(), *port))
        .await
        .map_err(|e| {
            log::error!("failed to listen {name} on `{host}:{port}`: {e}");
        })?;

    log::info!("{name} listening on `{host}:{port}`");

    axum::serve(tcp, app)
        .into_future()
        .map_err(|e| log::error!("{name} webserver failed: {e}"))
        .await
}

fn make_span(r: &http::Request<Body>) -> tracing::Span {
    tracing::info_span!(
        "HTTP request",
        http.client_ip = InsecureClientIp::from(r.headers(), r.extensions())
            .map(|ip| ip.0.to_string())
            .ok(),
        http.flavor = ?r.version(),
        http.host = r.uri().host(),
        http.method = r.method().as_str(),
        http.route = r
            .extensions()
            .get::<MatchedPath>()
            .map(MatchedPath::as_str),
        http.scheme = r.uri().scheme().map(http::uri::Scheme::as_str),
        http.target = r
            .uri()
            .path_and_query()
            .map(http::uri::PathAndQuery::as_str),
        http.user_agent = r
            .headers()
            .get("User-Agent")
            .and_then(|h| h.to_str().ok()),
        http.status_code = tracing::field::Empty,
    )
}

fn on_response(
    r: &http::Response<Body>,
    dur: time::Duration,
    span: &tracing::Span,
) {
    span.record(
        "http.status_code",
        tracing::field::display(r.status().as_u16()),
    );

    if r.status().is_server_error() || r.status().is_client_error() {
        tracing::error!(duration = format!("{}ms", dur.as_millis()));
    } else {
        tracing::info!(duration = format!("{}ms", dur.as_millis()));
    }
}
