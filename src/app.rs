use std::net::SocketAddr;
use std::path::Path;

use axum::{
    extract::{ConnectInfo, Request},
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, set_header::SetResponseHeaderLayer};

/// Serves `serving_root` as a stock static file tree. Every response,
/// errors and preflights included, carries CORS and cross-origin isolation
/// headers (COOP/COEP, needed for SharedArrayBuffer) plus `no-cache`.
pub fn create_routes(serving_root: &Path) -> Router {
    let augment = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("cross-origin-opener-policy"),
            HeaderValue::from_static("same-origin"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("cross-origin-embedder-policy"),
            HeaderValue::from_static("require-corp"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(middleware::from_fn(access_log))
        .layer(middleware::from_fn(preflight));

    Router::new()
        .fallback_service(ServeDir::new(serving_root).append_index_html_on_directories(true))
        .layer(augment)
}

/// Answers `OPTIONS` on any path with a bare 200 so CORS preflights pass
/// without per-route handling.
async fn preflight(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(request).await
}

async fn access_log(request: Request, next: Next) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());
    let method = request.method().clone();
    let uri = request.uri().clone();
    let version = request.version();

    let response = next.run(request).await;
    let status = response.status();
    if let Some(level) = access_level(status) {
        log::log!(
            level,
            "{client} \"{method} {uri} {version:?}\" {}",
            status.as_u16()
        );
    }
    response
}

/// Plain 200s are routine asset fetches and stay quiet; errors warn.
fn access_level(status: StatusCode) -> Option<log::Level> {
    if status == StatusCode::OK {
        None
    } else if status.is_client_error() || status.is_server_error() {
        Some(log::Level::Warn)
    } else {
        Some(log::Level::Info)
    }
}
