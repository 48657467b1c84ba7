//! HTTP Middleware
//!
//! 协议层错误日志；业务错误（errno != 0）在 `ApiError::into_response` 中记录

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

/// 记录 4xx / 5xx 响应及耗时
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms = elapsed_ms,
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms = elapsed_ms,
            "HTTP client error"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        routing::get,
        Router,
    };
    use tower::util::ServiceExt;

    fn router() -> Router {
        Router::new()
            .route("/api/ping", get(|| async { "pong" }))
            .route(
                "/api/audio/missing",
                get(|| async { StatusCode::NOT_FOUND }),
            )
            .route(
                "/api/broken",
                get(|| async { StatusCode::BAD_GATEWAY }),
            )
            .layer(axum::middleware::from_fn(error_logging_middleware))
    }

    async fn status_of(uri: &str) -> StatusCode {
        let request = HttpRequest::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        router().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_middleware_passes_responses_through() {
        assert_eq!(status_of("/api/ping").await, StatusCode::OK);
        assert_eq!(status_of("/api/audio/missing").await, StatusCode::NOT_FOUND);
        assert_eq!(status_of("/api/broken").await, StatusCode::BAD_GATEWAY);
        assert_eq!(status_of("/nowhere").await, StatusCode::NOT_FOUND);
    }
}
