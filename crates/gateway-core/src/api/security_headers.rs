//! Security headers middleware

use axum::{
    middleware::Next,
    response::Response,
    http::{Request, header, HeaderValue},
};

/// Add security headers to all responses
pub async fn security_headers_middleware(
    request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    // Access tokens are bearer credentials; never let an intermediary keep one
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store")
    );

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff")
    );

    headers.insert(
        header::X_FRAME_OPTIONS,
        HeaderValue::from_static("DENY")
    );

    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer")
    );

    // Responses are plain text and XML, nothing to execute or embed
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'")
    );

    response
}
