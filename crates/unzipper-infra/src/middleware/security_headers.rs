use axum::http::HeaderValue;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Path prefix of the interactive API documentation
const DOCS_PREFIX: &str = "/docs";

/// Security headers configuration
#[derive(Clone, Debug)]
pub struct SecurityHeadersConfig {
    pub is_production: bool,
}

impl SecurityHeadersConfig {
    pub fn new(is_production: bool) -> Self {
        Self { is_production }
    }

    /// Build Content-Security-Policy header value
    fn build_csp(&self, path: &str) -> &'static str {
        if path.starts_with(DOCS_PREFIX) {
            // RapiDoc loads its bundle from a CDN and injects inline styles
            return "default-src 'self'; \
                    script-src 'self' https://unpkg.com; \
                    style-src 'self' 'unsafe-inline' https://fonts.googleapis.com; \
                    img-src 'self' data: https:; \
                    font-src 'self' data: https://fonts.gstatic.com; \
                    connect-src 'self'; \
                    frame-ancestors 'none'";
        }

        "default-src 'none'; frame-ancestors 'none'"
    }
}

/// Security headers middleware
/// Adds security headers to all HTTP responses
pub async fn security_headers_middleware(
    State(config): State<Arc<SecurityHeadersConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let csp = config.build_csp(request.uri().path());
    let mut response = next.run(request).await;

    let headers = response.headers_mut();

    // X-Content-Type-Options: Prevent MIME type sniffing
    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );

    // X-Frame-Options: kept for older browsers alongside CSP frame-ancestors
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));

    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    // HSTS header (only set in production over HTTPS)
    if config.is_production {
        headers.insert(
            "Strict-Transport-Security",
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    headers.insert("Content-Security-Policy", HeaderValue::from_static(csp));

    headers.insert(
        "Permissions-Policy",
        HeaderValue::from_static("geolocation=(), microphone=(), camera=()"),
    );

    // Extracted files are per-upload and must not land in shared caches
    if !headers.contains_key("Cache-Control") {
        headers.insert(
            "Cache-Control",
            HeaderValue::from_static("no-store, private"),
        );
    }

    response
}
