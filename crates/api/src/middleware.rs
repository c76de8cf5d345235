use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use finapi_accounts::normalize_tax_id;
use finapi_core::LedgerError;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::CustomerContext;

/// Header carrying the caller's tax identifier.
pub const TAX_ID_HEADER: &str = "tax-id";

/// Legacy header name, still accepted.
pub const LEGACY_TAX_ID_HEADER: &str = "cpf";

/// Resolve the caller's account from the request headers.
///
/// A missing header and an unknown tax identifier are indistinguishable to
/// the caller: both yield 404 `Customer not found`.
pub async fn customer_middleware(
    State(services): State<Arc<AppServices>>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let tax_id = match extract_tax_id(req.headers()) {
        Some(t) if services.account_exists(t) => t.to_string(),
        _ => return ApiError::from(LedgerError::AccountNotFound).into_response(),
    };

    req.extensions_mut().insert(CustomerContext::new(tax_id));
    next.run(req).await
}

fn extract_tax_id(headers: &HeaderMap) -> Option<&str> {
    let header = headers
        .get(TAX_ID_HEADER)
        .or_else(|| headers.get(LEGACY_TAX_ID_HEADER))?;

    normalize_tax_id(header.to_str().ok()?).ok()
}

/// Log one line per request with method, path, status and latency.
pub async fn log_requests(req: axum::http::Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let res = next.run(req).await;

    tracing::info!(
        %method,
        path = %path,
        status = res.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request handled"
    );
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, HeaderValue};

    #[test]
    fn prefers_tax_id_header_over_legacy() {
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(LEGACY_TAX_ID_HEADER), HeaderValue::from_static("222"));
        headers.insert(HeaderName::from_static(TAX_ID_HEADER), HeaderValue::from_static("111"));
        assert_eq!(extract_tax_id(&headers), Some("111"));
    }

    #[test]
    fn falls_back_to_legacy_header() {
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(LEGACY_TAX_ID_HEADER), HeaderValue::from_static("222"));
        assert_eq!(extract_tax_id(&headers), Some("222"));
    }

    #[test]
    fn missing_or_blank_header_is_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_tax_id(&headers), None);

        headers.insert(HeaderName::from_static(TAX_ID_HEADER), HeaderValue::from_static("   "));
        assert_eq!(extract_tax_id(&headers), None);
    }
}
