use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use pl_core::playerlog::Source;
use pl_core::RequestContext;
use tracing::Instrument;
use ulid::Ulid;

pub const HEADER_NAME: &str = "x-correlation-id";

/// Builds the `RequestContext` handlers extract, and echoes its correlation id.
pub async fn request_context(mut request: Request<Body>, next: Next) -> Response {
    let correlation_id = correlation_id(request.headers());
    let span = tracing::info_span!("request", correlation_id = %correlation_id);
    request
        .extensions_mut()
        .insert(RequestContext::new(Source::Http, Some(correlation_id.clone())));

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(HEADER_NAME), value);
    }
    response
}

fn correlation_id(headers: &HeaderMap) -> String {
    headers
        .get(HEADER_NAME)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map_or_else(|| format!("corr_{}", Ulid::new()), ToString::to_string)
}
