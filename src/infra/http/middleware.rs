//! Shared middleware stack.
//!
//! Outermost first: request id assignment, tracing span, CORS, request id
//! propagation, error-response logging, panic capture.

use std::any::Any;
use std::time::{Duration, Instant};

use axum::{
    Router,
    body::Body,
    http::{HeaderName, Method, Request, StatusCode},
    middleware::{self as axum_middleware, Next},
    response::{IntoResponse, Response},
};
use metrics::counter;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    classify::ServerErrorsFailureClass,
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{Span, error, info_span, warn};

use crate::application::error::{AppError, ErrorReport};
use crate::infra::telemetry::HTTP_RESPONSES_TOTAL;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub const ALLOWED_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

pub fn apply(router: Router) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("unknown")
                .to_string();

            info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
                status = tracing::field::Empty,
                latency_ms = tracing::field::Empty,
            )
        })
        .on_request(|_request: &Request<_>, _span: &Span| {
            tracing::debug!("request started");
        })
        .on_response(|response: &Response, latency: Duration, span: &Span| {
            span.record("status", tracing::field::display(response.status()));
            span.record("latency_ms", latency.as_secs_f64() * 1000.0);
            tracing::info!("request completed");
        })
        .on_failure(
            |failure: ServerErrorsFailureClass, latency: Duration, span: &Span| {
                span.record("latency_ms", latency.as_secs_f64() * 1000.0);
                tracing::debug!(class = %failure, "request classified as failure");
            },
        );

    let stack = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
        .layer(trace_layer)
        .layer(cors_layer())
        .layer(PropagateRequestIdLayer::new(request_id))
        .layer(axum_middleware::from_fn(log_responses))
        .layer(CatchPanicLayer::custom(panic_response));

    router.layer(stack)
}

/// Any origin, the four verbs the API uses, credentials allowed.
///
/// A literal `*` cannot be combined with credentials, so the request's
/// origin is echoed back instead. Requests without an `Origin` header get no
/// `Access-Control-Allow-Origin` in the response.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(ALLOWED_METHODS.to_vec())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::new()
    };

    AppError::unexpected(detail).into_response()
}

/// Log every 4xx/5xx response with the diagnostic the handler attached.
pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let mut response = next.run(request).await;
    let status = response.status();

    counter!(HTTP_RESPONSES_TOTAL, "class" => status_class(status)).increment(1);

    if status.is_client_error() || status.is_server_error() {
        let elapsed_ms = start.elapsed().as_millis();
        let report = response.extensions_mut().remove::<ErrorReport>();
        let (source, messages) = match report {
            Some(report) => (report.source, report.messages),
            None => ("unknown", Vec::new()),
        };
        let detail = messages
            .first()
            .cloned()
            .unwrap_or_else(|| "no diagnostic available".to_string());

        if status.is_server_error() {
            error!(
                target = "giftlink::http::response",
                status = status.as_u16(),
                method = %method,
                path = %uri.path(),
                query = uri.query().unwrap_or(""),
                elapsed_ms = elapsed_ms,
                source = source,
                detail = %detail,
                chain = ?messages,
                request_id = request_id,
                "request failed",
            );
        } else {
            warn!(
                target = "giftlink::http::response",
                status = status.as_u16(),
                method = %method,
                path = %uri.path(),
                query = uri.query().unwrap_or(""),
                elapsed_ms = elapsed_ms,
                source = source,
                detail = %detail,
                request_id = request_id,
                "client request error",
            );
        }
    }

    response
}

fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    }
}
