//! HTTP routes for the customer API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                - Liveness probe
//! GET    /health/ready          - Readiness probe (store reachable)
//!
//! # Customers (basic auth)
//! GET    /api/customers         - Paginated, sortable listing
//! POST   /api/customers         - Create
//! GET    /api/customers/{id}    - Fetch one
//! PUT    /api/customers/{id}    - Full replace
//! DELETE /api/customers/{id}    - Delete
//! ```

pub mod customers;
pub mod health;

use axum::{Router, middleware::from_fn, middleware::from_fn_with_state, routing::get};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{basic_auth_middleware, request_id_middleware};
use crate::state::AppState;

/// Customer resource routes, all behind basic auth.
pub fn customer_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(customers::index).post(customers::store))
        .route(
            "/{id}",
            get(customers::show)
                .put(customers::update)
                .delete(customers::destroy),
        )
        .route_layer(from_fn_with_state(state, basic_auth_middleware))
}

/// Build the complete application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api/customers", customer_routes(state.clone()))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
