//! HTTP API server with observability for the pet health platform.
//!
//! Provides REST endpoints for accounts, orders, payments, lab tests,
//! health reports, shipments, tickets, and role management, with
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

use application::App;
use axum::routing::{get, post, put};
use axum::Router;
use chrono::Duration;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub app: App,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: AppState, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::health))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/login-2fa", post(routes::auth::login_two_factor))
        .route("/auth/refresh-token", post(routes::auth::refresh_token))
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/forgot-password", post(routes::auth::forgot_password))
        .route("/auth/reset-password", post(routes::auth::reset_password))
        .route(
            "/auth/2fa/generate",
            post(routes::auth::generate_two_factor_secret),
        )
        .route("/auth/2fa/enable", post(routes::auth::enable_two_factor))
        .route("/users/register", post(routes::users::register))
        .route("/users", post(routes::users::create))
        .route(
            "/users/me",
            get(routes::users::get_me).put(routes::users::update_me),
        )
        .route("/users/me/password", put(routes::users::change_password))
        .route(
            "/orders",
            post(routes::orders::create_order).get(routes::orders::get_my_orders),
        )
        .route("/orders/{id}/pay", post(routes::orders::pay_order))
        .route("/payments", post(routes::payments::process_payment))
        .route(
            "/pets",
            post(routes::pets::create_pet).get(routes::pets::get_my_pets),
        )
        .route("/lab-tests/record-results", post(routes::lab::record_results))
        .route("/lab-tests/order/{order_id}", get(routes::lab::get_by_order))
        .route("/health-reports/{id}", get(routes::reports::get_report))
        .route("/shipments", post(routes::shipments::create_shipment))
        .route(
            "/shipments/{id}/ship",
            post(routes::shipments::mark_as_shipped),
        )
        .route(
            "/tickets",
            post(routes::tickets::create_ticket).get(routes::tickets::get_my_tickets),
        )
        .route("/tickets/{id}/reply", post(routes::tickets::add_reply))
        .route("/tickets/{id}/resolve", post(routes::tickets::resolve_ticket))
        .route("/roles", post(routes::roles::create_role))
        .route("/roles/permissions", get(routes::roles::get_permissions))
        .route(
            "/roles/{id}/permissions",
            post(routes::roles::assign_permissions),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state from configuration.
pub async fn create_default_state(config: &Config) -> AppState {
    let app = App::new(
        &config.jwt_secret,
        Duration::minutes(config.access_token_ttl_minutes),
    )
    .await;
    AppState { app }
}
