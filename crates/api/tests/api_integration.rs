//! Integration tests for the API server.

use std::sync::OnceLock;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

async fn setup() -> (axum::Router, api::AppState) {
    let config = api::config::Config::default();
    let state = api::create_default_state(&config).await;
    let app = api::create_app(state.clone(), get_metrics_handle());
    (app, state)
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed_json_request(
    method: &str,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed_get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Registers an account and returns its access token.
async fn register_and_login(app: &axum::Router, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/users/register",
            serde_json::json!({
                "first_name": "Jane",
                "last_name": "Doe",
                "email": email,
                "password": "correct-horse"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            serde_json::json!({ "email": email, "password": "correct-horse" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}

/// Mints a token carrying every permission, without a backing account.
fn admin_token(state: &api::AppState) -> String {
    let permissions = domain::role::permissions::all()
        .into_iter()
        .map(|p| p.code().to_string())
        .collect();
    state
        .app
        .tokens
        .issue(
            common::UserId::new(),
            "Ada Admin",
            "admin@petlab.test",
            "Admin",
            permissions,
        )
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = setup().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _) = setup().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/plain"));
}

#[tokio::test]
async fn test_register_login_and_profile() {
    let (app, _) = setup().await;
    let token = register_and_login(&app, "jane@example.com").await;

    let response = app
        .oneshot(authed_get("/users/me", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["email"], "jane@example.com");
    assert_eq!(json["role"], "Customer");
    assert_eq!(json["email_verified"], false);
}

#[tokio::test]
async fn test_invalid_credentials_return_401_envelope() {
    let (app, _) = setup().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/login",
            serde_json::json!({ "email": "nobody@example.com", "password": "nope" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "User.InvalidCredentials");
    assert_eq!(json["message"], "Invalid email or password.");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (app, _) = setup().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/orders")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "Auth.Unauthorized");
}

#[tokio::test]
async fn test_empty_order_is_rejected() {
    let (app, _) = setup().await;
    let token = register_and_login(&app, "empty@example.com").await;

    let response = app
        .oneshot(authed_json_request(
            "POST",
            "/orders",
            &token,
            serde_json::json!({ "items": [] }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "Order.NoItems");
}

#[tokio::test]
async fn test_order_payment_flow() {
    let (app, _) = setup().await;
    let token = register_and_login(&app, "buyer@example.com").await;

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/pets",
            &token,
            serde_json::json!({ "name": "Rex", "pet_type": "Dog" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let pet = body_json(response).await;
    let pet_id = pet["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/orders",
            &token,
            serde_json::json!({
                "items": [{
                    "product_id": "KIT-DNA-01",
                    "product_name": "Canine DNA Kit",
                    "unit_price_cents": 12900,
                    "quantity": 1,
                    "kit_type": "Dna",
                    "pet_id": pet_id
                }]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let order = body_json(response).await;
    assert_eq!(order["status"], "Pending");
    assert_eq!(order["total_cents"], 12900);
    let order_id = order["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            &format!("/orders/{order_id}/pay"),
            &token,
            serde_json::json!({ "payment_token": "tok_visa" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let payment = body_json(response).await;
    assert_eq!(payment["status"], "Completed");
    assert!(payment["gateway_transaction_id"].as_str().is_some());

    // Paying the same order again is rejected without another charge.
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            &format!("/orders/{order_id}/pay"),
            &token,
            serde_json::json!({ "payment_token": "tok_visa" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await;
    assert_eq!(error["code"], "Order.NotPending");

    // The commit registered a lab test for the pet on the order.
    let response = app
        .clone()
        .oneshot(authed_get(&format!("/lab-tests/order/{order_id}"), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let test = body_json(response).await;
    assert_eq!(test["status"], "Registered");
    assert_eq!(test["pet_id"].as_str().unwrap(), pet_id);

    // Listing shows the order as paid.
    let response = app
        .oneshot(authed_get("/orders", &token))
        .await
        .unwrap();
    let orders = body_json(response).await;
    assert_eq!(orders[0]["status"], "Paid");
}

#[tokio::test]
async fn test_declined_payment_surfaces_error() {
    let (app, state) = setup().await;
    let token = register_and_login(&app, "declined@example.com").await;

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/orders",
            &token,
            serde_json::json!({
                "items": [{
                    "product_id": "KIT-ALG-01",
                    "product_name": "Allergy Kit",
                    "unit_price_cents": 8900,
                    "quantity": 1,
                    "kit_type": "Allergy"
                }]
            }),
        ))
        .await
        .unwrap();
    let order = body_json(response).await;
    let order_id = order["id"].as_str().unwrap().to_string();

    state.app.gateway.set_fail_on_charge(true);

    let response = app
        .oneshot(authed_json_request(
            "POST",
            &format!("/orders/{order_id}/pay"),
            &token,
            serde_json::json!({ "payment_token": "tok_bad" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "Payment.Failed");
}

#[tokio::test]
async fn test_unknown_report_returns_404() {
    let (app, _) = setup().await;
    let token = register_and_login(&app, "reader@example.com").await;

    let response = app
        .oneshot(authed_get(
            &format!("/health-reports/{}", uuid::Uuid::new_v4()),
            &token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "Report.NotFound");
}

#[tokio::test]
async fn test_customer_cannot_manage_roles() {
    let (app, _) = setup().await;
    let token = register_and_login(&app, "customer@example.com").await;

    let response = app
        .oneshot(authed_json_request(
            "POST",
            "/roles",
            &token,
            serde_json::json!({ "name": "Support", "description": "Support staff" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "Auth.Forbidden");
}

#[tokio::test]
async fn test_admin_role_management() {
    let (app, state) = setup().await;
    let token = admin_token(&state);

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/roles",
            &token,
            serde_json::json!({ "name": "Support", "description": "Support staff" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let role_id = created["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            &format!("/roles/{role_id}/permissions"),
            &token,
            serde_json::json!({ "permissions": ["Users:Read", "NotACode"] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let role = body_json(response).await;
    assert_eq!(role["permissions"], serde_json::json!(["Users:Read"]));

    let response = app
        .oneshot(authed_get("/roles/permissions", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let catalog = body_json(response).await;
    assert_eq!(catalog.as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn test_ticket_round_trip() {
    let (app, _) = setup().await;
    let token = register_and_login(&app, "help@example.com").await;

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/tickets",
            &token,
            serde_json::json!({ "subject": "Kit missing", "message": "My kit never arrived." }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let ticket_id = created["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            &format!("/tickets/{ticket_id}/resolve"),
            &token,
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(authed_get("/tickets", &token)).await.unwrap();
    let tickets = body_json(response).await;
    assert_eq!(tickets[0]["status"], "Resolved");
    assert_eq!(tickets[0]["messages"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_shipment_lifecycle() {
    let (app, state) = setup().await;
    let customer = register_and_login(&app, "ship@example.com").await;
    let admin = admin_token(&state);

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/orders",
            &customer,
            serde_json::json!({
                "items": [{
                    "product_id": "KIT-WEL-01",
                    "product_name": "Wellness Kit",
                    "unit_price_cents": 5900,
                    "quantity": 1,
                    "kit_type": "Wellness"
                }]
            }),
        ))
        .await
        .unwrap();
    let order = body_json(response).await;
    let order_id = order["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/shipments",
            &admin,
            serde_json::json!({
                "order_id": order_id,
                "carrier": "Ups",
                "destination_address": "1 Main St, Springfield"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let shipment = body_json(response).await;
    assert_eq!(shipment["status"], "LabelGenerated");
    let tracking = shipment["tracking_number"].as_str().unwrap();
    assert!(tracking.starts_with("TRK-UPS-"));
    let shipment_id = shipment["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            &format!("/shipments/{shipment_id}/ship"),
            &admin,
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let shipped = body_json(response).await;
    assert_eq!(shipped["status"], "Shipped");

    // Second shipment for the same order is rejected.
    let response = app
        .oneshot(authed_json_request(
            "POST",
            "/shipments",
            &admin,
            serde_json::json!({
                "order_id": order_id,
                "carrier": "Fedex",
                "destination_address": "1 Main St, Springfield"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "Shipment.AlreadyExists");
}
