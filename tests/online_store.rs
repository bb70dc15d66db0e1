//! End-to-end tests for `/api/v1/online-store`, run against both gate compositions.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use order_gate::app::{build_app, build_state};
use order_gate::config::{AppEnv, Config, GateComposition};

const COMPOSITIONS: [GateComposition; 2] = [GateComposition::Inline, GateComposition::Staged];

fn config(composition: GateComposition) -> Config {
    Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        app_env: AppEnv::Development,
        auth_issuer: "order-gate-tests".to_string(),
        auth_audience: "online-store".to_string(),
        auth_signing_secret: b"integration-secret-0123456789abcdef".to_vec(),
        access_token_ttl_seconds: 3600,
        access_token_leeway_seconds: 0,
        validate_issuer_audience: true,
        gate_composition: composition,
    }
}

fn app(composition: GateComposition) -> Router {
    let config = config(composition);
    build_app(build_state(&config), &config)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn token(app: &Router, path: &str) -> String {
    let req = Request::builder()
        .method("GET")
        .uri(format!("/api/v1/online-store/{path}"))
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 3600);
    body["access_token"].as_str().unwrap().to_string()
}

async fn post_raw(
    app: &Router,
    authorization: Option<&str>,
    content_type: Option<&str>,
    body: String,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method("POST").uri("/api/v1/online-store");
    if let Some(value) = content_type {
        req = req.header(header::CONTENT_TYPE, value);
    }
    if let Some(value) = authorization {
        req = req.header(header::AUTHORIZATION, value);
    }

    send(app, req.body(Body::from(body)).unwrap()).await
}

async fn post_order(app: &Router, authorization: Option<&str>, order: Value) -> (StatusCode, Value) {
    post_raw(app, authorization, Some("application/json"), order.to_string()).await
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[tokio::test]
async fn customer_order_is_processed() {
    for composition in COMPOSITIONS {
        let app = app(composition);
        let token = token(&app, "token").await;

        let (status, body) =
            post_order(&app, Some(&bearer(&token)), json!({"orderId": "42", "amount": 150})).await;

        assert_eq!(status, StatusCode::OK, "{composition:?}");
        assert_eq!(body["message"], "Order processed successfully.");
    }
}

#[tokio::test]
async fn amount_of_exactly_one_hundred_is_processed() {
    for composition in COMPOSITIONS {
        let app = app(composition);
        let token = token(&app, "token").await;

        let (status, _) =
            post_order(&app, Some(&bearer(&token)), json!({"orderId": "42", "amount": 100})).await;

        assert_eq!(status, StatusCode::OK, "{composition:?}");
    }
}

#[tokio::test]
async fn small_order_is_rejected_by_business_rule() {
    for composition in COMPOSITIONS {
        let app = app(composition);
        let token = token(&app, "token").await;

        let (status, body) =
            post_order(&app, Some(&bearer(&token)), json!({"orderId": "42", "amount": 50})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{composition:?}");
        assert_eq!(body["error"]["code"], "ORDER_REJECTED");
        assert_eq!(body["error"]["message"], "insufficient amount $50 for order 42");
    }
}

#[tokio::test]
async fn invalid_orders_are_rejected_by_validation() {
    for composition in COMPOSITIONS {
        let app = app(composition);
        let token = token(&app, "token").await;

        for order in [
            json!({"orderId": "-1", "amount": 150}),
            json!({"orderId": "0", "amount": 150}),
            json!({"orderId": "abc", "amount": 150}),
            json!({"orderId": "42", "amount": 0}),
        ] {
            let (status, body) = post_order(&app, Some(&bearer(&token)), order.clone()).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "{composition:?} {order}");
            assert_eq!(body["error"]["code"], "INVALID_ORDER");
        }
    }
}

#[tokio::test]
async fn missing_or_invalid_credential_is_unauthenticated() {
    for composition in COMPOSITIONS {
        let app = app(composition);

        for authorization in [None, Some("Bearer not-a-token"), Some("Basic Sm9objpwdw==")] {
            let (status, body) =
                post_order(&app, authorization, json!({"orderId": "42", "amount": 150})).await;

            assert_eq!(status, StatusCode::UNAUTHORIZED, "{composition:?} {authorization:?}");
            assert_eq!(body["error"]["code"], "UNAUTHENTICATED");
            assert_eq!(
                body["error"]["message"],
                "You must be logged in to place orders."
            );
        }
    }
}

#[tokio::test]
async fn credential_from_another_issuer_is_unauthenticated() {
    let mut foreign = config(GateComposition::Staged);
    foreign.auth_issuer = "someone-else".to_string();
    let foreign_app = build_app(build_state(&foreign), &foreign);
    let foreign_token = token(&foreign_app, "token").await;

    for composition in COMPOSITIONS {
        let app = app(composition);
        let (status, _) = post_order(
            &app,
            Some(&bearer(&foreign_token)),
            json!({"orderId": "42", "amount": 150}),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "{composition:?}");
    }
}

#[tokio::test]
async fn non_user_token_is_authorized() {
    for composition in COMPOSITIONS {
        let app = app(composition);
        let token = token(&app, "non-user-token").await;

        let (status, _) =
            post_order(&app, Some(&bearer(&token)), json!({"orderId": "42", "amount": 150})).await;

        assert_eq!(status, StatusCode::OK, "{composition:?}");
    }
}

#[tokio::test]
async fn non_customer_token_is_forbidden() {
    for composition in COMPOSITIONS {
        let app = app(composition);
        let token = token(&app, "non-customer-token").await;

        let (status, body) =
            post_order(&app, Some(&bearer(&token)), json!({"orderId": "42", "amount": 150})).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "{composition:?}");
        assert_eq!(body["error"]["code"], "FORBIDDEN");
        assert_eq!(
            body["error"]["message"],
            "You do not have permission to process orders."
        );
    }
}

#[tokio::test]
async fn compositions_answer_identically() {
    let inline = app(GateComposition::Inline);
    let staged = app(GateComposition::Staged);

    let customer = token(&inline, "token").await;
    let role_only = token(&inline, "non-user-token").await;
    let no_role = token(&inline, "non-customer-token").await;

    let authorizations = [
        None,
        Some("Bearer garbage".to_string()),
        Some(bearer(&customer)),
        Some(bearer(&role_only)),
        Some(bearer(&no_role)),
    ];
    let orders = [
        json!({"orderId": "42", "amount": 150}),
        json!({"orderId": "42", "amount": 50}),
        json!({"orderId": "-1", "amount": 150}),
        json!({"orderId": "x1", "amount": 150}),
        json!({"amount": 150}),
        json!({"orderId": 42, "amount": "lots"}),
    ];

    for authorization in &authorizations {
        for order in &orders {
            let a = post_order(&inline, authorization.as_deref(), order.clone()).await;
            let b = post_order(&staged, authorization.as_deref(), order.clone()).await;
            assert_eq!(a, b, "{authorization:?} {order}");
        }
    }
}

#[tokio::test]
async fn unreadable_body_without_credential_is_unauthenticated() {
    for composition in COMPOSITIONS {
        let app = app(composition);

        for (content_type, body) in [
            (Some("application/json"), r#"{"amount":150}"#),
            (Some("application/json"), "{not json"),
            (None, r#"{"orderId":"42","amount":150}"#),
        ] {
            let (status, body) = post_raw(&app, None, content_type, body.to_string()).await;

            assert_eq!(status, StatusCode::UNAUTHORIZED, "{composition:?} {content_type:?}");
            assert_eq!(body["error"]["code"], "UNAUTHENTICATED");
        }
    }
}

#[tokio::test]
async fn unreadable_body_with_credential_is_a_json_error() {
    let inline = app(GateComposition::Inline);
    let staged = app(GateComposition::Staged);
    let token = bearer(&token(&inline, "token").await);

    for (content_type, body) in [
        (Some("application/json"), r#"{"amount":150}"#),
        (Some("application/json"), "{not json"),
        (None, r#"{"orderId":"42","amount":150}"#),
    ] {
        let a = post_raw(&inline, Some(&token), content_type, body.to_string()).await;
        let b = post_raw(&staged, Some(&token), content_type, body.to_string()).await;

        assert_eq!(a.0, StatusCode::BAD_REQUEST, "{content_type:?} {body}");
        assert_eq!(a.1["error"]["code"], "INVALID_BODY");
        assert!(a.1["error"]["message"].is_string());
        assert_eq!(a, b, "{content_type:?} {body}");
    }
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = app(GateComposition::Staged);
    let req = Request::builder()
        .method("GET")
        .uri("/api/v1/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}
