//! End-to-end tests of the HTTP gateway against a local mock backend
//!
//! Each test binds an axum router to `127.0.0.1:0` and points a [`BackendConfig`] at it.

use axum::{Json, Router, http::StatusCode, routing::post};
use mpesa_form::prelude::*;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// =============================================================================
// Mock Backend
// =============================================================================

async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Backend that records request bodies and answers 200 with a JSON acknowledgement
fn recording_backend(seen: Arc<Mutex<Vec<Value>>>) -> Router {
    Router::new().route(
        "/initiate-payment",
        post(move |Json(body): Json<Value>| {
            let seen = seen.clone();
            async move {
                seen.lock().unwrap().push(body);
                Json(json!({"message": "STK push sent"}))
            }
        }),
    )
}

fn rejecting_backend(status: StatusCode, error: &'static str) -> Router {
    Router::new().route(
        "/initiate-payment",
        post(move || async move { (status, Json(json!({ "error": error }))) }),
    )
}

fn gateway_for(base_url: &str) -> Arc<HttpPaymentGateway> {
    let config = BackendConfig::new(base_url).unwrap();
    Arc::new(HttpPaymentGateway::new(&config).unwrap())
}

fn valid_request() -> PaymentRequest {
    PaymentRequest {
        phone: "254712345678".to_string(),
        amount: 100.0,
    }
}

// =============================================================================
// Gateway
// =============================================================================

mod gateway_tests {
    use super::*;

    #[tokio::test]
    async fn test_success_posts_json_body() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let base = spawn_backend(recording_backend(seen.clone())).await;

        let ack = gateway_for(&base)
            .initiate_payment(&valid_request())
            .await
            .unwrap();

        assert_eq!(ack.status, 200);
        assert_eq!(ack.body, Some(json!({"message": "STK push sent"})));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![json!({"phone": "254712345678", "amount": 100})]
        );
    }

    #[tokio::test]
    async fn test_empty_success_body_is_accepted() {
        let router =
            Router::new().route("/initiate-payment", post(|| async { StatusCode::NO_CONTENT }));
        let base = spawn_backend(router).await;

        let ack = gateway_for(&base)
            .initiate_payment(&valid_request())
            .await
            .unwrap();

        assert_eq!(ack.status, 204);
        assert_eq!(ack.body, None);
    }

    #[tokio::test]
    async fn test_base_url_prefix_is_honoured() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let router = Router::new().nest("/api/v1", recording_backend(seen.clone()));
        let base = spawn_backend(router).await;

        gateway_for(&format!("{}/api/v1/", base))
            .initiate_payment(&valid_request())
            .await
            .unwrap();

        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_error_payload_is_parsed() {
        let base = spawn_backend(rejecting_backend(
            StatusCode::BAD_REQUEST,
            "Insufficient funds",
        ))
        .await;

        let err = gateway_for(&base)
            .initiate_payment(&valid_request())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            GatewayError::Rejected {
                status: 400,
                body: Some(ErrorBody {
                    error: "Insufficient funds".to_string()
                }),
            }
        );
    }

    #[tokio::test]
    async fn test_non_json_error_has_no_detail() {
        let router = Router::new().route(
            "/initiate-payment",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        );
        let base = spawn_backend(router).await;

        let err = gateway_for(&base)
            .initiate_payment(&valid_request())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(err.detail(), None);
    }

    #[tokio::test]
    async fn test_unknown_route_is_rejection() {
        let base = spawn_backend(Router::new()).await;

        let err = gateway_for(&base)
            .initiate_payment(&valid_request())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_closed_port_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = gateway_for(&format!("http://{}", addr))
            .initiate_payment(&valid_request())
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Transport(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let router = Router::new().route(
            "/initiate-payment",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                StatusCode::OK
            }),
        );
        let base = spawn_backend(router).await;
        let config = BackendConfig::new(&base).unwrap().with_timeout_secs(1);
        let gateway = HttpPaymentGateway::new(&config).unwrap();

        let err = gateway
            .initiate_payment(&valid_request())
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Transport(_)));
    }
}

// =============================================================================
// Form over HTTP
// =============================================================================

mod form_over_http_tests {
    use super::*;

    #[tokio::test]
    async fn test_form_success_round_trip() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let base = spawn_backend(recording_backend(seen.clone())).await;
        let form = PaymentForm::new(gateway_for(&base));

        form.set_phone("254712345678");
        form.set_amount("100");
        assert_eq!(form.submit().await, SubmitOutcome::Succeeded);

        let state = form.state();
        assert_eq!(state.result_message.as_deref(), Some(SUCCESS_MESSAGE));
        assert!(!state.submitting);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_form_shows_backend_error() {
        let base = spawn_backend(rejecting_backend(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Insufficient funds",
        ))
        .await;
        let form = PaymentForm::new(gateway_for(&base));

        form.set_phone("254712345678");
        form.set_amount("100");
        form.submit().await;

        assert_eq!(
            form.state().result_message.as_deref(),
            Some("❌ Error: Insufficient funds")
        );
    }

    #[tokio::test]
    async fn test_form_unreachable_backend() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let form = PaymentForm::new(gateway_for(&format!("http://{}", addr)));

        form.set_phone("254712345678");
        form.set_amount("100");
        form.submit().await;

        let state = form.state();
        assert_eq!(
            state.result_message.as_deref(),
            Some("❌ Error: Server is unreachable")
        );
        assert!(!state.submitting);
        assert!(!state.result_is_success);
    }

    #[tokio::test]
    async fn test_invalid_form_makes_no_request() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let base = spawn_backend(recording_backend(seen.clone())).await;
        let form = PaymentForm::new(gateway_for(&base));

        form.set_phone("0712345678");
        form.set_amount("100");
        assert_eq!(form.submit().await, SubmitOutcome::Invalid);

        assert!(seen.lock().unwrap().is_empty());
    }
}
