//! HTTP endpoint exposing the loan calculator.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::calculator;
use crate::domain::{FieldMessages, LoanQuoteForm, LoanQuoteRequest, QuoteFieldKeys};
use crate::message::{calculation_error_message, render_field_messages};

/// Body of every 4xx response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    #[serde(skip_serializing_if = "FieldMessages::is_empty")]
    details: FieldMessages,
    message: String,
}

pub fn router() -> Router {
    Router::new()
        .route("/loan-quote", post(loan_quote))
        .route("/health", get(health))
}

pub async fn health() -> &'static str {
    "ok"
}

/// Quote a loan from `{principal, annualRatePercent, termMonths}`.
///
/// Invalid input yields 400 with the messages of every invalid field. A body
/// that is not JSON also yields 400; a missing JSON content type keeps axum's
/// 415.
pub async fn loan_quote(payload: Result<Json<LoanQuoteRequest>, JsonRejection>) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            log::warn!("rejected loan-quote body: {rejection}");
            let status = if matches!(
                rejection,
                JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_)
            ) {
                StatusCode::BAD_REQUEST
            } else {
                rejection.status()
            };
            return error_response(status, FieldMessages::default(), rejection.body_text());
        }
    };

    let input = match LoanQuoteForm::from(request).validate_with_keys(QuoteFieldKeys::SERVICE) {
        Ok(input) => input,
        Err(errors) => {
            let details = FieldMessages::from_field_errors(&errors);
            let message = render_field_messages(&details);
            log::debug!("invalid loan-quote input: {message}");
            return error_response(StatusCode::BAD_REQUEST, details, message);
        }
    };

    match calculator::quote(&input) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => {
            log::warn!("loan quote failed: {err}");
            error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                FieldMessages::default(),
                calculation_error_message(&err),
            )
        }
    }
}

fn error_response(status: StatusCode, details: FieldMessages, message: String) -> Response {
    (status, Json(ErrorBody { details, message })).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    async fn send(request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn post_raw(body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/loan-quote")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap();
        let (status, bytes) = send(request).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post(value: Value) -> (StatusCode, Value) {
        post_raw(&value.to_string()).await
    }

    #[tokio::test]
    async fn valid_input_returns_rounded_numbers() {
        let (status, body) = post(json!({
            "principal": 100000,
            "annualRatePercent": 12,
            "termMonths": 24
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"monthlyPayment": 4707.35, "totalPayment": 112976.4}));
    }

    #[tokio::test]
    async fn numeric_strings_are_accepted() {
        let (status, body) = post(json!({
            "principal": "75000",
            "annualRatePercent": "10",
            "termMonths": "36"
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["monthlyPayment"], json!(2420.04));
    }

    #[tokio::test]
    async fn negative_principal_is_a_field_error() {
        let (status, body) = post(json!({
            "principal": -5,
            "annualRatePercent": 12,
            "termMonths": 24
        }))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["details"]["principal"].is_array());
        assert!(body["details"].get("termMonths").is_none());
        assert!(
            body["message"].as_str().unwrap().starts_with("Monto: "),
            "{body}"
        );
    }

    #[tokio::test]
    async fn every_missing_field_is_reported() {
        let (status, body) = post(json!({"annualRatePercent": null})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let details = body["details"].as_object().unwrap();
        assert_eq!(details.len(), 3);
        assert_eq!(
            body["message"].as_str().unwrap().lines().count(),
            3,
            "{body}"
        );
    }

    #[tokio::test]
    async fn wrong_json_types_are_field_errors() {
        let (status, body) = post(json!({
            "principal": true,
            "annualRatePercent": {"value": 12},
            "termMonths": [24]
        }))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        let details = body["details"].as_object().unwrap();
        assert_eq!(details.len(), 3);
        assert!(details.contains_key("annualRatePercent"));
        assert!(details.contains_key("termMonths"));
        assert_eq!(
            body["details"]["principal"],
            json!(["Debe ser un número mayor a 0"])
        );
    }

    #[tokio::test]
    async fn form_keys_next_to_service_keys_are_ignored() {
        let (status, body) = post(json!({
            "principal": 100000,
            "monto": 5,
            "annualRatePercent": 12,
            "termMonths": 24
        }))
        .await;

        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["monthlyPayment"], json!(4707.35));
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let (status, body) = post_raw("{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.get("details").is_none());
        assert!(!body["message"].as_str().unwrap().is_empty(), "{body}");

        let (status, _) = post_raw(r#""100000""#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_content_type_keeps_its_status() {
        let request = Request::builder()
            .method("POST")
            .uri("/loan-quote")
            .body(Body::from(r#"{"principal": 1}"#))
            .unwrap();
        let (status, bytes) = send(request).await;

        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn health_says_ok() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, bytes) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, b"ok");
    }
}
