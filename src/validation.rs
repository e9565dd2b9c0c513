//! Request validation
//!
//! [`ValidatedJson`] deserializes a JSON body and runs its `validator` rules.
//! Malformed JSON, missing fields and rule violations all become
//! [`ApiError::Validation`], answered with 400. [`ValidatedPath`] does the
//! same for path parameters that fail to parse.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Request,
        rejection::{JsonRejection, PathRejection},
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::errors::ApiError;

/// A JSON extractor that also validates the request body
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection_message)?;

        value
            .validate()
            .map_err(|errors| ApiError::Validation(format_validation_errors(&errors)))?;

        Ok(Self(value))
    }
}

fn json_rejection_message(rejection: JsonRejection) -> ApiError {
    ApiError::Validation(rejection.body_text())
}

/// Path parameters whose parse failures answer with the JSON error body
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(path_rejection_message)?;
        Ok(Self(value))
    }
}

fn path_rejection_message(rejection: PathRejection) -> ApiError {
    ApiError::Validation(rejection.body_text())
}

/// Flattens field errors into `field: message` pairs, sorted by field name
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let detail = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                format!("{field}: {detail}")
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::{Body, to_bytes}, http::StatusCode, routing::{get, post}};
    use serde::Deserialize;
    use tower::ServiceExt;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct TestRequest {
        #[validate(length(min = 1, max = 10, message = "must be between 1 and 10 characters"))]
        name: String,
        #[validate(range(min = 0.0))]
        price: f64,
    }

    async fn test_handler(ValidatedJson(req): ValidatedJson<TestRequest>) -> String {
        req.name
    }

    async fn post_json(body: &'static str) -> (StatusCode, serde_json::Value) {
        let app = Router::new().route("/test", post(test_handler));
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/test")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn valid_request_passes() {
        let (status, _) = post_json(r#"{"name": "chair", "price": 1.5}"#).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_field_is_bad_request() {
        let (status, body) = post_json(r#"{"name": "chair"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("price"));
    }

    #[tokio::test]
    async fn rule_violation_is_bad_request() {
        let (status, body) = post_json(r#"{"name": "", "price": 1.0}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "name: must be between 1 and 10 characters");

        let (status, body) = post_json(r#"{"name": "chair", "price": -1.0}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "price: range");
    }

    #[tokio::test]
    async fn invalid_json_is_bad_request() {
        let (status, _) = post_json(r#"{"name": not json}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    async fn id_handler(ValidatedPath(id): ValidatedPath<i32>) -> String {
        id.to_string()
    }

    async fn get_path(uri: &str) -> (StatusCode, serde_json::Value) {
        let app = Router::new().route("/thing/{id}", get(id_handler));
        let response = app
            .oneshot(axum::http::Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn numeric_path_passes() {
        let (status, _) = get_path("/thing/42").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn unparsable_path_is_json_bad_request() {
        for uri in ["/thing/abc", "/thing/99999999999"] {
            let (status, body) = get_path(uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["code"], 400);
            assert_eq!(body["status"], "Bad Request");
            assert!(body["message"].is_string());
        }
    }
}
