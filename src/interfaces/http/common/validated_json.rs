//! JSON extractor that also runs `validator` rules
//!
//! Malformed JSON is answered with 400, failed field rules with 422;
//! both use the [`ApiResponse`] envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiResponse;

pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    Json(JsonRejection),
    Invalid(ValidationErrors),
}

fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => format!("{}: {}", field, msg),
                None => format!("{}: {}", field, e.code),
            })
        })
        .collect();

    if messages.is_empty() {
        return "Validation failed".to_string();
    }
    // field_errors is a HashMap; keep the output stable
    messages.sort();
    messages.join("; ")
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Json(rejection) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid JSON: {}", rejection.body_text()),
            ),
            Self::Invalid(errors) => (StatusCode::UNPROCESSABLE_ENTITY, describe(&errors)),
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Json)?;
        value.validate().map_err(ValidatedJsonRejection::Invalid)?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use tower::Service;

    #[derive(Debug, Deserialize, Validate)]
    struct PlateBody {
        #[validate(length(min = 1, max = 16, message = "plate must be 1-16 characters"))]
        plate: String,
    }

    async fn echo(ValidatedJson(body): ValidatedJson<PlateBody>) -> String {
        body.plate
    }

    async fn post_raw(body: impl Into<Body>) -> Response {
        let req = Request::builder()
            .method("POST")
            .uri("/plate")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap();
        let mut svc = Router::new().route("/plate", post(echo)).into_service();
        svc.call(req).await.unwrap()
    }

    #[tokio::test]
    async fn accepts_valid_body() {
        let resp = post_raw(r#"{"plate":"KA01AB1234"}"#).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let resp = post_raw("{plate").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn failed_rule_is_422() {
        let resp = post_raw(r#"{"plate":""}"#).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
