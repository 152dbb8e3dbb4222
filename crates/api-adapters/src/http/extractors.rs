//! Custom Axum extractors

use std::str::FromStr;

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use domains::IdParseError;
use serde_json::Value;

use super::error::ApiError;

/// Extract a single identifier from the path of a read.
pub struct PathId<T>(pub T);

impl<S, T> FromRequestParts<S> for PathId<T>
where
    S: Send + Sync,
    T: FromStr<Err = IdParseError> + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::InvalidPath(rejection.body_text()))?;

        Ok(Self(raw.parse::<T>()?))
    }
}

/// Raw JSON body, left unvalidated for the service layer.
///
/// An empty body becomes `null`; anything that is not JSON is rejected
/// with 400 before any service is called.
pub struct Payload(pub Value);

impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(Value::Null));
        }
        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|err| ApiError::MalformedBody(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde_json::json;

    async fn payload(body: &'static str) -> Result<Value, ApiError> {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/users")
            .body(Body::from(body))
            .unwrap();
        Payload::from_request(req, &()).await.map(|Payload(v)| v)
    }

    #[tokio::test]
    async fn empty_body_is_null() {
        assert_eq!(payload("").await.unwrap(), Value::Null);
        assert_eq!(payload("  \n").await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn json_body_is_parsed_without_validation() {
        let value = payload(r#"{"name": 1}"#).await.unwrap();
        assert_eq!(value, json!({ "name": 1 }));
    }

    #[tokio::test]
    async fn broken_json_is_rejected() {
        assert!(matches!(payload("{\"name\":").await, Err(ApiError::MalformedBody(_))));
    }
}
