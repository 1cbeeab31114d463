//! Path, query and validation extractors for API routes

use std::ops::Deref;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Validated entity id from the `{id}` path segment.
///
/// Returns a 400 Bad Request unless the segment is a positive integer.
#[derive(Debug)]
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(ValidationRejection::Path)?;

        match raw.parse::<i64>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(ValidationRejection::InvalidId(raw)),
        }
    }
}

/// Raw query string pairs in request order.
///
/// Criteria, paging and search parameters are all read from the same list;
/// repeated keys (`sort=a&sort=b`) are preserved.
#[derive(Debug, Default)]
pub struct QueryPairs(pub Vec<(String, String)>);

impl QueryPairs {
    /// Last value of a plain (non-filter) parameter
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl<S> FromRequestParts<S> for QueryPairs
where
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(ValidationRejection::Query)?;
        Ok(Self(pairs))
    }
}

/// Validation rejection with structured error response
pub enum ValidationRejection {
    /// Failed to parse path parameters
    Path(PathRejection),
    /// Path id is not a positive integer
    InvalidId(String),
    /// Failed to parse query string
    Query(QueryRejection),
    /// Failed to parse JSON body
    Json(JsonRejection),
    /// Validation constraints not satisfied
    Validation(validator::ValidationErrors),
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            Self::Path(rejection) => ("PATH_PARSE_ERROR", rejection.body_text()),
            Self::InvalidId(raw) => (
                "INVALID_ID",
                format!("Invalid id '{}': must be a positive integer", raw),
            ),
            Self::Query(rejection) => ("QUERY_PARSE_ERROR", rejection.body_text()),
            Self::Json(rejection) => ("JSON_PARSE_ERROR", rejection.body_text()),
            Self::Validation(errors) => ("VALIDATION_ERROR", format_validation_errors(&errors)),
        };
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "bad_request",
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: validation failed", field))
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// JSON body extractor with automatic validation.
///
/// Deserializes JSON body and validates it using the `validator` crate.
/// Returns a `ValidationRejection` on parse or validation failure.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ValidationRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidationRejection::Json)?;
        value.validate().map_err(ValidationRejection::Validation)?;
        Ok(Self(value))
    }
}
