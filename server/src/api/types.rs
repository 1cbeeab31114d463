//! Shared API types
//!
//! Error mapping and the paginated response envelope used by every
//! resource endpoint.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::data::{DataError, SearchError};
use crate::domain::criteria::CriteriaError;
use crate::domain::query::Page;
use crate::domain::records::RecordError;

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
    ServiceUnavailable { message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }
}

impl From<CriteriaError> for ApiError {
    fn from(e: CriteriaError) -> Self {
        match e {
            CriteriaError::Declaration { .. } => {
                tracing::error!(error = %e, "Criteria declaration error");
                Self::internal("Invalid criteria declaration")
            }
            _ => Self::bad_request(e.code(), e.to_string()),
        }
    }
}

impl From<DataError> for ApiError {
    fn from(e: DataError) -> Self {
        tracing::error!(error = %e, backend = e.backend(), "Data error");
        Self::internal("Database operation failed")
    }
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::Disabled => Self::service_unavailable("Search is disabled"),
            SearchError::InvalidQuery(message) => {
                Self::bad_request("INVALID_SEARCH_QUERY", message)
            }
            e => {
                tracing::error!(error = %e, "Search error");
                Self::internal("Search operation failed")
            }
        }
    }
}

impl From<RecordError> for ApiError {
    fn from(e: RecordError) -> Self {
        match e {
            RecordError::IdAlreadySet { .. } => Self::bad_request("ID_EXISTS", e.to_string()),
            RecordError::MissingId { .. } => Self::bad_request("ID_NULL", e.to_string()),
            RecordError::NotFound { .. } => Self::not_found("NOT_FOUND", e.to_string()),
            RecordError::Data(e) => e.into(),
            RecordError::Search(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
            Self::ServiceUnavailable { message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                "SERVICE_UNAVAILABLE".to_string(),
                message,
            ),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

/// Pagination metadata in response
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u32,
    pub size: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

/// Generic paginated response wrapper
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    /// Convert a domain page, mapping each row into its DTO
    pub fn from_page<E>(page: Page<E>, f: impl FnMut(E) -> T) -> Self {
        let meta = PaginationMeta {
            page: page.page,
            size: page.size,
            total_items: page.total,
            total_pages: page.total_pages(),
        };
        Self {
            data: page.items.into_iter().map(f).collect(),
            meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter::{FilterKind, Operator};

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_criteria_errors_are_bad_requests() {
        let err = CriteriaError::UnsupportedOperator {
            field: "jobTitle".into(),
            operator: Operator::GreaterThan,
            kind: FilterKind::String,
        };
        let (status, body) = body_json(err.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_FILTER_OPERATOR");
        assert_eq!(body["error"], "bad_request");
    }

    #[tokio::test]
    async fn test_record_errors_map_to_status() {
        let (status, body) = body_json(RecordError::IdAlreadySet { entity: "Job" }.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "ID_EXISTS");

        let (status, _) = body_json(RecordError::NotFound { entity: "Job", id: 9 }.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = body_json(RecordError::Search(SearchError::Disabled).into()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_paginated_response_meta() {
        let page = Page {
            items: vec![1, 2, 3],
            page: 2,
            size: 3,
            total: 7,
        };
        let response = PaginatedResponse::from_page(page, |n| n * 10);
        assert_eq!(response.data, vec![10, 20, 30]);
        assert_eq!(response.meta.total_pages, 3);
        assert_eq!(response.meta.total_items, 7);
    }
}
