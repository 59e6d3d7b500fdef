//! Shared response envelope types for API handlers.
//!
//! Every response, success or failure, is an [`ApiResponse`]:
//! `{ "success", "code", "message", "data" }`. Paginated listings put a
//! [`PageResult`] in `data`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use deepdrama_core::pagination::Page;
use serde::Serialize;

/// Uniform response envelope. The HTTP status always equals `code`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// A 200 envelope with the default message.
    pub fn ok(data: T) -> Self {
        Self::with_message("Success", data)
    }

    /// A 200 envelope with a custom message such as `Created`.
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            code: StatusCode::OK.as_u16(),
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// A failure envelope with no payload.
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: status.as_u16(),
            message: message.into(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// One page of a listing plus the unpaginated total.
#[derive(Debug, Serialize)]
pub struct PageResult<T: Serialize> {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub list: Vec<T>,
}

impl<T: Serialize> PageResult<T> {
    pub fn new(total: i64, page: Page, list: Vec<T>) -> Self {
        Self {
            total,
            page: page.page,
            limit: page.limit,
            list,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": true, "code": 200, "message": "Success", "data": [1, 2]})
        );
    }

    #[test]
    fn error_envelope_has_null_data() {
        let json = serde_json::to_value(ApiResponse::error(StatusCode::NOT_FOUND, "gone")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], 404);
        assert!(json["data"].is_null());
    }

    #[test]
    fn page_result_copies_page_numbers() {
        let page = PageResult::new(12, Page::new(Some(2), Some(10)), vec!["a"]);
        let json = serde_json::to_value(page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"total": 12, "page": 2, "limit": 10, "list": ["a"]})
        );
    }
}
