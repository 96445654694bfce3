//! API 에러 응답 처리.
//!
//! 도메인 에러([`IdentityError`])를 HTTP 응답으로 변환합니다.
//! 모든 에러 응답은 `{"error": {"code", "message"}}` 형태의 JSON입니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use identity_core::{ErrorCategory, IdentityError};

/// 핸들러 공용 Result 타입.
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP 경계용 에러 래퍼.
///
/// 핸들러는 `?`로 [`IdentityError`]를 전파하고, 이 래퍼가
/// 상태 코드와 응답 본문을 결정합니다.
#[derive(Debug)]
pub struct ApiError(pub IdentityError);

/// 에러 응답 본문.
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub code: String,
    pub message: String,
    /// 응답 생성 시각 (ISO 8601)
    pub timestamp: String,
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        ApiError(err)
    }
}

fn status_for(category: ErrorCategory) -> StatusCode {
    match category {
        ErrorCategory::BadRequest => StatusCode::BAD_REQUEST,
        ErrorCategory::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCategory::Forbidden => StatusCode::FORBIDDEN,
        ErrorCategory::NotFound => StatusCode::NOT_FOUND,
        ErrorCategory::Conflict => StatusCode::CONFLICT,
        ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.0.category());

        // 내부 에러의 상세는 로그에만 남기고 응답에는 일반 메시지만 노출.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "internal error");
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };

        let body = Json(json!({
            "error": ApiErrorResponse {
                code: self.0.code().to_string(),
                message,
                timestamp: chrono::Utc::now().to_rfc3339(),
            }
        }));

        (status, body).into_response()
    }
}
