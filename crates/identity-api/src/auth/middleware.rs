//! Axum용 JWT 인증 미들웨어.
//!
//! Axum 핸들러에서 사용할 JWT 인증 추출기 및 역할 검사.
//!
//! 서명 키는 항상 [`AppState`]에서 가져옵니다. 환경변수 폴백은 없습니다
//! — 키가 없으면 서버가 시작 단계에서 이미 실패했어야 합니다.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use identity_core::RoleName;

use super::jwt::{decode_token, extract_bearer, Claims, JwtError};
use crate::state::AppState;

/// JWT 인증 추출기.
///
/// Axum 핸들러에서 인증된 사용자 정보를 추출합니다.
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn protected_handler(
///     JwtAuth(claims): JwtAuth,
/// ) -> impl IntoResponse {
///     format!("Authenticated user: {}", claims.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JwtAuth(pub Claims);

/// JWT 인증 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtAuthError {
    #[error("Authentication token is required")]
    MissingToken,
    #[error("Invalid token format.")]
    InvalidAuthHeader,
    #[error("Token has expired.")]
    TokenExpired,
    #[error("Invalid token.")]
    InvalidToken,
    #[error("Insufficient permission")]
    InsufficientPermission,
}

impl IntoResponse for JwtAuthError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            JwtAuthError::MissingToken => (StatusCode::UNAUTHORIZED, "MISSING_TOKEN"),
            JwtAuthError::InvalidAuthHeader => (StatusCode::UNAUTHORIZED, "MALFORMED_TOKEN"),
            JwtAuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
            JwtAuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            JwtAuthError::InsufficientPermission => {
                (StatusCode::FORBIDDEN, "INSUFFICIENT_PERMISSION")
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string()
            }
        }));

        (status, body).into_response()
    }
}

impl<S> FromRequestParts<S> for JwtAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = JwtAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        // Authorization 헤더에서 토큰 추출
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(JwtAuthError::MissingToken)?;

        // Bearer 접두사 제거, 빈 값 거부
        let token =
            extract_bearer(auth_header).map_err(|_| JwtAuthError::InvalidAuthHeader)?;

        // 토큰 검증 (엔드포인트 검증과 동일한 구현)
        let claims =
            decode_token(token, app_state.jwt_secret()).map_err(|e| match e {
                JwtError::TokenExpired => JwtAuthError::TokenExpired,
                JwtError::InvalidSignature => JwtAuthError::InvalidToken,
                _ => JwtAuthError::InvalidAuthHeader,
            })?;

        Ok(JwtAuth(claims))
    }
}

/// 특정 역할을 요구하는 검사.
///
/// 정확한 집합 멤버십만 검사합니다 — 역할 간 계층은 없으며,
/// ADMIN 보유가 USER 요구를 충족하지 않습니다.
pub fn require_role(required: RoleName, claims: &Claims) -> Result<(), JwtAuthError> {
    if claims.has_role(required) {
        Ok(())
    } else {
        Err(JwtAuthError::InsufficientPermission)
    }
}

/// ADMIN 역할을 요구하는 추출기.
#[derive(Debug, Clone)]
pub struct AdminAuth(pub Claims);

impl<S> FromRequestParts<S> for AdminAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = JwtAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let JwtAuth(claims) = JwtAuth::from_request_parts(parts, state).await?;
        require_role(RoleName::Admin, &claims)?;
        Ok(AdminAuth(claims))
    }
}

/// USER 역할을 요구하는 추출기.
///
/// USER 멤버십 자체를 검사하므로 USER가 없는 ADMIN 전용 계정은
/// 거부됩니다.
#[derive(Debug, Clone)]
pub struct UserAuth(pub Claims);

impl<S> FromRequestParts<S> for UserAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = JwtAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let JwtAuth(claims) = JwtAuth::from_request_parts(parts, state).await?;
        require_role(RoleName::User, &claims)?;
        Ok(UserAuth(claims))
    }
}
