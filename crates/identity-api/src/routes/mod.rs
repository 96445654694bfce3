//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness/readiness)
//! - `/api/auth` - 등록, 로그인, 로그아웃, 토큰 검증, 권한 질의
//! - `/api/role` - 역할 부여/회수/조회 (ADMIN 전용 변경)

pub mod auth;
pub mod health;
pub mod roles;

pub use auth::{
    auth_router, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, TokenMessage,
};
pub use health::{health_router, ComponentStatus, HealthResponse};
pub use roles::{roles_router, RoleMutationResponse};

use axum::Router;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/health", health_router())
        .nest("/api/auth", auth_router())
        .nest("/api/role", roles_router())
}
