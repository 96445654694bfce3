//! 계정/인증 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (등록, 로그인, 토큰 검증, 역할 관리)
//! - JWT 발급/검증 및 인증 미들웨어
//! - Argon2 비밀번호 해싱
//! - PostgreSQL 저장소 (`AccountStore` 구현)
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: JWT 발급/검증, 비밀번호 해싱, 인증 추출기
//! - [`services`]: 등록/인증/역할 파이프라인
//! - [`repository`]: PostgreSQL 저장소 구현

pub mod auth;
pub mod error;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;

pub use auth::{
    create_token, decode_token, extract_bearer, hash_password, verify_password, AdminAuth, Claims,
    JwtAuth, JwtAuthError, UserAuth,
};
pub use error::{ApiErrorResponse, ApiResult};
pub use routes::create_api_router;
pub use services::{IdentityService, RoleService};
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::{create_test_state, MemoryAccountStore};
