//! 인증 및 권한 부여.
//!
//! JWT 기반 인증 및 역할 기반 접근 제어를 제공합니다.
//!
//! # 구성 요소
//!
//! - [`Claims`]: JWT 페이로드 구조체
//! - [`JwtAuth`]: Axum 핸들러용 JWT 검증 추출기 (요청 게이트)
//! - [`hash_password`] / [`verify_password`]: Argon2 비밀번호 처리
//!
//! 토큰 검증 로직은 [`jwt::decode_token`] 하나뿐입니다. 요청 필터와
//! 명시적 검증 엔드포인트 모두 같은 구현을 통과합니다 — 검증 로직이
//! 둘로 갈라지는 것이 인증 우회 버그의 가장 흔한 원인이기 때문입니다.

mod jwt;
mod middleware;
mod password;

pub use jwt::{create_token, decode_token, extract_bearer, Claims, JwtError};
pub use middleware::{require_role, AdminAuth, JwtAuth, JwtAuthError, UserAuth};
pub use password::{hash_password, validate_password_strength, verify_password, PasswordError};
