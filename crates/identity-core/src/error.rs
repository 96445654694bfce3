//! 계정 서비스의 에러 타입.
//!
//! 이 모듈은 파이프라인 경계에서 사용되는 에러 분류 체계를 정의합니다.
//! 저장소/해싱 내부 에러는 전부 이 타입으로 재매핑되며,
//! 원시 에러가 경계 밖으로 새어 나가지 않습니다.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::store::StoreError;

/// HTTP 응답 상태 분류.
///
/// 코어는 전송 계층을 모르므로 상태 코드 대신 분류만 제공합니다.
/// 실제 상태 코드 매핑은 API 크레이트가 담당합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 잘못된 요청 (입력 검증 실패)
    BadRequest,
    /// 인증 실패 (자격증명/토큰)
    Unauthorized,
    /// 권한 부족
    Forbidden,
    /// 리소스 없음
    NotFound,
    /// 중복 리소스 충돌
    Conflict,
    /// 내부 에러
    Internal,
}

/// 핵심 계정 서비스 에러.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// 이미 존재하는 사용자 이름
    #[error("The username {0} already exists, please try again.")]
    DuplicateUsername(String),

    /// 이미 존재하는 이메일
    #[error("The email {0} already exists, please try again.")]
    DuplicateEmail(String),

    /// 이미 존재하는 전화번호
    #[error("The phone number {0} already exists, please try again.")]
    DuplicatePhone(String),

    /// 로그인 식별자 누락 (저장소 접근 전에 검사)
    #[error("Username or Email cannot be null or empty")]
    InvalidCredentialsInput,

    /// 자격증명 불일치.
    ///
    /// "사용자 없음"과 "비밀번호 불일치"를 의도적으로 구분하지 않습니다
    /// (사용자 열거 공격 방지).
    #[error("Incorrect username or password")]
    AuthenticationFailed,

    /// 계정 없음 (역할 관리 조회)
    #[error("User not found with ID: {0}")]
    AccountNotFound(Uuid),

    /// 닫힌 열거형 밖의 역할 이름
    #[error("Role not found in system: {0}")]
    RoleNotFound(String),

    /// 구조적으로 잘못된 토큰 (빈 토큰 포함)
    #[error("Invalid token format.")]
    MalformedToken,

    /// 서명 검증 실패
    #[error("Invalid token signature.")]
    InvalidSignature,

    /// 만료된 토큰
    #[error("Token has expired.")]
    TokenExpired,

    /// 요청 입력 검증 실패 (비밀번호 강도 등)
    #[error("Invalid input: {0}")]
    Validation(String),

    /// 설정 에러. 프로세스 시작 시에만 발생하며 요청 단위로 복구하지 않습니다.
    #[error("Configuration error: {0}")]
    Config(String),

    /// 비밀번호 해싱 실패
    #[error("Password hashing failed")]
    Hashing,

    /// 저장소 에러 (중복 충돌은 파이프라인에서 Duplicate*로 재매핑된 뒤이므로
    /// 여기 도달하는 것은 인프라 장애뿐입니다)
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// 기타 내부 에러
    #[error("Internal error: {0}")]
    Internal(String),
}

/// 계정 서비스 작업을 위한 Result 타입.
pub type IdentityResult<T> = Result<T, IdentityError>;

impl IdentityError {
    /// API 에러 응답에 사용되는 안정적인 에러 코드를 반환합니다.
    pub fn code(&self) -> &'static str {
        match self {
            IdentityError::DuplicateUsername(_) => "DUPLICATE_USERNAME",
            IdentityError::DuplicateEmail(_) => "DUPLICATE_EMAIL",
            IdentityError::DuplicatePhone(_) => "DUPLICATE_PHONE",
            IdentityError::InvalidCredentialsInput => "INVALID_CREDENTIALS_INPUT",
            IdentityError::AuthenticationFailed => "AUTHENTICATION_FAILED",
            IdentityError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            IdentityError::RoleNotFound(_) => "ROLE_NOT_FOUND",
            IdentityError::MalformedToken => "MALFORMED_TOKEN",
            IdentityError::InvalidSignature => "INVALID_SIGNATURE",
            IdentityError::TokenExpired => "TOKEN_EXPIRED",
            IdentityError::Validation(_) => "INVALID_INPUT",
            IdentityError::Config(_) => "CONFIG_ERROR",
            IdentityError::Hashing => "HASHING_ERROR",
            IdentityError::Store(_) => "STORE_ERROR",
            IdentityError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 에러의 응답 상태 분류를 반환합니다.
    ///
    /// 중복 리소스는 원본 구현과 달리 `Conflict`로 분류합니다.
    pub fn category(&self) -> ErrorCategory {
        match self {
            IdentityError::DuplicateUsername(_)
            | IdentityError::DuplicateEmail(_)
            | IdentityError::DuplicatePhone(_) => ErrorCategory::Conflict,
            IdentityError::InvalidCredentialsInput | IdentityError::Validation(_) => {
                ErrorCategory::BadRequest
            }
            IdentityError::AuthenticationFailed
            | IdentityError::MalformedToken
            | IdentityError::InvalidSignature
            | IdentityError::TokenExpired => ErrorCategory::Unauthorized,
            IdentityError::AccountNotFound(_) | IdentityError::RoleNotFound(_) => {
                ErrorCategory::NotFound
            }
            IdentityError::Config(_)
            | IdentityError::Hashing
            | IdentityError::Store(_)
            | IdentityError::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// 토큰 검증 실패 계열인지 확인합니다.
    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            IdentityError::MalformedToken
                | IdentityError::InvalidSignature
                | IdentityError::TokenExpired
        )
    }
}
