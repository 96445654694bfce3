//! JWT 토큰 처리.
//!
//! 액세스 토큰 생성/검증 로직. HS256 대칭 키 서명을 사용하며,
//! 키는 프로세스 시작 시 설정에서 한 번 로드됩니다.
//!
//! 토큰은 저장되지 않는 파생 아티팩트입니다: 유일한 진실 기록은 발급
//! 시점에 계산된 서명이며, 만료가 유일한 무효화 수단입니다
//! (폐기 목록 없음).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use identity_core::{IdentityError, RoleName};

/// JWT 액세스 토큰 페이로드.
///
/// 계정 식별 정보와 역할 집합을 포함합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 계정 ID
    pub sub: String,
    /// 사용자 이름
    pub username: String,
    /// 발급 시점의 역할 이름 집합
    pub roles: Vec<RoleName>,
    /// Issued At - 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
    /// JWT ID - 토큰 고유 식별자
    pub jti: String,
}

impl Claims {
    /// 새로운 Claims 생성.
    ///
    /// # Arguments
    ///
    /// * `account_id` - 계정 ID
    /// * `username` - 사용자 이름
    /// * `roles` - 발급 시점의 역할 집합
    /// * `ttl_minutes` - 만료 시간 (분)
    pub fn new(
        account_id: Uuid,
        username: impl Into<String>,
        roles: Vec<RoleName>,
        ttl_minutes: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: account_id.to_string(),
            username: username.into(),
            roles,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(ttl_minutes)).timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// 특정 역할을 보유하는지 확인 (정확한 멤버십, 계층 없음).
    pub fn has_role(&self, role: RoleName) -> bool {
        self.roles.contains(&role)
    }

    /// 역할 이름 문자열 집합에 대한 정확한 문자열 일치 검사.
    ///
    /// `required`가 닫힌 열거형 밖의 문자열이면 항상 `false`입니다.
    pub fn has_role_named(&self, required: &str) -> bool {
        self.roles.iter().any(|r| r.as_str() == required)
    }

    /// 계정 ID를 파싱해 반환합니다.
    pub fn account_id(&self) -> Result<Uuid, IdentityError> {
        Uuid::parse_str(&self.sub).map_err(|_| IdentityError::MalformedToken)
    }
}

/// JWT 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// 구조적으로 잘못된 토큰 (빈 토큰, 잘못된 세그먼트, 깨진 클레임)
    #[error("Invalid token format.")]
    Malformed,
    /// 서명 검증 실패
    #[error("Invalid token signature.")]
    InvalidSignature,
    /// 만료된 토큰
    #[error("Token has expired.")]
    TokenExpired,
    /// 토큰 인코딩 실패
    #[error("Token encoding failed: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
}

impl From<JwtError> for IdentityError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Malformed => IdentityError::MalformedToken,
            JwtError::InvalidSignature => IdentityError::InvalidSignature,
            JwtError::TokenExpired => IdentityError::TokenExpired,
            JwtError::Encoding(e) => IdentityError::Internal(e.to_string()),
        }
    }
}

/// 액세스 토큰 생성.
///
/// 클레임을 직렬화하고 대칭 키로 서명합니다.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(JwtError::from)
}

/// JWT 토큰 디코딩 및 검증.
///
/// 서명 → 클레임 구조 → 만료 순으로 검증하며, 실패 종류를 구분해
/// 반환합니다. 요청 게이트와 명시적 검증 엔드포인트가 모두 이 함수를
/// 통과합니다 — 검증 구현은 이 하나뿐입니다.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if token.is_empty() {
        return Err(JwtError::Malformed);
    }

    let mut validation = Validation::default();
    validation.validate_exp = true;
    // 만료 타임스탬프가 지난 토큰은 즉시 죽은 것으로 취급한다.
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        _ => JwtError::Malformed,
    })
}

/// Authorization 헤더 값에서 토큰을 추출합니다.
///
/// "Bearer " 접두사가 있으면 제거하고, 비어 있으면 거부합니다.
pub fn extract_bearer(header_value: &str) -> Result<&str, JwtError> {
    let token = header_value
        .strip_prefix("Bearer ")
        .unwrap_or(header_value)
        .trim();

    if token.is_empty() {
        return Err(JwtError::Malformed);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    fn user_claims(ttl_minutes: i64) -> Claims {
        Claims::new(
            Uuid::new_v4(),
            "alice",
            vec![RoleName::User, RoleName::Pm],
            ttl_minutes,
        )
    }

    #[test]
    fn roundtrip_preserves_subject_and_roles() {
        let claims = user_claims(60);
        let token = create_token(&claims, TEST_SECRET).unwrap();
        assert!(!token.is_empty());

        let decoded = decode_token(&token, TEST_SECRET).unwrap();
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.username, "alice");
        assert_eq!(decoded.roles, vec![RoleName::User, RoleName::Pm]);
        assert_eq!(decoded.exp, claims.exp);
    }

    #[test]
    fn expired_token_fails_with_token_expired() {
        // 발급 시점부터 만료된 토큰: 서명은 유효하지만 exp가 과거.
        let mut claims = user_claims(60);
        claims.iat = Utc::now().timestamp() - 7200;
        claims.exp = Utc::now().timestamp() - 3600;

        let token = create_token(&claims, TEST_SECRET).unwrap();
        let err = decode_token(&token, TEST_SECRET).unwrap_err();
        assert!(matches!(err, JwtError::TokenExpired));
    }

    #[test]
    fn wrong_secret_fails_with_invalid_signature() {
        let claims = user_claims(60);
        let token = create_token(&claims, TEST_SECRET).unwrap();

        let err = decode_token(&token, "another-secret-key-also-32-characters!").unwrap_err();
        assert!(matches!(err, JwtError::InvalidSignature));
    }

    #[test]
    fn tampered_payload_fails_with_invalid_signature() {
        let claims = user_claims(60);
        let token = create_token(&claims, TEST_SECRET).unwrap();

        // 서명된 영역(페이로드)의 한 글자를 뒤집는다.
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        assert_eq!(parts.len(), 3);
        let payload = &parts[1];
        let flipped = if payload.starts_with('A') { "B" } else { "A" };
        parts[1] = format!("{}{}", flipped, &payload[1..]);
        let tampered = parts.join(".");

        let err = decode_token(&tampered, TEST_SECRET).unwrap_err();
        assert!(matches!(err, JwtError::InvalidSignature));
    }

    #[test]
    fn garbage_token_is_malformed() {
        assert!(matches!(
            decode_token("not.a.jwt", TEST_SECRET).unwrap_err(),
            JwtError::Malformed
        ));
        assert!(matches!(
            decode_token("", TEST_SECRET).unwrap_err(),
            JwtError::Malformed
        ));
    }

    #[test]
    fn extract_bearer_strips_prefix() {
        assert_eq!(extract_bearer("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        // 접두사 없이 온 값도 그대로 수용한다.
        assert_eq!(extract_bearer("abc.def.ghi").unwrap(), "abc.def.ghi");
    }

    #[test]
    fn extract_bearer_rejects_empty_values() {
        assert!(matches!(extract_bearer("").unwrap_err(), JwtError::Malformed));
        assert!(matches!(
            extract_bearer("Bearer ").unwrap_err(),
            JwtError::Malformed
        ));
        assert!(matches!(
            extract_bearer("Bearer    ").unwrap_err(),
            JwtError::Malformed
        ));
    }

    #[test]
    fn has_role_named_is_exact_match() {
        let claims = user_claims(60);
        assert!(claims.has_role_named("USER"));
        assert!(claims.has_role_named("PM"));
        // 계층 없음, 대소문자 변형 없음.
        assert!(!claims.has_role_named("ADMIN"));
        assert!(!claims.has_role_named("user"));
    }
}
