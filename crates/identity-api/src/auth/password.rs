//! 비밀번호 해싱 및 검증.
//!
//! Argon2id를 사용한 비밀번호 처리. 평문 비밀번호는 해싱 직후
//! 버려지며 어떤 저장 경로에도 닿지 않습니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use identity_core::IdentityError;

/// 비밀번호 최소 길이.
pub const MIN_PASSWORD_LEN: usize = 8;

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// 정책 미달 비밀번호
    #[error("Password must be at least {MIN_PASSWORD_LEN} characters and contain a letter and a digit")]
    TooWeak,
    /// 해싱 실패
    #[error("password hashing failed")]
    Hashing,
}

impl From<PasswordError> for IdentityError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::TooWeak => IdentityError::Validation(err.to_string()),
            PasswordError::Hashing => IdentityError::Hashing,
        }
    }
}

/// 비밀번호 정책 검사.
///
/// 최소 8자, 영문자와 숫자를 각각 하나 이상 포함해야 합니다.
pub fn validate_password_strength(password: &str) -> Result<(), PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordError::TooWeak);
    }
    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(PasswordError::TooWeak);
    }
    Ok(())
}

/// 비밀번호를 Argon2id로 해싱합니다.
///
/// 매 호출마다 새로운 랜덤 솔트를 생성하므로 같은 비밀번호라도
/// 해시 문자열은 매번 다릅니다.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordError::Hashing)
}

/// 비밀번호와 저장된 해시를 대조합니다.
///
/// 해시 파싱 실패나 불일치 모두 `false`로 수렴합니다 — 호출자는
/// 실패 원인을 구분할 수 없어야 합니다.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
